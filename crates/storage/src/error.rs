/// All errors that can be returned by a ScheduleGateway implementation.
///
/// The gateway is read-only, so "not found" is not an error: a missing
/// project comes back as `None` and empty relations come back as empty
/// vectors. Only backend faults (connection loss, malformed rows,
/// serialization problems) surface here.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A backend-specific failure (DB connection, query, deserialization).
    #[error("gateway backend error: {0}")]
    Backend(String),
}
