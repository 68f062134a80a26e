mod error;
mod memory;
mod record;
mod traits;

pub use error::GatewayError;
pub use memory::{InMemoryGateway, SnapshotData};
pub use record::{
    ActivityRecord, CategoryRecord, DependencyKind, DependencyRecord, HourLogRecord, PhaseRecord,
    ProjectRecord, TaskRecord, WorkPackageFilter, WorkPackageRecord, WorkStatus,
};
pub use traits::ScheduleGateway;
