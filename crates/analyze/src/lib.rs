//! Analytics over the EDT schedule hierarchy and its hour-log ledger.
//!
//! Each analysis lives in its own module and produces a serializable
//! result struct from the [`edt_storage::ScheduleGateway`] alone: KPI
//! aggregation, monthly trend extraction, per-category performance
//! classification, and rule-based alerting. The dashboard module composes
//! the four into one executive view, degrading section by section when a
//! sub-computation fails.
//!
//! Every computation is a stateless read over a snapshot; calling an
//! entry point twice against unchanged data yields identical output.

pub mod alert;
pub mod dashboard;
pub mod kpi;
pub mod performance;
mod rates;
pub mod trend;

pub use alert::{generate_alerts, generate_alerts_at, Alert, AlertKind, AlertSeverity};
pub use dashboard::{
    executive_dashboard, executive_dashboard_at, DashboardReport, ProjectAlertSummary,
};
pub use kpi::{compute_kpis, KpiSnapshot, StatusCounts};
pub use performance::{performance_by_category, CategoryPerformance, PerformanceTier};
pub use trend::{monthly_trends, monthly_trends_at, TrendPoint, DEFAULT_MONTHS_BACK};
