use async_trait::async_trait;
use time::Date;

use crate::error::GatewayError;
use crate::record::{
    ActivityRecord, CategoryRecord, DependencyRecord, HourLogRecord, PhaseRecord, ProjectRecord,
    TaskRecord, WorkPackageFilter, WorkPackageRecord,
};

/// Read access to the schedule hierarchy and its associated records.
///
/// The validation and analytics engines consume a consistent snapshot per
/// invocation through this trait; all writes belong to the surrounding CRUD
/// application and are out of scope here. Implementations back onto a
/// relational store, an HTTP API, or (for tests and the CLI) plain memory.
///
/// ## Scope arguments
///
/// `list_work_packages` takes `Option<project_id>`: `Some` restricts to a
/// single project, `None` is portfolio-wide scope for the cross-project
/// analytics. All other listings are keyed by their parent id.
///
/// ## Thread safety
///
/// Implementations must be `Send + Sync` so one gateway can serve several
/// in-flight request computations.
#[async_trait]
pub trait ScheduleGateway: Send + Sync {
    /// Fetch one project, `None` when the id is unknown.
    async fn get_project(&self, id: i64) -> Result<Option<ProjectRecord>, GatewayError>;

    /// List every project in the portfolio.
    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, GatewayError>;

    /// List the phases of a project, in storage order.
    async fn list_phases(&self, project_id: i64) -> Result<Vec<PhaseRecord>, GatewayError>;

    /// List work packages, optionally scoped to a project, applying the filter.
    async fn list_work_packages(
        &self,
        project_id: Option<i64>,
        filter: &WorkPackageFilter,
    ) -> Result<Vec<WorkPackageRecord>, GatewayError>;

    /// List the activities of a work package.
    async fn list_activities(
        &self,
        work_package_id: i64,
    ) -> Result<Vec<ActivityRecord>, GatewayError>;

    /// List every task under a work package: tasks of its activities plus
    /// tasks attached directly to the package.
    async fn list_tasks(&self, work_package_id: i64) -> Result<Vec<TaskRecord>, GatewayError>;

    /// List dependency edges whose origin task belongs to the project.
    async fn list_dependencies(
        &self,
        project_id: i64,
    ) -> Result<Vec<DependencyRecord>, GatewayError>;

    /// List hour-log entries for a work package, optionally only those with
    /// a work date on or after `since`.
    async fn list_hour_logs(
        &self,
        work_package_id: i64,
        since: Option<Date>,
    ) -> Result<Vec<HourLogRecord>, GatewayError>;

    /// Resolve category names for the given ids. Unknown ids are simply
    /// absent from the result.
    async fn list_categories(&self, ids: &[i64]) -> Result<Vec<CategoryRecord>, GatewayError>;
}
