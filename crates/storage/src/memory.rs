//! In-memory gateway over a deserialized portfolio snapshot.
//!
//! Backs the test suites and the CLI snapshot runner. All queries are
//! linear scans over plain vectors, preserving insertion order so results
//! are deterministic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::GatewayError;
use crate::record::{
    ActivityRecord, CategoryRecord, DependencyRecord, HourLogRecord, PhaseRecord, ProjectRecord,
    TaskRecord, WorkPackageFilter, WorkPackageRecord,
};
use crate::traits::ScheduleGateway;

/// A complete portfolio snapshot: every record the engine can read.
///
/// This is also the CLI's JSON input format; every section may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotData {
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
    #[serde(default)]
    pub phases: Vec<PhaseRecord>,
    #[serde(default)]
    pub work_packages: Vec<WorkPackageRecord>,
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub dependencies: Vec<DependencyRecord>,
    #[serde(default)]
    pub hour_logs: Vec<HourLogRecord>,
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
}

/// A gateway that serves a fixed `SnapshotData` from memory.
pub struct InMemoryGateway {
    data: SnapshotData,
}

impl InMemoryGateway {
    /// Create a gateway over the given snapshot.
    pub fn new(data: SnapshotData) -> Self {
        Self { data }
    }

    /// Create a gateway with no records at all.
    pub fn empty() -> Self {
        Self {
            data: SnapshotData::default(),
        }
    }

    /// The project a task belongs to, resolved through its work package
    /// (directly, or via its activity).
    fn project_of_task(&self, task: &TaskRecord) -> Option<i64> {
        let work_package_id = task.work_package_id.or_else(|| {
            let activity_id = task.activity_id?;
            self.data
                .activities
                .iter()
                .find(|a| a.id == activity_id)
                .map(|a| a.work_package_id)
        })?;
        self.data
            .work_packages
            .iter()
            .find(|w| w.id == work_package_id)
            .map(|w| w.project_id)
    }
}

#[async_trait]
impl ScheduleGateway for InMemoryGateway {
    async fn get_project(&self, id: i64) -> Result<Option<ProjectRecord>, GatewayError> {
        Ok(self.data.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, GatewayError> {
        Ok(self.data.projects.clone())
    }

    async fn list_phases(&self, project_id: i64) -> Result<Vec<PhaseRecord>, GatewayError> {
        Ok(self
            .data
            .phases
            .iter()
            .filter(|p| p.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_work_packages(
        &self,
        project_id: Option<i64>,
        filter: &WorkPackageFilter,
    ) -> Result<Vec<WorkPackageRecord>, GatewayError> {
        Ok(self
            .data
            .work_packages
            .iter()
            .filter(|w| project_id.is_none_or(|id| w.project_id == id))
            .filter(|w| filter.matches(w))
            .cloned()
            .collect())
    }

    async fn list_activities(
        &self,
        work_package_id: i64,
    ) -> Result<Vec<ActivityRecord>, GatewayError> {
        Ok(self
            .data
            .activities
            .iter()
            .filter(|a| a.work_package_id == work_package_id)
            .cloned()
            .collect())
    }

    async fn list_tasks(&self, work_package_id: i64) -> Result<Vec<TaskRecord>, GatewayError> {
        let activity_ids: Vec<i64> = self
            .data
            .activities
            .iter()
            .filter(|a| a.work_package_id == work_package_id)
            .map(|a| a.id)
            .collect();
        Ok(self
            .data
            .tasks
            .iter()
            .filter(|t| {
                t.work_package_id == Some(work_package_id)
                    || t.activity_id.is_some_and(|id| activity_ids.contains(&id))
            })
            .cloned()
            .collect())
    }

    async fn list_dependencies(
        &self,
        project_id: i64,
    ) -> Result<Vec<DependencyRecord>, GatewayError> {
        Ok(self
            .data
            .dependencies
            .iter()
            .filter(|d| {
                self.data
                    .tasks
                    .iter()
                    .find(|t| t.id == d.origin_task_id)
                    .and_then(|t| self.project_of_task(t))
                    == Some(project_id)
            })
            .cloned()
            .collect())
    }

    async fn list_hour_logs(
        &self,
        work_package_id: i64,
        since: Option<Date>,
    ) -> Result<Vec<HourLogRecord>, GatewayError> {
        Ok(self
            .data
            .hour_logs
            .iter()
            .filter(|h| h.work_package_id == work_package_id)
            .filter(|h| since.is_none_or(|cutoff| h.work_date >= cutoff))
            .cloned()
            .collect())
    }

    async fn list_categories(&self, ids: &[i64]) -> Result<Vec<CategoryRecord>, GatewayError> {
        Ok(self
            .data
            .categories
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DependencyKind, WorkStatus};
    use rust_decimal::Decimal;
    use time::macros::date;

    fn project(id: i64) -> ProjectRecord {
        ProjectRecord {
            id,
            name: format!("project {}", id),
            status: "active".to_string(),
            planned_start: Some(date!(2024 - 01 - 01)),
            planned_end: Some(date!(2024 - 12 - 31)),
        }
    }

    fn package(id: i64, project_id: i64) -> WorkPackageRecord {
        WorkPackageRecord {
            id,
            project_id,
            phase_id: None,
            category_id: None,
            responsible_id: None,
            name: format!("wp {}", id),
            status: WorkStatus::Planned,
            planned_hours: Some(Decimal::from(40)),
            actual_hours: None,
            planned_start: Some(date!(2024 - 02 - 01)),
            planned_end: Some(date!(2024 - 03 - 01)),
            actual_end: None,
            progress: 0,
        }
    }

    fn task(id: i64, activity_id: Option<i64>, work_package_id: Option<i64>) -> TaskRecord {
        TaskRecord {
            id,
            activity_id,
            work_package_id,
            name: format!("task {}", id),
            status: WorkStatus::Planned,
            planned_start: None,
            planned_end: None,
            actual_start: None,
            actual_end: None,
            progress: 0,
        }
    }

    fn snapshot() -> SnapshotData {
        SnapshotData {
            projects: vec![project(1), project(2)],
            work_packages: vec![package(10, 1), package(11, 1), package(20, 2)],
            activities: vec![ActivityRecord {
                id: 100,
                work_package_id: 10,
                name: "design".to_string(),
                planned_start: None,
                planned_end: None,
            }],
            tasks: vec![
                task(1000, Some(100), None),
                task(1001, None, Some(10)),
                task(2000, None, Some(20)),
            ],
            dependencies: vec![
                DependencyRecord {
                    id: 1,
                    origin_task_id: 1000,
                    dependent_task_id: 1001,
                    kind: DependencyKind::FinishToStart,
                },
                DependencyRecord {
                    id: 2,
                    origin_task_id: 2000,
                    dependent_task_id: 1000,
                    kind: DependencyKind::FinishToStart,
                },
            ],
            hour_logs: vec![
                HourLogRecord {
                    id: 1,
                    work_package_id: 10,
                    hours_worked: Decimal::from(4),
                    work_date: date!(2024 - 02 - 05),
                },
                HourLogRecord {
                    id: 2,
                    work_package_id: 10,
                    hours_worked: Decimal::from(6),
                    work_date: date!(2024 - 02 - 20),
                },
            ],
            categories: vec![CategoryRecord {
                id: 7,
                name: "civil".to_string(),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn get_project_by_id() {
        let gateway = InMemoryGateway::new(snapshot());
        assert_eq!(gateway.get_project(1).await.unwrap().unwrap().id, 1);
        assert!(gateway.get_project(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn work_packages_scoped_and_global() {
        let gateway = InMemoryGateway::new(snapshot());
        let scoped = gateway
            .list_work_packages(Some(1), &WorkPackageFilter::default())
            .await
            .unwrap();
        assert_eq!(scoped.len(), 2);
        let global = gateway
            .list_work_packages(None, &WorkPackageFilter::default())
            .await
            .unwrap();
        assert_eq!(global.len(), 3);
    }

    #[tokio::test]
    async fn tasks_include_activity_and_direct_attachment() {
        let gateway = InMemoryGateway::new(snapshot());
        let tasks = gateway.list_tasks(10).await.unwrap();
        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1000, 1001]);
    }

    #[tokio::test]
    async fn dependencies_keyed_by_origin_project() {
        let gateway = InMemoryGateway::new(snapshot());
        let deps = gateway.list_dependencies(1).await.unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].origin_task_id, 1000);

        // Edge 2 originates from project 2's task even though it points
        // into project 1.
        let deps = gateway.list_dependencies(2).await.unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].origin_task_id, 2000);
    }

    #[tokio::test]
    async fn hour_logs_respect_since_cutoff() {
        let gateway = InMemoryGateway::new(snapshot());
        let all = gateway.list_hour_logs(10, None).await.unwrap();
        assert_eq!(all.len(), 2);
        let recent = gateway
            .list_hour_logs(10, Some(date!(2024 - 02 - 10)))
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].work_date, date!(2024 - 02 - 20));
    }

    #[tokio::test]
    async fn categories_resolved_by_id() {
        let gateway = InMemoryGateway::new(snapshot());
        let found = gateway.list_categories(&[7, 99]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "civil");
    }

    #[tokio::test]
    async fn snapshot_sections_default_to_empty() {
        let data: SnapshotData = serde_json::from_str("{}").unwrap();
        let gateway = InMemoryGateway::new(data);
        assert!(gateway.list_projects().await.unwrap().is_empty());
    }
}
