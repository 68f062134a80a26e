//! Task-level validation: containment within the parent activity's window
//! and the completed-status progress invariant.

use std::collections::HashMap;

use edt_storage::{ActivityRecord, GatewayError, ScheduleGateway, WorkPackageFilter, WorkStatus};

use crate::finding::{EntityKind, Finding};

pub(super) async fn validate_tasks<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: i64,
) -> Result<Vec<Finding>, GatewayError> {
    let mut findings = Vec::new();

    let packages = gateway
        .list_work_packages(Some(project_id), &WorkPackageFilter::default())
        .await?;

    for package in &packages {
        let activities: HashMap<i64, ActivityRecord> = gateway
            .list_activities(package.id)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();
        let tasks = gateway.list_tasks(package.id).await?;

        for task in &tasks {
            // Containment applies to tasks attached to an activity; the
            // actual date wins over the planned one when both exist.
            if let Some(activity) = task.activity_id.and_then(|id| activities.get(&id)) {
                let task_start = task.actual_start.or(task.planned_start);
                if let (Some(start), Some(activity_start)) = (task_start, activity.planned_start) {
                    if start < activity_start {
                        findings.push(
                            Finding::warning(
                                EntityKind::Task,
                                task.id,
                                format!(
                                    "task '{}' starts {} before its activity '{}' starts {}",
                                    task.name, start, activity.name, activity_start
                                ),
                            )
                            .with_field("start")
                            .with_suggestion("move the task inside the activity's planned window"),
                        );
                    }
                }
                let task_end = task.actual_end.or(task.planned_end);
                if let (Some(end), Some(activity_end)) = (task_end, activity.planned_end) {
                    if end > activity_end {
                        findings.push(
                            Finding::warning(
                                EntityKind::Task,
                                task.id,
                                format!(
                                    "task '{}' ends {} after its activity '{}' ends {}",
                                    task.name, end, activity.name, activity_end
                                ),
                            )
                            .with_field("end")
                            .with_suggestion("move the task inside the activity's planned window"),
                        );
                    }
                }
            }

            if task.status == WorkStatus::Completed && task.progress != 100 {
                findings.push(
                    Finding::error(
                        EntityKind::Task,
                        task.id,
                        format!(
                            "completed task '{}' reports {}% progress",
                            task.name, task.progress
                        ),
                    )
                    .with_field("progress")
                    .with_suggestion("set progress to 100 or reopen the task"),
                );
            }
        }
    }

    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Severity;
    use edt_storage::{InMemoryGateway, SnapshotData, TaskRecord, WorkPackageRecord};
    use rust_decimal::Decimal;
    use time::macros::date;

    fn package() -> WorkPackageRecord {
        WorkPackageRecord {
            id: 1,
            project_id: 1,
            phase_id: Some(1),
            category_id: None,
            responsible_id: Some(2),
            name: "electrical".to_string(),
            status: WorkStatus::InProgress,
            planned_hours: Some(Decimal::from(60)),
            actual_hours: None,
            planned_start: Some(date!(2024 - 02 - 01)),
            planned_end: Some(date!(2024 - 05 - 01)),
            actual_end: None,
            progress: 40,
        }
    }

    fn activity() -> edt_storage::ActivityRecord {
        edt_storage::ActivityRecord {
            id: 10,
            work_package_id: 1,
            name: "wiring".to_string(),
            planned_start: Some(date!(2024 - 02 - 10)),
            planned_end: Some(date!(2024 - 03 - 10)),
        }
    }

    fn task(id: i64) -> TaskRecord {
        TaskRecord {
            id,
            activity_id: Some(10),
            work_package_id: None,
            name: format!("task {}", id),
            status: WorkStatus::InProgress,
            planned_start: Some(date!(2024 - 02 - 12)),
            planned_end: Some(date!(2024 - 03 - 01)),
            actual_start: None,
            actual_end: None,
            progress: 50,
        }
    }

    fn snapshot(tasks: Vec<TaskRecord>) -> SnapshotData {
        SnapshotData {
            work_packages: vec![package()],
            activities: vec![activity()],
            tasks,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn contained_task_is_clean() {
        let gateway = InMemoryGateway::new(snapshot(vec![task(100)]));
        let findings = validate_tasks(&gateway, 1).await.unwrap();
        assert!(findings.is_empty(), "unexpected: {:?}", findings);
    }

    #[tokio::test]
    async fn actual_start_outside_activity_window_warns() {
        let mut early = task(100);
        early.actual_start = Some(date!(2024 - 02 - 05));
        let gateway = InMemoryGateway::new(snapshot(vec![early]));
        let findings = validate_tasks(&gateway, 1).await.unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("before its activity"));
    }

    #[tokio::test]
    async fn end_past_activity_window_warns() {
        let mut late = task(100);
        late.planned_end = Some(date!(2024 - 04 - 01));
        let gateway = InMemoryGateway::new(snapshot(vec![late]));
        let findings = validate_tasks(&gateway, 1).await.unwrap();
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("after its activity"));
    }

    #[tokio::test]
    async fn detached_task_skips_containment() {
        let mut direct = task(100);
        direct.activity_id = None;
        direct.work_package_id = Some(1);
        direct.planned_start = Some(date!(2024 - 01 - 01));
        let gateway = InMemoryGateway::new(snapshot(vec![direct]));
        let findings = validate_tasks(&gateway, 1).await.unwrap();
        assert!(findings.is_empty());
    }

    #[tokio::test]
    async fn completed_task_progress_invariant() {
        let mut done = task(100);
        done.status = WorkStatus::Completed;
        done.progress = 90;
        let gateway = InMemoryGateway::new(snapshot(vec![done]));
        let findings = validate_tasks(&gateway, 1).await.unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);

        let mut done = task(101);
        done.status = WorkStatus::Completed;
        done.progress = 100;
        let gateway = InMemoryGateway::new(snapshot(vec![done]));
        assert!(validate_tasks(&gateway, 1).await.unwrap().is_empty());
    }
}
