//! Finish-to-start dependency validation between tasks.

use std::collections::HashMap;

use edt_storage::{
    DependencyKind, GatewayError, ScheduleGateway, TaskRecord, WorkPackageFilter,
};

use crate::finding::{EntityKind, Finding};

pub(super) async fn validate_dependencies<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: i64,
) -> Result<Vec<Finding>, GatewayError> {
    let mut findings = Vec::new();

    let packages = gateway
        .list_work_packages(Some(project_id), &WorkPackageFilter::default())
        .await?;
    let mut tasks: HashMap<i64, TaskRecord> = HashMap::new();
    for package in &packages {
        for task in gateway.list_tasks(package.id).await? {
            tasks.insert(task.id, task);
        }
    }

    for dependency in gateway.list_dependencies(project_id).await? {
        // Start-to-start and finish-to-finish edges are stored but not
        // checked; only the finish-to-start rule is implemented.
        if dependency.kind != DependencyKind::FinishToStart {
            continue;
        }
        let (Some(origin), Some(dependent)) = (
            tasks.get(&dependency.origin_task_id),
            tasks.get(&dependency.dependent_task_id),
        ) else {
            continue;
        };

        let origin_end = origin.actual_end.or(origin.planned_end);
        let dependent_start = dependent.actual_start.or(dependent.planned_start);
        if let (Some(end), Some(start)) = (origin_end, dependent_start) {
            if end > start {
                findings.push(
                    Finding::warning(
                        EntityKind::Task,
                        dependent.id,
                        format!(
                            "task '{}' starts {} before its predecessor '{}' finishes {}",
                            dependent.name, start, origin.name, end
                        ),
                    )
                    .with_suggestion("shift the dependent task to after its predecessor's finish"),
                );
            }
        }
    }

    Ok(findings)
}
