//! Activity-level validation: date containment within the parent work
//! package and non-empty task lists.

use edt_storage::{GatewayError, ScheduleGateway, WorkPackageFilter};

use crate::finding::{EntityKind, Finding};

pub(super) async fn validate_activities<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: i64,
) -> Result<Vec<Finding>, GatewayError> {
    let mut findings = Vec::new();

    let packages = gateway
        .list_work_packages(Some(project_id), &WorkPackageFilter::default())
        .await?;

    for package in &packages {
        let activities = gateway.list_activities(package.id).await?;
        if activities.is_empty() {
            continue;
        }
        let tasks = gateway.list_tasks(package.id).await?;

        for activity in &activities {
            // Containment is only judged when both sides of a comparison
            // carry a date; absence is the work-package stage's concern.
            if let (Some(activity_start), Some(package_start)) =
                (activity.planned_start, package.planned_start)
            {
                if activity_start < package_start {
                    findings.push(
                        Finding::warning(
                            EntityKind::Activity,
                            activity.id,
                            format!(
                                "activity '{}' starts {} before its work package '{}' starts {}",
                                activity.name, activity_start, package.name, package_start
                            ),
                        )
                        .with_field("planned_start")
                        .with_suggestion("move the activity inside the package's planned window"),
                    );
                }
            }
            if let (Some(activity_end), Some(package_end)) =
                (activity.planned_end, package.planned_end)
            {
                if activity_end > package_end {
                    findings.push(
                        Finding::warning(
                            EntityKind::Activity,
                            activity.id,
                            format!(
                                "activity '{}' ends {} after its work package '{}' ends {}",
                                activity.name, activity_end, package.name, package_end
                            ),
                        )
                        .with_field("planned_end")
                        .with_suggestion("move the activity inside the package's planned window"),
                    );
                }
            }

            if !tasks.iter().any(|t| t.activity_id == Some(activity.id)) {
                findings.push(
                    Finding::warning(
                        EntityKind::Activity,
                        activity.id,
                        format!("activity '{}' has no tasks", activity.name),
                    )
                    .with_suggestion("break the activity down into tasks"),
                );
            }
        }
    }

    Ok(findings)
}
