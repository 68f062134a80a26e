//! Work-package (EDT) validation: assignment, dates, budget, ownership,
//! and the completed-status invariants.

use edt_storage::{GatewayError, ScheduleGateway, WorkPackageFilter, WorkStatus};
use rust_decimal::Decimal;

use crate::finding::{EntityKind, Finding};

pub(super) async fn validate_work_packages<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: i64,
) -> Result<Vec<Finding>, GatewayError> {
    let mut findings = Vec::new();

    let packages = gateway
        .list_work_packages(Some(project_id), &WorkPackageFilter::default())
        .await?;

    for package in &packages {
        if package.phase_id.is_none() {
            findings.push(
                Finding::warning(
                    EntityKind::WorkPackage,
                    package.id,
                    format!("work package '{}' is not assigned to a phase", package.name),
                )
                .with_field("phase_id")
                .with_suggestion("attach the package to one of the project's phases"),
            );
        }

        if package.planned_start.is_none() {
            findings.push(
                Finding::error(
                    EntityKind::WorkPackage,
                    package.id,
                    format!("work package '{}' has no planned start date", package.name),
                )
                .with_field("planned_start")
                .with_suggestion("set the package's planned start date"),
            );
        }
        if package.planned_end.is_none() {
            findings.push(
                Finding::error(
                    EntityKind::WorkPackage,
                    package.id,
                    format!("work package '{}' has no planned end date", package.name),
                )
                .with_field("planned_end")
                .with_suggestion("set the package's planned end date"),
            );
        }

        if package.responsible_id.is_none() {
            findings.push(
                Finding::warning(
                    EntityKind::WorkPackage,
                    package.id,
                    format!("work package '{}' has no responsible person", package.name),
                )
                .with_field("responsible_id")
                .with_suggestion("assign a responsible person to the package"),
            );
        }

        if !package
            .planned_hours
            .is_some_and(|hours| hours > Decimal::ZERO)
        {
            findings.push(
                Finding::warning(
                    EntityKind::WorkPackage,
                    package.id,
                    format!("work package '{}' has no positive hour budget", package.name),
                )
                .with_field("planned_hours")
                .with_suggestion("estimate and record the package's planned hours"),
            );
        }

        if package.status == WorkStatus::Completed {
            if package.actual_end.is_none() {
                findings.push(
                    Finding::error(
                        EntityKind::WorkPackage,
                        package.id,
                        format!(
                            "completed work package '{}' has no actual end date",
                            package.name
                        ),
                    )
                    .with_field("actual_end")
                    .with_suggestion("record the actual completion date"),
                );
            }
            if package.progress != 100 {
                findings.push(
                    Finding::error(
                        EntityKind::WorkPackage,
                        package.id,
                        format!(
                            "completed work package '{}' reports {}% progress",
                            package.name, package.progress
                        ),
                    )
                    .with_field("progress")
                    .with_suggestion("set progress to 100 or reopen the package"),
                );
            }
        }

        let activities = gateway.list_activities(package.id).await?;
        if activities.is_empty() {
            findings.push(
                Finding::warning(
                    EntityKind::WorkPackage,
                    package.id,
                    format!("work package '{}' has no activities", package.name),
                )
                .with_suggestion("break the package down into activities"),
            );
        }
    }

    Ok(findings)
}
