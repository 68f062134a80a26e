//! Project-level validation.

use edt_storage::{GatewayError, ScheduleGateway, WorkPackageFilter};

use crate::finding::{EntityKind, Finding};

pub(super) fn not_found(project_id: i64) -> Finding {
    Finding::error(
        EntityKind::Project,
        project_id,
        format!("project {} not found", project_id),
    )
    .with_suggestion("verify the project id before requesting validation")
}

/// Validate the project record itself: presence, date completeness, date
/// ordering, and a non-empty schedule underneath it.
pub(super) async fn validate_project<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: i64,
) -> Result<Vec<Finding>, GatewayError> {
    let mut findings = Vec::new();

    let Some(project) = gateway.get_project(project_id).await? else {
        findings.push(not_found(project_id));
        return Ok(findings);
    };

    if project.planned_start.is_none() {
        findings.push(
            Finding::error(
                EntityKind::Project,
                project.id,
                format!("project '{}' has no planned start date", project.name),
            )
            .with_field("planned_start")
            .with_suggestion("set the project's planned start date"),
        );
    }
    if project.planned_end.is_none() {
        findings.push(
            Finding::error(
                EntityKind::Project,
                project.id,
                format!("project '{}' has no planned end date", project.name),
            )
            .with_field("planned_end")
            .with_suggestion("set the project's planned end date"),
        );
    }
    if let (Some(start), Some(end)) = (project.planned_start, project.planned_end) {
        if start >= end {
            findings.push(
                Finding::error(
                    EntityKind::Project,
                    project.id,
                    format!(
                        "project '{}' planned start {} is not before its planned end {}",
                        project.name, start, end
                    ),
                )
                .with_field("planned_start")
                .with_suggestion("adjust the planned dates so the start precedes the end"),
            );
        }
    }

    let phases = gateway.list_phases(project_id).await?;
    let packages = gateway
        .list_work_packages(Some(project_id), &WorkPackageFilter::default())
        .await?;
    if phases.is_empty() && packages.is_empty() {
        findings.push(
            Finding::warning(
                EntityKind::Project,
                project.id,
                format!(
                    "project '{}' has no phases and no work packages",
                    project.name
                ),
            )
            .with_suggestion("break the project down into phases or work packages"),
        );
    }

    Ok(findings)
}
