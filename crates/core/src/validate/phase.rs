//! Phase-level validation: ordering, date completeness, non-empty phases.

use edt_storage::{GatewayError, ScheduleGateway, WorkPackageFilter};

use crate::finding::{EntityKind, Finding};

pub(super) async fn validate_phases<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: i64,
) -> Result<Vec<Finding>, GatewayError> {
    let mut findings = Vec::new();

    let mut phases = gateway.list_phases(project_id).await?;
    phases.sort_by_key(|p| p.order_index);
    let packages = gateway
        .list_work_packages(Some(project_id), &WorkPackageFilter::default())
        .await?;

    for (position, phase) in phases.iter().enumerate() {
        let expected = position as i32 + 1;
        if phase.order_index != expected {
            // Gaps and duplicates both surface here; the validator reports,
            // it never renumbers.
            findings.push(
                Finding::warning(
                    EntityKind::Phase,
                    phase.id,
                    format!(
                        "phase '{}' has order {}, expected {} from its position",
                        phase.name, phase.order_index, expected
                    ),
                )
                .with_field("order_index")
                .with_suggestion("renumber the project's phases sequentially from 1"),
            );
        }

        if phase.planned_start.is_none() {
            findings.push(
                Finding::error(
                    EntityKind::Phase,
                    phase.id,
                    format!("phase '{}' has no planned start date", phase.name),
                )
                .with_field("planned_start")
                .with_suggestion("set the phase's planned start date"),
            );
        }
        if phase.planned_end.is_none() {
            findings.push(
                Finding::error(
                    EntityKind::Phase,
                    phase.id,
                    format!("phase '{}' has no planned end date", phase.name),
                )
                .with_field("planned_end")
                .with_suggestion("set the phase's planned end date"),
            );
        }

        if !packages.iter().any(|w| w.phase_id == Some(phase.id)) {
            findings.push(
                Finding::warning(
                    EntityKind::Phase,
                    phase.id,
                    format!("phase '{}' has no work packages", phase.name),
                )
                .with_suggestion("assign work packages to the phase or remove it"),
            );
        }
    }

    Ok(findings)
}
