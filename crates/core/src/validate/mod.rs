//! Validation orchestration -- structural and temporal checks across the
//! Project, Phase, WorkPackage, Activity, and Task levels, plus
//! finish-to-start dependency ordering.
//!
//! Each stage fetches its own inputs and is isolated at its boundary: a
//! gateway failure inside one stage becomes a single synthetic error
//! finding naming the stage, and the remaining stages still run.

mod activity;
mod dependency;
mod phase;
mod project;
mod task;
mod work_package;

use std::fmt;

use edt_storage::{GatewayError, ScheduleGateway, WorkPackageFilter};

use crate::finding::{EntityKind, Finding, ValidationReport, ValidationStats};

/// One stage of the fixed validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStage {
    Project,
    Phases,
    WorkPackages,
    Activities,
    Tasks,
    Dependencies,
}

impl ValidationStage {
    /// Every stage, in execution order.
    pub const ALL: [ValidationStage; 6] = [
        ValidationStage::Project,
        ValidationStage::Phases,
        ValidationStage::WorkPackages,
        ValidationStage::Activities,
        ValidationStage::Tasks,
        ValidationStage::Dependencies,
    ];
}

impl fmt::Display for ValidationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationStage::Project => "project",
            ValidationStage::Phases => "phase",
            ValidationStage::WorkPackages => "work package",
            ValidationStage::Activities => "activity",
            ValidationStage::Tasks => "task",
            ValidationStage::Dependencies => "dependency",
        };
        f.write_str(name)
    }
}

/// Walk the five hierarchy levels of one project and return the union of
/// their findings.
///
/// A missing project short-circuits: the only finding is the not-found
/// error. Everything else runs to completion regardless of what the
/// earlier levels reported.
pub async fn validate_hierarchy<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: i64,
) -> Result<Vec<Finding>, GatewayError> {
    if gateway.get_project(project_id).await?.is_none() {
        return Ok(vec![project::not_found(project_id)]);
    }
    let mut findings = project::validate_project(gateway, project_id).await?;
    findings.extend(phase::validate_phases(gateway, project_id).await?);
    findings.extend(work_package::validate_work_packages(gateway, project_id).await?);
    findings.extend(activity::validate_activities(gateway, project_id).await?);
    findings.extend(task::validate_tasks(gateway, project_id).await?);
    Ok(findings)
}

/// Check every stored finish-to-start edge whose origin task belongs to
/// the project.
pub async fn validate_dependencies<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: i64,
) -> Result<Vec<Finding>, GatewayError> {
    dependency::validate_dependencies(gateway, project_id).await
}

/// Run the requested stages in the fixed order, isolating failures at
/// each stage boundary, and assemble the report.
pub async fn run_stages<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: i64,
    stages: &[ValidationStage],
) -> ValidationReport {
    let mut findings = Vec::new();

    for stage in ValidationStage::ALL
        .iter()
        .copied()
        .filter(|s| stages.contains(s))
    {
        let result = match stage {
            ValidationStage::Project => project::validate_project(gateway, project_id).await,
            ValidationStage::Phases => phase::validate_phases(gateway, project_id).await,
            ValidationStage::WorkPackages => {
                work_package::validate_work_packages(gateway, project_id).await
            }
            ValidationStage::Activities => activity::validate_activities(gateway, project_id).await,
            ValidationStage::Tasks => task::validate_tasks(gateway, project_id).await,
            ValidationStage::Dependencies => {
                dependency::validate_dependencies(gateway, project_id).await
            }
        };
        match result {
            Ok(stage_findings) => findings.extend(stage_findings),
            Err(err) => {
                tracing::warn!(%stage, project_id, error = %err, "validation stage failed");
                findings.push(
                    Finding::error(
                        EntityKind::Project,
                        project_id,
                        format!("{} validation could not run: {}", stage, err),
                    )
                    .with_suggestion("check the data gateway and re-run the validation"),
                );
            }
        }
    }

    let stats = collect_stats(gateway, project_id).await;
    ValidationReport::from_findings(findings, stats)
}

/// Run the full fixed stage order for one project.
pub async fn run_full_validation<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: i64,
) -> ValidationReport {
    run_stages(gateway, project_id, &ValidationStage::ALL).await
}

/// Best-effort record counts. The report's stats are approximate by
/// contract, so a failing count query degrades to zeros.
async fn collect_stats<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: i64,
) -> ValidationStats {
    match try_collect_stats(gateway, project_id).await {
        Ok(stats) => stats,
        Err(err) => {
            tracing::warn!(project_id, error = %err, "stats collection failed");
            ValidationStats::default()
        }
    }
}

async fn try_collect_stats<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: i64,
) -> Result<ValidationStats, GatewayError> {
    let mut stats = ValidationStats {
        phases: gateway.list_phases(project_id).await?.len(),
        ..Default::default()
    };
    let packages = gateway
        .list_work_packages(Some(project_id), &WorkPackageFilter::default())
        .await?;
    stats.work_packages = packages.len();
    for package in &packages {
        stats.activities += gateway.list_activities(package.id).await?.len();
        stats.tasks += gateway.list_tasks(package.id).await?.len();
    }
    stats.dependencies = gateway.list_dependencies(project_id).await?.len();
    Ok(stats)
}
