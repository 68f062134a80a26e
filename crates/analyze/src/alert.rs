//! Rule-based alert generation over work packages and their hour logs.
//!
//! Four independent passes (overdue, due soon, hour deviation, stale),
//! each scanning the scope's work packages; the final list is stably
//! sorted by severity so ties keep their discovery order.

use edt_storage::{GatewayError, ScheduleGateway, WorkPackageFilter, WorkPackageRecord, WorkStatus};
use serde::Serialize;
use serde_json::json;
use time::{Date, Duration, OffsetDateTime};

use crate::rates;

const OVERDUE_HIGH_AFTER_DAYS: i64 = 7;
const DUE_SOON_WINDOW_DAYS: i64 = 7;
const DUE_SOON_HIGH_WITHIN_DAYS: i64 = 3;
const DEVIATION_ALERT_OVER_PCT: i64 = 25;
const DEVIATION_HIGH_OVER_PCT: i64 = 50;
const STALE_AFTER_DAYS: i64 = 7;

/// The rule class that produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Overdue,
    DueSoon,
    HourDeviation,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    High,
    Medium,
    Low,
}

impl AlertSeverity {
    /// Rank used for ordering: high outranks medium outranks low.
    pub fn rank(self) -> u8 {
        match self {
            AlertSeverity::High => 3,
            AlertSeverity::Medium => 2,
            AlertSeverity::Low => 1,
        }
    }
}

/// One ranked alert about a work package.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub title: String,
    pub description: String,
    pub project_id: i64,
    pub work_package_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<i64>,
    pub detected_at: OffsetDateTime,
    /// Rule-specific payload for the consuming screen.
    pub detail: serde_json::Value,
}

impl Alert {
    fn new(
        kind: AlertKind,
        severity: AlertSeverity,
        title: impl Into<String>,
        description: impl Into<String>,
        package: &WorkPackageRecord,
        detail: serde_json::Value,
    ) -> Self {
        Alert {
            kind,
            severity,
            title: title.into(),
            description: description.into(),
            project_id: package.project_id,
            work_package_id: package.id,
            responsible_id: package.responsible_id,
            detected_at: OffsetDateTime::now_utc(),
            detail,
        }
    }
}

/// True for the statuses the schedule rules watch: still-open packages.
fn is_open(package: &WorkPackageRecord) -> bool {
    matches!(
        package.status,
        WorkStatus::InProgress | WorkStatus::Planned
    )
}

/// Scan the scope's work packages with all four alert rules.
pub async fn generate_alerts<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: Option<i64>,
) -> Result<Vec<Alert>, GatewayError> {
    generate_alerts_at(gateway, project_id, OffsetDateTime::now_utc().date()).await
}

/// Scan with an explicit reference date.
pub async fn generate_alerts_at<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: Option<i64>,
    today: Date,
) -> Result<Vec<Alert>, GatewayError> {
    let packages = gateway
        .list_work_packages(project_id, &WorkPackageFilter::default())
        .await?;

    let mut alerts = Vec::new();

    // Pass 1: planned end already behind us.
    for package in &packages {
        if !is_open(package) {
            continue;
        }
        if let Some(end) = package.planned_end {
            if end < today {
                let days_overdue = (today - end).whole_days();
                let severity = if days_overdue > OVERDUE_HIGH_AFTER_DAYS {
                    AlertSeverity::High
                } else {
                    AlertSeverity::Medium
                };
                alerts.push(Alert::new(
                    AlertKind::Overdue,
                    severity,
                    "work package overdue",
                    format!(
                        "'{}' was planned to finish {} and is {} day(s) overdue",
                        package.name, end, days_overdue
                    ),
                    package,
                    json!({ "planned_end": end, "days_overdue": days_overdue }),
                ));
            }
        }
    }

    // Pass 2: planned end inside the coming week.
    for package in &packages {
        if !is_open(package) {
            continue;
        }
        if let Some(end) = package.planned_end {
            if end >= today && end <= today + Duration::days(DUE_SOON_WINDOW_DAYS) {
                let days_remaining = (end - today).whole_days();
                let severity = if days_remaining <= DUE_SOON_HIGH_WITHIN_DAYS {
                    AlertSeverity::High
                } else {
                    AlertSeverity::Medium
                };
                alerts.push(Alert::new(
                    AlertKind::DueSoon,
                    severity,
                    "work package due soon",
                    format!(
                        "'{}' is due {} ({} day(s) remaining)",
                        package.name, end, days_remaining
                    ),
                    package,
                    json!({ "planned_end": end, "days_remaining": days_remaining }),
                ));
            }
        }
    }

    // Pass 3: logged hours far off the budget, in either direction.
    for package in &packages {
        if !matches!(
            package.status,
            WorkStatus::InProgress | WorkStatus::Completed
        ) {
            continue;
        }
        let (Some(planned), Some(actual)) = (package.planned_hours, package.actual_hours) else {
            continue;
        };
        if planned.is_sign_negative() || planned.is_zero() || actual.is_zero() {
            continue;
        }
        let deviation = rates::deviation_pct(planned, actual);
        if deviation.abs() > DEVIATION_ALERT_OVER_PCT {
            let severity = if deviation.abs() > DEVIATION_HIGH_OVER_PCT {
                AlertSeverity::High
            } else {
                AlertSeverity::Medium
            };
            alerts.push(Alert::new(
                AlertKind::HourDeviation,
                severity,
                "hour budget deviation",
                format!(
                    "'{}' has logged {} hours against a budget of {} ({:+}%)",
                    package.name, actual, planned, deviation
                ),
                package,
                json!({
                    "planned_hours": planned,
                    "actual_hours": actual,
                    "deviation_pct": deviation,
                }),
            ));
        }
    }

    // Pass 4: in progress but nobody has logged hours lately.
    let cutoff = today - Duration::days(STALE_AFTER_DAYS);
    for package in &packages {
        if package.status != WorkStatus::InProgress {
            continue;
        }
        let recent = gateway.list_hour_logs(package.id, Some(cutoff)).await?;
        if recent.is_empty() {
            alerts.push(Alert::new(
                AlertKind::Stale,
                AlertSeverity::Medium,
                "work package inactive",
                format!(
                    "'{}' is in progress but has no hours logged since {}",
                    package.name, cutoff
                ),
                package,
                json!({ "last_checked": today, "idle_days_threshold": STALE_AFTER_DAYS }),
            ));
        }
    }

    // Stable: equal severities keep their discovery order.
    alerts.sort_by(|a, b| b.severity.rank().cmp(&a.severity.rank()));
    Ok(alerts)
}
