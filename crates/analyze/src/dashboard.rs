//! Executive dashboard composition.
//!
//! Pure composition of the four analytics: global KPIs, the projects with
//! the most high-severity alerts, the recent trend quarter, and the top
//! categories by efficiency. Each section is computed independently and a
//! failing section is omitted rather than failing the whole response.

use std::collections::{BTreeMap, HashMap};

use edt_storage::{GatewayError, ScheduleGateway, WorkPackageFilter};
use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::alert::{self, AlertSeverity};
use crate::kpi::{self, KpiSnapshot};
use crate::performance::{self, CategoryPerformance};
use crate::trend::{self, TrendPoint};

/// How many projects / categories the dashboard keeps per section.
const CRITICAL_PROJECT_LIMIT: usize = 5;
const TOP_CATEGORY_LIMIT: usize = 5;
const RECENT_TREND_MONTHS: u32 = 3;

/// Alert totals for one project, used for the critical-projects ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectAlertSummary {
    pub project_id: i64,
    pub name: String,
    pub high_alerts: usize,
    pub total_alerts: usize,
}

/// The composed executive view. Absent sections failed to compute and
/// were logged; present sections are complete.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<KpiSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_projects: Option<Vec<ProjectAlertSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_trend: Option<Vec<TrendPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_categories: Option<Vec<CategoryPerformance>>,
    pub generated_at: OffsetDateTime,
}

/// Compose the executive dashboard over the whole portfolio.
pub async fn executive_dashboard<G: ScheduleGateway + ?Sized>(gateway: &G) -> DashboardReport {
    executive_dashboard_at(gateway, OffsetDateTime::now_utc().date()).await
}

/// Compose the dashboard with an explicit reference date.
pub async fn executive_dashboard_at<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    today: Date,
) -> DashboardReport {
    let summary = section(
        "summary",
        kpi::compute_kpis(gateway, None, &WorkPackageFilter::default()).await,
    );
    let critical_projects = section("critical_projects", critical_projects(gateway, today).await);
    let recent_trend = section(
        "recent_trend",
        trend::monthly_trends_at(gateway, None, RECENT_TREND_MONTHS, today).await,
    );
    let top_categories = section(
        "top_categories",
        performance::performance_by_category(gateway, None)
            .await
            .map(|mut rows| {
                rows.truncate(TOP_CATEGORY_LIMIT);
                rows
            }),
    );

    DashboardReport {
        summary,
        critical_projects,
        recent_trend,
        top_categories,
        generated_at: OffsetDateTime::now_utc(),
    }
}

fn section<T>(name: &str, result: Result<T, GatewayError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(section = name, error = %err, "dashboard section failed");
            None
        }
    }
}

/// Portfolio-wide alert scan grouped by project, ranked by high-severity
/// count (stable), top five kept.
async fn critical_projects<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    today: Date,
) -> Result<Vec<ProjectAlertSummary>, GatewayError> {
    let alerts = alert::generate_alerts_at(gateway, None, today).await?;

    let mut grouped: BTreeMap<i64, (usize, usize)> = BTreeMap::new();
    for alert in &alerts {
        let (high, total) = grouped.entry(alert.project_id).or_default();
        *total += 1;
        if alert.severity == AlertSeverity::High {
            *high += 1;
        }
    }

    let names: HashMap<i64, String> = gateway
        .list_projects()
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    let mut rows: Vec<ProjectAlertSummary> = grouped
        .into_iter()
        .map(|(project_id, (high_alerts, total_alerts))| ProjectAlertSummary {
            project_id,
            name: names
                .get(&project_id)
                .cloned()
                .unwrap_or_else(|| format!("project {}", project_id)),
            high_alerts,
            total_alerts,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.high_alerts
            .cmp(&a.high_alerts)
            .then(b.total_alerts.cmp(&a.total_alerts))
    });
    rows.truncate(CRITICAL_PROJECT_LIMIT);
    Ok(rows)
}
