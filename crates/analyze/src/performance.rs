//! Per-category performance classification of work packages.

use std::collections::{BTreeMap, HashMap};

use edt_storage::{GatewayError, ScheduleGateway, WorkPackageFilter};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::rates;

/// Label applied when a category id cannot be resolved to a name (or the
/// packages carry no category at all).
const UNCATEGORIZED: &str = "uncategorized";

/// Qualitative tier assigned from joint efficiency/progress thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Excellent,
    Good,
    Regular,
    Deficient,
}

impl PerformanceTier {
    /// Both bars must clear for a tier to apply.
    fn classify(efficiency: i64, avg_progress: i64) -> Self {
        if efficiency >= 90 && avg_progress >= 80 {
            PerformanceTier::Excellent
        } else if efficiency >= 75 && avg_progress >= 60 {
            PerformanceTier::Good
        } else if efficiency >= 60 && avg_progress >= 40 {
            PerformanceTier::Regular
        } else {
            PerformanceTier::Deficient
        }
    }
}

/// Aggregates and tier for one work-package category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPerformance {
    pub category_id: Option<i64>,
    pub category: String,
    pub package_count: usize,
    pub planned_hours: Decimal,
    pub actual_hours: Decimal,
    pub avg_progress: i64,
    pub efficiency: i64,
    pub deviation: i64,
    pub tier: PerformanceTier,
}

#[derive(Default)]
struct CategoryAccum {
    count: usize,
    planned_hours: Decimal,
    actual_hours: Decimal,
    progress_sum: i64,
}

/// Group work packages by category, compute per-group indicators, and
/// classify each group. Output is sorted by efficiency, descending.
pub async fn performance_by_category<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: Option<i64>,
) -> Result<Vec<CategoryPerformance>, GatewayError> {
    let packages = gateway
        .list_work_packages(project_id, &WorkPackageFilter::default())
        .await?;

    let mut groups: BTreeMap<Option<i64>, CategoryAccum> = BTreeMap::new();
    for package in &packages {
        let group = groups.entry(package.category_id).or_default();
        group.count += 1;
        group.planned_hours += package.planned_hours.unwrap_or(Decimal::ZERO);
        group.actual_hours += package.actual_hours.unwrap_or(Decimal::ZERO);
        group.progress_sum += i64::from(package.progress);
    }

    let ids: Vec<i64> = groups.keys().filter_map(|id| *id).collect();
    let names: HashMap<i64, String> = gateway
        .list_categories(&ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut rows: Vec<CategoryPerformance> = groups
        .into_iter()
        .map(|(category_id, group)| {
            let category = category_id
                .and_then(|id| names.get(&id).cloned())
                .unwrap_or_else(|| UNCATEGORIZED.to_string());
            let efficiency = rates::efficiency_pct(group.planned_hours, group.actual_hours);
            let avg_progress = rates::mean_pct(group.progress_sum, group.count);
            CategoryPerformance {
                category_id,
                category,
                package_count: group.count,
                planned_hours: group.planned_hours,
                actual_hours: group.actual_hours,
                avg_progress,
                efficiency,
                deviation: rates::deviation_pct(group.planned_hours, group.actual_hours),
                tier: PerformanceTier::classify(efficiency, avg_progress),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.efficiency.cmp(&a.efficiency));
    Ok(rows)
}
