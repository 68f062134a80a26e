//! KPI aggregation over work packages, per project or portfolio-wide.

use edt_storage::{GatewayError, ScheduleGateway, WorkPackageFilter, WorkStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;

use crate::rates;

/// Work-package counts per lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub planned: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub stopped: usize,
    pub cancelled: usize,
}

/// Aggregate indicators for one scope, timestamped at computation time.
///
/// Never cached; callers re-run the computation when they need fresh
/// numbers.
#[derive(Debug, Clone, Serialize)]
pub struct KpiSnapshot {
    pub total: usize,
    pub by_status: StatusCounts,
    pub planned_hours: Decimal,
    pub actual_hours: Decimal,
    /// Mean progress percent across all matched packages.
    pub avg_progress: i64,
    /// Planned over actual hours, percent. 0 with no actual hours.
    pub efficiency: i64,
    /// Completed on or before the planned end, over packages that have a
    /// planned end, percent.
    pub schedule_adherence: i64,
    /// Actual over planned hour overrun, percent, signed. 0 with no plan.
    pub budget_deviation: i64,
    pub generated_at: OffsetDateTime,
}

/// Aggregate KPIs for a project (or the whole portfolio with
/// `project_id = None`), restricted by the filter.
pub async fn compute_kpis<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: Option<i64>,
    filter: &WorkPackageFilter,
) -> Result<KpiSnapshot, GatewayError> {
    let packages = gateway.list_work_packages(project_id, filter).await?;

    let mut by_status = StatusCounts::default();
    let mut planned_hours = Decimal::ZERO;
    let mut actual_hours = Decimal::ZERO;
    // Progress is accumulated per status group and the grouped sums are
    // then divided by the overall count, which is how the reports have
    // always averaged it (and equals the flat mean over all packages).
    let mut grouped_progress = [0i64; 5];

    for package in &packages {
        let slot = match package.status {
            WorkStatus::Planned => {
                by_status.planned += 1;
                0
            }
            WorkStatus::InProgress => {
                by_status.in_progress += 1;
                1
            }
            WorkStatus::Completed => {
                by_status.completed += 1;
                2
            }
            WorkStatus::Stopped => {
                by_status.stopped += 1;
                3
            }
            WorkStatus::Cancelled => {
                by_status.cancelled += 1;
                4
            }
        };
        grouped_progress[slot] += i64::from(package.progress);
        planned_hours += package.planned_hours.unwrap_or(Decimal::ZERO);
        actual_hours += package.actual_hours.unwrap_or(Decimal::ZERO);
    }

    let total = packages.len();
    let with_planned_end = packages
        .iter()
        .filter(|p| p.planned_end.is_some())
        .count();
    let on_time = packages
        .iter()
        .filter(|p| {
            p.status == WorkStatus::Completed
                && matches!(
                    (p.actual_end, p.planned_end),
                    (Some(actual), Some(planned)) if actual <= planned
                )
        })
        .count();

    Ok(KpiSnapshot {
        total,
        by_status,
        planned_hours,
        actual_hours,
        avg_progress: rates::mean_pct(grouped_progress.iter().sum(), total),
        efficiency: rates::efficiency_pct(planned_hours, actual_hours),
        schedule_adherence: rates::count_rate_pct(on_time, with_planned_end),
        budget_deviation: rates::deviation_pct(planned_hours, actual_hours),
        generated_at: OffsetDateTime::now_utc(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use edt_storage::{InMemoryGateway, SnapshotData, WorkPackageRecord};
    use time::macros::date;

    fn package(id: i64, status: WorkStatus, planned: i64, actual: i64) -> WorkPackageRecord {
        WorkPackageRecord {
            id,
            project_id: 1,
            phase_id: None,
            category_id: None,
            responsible_id: None,
            name: format!("wp {}", id),
            status,
            planned_hours: Some(Decimal::from(planned)),
            actual_hours: Some(Decimal::from(actual)),
            planned_start: Some(date!(2024 - 01 - 01)),
            planned_end: Some(date!(2024 - 02 - 01)),
            actual_end: None,
            progress: 0,
        }
    }

    #[tokio::test]
    async fn overrun_package_matches_reference_numbers() {
        let gateway = InMemoryGateway::new(SnapshotData {
            work_packages: vec![package(1, WorkStatus::InProgress, 100, 150)],
            ..Default::default()
        });
        let kpis = compute_kpis(&gateway, Some(1), &WorkPackageFilter::default())
            .await
            .unwrap();
        assert_eq!(kpis.efficiency, 67);
        assert_eq!(kpis.budget_deviation, 50);
    }

    #[tokio::test]
    async fn counts_hours_and_average_progress() {
        let mut first = package(1, WorkStatus::Completed, 40, 30);
        first.progress = 100;
        first.actual_end = Some(date!(2024 - 01 - 20));
        let mut second = package(2, WorkStatus::InProgress, 60, 30);
        second.progress = 50;
        let third = package(3, WorkStatus::Planned, 20, 0);

        let gateway = InMemoryGateway::new(SnapshotData {
            work_packages: vec![first, second, third],
            ..Default::default()
        });
        let kpis = compute_kpis(&gateway, Some(1), &WorkPackageFilter::default())
            .await
            .unwrap();

        assert_eq!(kpis.total, 3);
        assert_eq!(kpis.by_status.completed, 1);
        assert_eq!(kpis.by_status.in_progress, 1);
        assert_eq!(kpis.by_status.planned, 1);
        assert_eq!(kpis.planned_hours, Decimal::from(120));
        assert_eq!(kpis.actual_hours, Decimal::from(60));
        assert_eq!(kpis.avg_progress, 50); // (100 + 50 + 0) / 3
        assert_eq!(kpis.efficiency, 200);
    }

    #[tokio::test]
    async fn schedule_adherence_counts_on_time_completions() {
        let mut on_time = package(1, WorkStatus::Completed, 10, 10);
        on_time.actual_end = Some(date!(2024 - 01 - 25));
        let mut late = package(2, WorkStatus::Completed, 10, 10);
        late.actual_end = Some(date!(2024 - 02 - 10));
        let open = package(3, WorkStatus::InProgress, 10, 5);

        let gateway = InMemoryGateway::new(SnapshotData {
            work_packages: vec![on_time, late, open],
            ..Default::default()
        });
        let kpis = compute_kpis(&gateway, Some(1), &WorkPackageFilter::default())
            .await
            .unwrap();
        // One of three packages with a planned end finished on time.
        assert_eq!(kpis.schedule_adherence, 33);
    }

    #[tokio::test]
    async fn empty_scope_is_all_zeroes() {
        let gateway = InMemoryGateway::empty();
        let kpis = compute_kpis(&gateway, None, &WorkPackageFilter::default())
            .await
            .unwrap();
        assert_eq!(kpis.total, 0);
        assert_eq!(kpis.avg_progress, 0);
        assert_eq!(kpis.efficiency, 0);
        assert_eq!(kpis.schedule_adherence, 0);
        assert_eq!(kpis.budget_deviation, 0);
    }

    #[tokio::test]
    async fn filter_narrows_the_aggregation() {
        let mut tagged = package(1, WorkStatus::InProgress, 100, 150);
        tagged.category_id = Some(7);
        let untagged = package(2, WorkStatus::InProgress, 999, 1);

        let gateway = InMemoryGateway::new(SnapshotData {
            work_packages: vec![tagged, untagged],
            ..Default::default()
        });
        let filter = WorkPackageFilter {
            category_id: Some(7),
            ..Default::default()
        };
        let kpis = compute_kpis(&gateway, Some(1), &filter).await.unwrap();
        assert_eq!(kpis.total, 1);
        assert_eq!(kpis.planned_hours, Decimal::from(100));
    }
}
