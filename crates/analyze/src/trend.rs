//! Monthly trend extraction: work packages bucketed by the calendar month
//! of their planned start.
//!
//! The bucketing is an explicit in-language group-by on the truncated
//! month, so no storage dialect is involved. The series is sparse by
//! contract: months with no matching packages are omitted, not
//! zero-filled.

use std::collections::BTreeMap;

use edt_storage::{GatewayError, ScheduleGateway, WorkPackageFilter, WorkStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::rates;

/// Default look-back window, in months.
pub const DEFAULT_MONTHS_BACK: u32 = 12;

/// Aggregates for one non-empty calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    /// 1-12.
    pub month: u8,
    pub total: usize,
    pub completed: usize,
    pub completion_rate: i64,
    pub planned_hours: Decimal,
    pub actual_hours: Decimal,
    pub efficiency: i64,
    pub avg_progress: i64,
}

#[derive(Default)]
struct MonthAccum {
    total: usize,
    completed: usize,
    planned_hours: Decimal,
    actual_hours: Decimal,
    progress_sum: i64,
}

/// Monthly trend series ending at the current month.
pub async fn monthly_trends<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: Option<i64>,
    months_back: u32,
) -> Result<Vec<TrendPoint>, GatewayError> {
    monthly_trends_at(
        gateway,
        project_id,
        months_back,
        OffsetDateTime::now_utc().date(),
    )
    .await
}

/// Monthly trend series with an explicit reference date, covering the
/// months `[today - months_back, today]` inclusive. Packages without a
/// planned start are skipped; empty months are omitted; output is in
/// ascending chronological order.
pub async fn monthly_trends_at<G: ScheduleGateway + ?Sized>(
    gateway: &G,
    project_id: Option<i64>,
    months_back: u32,
    today: Date,
) -> Result<Vec<TrendPoint>, GatewayError> {
    let packages = gateway
        .list_work_packages(project_id, &WorkPackageFilter::default())
        .await?;

    let current = month_index(today);
    let earliest = current - months_back as i32;

    let mut buckets: BTreeMap<i32, MonthAccum> = BTreeMap::new();
    for package in &packages {
        let Some(start) = package.planned_start else {
            continue;
        };
        let index = month_index(start);
        if index < earliest || index > current {
            continue;
        }
        let bucket = buckets.entry(index).or_default();
        bucket.total += 1;
        if package.status == WorkStatus::Completed {
            bucket.completed += 1;
        }
        bucket.planned_hours += package.planned_hours.unwrap_or(Decimal::ZERO);
        bucket.actual_hours += package.actual_hours.unwrap_or(Decimal::ZERO);
        bucket.progress_sum += i64::from(package.progress);
    }

    Ok(buckets
        .into_iter()
        .map(|(index, bucket)| TrendPoint {
            year: index.div_euclid(12),
            month: (index.rem_euclid(12) + 1) as u8,
            total: bucket.total,
            completed: bucket.completed,
            completion_rate: rates::count_rate_pct(bucket.completed, bucket.total),
            planned_hours: bucket.planned_hours,
            actual_hours: bucket.actual_hours,
            efficiency: rates::efficiency_pct(bucket.planned_hours, bucket.actual_hours),
            avg_progress: rates::mean_pct(bucket.progress_sum, bucket.total),
        })
        .collect())
}

/// Months since year 0; one integer per calendar month.
fn month_index(date: Date) -> i32 {
    date.year() * 12 + date.month() as i32 - 1
}
