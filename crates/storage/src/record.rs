use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

/// Lifecycle status of a work package or task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    Planned,
    InProgress,
    Completed,
    Stopped,
    Cancelled,
}

/// Ordering constraint kind between two tasks.
///
/// Only `FinishToStart` is checked by the dependency validator; the other
/// kinds are accepted into storage and counted but not validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    FinishToStart,
    StartToStart,
    FinishToFinish,
}

/// Top level of the schedule hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: i64,
    pub name: String,
    /// Status string owned by the surrounding CRUD application.
    pub status: String,
    pub planned_start: Option<Date>,
    pub planned_end: Option<Date>,
}

/// Second level: an ordered phase within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    /// 1-based position within the project. Expected sequential and unique.
    pub order_index: i32,
    pub planned_start: Option<Date>,
    pub planned_end: Option<Date>,
}

/// Third level: a work package (EDT), a deliverable-sized unit of work
/// with its own hour budget and responsible owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkPackageRecord {
    pub id: i64,
    pub project_id: i64,
    pub phase_id: Option<i64>,
    pub category_id: Option<i64>,
    pub responsible_id: Option<i64>,
    pub name: String,
    pub status: WorkStatus,
    pub planned_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    pub planned_start: Option<Date>,
    pub planned_end: Option<Date>,
    pub actual_end: Option<Date>,
    /// Percent complete, 0-100.
    pub progress: i32,
}

/// Fourth level: an activity within a work package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: i64,
    pub work_package_id: i64,
    pub name: String,
    pub planned_start: Option<Date>,
    pub planned_end: Option<Date>,
}

/// Fifth level: a task. Usually attached to an activity, but may hang
/// directly under a work package (`activity_id` absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: i64,
    pub activity_id: Option<i64>,
    pub work_package_id: Option<i64>,
    pub name: String,
    pub status: WorkStatus,
    pub planned_start: Option<Date>,
    pub planned_end: Option<Date>,
    pub actual_start: Option<Date>,
    pub actual_end: Option<Date>,
    /// Percent complete, 0-100.
    pub progress: i32,
}

/// A directed ordering edge between two tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub id: i64,
    pub origin_task_id: i64,
    pub dependent_task_id: i64,
    pub kind: DependencyKind,
}

/// An immutable time-tracking ledger entry against a work package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourLogRecord {
    pub id: i64,
    pub work_package_id: i64,
    pub hours_worked: Decimal,
    pub work_date: Date,
}

/// A work-package category, resolved by id for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
}

/// Filter applied when listing work packages.
///
/// The date window applies to the planned schedule: `date_from` requires a
/// planned start on or after the bound, `date_to` requires a planned end on
/// or before the bound. A package missing the relevant planned date does
/// not match a set bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkPackageFilter {
    pub category_id: Option<i64>,
    pub responsible_id: Option<i64>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
}

impl WorkPackageFilter {
    /// True when the package satisfies every bound that is set.
    pub fn matches(&self, package: &WorkPackageRecord) -> bool {
        if let Some(category_id) = self.category_id {
            if package.category_id != Some(category_id) {
                return false;
            }
        }
        if let Some(responsible_id) = self.responsible_id {
            if package.responsible_id != Some(responsible_id) {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            match package.planned_start {
                Some(start) if start >= from => {}
                _ => return false,
            }
        }
        if let Some(to) = self.date_to {
            match package.planned_end {
                Some(end) if end <= to => {}
                _ => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use time::macros::date;

    fn package() -> WorkPackageRecord {
        WorkPackageRecord {
            id: 1,
            project_id: 1,
            phase_id: Some(1),
            category_id: Some(7),
            responsible_id: Some(42),
            name: "foundation".to_string(),
            status: WorkStatus::InProgress,
            planned_hours: Some(Decimal::from(80)),
            actual_hours: Some(Decimal::from(20)),
            planned_start: Some(date!(2024 - 02 - 01)),
            planned_end: Some(date!(2024 - 03 - 15)),
            actual_end: None,
            progress: 25,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(WorkPackageFilter::default().matches(&package()));
    }

    #[test]
    fn category_and_responsible_bounds() {
        let filter = WorkPackageFilter {
            category_id: Some(7),
            responsible_id: Some(42),
            ..Default::default()
        };
        assert!(filter.matches(&package()));

        let filter = WorkPackageFilter {
            category_id: Some(8),
            ..Default::default()
        };
        assert!(!filter.matches(&package()));
    }

    #[test]
    fn date_window_bounds() {
        let filter = WorkPackageFilter {
            date_from: Some(date!(2024 - 01 - 01)),
            date_to: Some(date!(2024 - 12 - 31)),
            ..Default::default()
        };
        assert!(filter.matches(&package()));

        let filter = WorkPackageFilter {
            date_from: Some(date!(2024 - 02 - 02)),
            ..Default::default()
        };
        assert!(!filter.matches(&package()));
    }

    #[test]
    fn missing_planned_date_fails_a_set_bound() {
        let mut unscheduled = package();
        unscheduled.planned_start = None;
        let filter = WorkPackageFilter {
            date_from: Some(date!(2024 - 01 - 01)),
            ..Default::default()
        };
        assert!(!filter.matches(&unscheduled));
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_value(WorkStatus::InProgress).unwrap();
        assert_eq!(json, serde_json::json!("in_progress"));
        let kind = serde_json::to_value(DependencyKind::FinishToStart).unwrap();
        assert_eq!(kind, serde_json::json!("finish_to_start"));
    }

    #[test]
    fn record_round_trips_through_json() {
        let original = package();
        let json = serde_json::to_string(&original).unwrap();
        let back: WorkPackageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }
}
