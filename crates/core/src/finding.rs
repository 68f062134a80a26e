//! Finding vocabulary and the aggregated validation report.

use serde::Serialize;
use time::OffsetDateTime;

/// Severity of a validation finding.
///
/// Only `Error` findings affect a report's validity; warnings are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// The hierarchy level a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Phase,
    WorkPackage,
    Activity,
    Task,
}

/// A single structured validation result about one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub entity: EntityKind,
    pub entity_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Finding {
    pub fn error(entity: EntityKind, entity_id: i64, message: impl Into<String>) -> Self {
        Finding {
            severity: Severity::Error,
            entity,
            entity_id,
            field: None,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn warning(entity: EntityKind, entity_id: i64, message: impl Into<String>) -> Self {
        Finding {
            severity: Severity::Warning,
            entity,
            entity_id,
            field: None,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_owned());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Counts of the records each validation run examined. Best-effort: a
/// failing count query reports zero rather than failing the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidationStats {
    pub phases: usize,
    pub work_packages: usize,
    pub activities: usize,
    pub tasks: usize,
    pub dependencies: usize,
}

/// The aggregated outcome of a validation run.
///
/// `is_valid` is strictly "zero error-severity findings"; warnings never
/// affect validity. Finding order within each severity follows the fixed
/// stage order (project, phases, work packages, activities, tasks,
/// dependencies).
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub stats: ValidationStats,
    pub generated_at: OffsetDateTime,
}

impl ValidationReport {
    /// Partition raw findings into errors and warnings, preserving order.
    pub fn from_findings(findings: Vec<Finding>, stats: ValidationStats) -> Self {
        let (errors, warnings): (Vec<Finding>, Vec<Finding>) = findings
            .into_iter()
            .partition(|f| f.severity == Severity::Error);
        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            stats,
            generated_at: OffsetDateTime::now_utc(),
        }
    }
}
