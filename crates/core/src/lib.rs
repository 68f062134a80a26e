//! Validation engine for the five-level EDT schedule hierarchy
//! (Project, Phase, WorkPackage, Activity, Task) plus finish-to-start
//! task dependencies.
//!
//! Findings are data, not exceptions: every structural or temporal
//! inconsistency is reported as a [`Finding`] and the orchestrator always
//! returns a structured [`ValidationReport`], even when individual stages
//! hit gateway failures.

pub mod finding;
pub mod validate;

pub use finding::{EntityKind, Finding, Severity, ValidationReport, ValidationStats};
pub use validate::{
    run_full_validation, run_stages, validate_dependencies, validate_hierarchy, ValidationStage,
};
