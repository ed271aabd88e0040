//! Shared application service layer for the neutron-star workspace.
//!
//! Centralizes what the CLI needs on top of the physics crates: YAML run
//! configurations, pressure-constraint filters, single-star services and the
//! parallel batch sweep with cached, persisted results.

pub mod batch;
pub mod config;
pub mod constraint;
pub mod error;
pub mod progress;
pub mod run_service;
pub mod star_service;

// Re-export key types for convenience
pub use batch::{CandidateOutcome, evaluate_candidate, run_batch};
pub use config::{
    CandidateDef, ConstraintDef, EosDef, LATEST_VERSION, NamedDensity, RunConfig, SearchDef,
    ValidationError, load_yaml, save_yaml, validate_config,
};
pub use constraint::PressureConstraint;
pub use error::{AppError, AppResult};
pub use progress::{BatchProgressEvent, BatchStage};
pub use run_service::{BatchOptions, BatchRequest, BatchResponse, ensure_batch, list_runs, load_run};
pub use star_service::{StarProfile, find_mass, find_max_mass, star_profile, write_table};
