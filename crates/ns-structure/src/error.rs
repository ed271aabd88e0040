//! Error types for stellar-structure integration.

use ns_core::NsError;
use ns_eos::EosError;
use thiserror::Error;

/// Errors encountered while integrating a star.
#[derive(Error, Debug)]
pub enum StructureError {
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    #[error("Non-physical condition: {what} at P = {pressure} MeV/fm^3")]
    NonPhysical { what: &'static str, pressure: f64 },

    #[error("Step budget of {max_steps} exhausted at P = {pressure} MeV/fm^3")]
    StepBudget { max_steps: usize, pressure: f64 },

    #[error("EOS table unusable: {0}")]
    Table(#[from] EosError),
}

pub type StructureResult<T> = Result<T, StructureError>;

impl From<NsError> for StructureError {
    fn from(e: NsError) -> Self {
        match e {
            NsError::NonFinite { what, value } | NsError::OutOfRange { what, value } => {
                StructureError::OutOfRange { what, value }
            }
        }
    }
}

impl From<std::io::Error> for StructureError {
    fn from(e: std::io::Error) -> Self {
        StructureError::Table(EosError::Io(e))
    }
}
