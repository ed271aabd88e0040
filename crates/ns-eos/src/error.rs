//! EOS errors.

use ns_core::NsError;
use thiserror::Error;

/// Result type for EOS operations.
pub type EosResult<T> = Result<T, EosError>;

/// Errors that can occur while building, querying or serializing an EOS.
#[derive(Error, Debug)]
pub enum EosError {
    /// Non-physical values (negative pressure, decreasing energy, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value out of valid range.
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    /// Malformed or unusable EOS table.
    #[error("Table error at line {line}: {message}")]
    Table { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<NsError> for EosError {
    fn from(err: NsError) -> Self {
        match err {
            NsError::NonFinite { what, .. } => EosError::NonPhysical { what },
            NsError::OutOfRange { what, value } => EosError::OutOfRange { what, value },
        }
    }
}
