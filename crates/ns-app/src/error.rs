//! Error types for the ns-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates' errors behind one
/// interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file: {path}")]
    ConfigFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config validation failed: {0}")]
    Validation(String),

    #[error("EOS error: {0}")]
    Eos(String),

    #[error("Stellar structure error: {0}")]
    Tidal(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ns-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<crate::config::ValidationError> for AppError {
    fn from(err: crate::config::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<ns_eos::EosError> for AppError {
    fn from(err: ns_eos::EosError) -> Self {
        AppError::Eos(err.to_string())
    }
}

impl From<ns_tidal::TidalError> for AppError {
    fn from(err: ns_tidal::TidalError) -> Self {
        AppError::Tidal(err.to_string())
    }
}

impl From<ns_results::ResultsError> for AppError {
    fn from(err: ns_results::ResultsError) -> Self {
        match err {
            ns_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
