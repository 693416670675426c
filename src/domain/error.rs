//! Domain error types.
//!
//! Each pipeline stage has its own error enum; this module wraps them into
//! the crate-level error and maps it to a process exit code for the CLI.
//! Failures always propagate as typed values — nothing in this crate logs
//! and swallows, and nothing substitutes a placeholder price or token for
//! an error.

use crate::domain::catalog::CatalogError;
use crate::domain::normalize::NormalizeError;
use crate::domain::resolver::ResolutionError;

/// Top-level error type for fnosignal.
#[derive(Debug, thiserror::Error)]
pub enum FnosignalError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("catalog source error: {reason}")]
    CatalogSource { reason: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("market data source error: {reason}")]
    MarketDataSource { reason: String },

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FnosignalError> for std::process::ExitCode {
    fn from(err: &FnosignalError) -> Self {
        let code: u8 = match err {
            FnosignalError::Io(_) => 1,
            FnosignalError::ConfigParse { .. }
            | FnosignalError::ConfigMissing { .. }
            | FnosignalError::ConfigInvalid { .. } => 2,
            FnosignalError::CatalogSource { .. } | FnosignalError::Catalog(_) => 3,
            FnosignalError::Resolution(_) => 4,
            FnosignalError::MarketDataSource { .. } | FnosignalError::Normalize(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
