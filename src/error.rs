//! Error types for tintforge.
//!
//! Uses thiserror for derive macros. Per-unit failures (a bad descriptor, a
//! failed generation) are reported by the orchestrator and never abort a run;
//! only configuration-level errors reach `main`.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for tintforge operations.
#[derive(Error, Debug)]
pub enum ForgeError {
    /// User provided invalid arguments or the project is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// The configuration file is unreadable or has invalid values.
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// A color scheme has no colors.
    #[error("color scheme '{0}' has no colors")]
    PaletteEmpty(String),

    /// A task descriptor is unreadable or violates the descriptor schema.
    #[error("malformed descriptor '{path}': {reason}")]
    DescriptorMalformed { path: String, reason: String },

    /// The generation backend returned a non-success or unusable response.
    #[error("generation failed{}: {message}", status_suffix(.status))]
    GenerationFailed {
        status: Option<u16>,
        message: String,
    },

    /// An image could not be decoded or encoded.
    #[error("image error: {0}")]
    ImageError(String),

    /// An artifact claim or lock could not be acquired.
    #[error("lock acquisition failed: {0}")]
    LockError(String),

    /// `run --strict` finished with failed units.
    #[error("{0} unit(s) failed")]
    UnitsFailed(usize),
}

impl ForgeError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ForgeError::UserError(_)
            | ForgeError::ConfigError(_)
            | ForgeError::PaletteEmpty(_)
            | ForgeError::DescriptorMalformed { .. } => exit_codes::USER_ERROR,
            ForgeError::ImageError(_) => exit_codes::IMAGE_FAILURE,
            ForgeError::GenerationFailed { .. } => exit_codes::GENERATION_FAILURE,
            ForgeError::LockError(_) => exit_codes::LOCK_FAILURE,
            ForgeError::UnitsFailed(_) => exit_codes::UNITS_FAILED,
        }
    }

    /// Shorthand for a backend failure without an HTTP status.
    pub fn generation(message: impl Into<String>) -> Self {
        ForgeError::GenerationFailed {
            status: None,
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for ForgeError {
    fn from(err: image::ImageError) -> Self {
        ForgeError::ImageError(err.to_string())
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|s| format!(" (status {})", s))
        .unwrap_or_default()
}

/// Result type alias for tintforge operations.
pub type Result<T> = std::result::Result<T, ForgeError>;
