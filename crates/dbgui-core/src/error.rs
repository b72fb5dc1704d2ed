#![forbid(unsafe_code)]

//! Error types for the panel engine.
//!
//! Registry semantics are total: key collisions replace, absent keys are
//! no-ops, and numeric coercion yields `NaN` instead of failing. The only
//! errors that exist are the ones a host backend reports while mutating the
//! document, plus rejected configuration values.

use thiserror::Error;

/// A DOM operation reported by a [`crate::host::DomHost`] failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host operation `{operation}` failed: {message}")]
pub struct HostError {
    /// Name of the failing operation (`create`, `append_child`, ...).
    pub operation: &'static str,
    /// Backend-provided description.
    pub message: String,
}

impl HostError {
    /// Build an error for `operation` with a backend message.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Result alias for host backend operations.
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Invalid value for a recognised configuration option.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// `fontSize` was not a finite positive number.
    #[error("invalid fontSize `{raw}`: expected a positive number of pixels")]
    InvalidFontSize { raw: String },
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DbguiError {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Standard result type for panel APIs.
pub type Result<T> = std::result::Result<T, DbguiError>;
