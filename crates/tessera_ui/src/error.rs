//! Error types for the UI crate.

use crate::dock::DockError;
use thiserror::Error;

/// Result type for UI setup operations.
pub type UiResult<T> = Result<T, UiError>;

/// Errors raised while loading configuration or stylesheets, or by
/// rejected dock operations.
#[derive(Debug, Error)]
pub enum UiError {
    /// File could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax or shape error.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Stylesheet names an element type that does not exist.
    #[error("unknown element type: {0}")]
    UnknownElement(String),

    /// Stylesheet names a property that does not exist.
    #[error("unknown style property: {0}")]
    UnknownProperty(String),

    /// Property value has the wrong type or shape.
    #[error("invalid value for {property}: {reason}")]
    InvalidValue {
        /// Property name as written.
        property: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Dock operation rejected.
    #[error("dock error: {0}")]
    Dock(#[from] DockError),
}

impl UiError {
    pub(crate) fn invalid(property: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            property: property.to_owned(),
            reason: reason.into(),
        }
    }
}
