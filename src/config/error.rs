//! Errors raised while compiling an arrangement configuration.

use thiserror::Error;

/// A configuration that cannot be compiled into rules.
///
/// Raised once, by [`Arranger::new`](crate::arrange::Arranger::new) or
/// [`Condition::parse`](crate::condition::Condition::parse); a compiled
/// arranger never fails afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Malformed condition expression.
    #[error("invalid condition expression '{expression}': {reason}")]
    Format { expression: String, reason: String },

    /// Reference to an element id that no configuration node declares.
    #[error("unresolved element reference '{id}'")]
    UnresolvedReference { id: String },

    /// Reference chain that leads back to itself.
    #[error("circular element reference '{id}'")]
    CircularReference { id: String },

    /// GroupBy capture pattern that is not a valid regular expression.
    #[error("invalid attribute capture '{pattern}': {reason}")]
    InvalidCapture { pattern: String, reason: String },
}

impl ConfigurationError {
    pub fn format(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}
