//! Error types for the redaction filter.

use thiserror::Error;

/// Result type for redaction operations.
pub type Result<T> = std::result::Result<T, RedactionError>;

/// Errors that can occur while building a redaction filter.
///
/// Applying a filter never fails; only constructing one from a user policy can.
#[derive(Error, Debug)]
pub enum RedactionError {
    /// A user-supplied rule did not compile.
    #[error("invalid pattern for rule '{name}': {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// A user-supplied rule has an empty pattern or name.
    #[error("invalid rule: {0}")]
    InvalidRule(String),
}
