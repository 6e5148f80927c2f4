//! # Core Error Types
//!
//! Everything that can be malformed in a length, a padding shorthand or a
//! gradient descriptor.

use thiserror::Error;

/// Errors raised while parsing geometry inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A length string did not match `<number><unit>`.
    #[error("malformed length `{0}`")]
    MalformedLength(String),

    /// A padding shorthand had no usable values.
    #[error("malformed padding `{0}`")]
    MalformedPadding(String),

    /// A `linear-gradient(...)` descriptor could not be parsed.
    #[error("malformed gradient `{input}`: {reason}")]
    MalformedGradient {
        /// The descriptor as written.
        input: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl CoreError {
    pub(crate) fn gradient(input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedGradient {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Result type for core parsing operations.
pub type CoreResult<T> = Result<T, CoreError>;
