//! # Widget Error Types
//!
//! Everything that can go wrong between a configuration document and a
//! finished frame.

use luckydraw_core::CoreError;
use thiserror::Error;

/// Errors raised by the wheel and grid widgets.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    /// A length, padding or gradient failed to parse.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A color string was not recognised.
    #[error("invalid color `{0}`")]
    InvalidColor(String),

    /// A shadow string was not `<x> <y> <blur> <color>`.
    #[error("invalid shadow `{0}`")]
    InvalidShadow(String),

    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    ConfigParse(String),

    /// The host reported a failed image load.
    #[error("failed to load image `{src}`: {reason}")]
    ImageLoad {
        /// Image source as configured.
        src: String,
        /// Reason given by the loader.
        reason: String,
    },

    /// Images were still pending when the load timeout expired.
    #[error("{pending} image(s) still pending after {timeout_ms}ms")]
    ImageTimeout {
        /// Slots that had not finished.
        pending: usize,
        /// The configured timeout.
        timeout_ms: u64,
    },
}

/// Result type for widget operations.
pub type DrawResult<T> = Result<T, DrawError>;
