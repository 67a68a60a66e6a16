//! Error types for decoding scanner output in ruuvi-types.

use thiserror::Error;

/// Errors that can occur when decoding a line of scanner output.
///
/// Malformed *optional* fields never produce an error; they are dropped while
/// shaping the reading. Only lines that cannot be interpreted at all end up here.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The line was not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The line was valid JSON but not a recognizable scanner message.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A reading did not carry a device address.
    #[error("Reading has no device address")]
    MissingAddress,
}

/// Result type alias using ruuvi-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
