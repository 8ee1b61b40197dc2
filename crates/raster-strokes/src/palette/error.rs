//! Error type for hex color parsing.

use std::num::ParseIntError;

use thiserror::Error;

/// Returned when parsing a hex color string fails, either due to an invalid
/// length or invalid hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}
