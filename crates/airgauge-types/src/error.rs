//! Error types for data parsing in airgauge-types.

use thiserror::Error;

/// Errors that can occur when parsing airgauge values from text.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A colour string was neither `r,g,b,a` nor `#rrggbb[aa]`.
    #[error("Invalid color '{0}': expected \"r,g,b,a\" or \"#rrggbb\"")]
    InvalidColor(String),
}
