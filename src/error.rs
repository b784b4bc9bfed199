//! Error types for code resolution.
//!
//! Alphabetic and numeric lookups fail with different variants so callers can
//! tell malformed input apart from a numeric id that simply is not assigned.

use thiserror::Error;

/// Errors raised while resolving country, currency, or area codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    /// An alpha-2 or alpha-3 code matched no record.
    #[error("Invalid code: '{0}'")]
    InvalidCode(String),

    /// A numeric code matched no record, or does not fit the numeric range.
    #[error("Numeric code out of range: {0}")]
    OutOfRange(String),

    /// An area code or country has no registered telephone mapping.
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, LocaleError>;
