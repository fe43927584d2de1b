//! Codec error types
//!
//! Exactly two failure kinds cross the codec boundary: a snapshot that cannot be
//! represented ([`EncodeError`]) and bytes that are not a valid envelope
//! ([`DecodeError`]). Neither is retryable.

use thiserror::Error;

/// The snapshot holds a value the format cannot represent
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("failed to encode session data: {0}")]
    Serialization(String),

    #[error("failed to encode session data: NaN and infinite floats are not representable")]
    NonFiniteFloat,

    #[error("failed to encode session data: nesting depth {depth} exceeds limit of {limit}")]
    NestingTooDeep { depth: usize, limit: usize },

    #[error("failed to encode session data: deadline year {year} is outside 0..=9999")]
    DeadlineOutOfRange { year: i32 },
}

/// The bytes are not a valid encoded envelope
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Corrupt, truncated or otherwise unparsable bytes
    #[error("failed to decode session data: malformed input: {0}")]
    Syntax(String),

    /// Well-formed input whose content does not fit the envelope
    #[error("failed to decode session data: invalid content: {0}")]
    Invalid(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Data => DecodeError::Invalid(err.to_string()),
            Category::Io | Category::Syntax | Category::Eof => DecodeError::Syntax(err.to_string()),
        }
    }
}
