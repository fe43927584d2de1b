//! Session Data Codecs
//!
//! A codec turns a session snapshot (deadline + values) into the opaque bytes a
//! session store persists, and back. Codecs are stateless and safe to share
//! across threads; the session manager picks one at configuration time through
//! [`CodecFactory`].
//!
//! # Modules
//!
//! - [`errors`] - `EncodeError` / `DecodeError`
//! - [`json`] - JSON codec, wire-compatible with Go `scs` JSON blobs
//! - [`cbor`] - compact CBOR codec (`cbor` feature)
//! - [`factory`] - codec selection from settings

#[cfg(feature = "cbor")]
pub mod cbor;
mod deadline;
mod envelope;
pub mod errors;
pub mod factory;
pub mod json;

#[cfg(feature = "cbor")]
pub use cbor::CborCodec;
pub use errors::{DecodeError, EncodeError};
pub use factory::CodecFactory;
pub use json::JsonCodec;

use crate::models::{values_depth, Snapshot, Values};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default limit on how deeply values may nest
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Highest configurable nesting limit.
///
/// The envelope adds two levels on top of the values, and `serde_json` refuses
/// to parse beyond 128.
pub const MAX_NESTING_DEPTH_CEILING: usize = 120;

/// The serialization capability a session manager depends on
pub trait Codec: Send + Sync {
    /// Serialize a deadline and its values into one envelope
    ///
    /// # Errors
    ///
    /// Returns `EncodeError` if any value cannot be represented in the format
    fn encode(&self, deadline: DateTime<FixedOffset>, values: &Values)
        -> Result<Vec<u8>, EncodeError>;

    /// Parse an envelope produced by [`Codec::encode`].
    ///
    /// Empty input yields the zero deadline and an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if non-empty input is not a valid envelope
    fn decode(&self, bytes: &[u8]) -> Result<(DateTime<FixedOffset>, Values), DecodeError>;

    /// Which wire format this codec speaks
    fn format(&self) -> CodecFormat;

    /// Encode a whole [`Snapshot`]
    ///
    /// # Errors
    ///
    /// Same as [`Codec::encode`]
    fn encode_snapshot(&self, snapshot: &Snapshot) -> Result<Vec<u8>, EncodeError> {
        self.encode(snapshot.deadline, &snapshot.values)
    }

    /// Decode straight into a [`Snapshot`]
    ///
    /// # Errors
    ///
    /// Same as [`Codec::decode`]
    fn decode_snapshot(&self, bytes: &[u8]) -> Result<Snapshot, DecodeError> {
        let (deadline, values) = self.decode(bytes)?;
        Ok(Snapshot::new(deadline, values))
    }
}

/// Supported wire formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecFormat {
    #[default]
    Json,
    Cbor,
}

impl fmt::Display for CodecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecFormat::Json => f.write_str("json"),
            CodecFormat::Cbor => f.write_str("cbor"),
        }
    }
}

impl FromStr for CodecFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(CodecFormat::Json),
            "cbor" => Ok(CodecFormat::Cbor),
            other => Err(format!("unknown codec format '{other}' (expected json or cbor)")),
        }
    }
}

/// Cap a requested nesting limit at [`MAX_NESTING_DEPTH_CEILING`]
pub(crate) fn clamp_nesting_depth(max_depth: usize) -> usize {
    max_depth.min(MAX_NESTING_DEPTH_CEILING)
}

/// Reject values nested deeper than `limit`
pub(crate) fn check_nesting(values: &Values, limit: usize) -> Result<(), EncodeError> {
    let depth = values_depth(values);
    if depth > limit {
        return Err(EncodeError::NestingTooDeep { depth, limit });
    }
    Ok(())
}

/// Checks shared by every codec before anything is serialized
pub(crate) fn check_encodable(
    deadline: &DateTime<FixedOffset>,
    values: &Values,
    max_depth: usize,
) -> Result<(), EncodeError> {
    deadline::check_deadline(deadline)?;
    check_nesting(values, max_depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;

    #[test]
    fn test_codec_format_parsing() {
        assert_eq!("json".parse::<CodecFormat>(), Ok(CodecFormat::Json));
        assert_eq!(" CBOR ".parse::<CodecFormat>(), Ok(CodecFormat::Cbor));
        assert!("msgpack".parse::<CodecFormat>().is_err());
        assert_eq!(CodecFormat::Cbor.to_string(), "cbor");
        assert_eq!(CodecFormat::default(), CodecFormat::Json);
    }

    #[test]
    fn test_check_nesting() {
        let mut values = Values::new();
        values.insert("list".to_string(), Value::List(vec![Value::List(vec![])]));
        assert!(check_nesting(&values, 2).is_ok());
        assert_eq!(
            check_nesting(&values, 1),
            Err(EncodeError::NestingTooDeep { depth: 2, limit: 1 })
        );
    }

    #[test]
    fn test_clamp_nesting_depth() {
        assert_eq!(clamp_nesting_depth(8), 8);
        assert_eq!(clamp_nesting_depth(usize::MAX), MAX_NESTING_DEPTH_CEILING);
    }

    #[test]
    fn test_codecs_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn Codec>();
        assert_send_sync::<JsonCodec>();
    }
}
