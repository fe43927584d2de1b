//! CBOR session codec
//!
//! Compact binary counterpart of [`JsonCodec`](super::JsonCodec), built on
//! `ciborium`. The envelope keeps the same `Deadline` / `Values` text keys and
//! the deadline is the same text, so the two formats carry identical
//! information. Unlike JSON, CBOR has native NaN and infinities.

use super::envelope::{Envelope, EnvelopeRef};
use super::{check_encodable, clamp_nesting_depth, Codec, CodecFormat, DecodeError, EncodeError};
use super::DEFAULT_MAX_NESTING_DEPTH;
use crate::models::{zero_deadline, Values};
use chrono::{DateTime, FixedOffset};
use log::debug;

/// Binary codec encoding the envelope as a two-entry CBOR map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CborCodec {
    max_depth: usize,
}

impl CborCodec {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    /// Use a custom nesting limit, capped at [`MAX_NESTING_DEPTH_CEILING`](super::MAX_NESTING_DEPTH_CEILING)
    #[must_use]
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: clamp_nesting_depth(max_depth),
        }
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for CborCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for CborCodec {
    fn encode(
        &self,
        deadline: DateTime<FixedOffset>,
        values: &Values,
    ) -> Result<Vec<u8>, EncodeError> {
        check_encodable(&deadline, values, self.max_depth)?;

        let envelope = EnvelopeRef {
            deadline,
            values,
        };
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&envelope, &mut bytes)
            .map_err(|e| EncodeError::Serialization(e.to_string()))?;

        debug!("Encoded session envelope: {} keys, {} bytes (cbor)", values.len(), bytes.len());
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<(DateTime<FixedOffset>, Values), DecodeError> {
        if bytes.is_empty() {
            return Ok((zero_deadline(), Values::new()));
        }

        let mut reader = bytes;
        let envelope: Envelope = ciborium::de::from_reader(&mut reader).map_err(|e| match e {
            ciborium::de::Error::Semantic(_, msg) => DecodeError::Invalid(msg),
            other => DecodeError::Syntax(other.to_string()),
        })?;

        if !reader.is_empty() {
            return Err(DecodeError::Syntax(format!(
                "{} trailing bytes after envelope",
                reader.len()
            )));
        }

        debug!(
            "Decoded session envelope: {} keys from {} bytes (cbor)",
            envelope.values.len(),
            bytes.len()
        );
        Ok((envelope.deadline, envelope.values))
    }

    fn format(&self) -> CodecFormat {
        CodecFormat::Cbor
    }
}
