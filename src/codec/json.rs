//! JSON session codec
//!
//! Integers and floats keep their kind across a round trip: `serde_json` writes
//! floats with a fractional part or exponent, and [`Value`](crate::models::Value)
//! decodes whole numbers as integers. NaN and infinities have no JSON form and are
//! rejected instead of being written as `null`.

use super::envelope::{Envelope, EnvelopeRef};
use super::{check_encodable, clamp_nesting_depth, Codec, CodecFormat, DecodeError, EncodeError};
use super::DEFAULT_MAX_NESTING_DEPTH;
use crate::models::{zero_deadline, Value, Values};
use chrono::{DateTime, FixedOffset};
use log::debug;

/// Human-readable codec producing `{"Deadline": ..., "Values": {...}}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonCodec {
    max_depth: usize,
}

impl JsonCodec {
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

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for JsonCodec {
    fn encode(
        &self,
        deadline: DateTime<FixedOffset>,
        values: &Values,
    ) -> Result<Vec<u8>, EncodeError> {
        check_encodable(&deadline, values, self.max_depth)?;
        if values.values().any(Value::contains_non_finite) {
            return Err(EncodeError::NonFiniteFloat);
        }

        let envelope = EnvelopeRef {
            deadline,
            values,
        };
        let bytes =
            serde_json::to_vec(&envelope).map_err(|e| EncodeError::Serialization(e.to_string()))?;

        debug!("Encoded session envelope: {} keys, {} bytes (json)", values.len(), bytes.len());
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<(DateTime<FixedOffset>, Values), DecodeError> {
        if bytes.is_empty() {
            return Ok((zero_deadline(), Values::new()));
        }

        let envelope: Envelope = serde_json::from_slice(bytes)?;

        debug!(
            "Decoded session envelope: {} keys from {} bytes (json)",
            envelope.values.len(),
            bytes.len()
        );
        Ok((envelope.deadline, envelope.values))
    }

    fn format(&self) -> CodecFormat {
        CodecFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::MAX_NESTING_DEPTH_CEILING;
    use chrono::TimeZone;

    fn deadline() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 30, 23, 59, 59)
            .unwrap()
    }

    #[test]
    fn test_message_round_trip() {
        let codec = JsonCodec::new();
        let mut values = Values::new();
        values.insert("message".to_string(), Value::from("Hello from a session!"));

        let bytes = codec.encode(deadline(), &values).unwrap();
        let (decoded_deadline, decoded_values) = codec.decode(&bytes).unwrap();

        assert_eq!(decoded_deadline, deadline());
        assert_eq!(decoded_deadline.offset(), deadline().offset());
        assert_eq!(decoded_values, values);
    }

    #[test]
    fn test_empty_input_is_new_session() {
        let (deadline, values) = JsonCodec::new().decode(&[]).unwrap();
        assert_eq!(deadline, zero_deadline());
        assert!(values.is_empty());
    }

    #[test]
    fn test_integer_and_float_keep_their_kind() {
        let codec = JsonCodec::new();
        let mut values = Values::new();
        values.insert("int".to_string(), Value::Integer(i64::MAX));
        values.insert("min".to_string(), Value::Integer(i64::MIN));
        values.insert("whole_float".to_string(), Value::Float(3.0));
        values.insert("tiny".to_string(), Value::Float(1e-300));

        let bytes = codec.encode(deadline(), &values).unwrap();
        let (_, decoded) = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let codec = JsonCodec::new();
        let mut values = Values::new();
        values.insert(
            "nested".to_string(),
            Value::List(vec![Value::Float(f64::NEG_INFINITY)]),
        );
        assert_eq!(
            codec.encode(deadline(), &values),
            Err(EncodeError::NonFiniteFloat)
        );
    }

    #[test]
    fn test_nesting_limit() {
        let codec = JsonCodec::with_max_depth(2);
        let mut values = Values::new();
        values.insert(
            "deep".to_string(),
            Value::List(vec![Value::List(vec![Value::List(vec![])])]),
        );
        assert!(matches!(
            codec.encode(deadline(), &values),
            Err(EncodeError::NestingTooDeep { depth: 3, limit: 2 })
        ));
        assert_eq!(JsonCodec::with_max_depth(10_000).max_depth(), MAX_NESTING_DEPTH_CEILING);
    }

    #[test]
    fn test_deepest_allowed_nesting_still_decodes() {
        let codec = JsonCodec::with_max_depth(MAX_NESTING_DEPTH_CEILING);
        let mut nested = Value::Integer(1);
        for _ in 0..MAX_NESTING_DEPTH_CEILING {
            nested = Value::List(vec![nested]);
        }
        let mut values = Values::new();
        values.insert("deep".to_string(), nested);

        let bytes = codec.encode(deadline(), &values).unwrap();
        let (_, decoded) = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_decodes_go_scs_blob() {
        // json.Encoder output, including its trailing newline and a nil map
        let blob = b"{\"Deadline\":\"2024-01-01T00:00:00Z\",\"Values\":null}\n";
        let (deadline, values) = JsonCodec::new().decode(blob).unwrap();
        assert_eq!(deadline.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert!(values.is_empty());
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        let codec = JsonCodec::new();
        let bytes = codec.encode(deadline(), &Values::new()).unwrap();

        let truncated = &bytes[..bytes.len() - 1];
        assert!(matches!(codec.decode(truncated), Err(DecodeError::Syntax(_))));
        assert!(matches!(codec.decode(b"\xff\xfe"), Err(DecodeError::Syntax(_))));
        assert!(codec.decode(b"{} trailing").is_err());
        assert!(matches!(codec.decode(b"42"), Err(DecodeError::Invalid(_))));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let codec = JsonCodec::new();
        let mut first = Values::new();
        first.insert("b".to_string(), Value::from(2));
        first.insert("a".to_string(), Value::from(1));
        let mut second = Values::new();
        second.insert("a".to_string(), Value::from(1));
        second.insert("b".to_string(), Value::from(2));

        assert_eq!(
            codec.encode(deadline(), &first).unwrap(),
            codec.encode(deadline(), &second).unwrap()
        );
    }

    #[test]
    fn test_escaped_strings_round_trip() {
        let codec = JsonCodec::new();
        let mut values = Values::new();
        values.insert(
            "text".to_string(),
            Value::from("quote \" backslash \\ newline \n tab \t nul \u{0} emoji 🦀 café"),
        );
        let bytes = codec.encode(deadline(), &values).unwrap();
        let (_, decoded) = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, values);
    }
}
