//! The two-field envelope every codec serializes
//!
//! Field names match the Go `scs` JSON codec (`Deadline`, `Values`) so blobs
//! written by either side stay readable by the other. Decoding is lenient about
//! missing or null fields and strict about syntax.

use super::deadline::{check_deadline, format_deadline, parse_deadline};
use crate::models::{zero_deadline, Values};
use chrono::{DateTime, FixedOffset};
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Serialize)]
pub(crate) struct EnvelopeRef<'a> {
    #[serde(rename = "Deadline", serialize_with = "serialize_deadline")]
    pub deadline: DateTime<FixedOffset>,
    #[serde(rename = "Values")]
    pub values: &'a Values,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(
        rename = "Deadline",
        default = "zero_deadline",
        deserialize_with = "nullable_deadline"
    )]
    pub deadline: DateTime<FixedOffset>,
    #[serde(rename = "Values", default, deserialize_with = "nullable_values")]
    pub values: Values,
}

fn serialize_deadline<S>(deadline: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    check_deadline(deadline).map_err(<S::Error as ser::Error>::custom)?;
    serializer.serialize_str(&format_deadline(deadline))
}

fn nullable_deadline<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) => parse_deadline(&text).map_err(<D::Error as de::Error>::custom),
        None => Ok(zero_deadline()),
    }
}

fn nullable_values<'de, D>(deserializer: D) -> Result<Values, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Values>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;

    #[test]
    fn test_missing_fields_take_zero_values() {
        let envelope: Envelope = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope.deadline, zero_deadline());
        assert!(envelope.values.is_empty());
    }

    #[test]
    fn test_null_fields_take_zero_values() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"Deadline":null,"Values":null}"#).unwrap();
        assert_eq!(envelope.deadline, zero_deadline());
        assert!(envelope.values.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"Deadline":"2024-01-01T00:00:00Z","Values":{"a":1},"Extra":true}"#,
        )
        .unwrap();
        assert_eq!(envelope.values.get("a"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let result: Result<Envelope, _> = serde_json::from_str(r#"{"Values":[1,2]}"#);
        assert!(result.is_err());
        let result: Result<Envelope, _> = serde_json::from_str(r#"{"Deadline":"not a time"}"#);
        assert!(result.is_err());
        let result: Result<Envelope, _> = serde_json::from_str(r#"{"Deadline":1704067200}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let values = Values::new();
        let json = serde_json::to_string(&EnvelopeRef {
            deadline: zero_deadline(),
            values: &values,
        })
        .unwrap();
        assert_eq!(json, r#"{"Deadline":"0001-01-01T00:00:00Z","Values":{}}"#);
    }
}
