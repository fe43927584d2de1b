//! Test fixtures providing pre-built snapshots

use crate::codec::{Codec, JsonCodec};
use crate::models::{Snapshot, Value, Values};
use chrono::{DateTime, FixedOffset, TimeZone};

use super::constants::{TEST_DEADLINE, TEST_MESSAGE};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// The canonical deadline, `2024-01-01T00:00:00Z`
    ///
    /// # Panics
    ///
    /// Never; the constant is valid RFC 3339.
    #[must_use]
    pub fn deadline() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(TEST_DEADLINE).expect("valid test deadline")
    }

    /// A deadline with a non-UTC offset and sub-second precision
    ///
    /// # Panics
    ///
    /// Never; the components are in range.
    #[must_use]
    pub fn offset_deadline() -> DateTime<FixedOffset> {
        let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("valid offset");
        ist.with_ymd_and_hms(2031, 3, 14, 15, 9, 26)
            .single()
            .expect("unambiguous time")
            + chrono::Duration::nanoseconds(535_897_932)
    }

    /// `{"message": "Hello from a session!"}` at the canonical deadline
    #[must_use]
    pub fn message_snapshot() -> Snapshot {
        let mut values = Values::new();
        values.insert("message".to_string(), Value::from(TEST_MESSAGE));
        Snapshot::new(Self::deadline(), values)
    }

    /// Null, `true`, a non-ASCII string and an empty map
    #[must_use]
    pub fn scalar_kinds_snapshot() -> Snapshot {
        let mut values = Values::new();
        values.insert("nothing".to_string(), Value::Null);
        values.insert("flag".to_string(), Value::Bool(true));
        values.insert("drink".to_string(), Value::from("café"));
        values.insert("empty".to_string(), Value::Map(Values::new()));
        Snapshot::new(Self::deadline(), values)
    }

    /// A map containing a map containing a list of mixed scalars
    #[must_use]
    pub fn nested_snapshot() -> Snapshot {
        let list = Value::List(vec![
            Value::Integer(-7),
            Value::Float(2.5),
            Value::from("text"),
            Value::Bool(false),
            Value::Null,
        ]);
        let mut inner = Values::new();
        inner.insert("items".to_string(), list);
        let mut outer = Values::new();
        outer.insert("inner".to_string(), Value::Map(inner));

        let mut values = Values::new();
        values.insert("outer".to_string(), Value::Map(outer));
        Snapshot::new(Self::offset_deadline(), values)
    }

    /// Every snapshot fixture, for tests that sweep all of them
    #[must_use]
    pub fn all_snapshots() -> Vec<Snapshot> {
        vec![
            Snapshot::empty(),
            Self::message_snapshot(),
            Self::scalar_kinds_snapshot(),
            Self::nested_snapshot(),
        ]
    }

    /// One instance of every codec compiled into the crate
    #[must_use]
    pub fn all_codecs() -> Vec<Box<dyn Codec>> {
        let mut codecs: Vec<Box<dyn Codec>> = vec![Box::new(JsonCodec::new())];
        #[cfg(feature = "cbor")]
        codecs.push(Box::new(crate::codec::CborCodec::new()));
        codecs
    }
}
