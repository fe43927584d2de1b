//! Session snapshot: the deadline + values pair a codec operates on

use super::value::{Value, Values};
use chrono::{DateTime, FixedOffset};

/// Seconds from the Unix epoch to `0001-01-01T00:00:00Z`
const ZERO_DEADLINE_UNIX_SECONDS: i64 = -62_135_596_800;

/// The "no expiration set" instant, `0001-01-01T00:00:00Z`.
///
/// Returned for empty input and for an absent or null deadline field.
#[must_use]
pub fn zero_deadline() -> DateTime<FixedOffset> {
    DateTime::from_timestamp(ZERO_DEADLINE_UNIX_SECONDS, 0)
        .unwrap_or_default()
        .fixed_offset()
}

/// One session's persistable state at a point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub deadline: DateTime<FixedOffset>,
    pub values: Values,
}

impl Snapshot {
    #[must_use]
    pub fn new(deadline: DateTime<FixedOffset>, values: Values) -> Self {
        Self { deadline, values }
    }

    /// Zero deadline and no values; what decoding empty input yields
    #[must_use]
    pub fn empty() -> Self {
        Self {
            deadline: zero_deadline(),
            values: Values::new(),
        }
    }

    /// Whether an expiration has been set
    #[must_use]
    pub fn has_deadline(&self) -> bool {
        self.deadline != zero_deadline()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}
