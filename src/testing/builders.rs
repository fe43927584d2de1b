//! Fluent builders for creating customizable test snapshots

use crate::models::{Snapshot, Value, Values};
use chrono::{DateTime, Duration, FixedOffset, Utc};

use super::fixtures::TestFixtures;

/// Builder for creating customized test snapshots
pub struct SnapshotBuilder {
    deadline: DateTime<FixedOffset>,
    values: Values,
}

impl SnapshotBuilder {
    /// Start from the canonical deadline with no values
    #[must_use]
    pub fn new() -> Self {
        Self {
            deadline: TestFixtures::deadline(),
            values: Values::new(),
        }
    }

    #[must_use]
    pub fn deadline(mut self, deadline: DateTime<FixedOffset>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Set the deadline relative to now, in UTC
    #[must_use]
    pub fn expires_in_hours(mut self, hours: i64) -> Self {
        self.deadline = (Utc::now() + Duration::hours(hours)).fixed_offset();
        self
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// Add a value nested `depth` lists deep around `leaf`
    #[must_use]
    pub fn with_nested_lists(mut self, key: &str, depth: usize, leaf: impl Into<Value>) -> Self {
        let mut value = leaf.into();
        for _ in 0..depth {
            value = Value::List(vec![value]);
        }
        self.values.insert(key.to_string(), value);
        self
    }

    #[must_use]
    pub fn build(self) -> Snapshot {
        Snapshot::new(self.deadline, self.values)
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}
