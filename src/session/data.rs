//! A loaded session and its in-memory edits

use crate::models::{Snapshot, Value, Values};
use chrono::{DateTime, FixedOffset, Utc};

/// What needs to happen to a session when the request finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unmodified,
    Modified,
    Destroyed,
}

/// Session state between a `load` and a `save`
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    deadline: DateTime<FixedOffset>,
    values: Values,
    status: SessionStatus,
}

impl SessionData {
    /// A new, empty session expiring at `deadline`
    #[must_use]
    pub fn new(deadline: DateTime<FixedOffset>) -> Self {
        Self {
            deadline,
            values: Values::new(),
            status: SessionStatus::Unmodified,
        }
    }

    /// Wrap a snapshot decoded from the store
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            deadline: snapshot.deadline,
            values: snapshot.values,
            status: SessionStatus::Unmodified,
        }
    }

    /// Copy of the persistable state
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.deadline, self.values.clone())
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn deadline(&self) -> DateTime<FixedOffset> {
        self.deadline
    }

    pub fn set_deadline(&mut self, deadline: DateTime<FixedOffset>) {
        self.deadline = deadline;
        self.mark_modified();
    }

    /// Whether the deadline is at or before `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.deadline.with_timezone(&Utc) <= now
    }

    /// Add or replace a value
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
        self.mark_modified();
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value for `key`, or `None` when missing or not a string
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    #[must_use]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Remove and return a value; one-time flash messages use this
    pub fn pop(&mut self, key: &str) -> Option<Value> {
        let value = self.values.remove(key);
        if value.is_some() {
            self.mark_modified();
        }
        value
    }

    pub fn remove(&mut self, key: &str) {
        self.pop(key);
    }

    /// Drop every value, keeping the deadline
    pub fn clear(&mut self) {
        if !self.values.is_empty() {
            self.values.clear();
            self.mark_modified();
        }
    }

    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in sorted order
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Mark for deletion from the store on the next save
    pub fn destroy(&mut self) {
        self.values.clear();
        self.status = SessionStatus::Destroyed;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.status = SessionStatus::Unmodified;
    }

    fn mark_modified(&mut self) {
        if self.status != SessionStatus::Destroyed {
            self.status = SessionStatus::Modified;
        }
    }
}
