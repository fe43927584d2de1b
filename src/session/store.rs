//! Session store capability and an in-memory implementation
//!
//! Stores treat codec output as an opaque blob keyed by session token.

use super::errors::SessionError;
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

/// Persists encoded session blobs by token
pub trait SessionStore: Send + Sync {
    /// Blob for `token`, or `None` if unknown or expired
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails
    fn find(&self, token: &str) -> Result<Option<Vec<u8>>, SessionError>;

    /// Insert or replace the blob for `token`
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails
    fn commit(
        &self,
        token: &str,
        bytes: &[u8],
        expiry: DateTime<FixedOffset>,
    ) -> Result<(), SessionError>;

    /// Remove `token`; removing an unknown token is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails
    fn delete(&self, token: &str) -> Result<(), SessionError>;
}

#[derive(Debug, Clone)]
struct StoredSession {
    bytes: Vec<u8>,
    expiry: DateTime<Utc>,
}

/// Process-local store, mainly for tests and single-instance deployments
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, StoredSession>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().map_or(0, |sessions| sessions.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_poisoned<T>(_: T) -> SessionError {
    SessionError::Store("memory store lock poisoned".to_string())
}

impl SessionStore for MemoryStore {
    fn find(&self, token: &str) -> Result<Option<Vec<u8>>, SessionError> {
        let sessions = self.sessions.read().map_err(lock_poisoned)?;
        Ok(sessions
            .get(token)
            .filter(|stored| stored.expiry > Utc::now())
            .map(|stored| stored.bytes.clone()))
    }

    fn commit(
        &self,
        token: &str,
        bytes: &[u8],
        expiry: DateTime<FixedOffset>,
    ) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().map_err(lock_poisoned)?;
        sessions.insert(
            token.to_string(),
            StoredSession {
                bytes: bytes.to_vec(),
                expiry: expiry.with_timezone(&Utc),
            },
        );
        Ok(())
    }

    fn delete(&self, token: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().map_err(lock_poisoned)?;
        sessions.remove(token);
        Ok(())
    }
}
