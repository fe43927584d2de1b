//! Session Manager - codec-backed load/save around a session store
//!
//! The manager owns the session lifecycle: it decodes whatever the store holds
//! for a token, hands out a [`SessionData`] for the request to edit, and encodes
//! it back when the request finishes. Bytes produced by the codec are never
//! inspected here.
//!
//! A blob that fails to decode is treated as unrecoverable. The manager logs it
//! and starts a fresh session rather than failing the request.

use super::data::{SessionData, SessionStatus};
use super::errors::SessionError;
use super::store::SessionStore;
use crate::codec::{Codec, CodecFactory};
use crate::settings::{Settings, SettingsError};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use log::{debug, warn};

/// Loads and saves sessions through a codec and a store
pub struct SessionManager<S: SessionStore> {
    codec: Box<dyn Codec>,
    store: S,
    lifetime: Duration,
}

impl<S: SessionStore> SessionManager<S> {
    /// Create a session manager; new sessions expire `lifetime` after creation
    #[must_use]
    pub fn new(codec: Box<dyn Codec>, store: S, lifetime: Duration) -> Self {
        Self {
            codec,
            store,
            lifetime,
        }
    }

    /// Build the configured codec and wrap `store`
    ///
    /// # Errors
    ///
    /// Returns an error if the codec settings are invalid or the lifetime
    /// does not fit in a `chrono::Duration`
    pub fn from_settings(settings: &Settings, store: S) -> Result<Self, SettingsError> {
        let codec = CodecFactory::create(&settings.codec)?;
        let lifetime = i64::try_from(settings.session.lifetime_hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or_else(|| {
                SettingsError::Invalid(format!(
                    "session.lifetime_hours {} is too large",
                    settings.session.lifetime_hours
                ))
            })?;
        Ok(Self::new(codec, store, lifetime))
    }

    #[must_use]
    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Load the session for `token`.
    ///
    /// Unknown tokens, undecodable blobs and sessions whose deadline has passed
    /// all yield a fresh, empty session.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself fails
    pub fn load(&self, token: &str) -> Result<SessionData, SessionError> {
        let Some(bytes) = self.store.find(token)? else {
            return Ok(self.fresh_session());
        };

        let snapshot = match self.codec.decode_snapshot(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Discarding undecodable session data ({} codec): {e}", self.codec.format());
                return Ok(self.fresh_session());
            }
        };

        let data = SessionData::from_snapshot(snapshot);
        if data.is_expired_at(Utc::now()) {
            debug!("Stored session expired at {}, starting fresh", data.deadline());
            return Ok(self.fresh_session());
        }
        Ok(data)
    }

    /// Persist the session according to its status.
    ///
    /// Unmodified sessions are left alone, modified ones are encoded and
    /// committed, destroyed ones are deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the store fails; nothing is written
    /// in either case
    pub fn save(&self, token: &str, session: &mut SessionData) -> Result<(), SessionError> {
        match session.status() {
            SessionStatus::Unmodified => Ok(()),
            SessionStatus::Modified => {
                let bytes = self.codec.encode_snapshot(&session.snapshot())?;
                self.store.commit(token, &bytes, session.deadline())?;
                session.mark_saved();
                Ok(())
            }
            SessionStatus::Destroyed => self.store.delete(token),
        }
    }

    /// Destroy the session and delete it from the store immediately
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub fn destroy(&self, token: &str, session: &mut SessionData) -> Result<(), SessionError> {
        session.destroy();
        self.store.delete(token)
    }

    fn fresh_session(&self) -> SessionData {
        let now = Utc::now();
        let deadline = now
            .checked_add_signed(self.lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        SessionData::new(deadline.fixed_offset())
    }

    /// Deadline a session created right now would get
    #[must_use]
    pub fn fresh_deadline(&self) -> DateTime<FixedOffset> {
        self.fresh_session().deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use crate::session::store::MemoryStore;

    fn manager() -> SessionManager<MemoryStore> {
        SessionManager::new(Box::new(JsonCodec::new()), MemoryStore::new(), Duration::hours(1))
    }

    #[test]
    fn test_unknown_token_gives_fresh_session() {
        let manager = manager();
        let before = Utc::now();
        let session = manager.load("missing").unwrap();

        assert!(session.values().is_empty());
        assert_eq!(session.status(), SessionStatus::Unmodified);
        assert!(session.deadline() > (before + Duration::minutes(59)).fixed_offset());
    }

    #[test]
    fn test_put_save_load() {
        let manager = manager();
        let mut session = manager.load("token").unwrap();
        session.put("message", "Hello from a session!");
        manager.save("token", &mut session).unwrap();
        assert_eq!(session.status(), SessionStatus::Unmodified);

        let loaded = manager.load("token").unwrap();
        assert_eq!(loaded.get_str("message"), Some("Hello from a session!"));
        assert_eq!(loaded.deadline(), session.deadline());
    }

    #[test]
    fn test_unmodified_session_is_not_written() {
        let manager = manager();
        let mut session = manager.load("token").unwrap();
        manager.save("token", &mut session).unwrap();
        assert!(manager.store().is_empty());
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_fresh_session() {
        let manager = manager();
        let expiry = (Utc::now() + Duration::hours(1)).fixed_offset();
        manager.store().commit("token", b"{not json", expiry).unwrap();

        let session = manager.load("token").unwrap();
        assert!(session.values().is_empty());
    }

    #[test]
    fn test_expired_deadline_in_blob_gives_fresh_session() {
        let manager = manager();
        let mut values = crate::models::Values::new();
        values.insert("stale".to_string(), crate::models::Value::from(true));
        let past = (Utc::now() - Duration::minutes(1)).fixed_offset();
        let bytes = manager.codec().encode(past, &values).unwrap();
        // Store expiry is independent of the encoded deadline
        let store_expiry = (Utc::now() + Duration::hours(1)).fixed_offset();
        manager.store().commit("token", &bytes, store_expiry).unwrap();

        let session = manager.load("token").unwrap();
        assert!(!session.exists("stale"));
    }

    #[test]
    fn test_encode_failure_writes_nothing() {
        let manager = manager();
        let mut session = manager.load("token").unwrap();
        session.put("bad", f64::NAN);

        let result = manager.save("token", &mut session);
        assert!(matches!(result, Err(SessionError::Encode(_))));
        assert!(manager.store().is_empty());
        assert_eq!(session.status(), SessionStatus::Modified);
    }

    #[test]
    fn test_destroy_removes_from_store() {
        let manager = manager();
        let mut session = manager.load("token").unwrap();
        session.put("a", 1);
        manager.save("token", &mut session).unwrap();
        assert_eq!(manager.store().len(), 1);

        manager.destroy("token", &mut session).unwrap();
        assert!(manager.store().is_empty());
        assert_eq!(session.status(), SessionStatus::Destroyed);
    }

    #[test]
    fn test_from_settings_rejects_huge_lifetime() {
        let mut settings = Settings::default();
        settings.session.lifetime_hours = u64::MAX;
        assert!(SessionManager::from_settings(&settings, MemoryStore::new()).is_err());
    }
}
