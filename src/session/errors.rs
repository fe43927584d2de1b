//! Session collaborator errors

use crate::codec::EncodeError;
use thiserror::Error;

/// Errors raised while loading or saving a session
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backing store failed
    #[error("session store error: {0}")]
    Store(String),

    /// The session content cannot be serialized
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
