//! Session Management Module
//!
//! The collaborators a codec is plugged into: a session manager that owns the
//! lifecycle, and a store that persists the codec's opaque bytes.
//!
//! # Modules
//!
//! - [`manager`] - load/save through the configured codec
//! - [`store`] - store capability plus an in-memory implementation
//! - [`data`] - a loaded session and its edit status
//! - [`errors`] - session errors

pub mod data;
pub mod errors;
pub mod manager;
pub mod store;

// Re-export commonly used items for convenience
pub use data::{SessionData, SessionStatus};
pub use errors::SessionError;
pub use manager::SessionManager;
pub use store::{MemoryStore, SessionStore};
