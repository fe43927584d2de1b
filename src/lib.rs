#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Session-data codecs.
//!
//! A [`Codec`] converts a session snapshot (an expiry deadline plus a map of
//! dynamically-typed values) to opaque bytes for a session store, and back.
//! [`JsonCodec`] and [`CborCodec`] implement it; [`SessionManager`] shows the
//! codec wired between a session lifecycle and a [`SessionStore`].

/// Version of the sessioncodec crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod codec;
pub mod models;
pub mod session;
pub mod settings;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
#[cfg(feature = "cbor")]
pub use codec::CborCodec;
pub use codec::{Codec, CodecFactory, CodecFormat, DecodeError, EncodeError, JsonCodec};
pub use models::{Snapshot, Value, ValueKind, Values};
pub use session::{MemoryStore, SessionData, SessionManager, SessionStore};
pub use settings::Settings;
