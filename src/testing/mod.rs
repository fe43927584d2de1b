//! Unified testing utilities for sessioncodec
//!
//! Shared fixtures, builders and assertions for codec and session tests.
//!
//! ## Organization
//!
//! - [`fixtures`] - Pre-built snapshots covering every value kind
//! - [`builders`] - Fluent builder for custom snapshots
//! - [`assertions`] - Round-trip and snapshot equality helpers
//!
//! ## Usage
//!
//! ```rust
//! use sessioncodec::codec::JsonCodec;
//! use sessioncodec::testing::{assert_round_trip, SnapshotBuilder};
//!
//! let snapshot = SnapshotBuilder::new()
//!     .expires_in_hours(2)
//!     .with("message", "Hello from a session!")
//!     .build();
//! assert_round_trip(&JsonCodec::new(), &snapshot);
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;

// Re-export commonly used items for convenience
pub use assertions::*;
pub use builders::*;
pub use fixtures::TestFixtures;

/// Common test constants
pub mod constants {
    /// Message value used by the canonical put/get example
    pub const TEST_MESSAGE: &str = "Hello from a session!";

    /// Deadline of the canonical example snapshot
    pub const TEST_DEADLINE: &str = "2024-01-01T00:00:00Z";

    /// Default test session token
    pub const TEST_TOKEN: &str = "test-session-token";
}
