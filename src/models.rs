//! Session data model shared by every codec

pub mod snapshot;
pub mod value;

pub use snapshot::{zero_deadline, Snapshot};
pub use value::{values_depth, Value, ValueKind, Values};
