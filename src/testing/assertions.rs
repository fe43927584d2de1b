//! Custom assertion helpers for codec tests

use crate::codec::Codec;
use crate::models::Snapshot;

/// Assert two snapshots match: same instant, same offset, same values
///
/// # Panics
///
/// Panics if any of the three differ.
pub fn assert_snapshot_eq(actual: &Snapshot, expected: &Snapshot) {
    assert_eq!(
        actual.deadline, expected.deadline,
        "Deadline instant differs"
    );
    assert_eq!(
        actual.deadline.offset(),
        expected.deadline.offset(),
        "Deadline offset differs"
    );
    assert_eq!(actual.values, expected.values, "Values differ");
}

/// Encode then decode `snapshot` with `codec` and assert nothing changed.
///
/// Returns the encoded bytes for further inspection.
///
/// # Panics
///
/// Panics if encoding or decoding fails, or the decoded snapshot differs.
pub fn assert_round_trip(codec: &dyn Codec, snapshot: &Snapshot) -> Vec<u8> {
    let bytes = codec
        .encode_snapshot(snapshot)
        .unwrap_or_else(|e| panic!("{} encode failed: {e}", codec.format()));
    let decoded = codec
        .decode_snapshot(&bytes)
        .unwrap_or_else(|e| panic!("{} decode failed: {e}", codec.format()));
    assert_snapshot_eq(&decoded, snapshot);
    bytes
}
