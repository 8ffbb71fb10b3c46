//! UUID helpers, including the index-ordered binary layout
//!
//! Version-1 UUIDs put their most-varying bytes first, which fragments
//! B-tree indexes when stored as raw bytes. The ordered layout swaps the
//! timestamp fields (high, mid, low) to the front so lexicographic byte
//! order approximates creation order.

use uuid::Uuid;

/// Generates a random (v4) UUID
#[must_use]
pub fn new_v4() -> Uuid {
    Uuid::new_v4()
}

/// Generates a time-based (v1) UUID for the given node id
#[must_use]
pub fn new_v1(node_id: &[u8; 6]) -> Uuid {
    Uuid::now_v1(node_id)
}

/// Whether the string parses as a UUID
#[must_use]
pub fn is_valid(candidate: &str) -> bool {
    Uuid::parse_str(candidate).is_ok()
}

/// Encodes a UUID into the index-ordered 16-byte layout
#[must_use]
pub fn to_ordered_bytes(id: &Uuid) -> [u8; 16] {
    let raw = id.as_bytes();
    let mut ordered = [0_u8; 16];

    ordered[0..2].copy_from_slice(&raw[6..8]); // time_hi_and_version
    ordered[2..4].copy_from_slice(&raw[4..6]); // time_mid
    ordered[4..8].copy_from_slice(&raw[0..4]); // time_low
    ordered[8..16].copy_from_slice(&raw[8..16]);

    ordered
}

/// Decodes the index-ordered layout back into a UUID
#[must_use]
pub fn from_ordered_bytes(ordered: &[u8; 16]) -> Uuid {
    let mut raw = [0_u8; 16];

    raw[6..8].copy_from_slice(&ordered[0..2]);
    raw[4..6].copy_from_slice(&ordered[2..4]);
    raw[0..4].copy_from_slice(&ordered[4..8]);
    raw[8..16].copy_from_slice(&ordered[8..16]);

    Uuid::from_bytes(raw)
}
