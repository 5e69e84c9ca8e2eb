//! Hash-chain primitives: entry hashing and chain integrity verification.
//!
//! Every field that contributes to an entry's hash is listed explicitly so
//! nothing is accidentally omitted.
//!
//! Hash input layout (bytes, in order):
//!   1. sequence as 8-byte little-endian
//!   2. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   3. kind as its stable string form
//!   4. description as UTF-8 bytes
//!   5. performer as its stable string form
//!   6. timestamp as RFC 3339 UTF-8 bytes

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use vitasim_contracts::timeline::{ActionKind, Performer, TimelineEntry};

/// Compute the SHA-256 hash for a single timeline entry.
///
/// The hash commits to every field that identifies an entry: its position
/// in the chain (`sequence`), its link to the previous entry
/// (`prev_hash`), and the recorded action itself.
///
/// Returns a lowercase 64-character hex string.
pub fn hash_entry(
    sequence: u64,
    prev_hash: &str,
    kind: ActionKind,
    description: &str,
    performer: Performer,
    timestamp: DateTime<Utc>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(kind.as_str().as_bytes());
    hasher.update(description.as_bytes());
    hasher.update(performer.as_str().as_bytes());
    hasher.update(timestamp.to_rfc3339().as_bytes());

    hex::encode(hasher.finalize())
}

/// Verify the integrity of a case timeline.
///
/// Returns `true` when the chain is valid according to both rules:
///
/// 1. **Prev-hash linkage** — each entry's `prev_hash` equals the
///    `this_hash` of the preceding entry (or `GENESIS_HASH` for entry 0).
/// 2. **Hash correctness** — each entry's `this_hash` matches the value
///    recomputed from its own fields.
///
/// Returns `false` the moment any mismatch is detected.  An empty timeline
/// is defined as valid.  The session runs this check on every reloaded
/// blob — a failing chain means the persisted case was tampered with or
/// corrupted and must be discarded.
pub fn verify_chain(entries: &[TimelineEntry]) -> bool {
    let mut expected_prev = TimelineEntry::GENESIS_HASH.to_string();

    for entry in entries {
        // Rule 1: the stored prev_hash must match what we expect.
        if entry.prev_hash != expected_prev {
            return false;
        }

        // Rule 2: recompute this_hash and compare to the stored value.
        let recomputed = hash_entry(
            entry.sequence,
            &entry.prev_hash,
            entry.kind,
            &entry.description,
            entry.performer,
            entry.timestamp,
        );
        if entry.this_hash != recomputed {
            return false;
        }

        // Advance the expected prev_hash to this entry's hash.
        expected_prev = entry.this_hash.clone();
    }

    true
}
