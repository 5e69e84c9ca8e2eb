//! # vitasim-journal
//!
//! Append-only, SHA-256 hash-chained case timeline and bounded alert log
//! for the vitasim patient simulation core.
//!
//! ## Overview
//!
//! Every action the simulation records — medications, lab orders, exams,
//! phase changes — is appended to the case timeline as a `TimelineEntry`
//! that links to the previous entry via its SHA-256 hash.  Tampering with
//! any entry — even a single byte — breaks the chain and is detected by
//! `verify_chain`.  The session reuses that check to reject corrupted
//! persisted state on load.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vitasim_journal::{append, push_alert, verify_chain};
//!
//! append(&mut state.timeline, ActionKind::LabOrder, "Zlecono badanie: Troponina T", Performer::User, now);
//! assert!(verify_chain(&state.timeline));
//! ```

pub mod chain;
pub mod log;

pub use chain::{hash_entry, verify_chain};
pub use log::{append, push_alert, MAX_ALERTS};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use vitasim_contracts::patient::{Alert, AlertSeverity};
    use vitasim_contracts::timeline::{ActionKind, Performer, TimelineEntry};

    use super::{append, push_alert, verify_chain, MAX_ALERTS};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn ts(offset_secs: i64) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + chrono::Duration::seconds(offset_secs)
    }

    fn make_alert(message: &str) -> Alert {
        Alert {
            message: message.to_string(),
            severity: AlertSeverity::Info,
            raised_at: ts(0),
        }
    }

    fn chain_of(descriptions: &[&str]) -> Vec<TimelineEntry> {
        let mut timeline = Vec::new();
        for (i, d) in descriptions.iter().enumerate() {
            append(
                &mut timeline,
                ActionKind::Observation,
                *d,
                Performer::System,
                ts(i as i64),
            );
        }
        timeline
    }

    // ── Chain integrity ───────────────────────────────────────────────────────

    /// Appending three entries produces a valid chain.
    #[test]
    fn test_hash_chain_integrity() {
        let timeline = chain_of(&["first", "second", "third"]);
        assert!(verify_chain(&timeline), "chain must be valid after sequential appends");
    }

    /// An empty timeline is defined as valid.
    #[test]
    fn test_empty_chain_is_valid() {
        assert!(verify_chain(&[]));
    }

    /// Mutating any entry's description breaks the chain.
    #[test]
    fn test_tamper_detection() {
        let mut timeline = chain_of(&["step-a", "step-b", "step-c"]);
        timeline[0].description = "TAMPERED".to_string();

        // The chain must now fail verification because entry 0's this_hash
        // no longer matches the recomputed hash of its (mutated) content.
        assert!(
            !verify_chain(&timeline),
            "chain must detect tampering with a stored entry"
        );
    }

    /// Changing a timestamp is also detected.
    #[test]
    fn test_tampered_timestamp_detected() {
        let mut timeline = chain_of(&["a", "b"]);
        timeline[1].timestamp = ts(9999);
        assert!(!verify_chain(&timeline));
    }

    /// The first entry's `prev_hash` must equal the genesis sentinel.
    #[test]
    fn test_genesis_hash() {
        let timeline = chain_of(&["first"]);
        assert_eq!(timeline[0].prev_hash, TimelineEntry::GENESIS_HASH);
    }

    /// Sequence numbers must be 0, 1, 2, … with no gaps.
    #[test]
    fn test_sequence_monotonic() {
        let timeline = chain_of(&["a", "b", "c", "d"]);
        for (idx, entry) in timeline.iter().enumerate() {
            assert_eq!(entry.sequence, idx as u64);
        }
    }

    /// A chain with a broken prev-hash link fails even when each entry's
    /// own hash is internally consistent.
    #[test]
    fn test_broken_linkage_detected() {
        let mut timeline = chain_of(&["a", "b"]);
        let mut other = chain_of(&["x"]);
        // Splice an entry from a different chain in place of entry 1.
        timeline[1] = other.remove(0);
        timeline[1].sequence = 1;
        assert!(!verify_chain(&timeline));
    }

    // ── Alert bound ───────────────────────────────────────────────────────────

    /// The alert log never exceeds MAX_ALERTS, dropping the oldest first.
    #[test]
    fn test_alert_bound() {
        let mut alerts = Vec::new();
        for i in 0..12 {
            push_alert(&mut alerts, make_alert(&format!("alert {i}")));
            assert!(alerts.len() <= MAX_ALERTS);
        }
        assert_eq!(alerts.len(), MAX_ALERTS);
        // The oldest entries were dropped; the newest survive.
        assert_eq!(alerts[0].message, "alert 7");
        assert_eq!(alerts[MAX_ALERTS - 1].message, "alert 11");
    }

    /// Fewer than MAX_ALERTS alerts are all retained in order.
    #[test]
    fn test_alerts_below_bound_retained() {
        let mut alerts = Vec::new();
        push_alert(&mut alerts, make_alert("one"));
        push_alert(&mut alerts, make_alert("two"));
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].message, "one");
        assert_eq!(alerts[1].message, "two");
    }
}
