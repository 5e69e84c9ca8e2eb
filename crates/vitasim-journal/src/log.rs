//! Append helpers for the case timeline and the bounded alert log.
//!
//! Both live inside `PatientState` so they persist and broadcast with the
//! rest of the case; this module owns the append discipline — sequence
//! numbering and hash linkage for timeline entries, the recency bound for
//! alerts.

use chrono::{DateTime, Utc};
use tracing::debug;

use vitasim_contracts::patient::Alert;
use vitasim_contracts::timeline::{ActionKind, Performer, TimelineEntry};

use crate::chain::hash_entry;

/// The number of alerts retained in a patient state.
pub const MAX_ALERTS: usize = 5;

/// Append one entry to a case timeline, maintaining the hash chain.
///
/// Computes `this_hash` from (sequence, prev_hash, action fields), links
/// `prev_hash` to the previous entry or the genesis sentinel, and pushes
/// the entry. Entries appended here are never modified or deleted by the
/// runtime.
pub fn append(
    timeline: &mut Vec<TimelineEntry>,
    kind: ActionKind,
    description: impl Into<String>,
    performer: Performer,
    now: DateTime<Utc>,
) {
    let description = description.into();
    let sequence = timeline.len() as u64;
    let prev_hash = timeline
        .last()
        .map(|e| e.this_hash.clone())
        .unwrap_or_else(|| TimelineEntry::GENESIS_HASH.to_string());

    let this_hash = hash_entry(sequence, &prev_hash, kind, &description, performer, now);

    debug!(sequence, kind = %kind, description = %description, "timeline entry appended");

    timeline.push(TimelineEntry {
        sequence,
        kind,
        description,
        performer,
        timestamp: now,
        prev_hash,
        this_hash,
    });
}

/// Push an alert, retaining only the `MAX_ALERTS` most recent.
///
/// Alerts are ordered oldest-first; when the bound is exceeded the oldest
/// entries are dropped from the front.
pub fn push_alert(alerts: &mut Vec<Alert>, alert: Alert) {
    alerts.push(alert);
    if alerts.len() > MAX_ALERTS {
        let excess = alerts.len() - MAX_ALERTS;
        alerts.drain(..excess);
    }
}
