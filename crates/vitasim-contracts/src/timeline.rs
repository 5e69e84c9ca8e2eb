//! Case timeline entry types.
//!
//! `TimelineEntry` is a single entry in the per-case hash chain — every
//! medical action, system observation, and phase change the case has seen,
//! in append order. The chain hashes are computed and verified by the
//! vitasim-journal crate; this module only defines the data shape.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of medical action a timeline entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Medication,
    Examination,
    LabOrder,
    Diagnosis,
    Observation,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Medication => "medication",
            ActionKind::Examination => "examination",
            ActionKind::LabOrder => "lab-order",
            ActionKind::Diagnosis => "diagnosis",
            ActionKind::Observation => "observation",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who performed the recorded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Performer {
    /// The learner driving the case.
    User,
    /// The simulation itself (phase changes, admissions).
    System,
}

impl Performer {
    pub fn as_str(self) -> &'static str {
        match self {
            Performer::User => "user",
            Performer::System => "system",
        }
    }
}

/// One immutable entry in the case timeline.
///
/// Each entry commits to the previous one via `prev_hash`, forming an
/// append-only chain. Modifying any field invalidates `this_hash` and
/// every subsequent `prev_hash`, which chain verification detects — the
/// same check doubles as corruption detection for persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Monotonically increasing position in the chain, starting at 0.
    pub sequence: u64,
    pub kind: ActionKind,
    /// Human-readable description shown on the case timeline.
    pub description: String,
    pub performer: Performer,
    /// Wall-clock time (UTC) the action was recorded.
    pub timestamp: DateTime<Utc>,
    /// SHA-256 hash (hex) of the previous entry, or `GENESIS_HASH` for the
    /// first entry.
    pub prev_hash: String,
    /// SHA-256 hash (hex) of this entry's canonical content.
    pub this_hash: String,
}

impl TimelineEntry {
    /// The sentinel `prev_hash` used for the first entry in every chain.
    ///
    /// 64 hex zeros — a value that can never be the SHA-256 of real data,
    /// making genesis detection unambiguous.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}
