//! The mutable patient case record and its supporting types.
//!
//! Exactly one `PatientState` is active per session. It is owned by the
//! simulation core and handed to observers only as cloned snapshots —
//! never as a live reference — so external code cannot bypass the
//! transition rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::lab::LabResult;
use crate::medication::Medication;
use crate::scenario::{ExamFinding, PhaseName};
use crate::timeline::TimelineEntry;
use crate::vitals::Vitals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

/// Who the simulated patient is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub name: String,
    pub age: u8,
    pub sex: Sex,
}

/// One entry of past medical history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub description: String,
}

/// How urgent an alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

/// A notification shown to the learner.
///
/// The alert log is bounded: only the 5 most recent alerts are retained
/// (enforced by the journal crate's `push_alert`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub severity: AlertSeverity,
    pub raised_at: DateTime<Utc>,
}

/// The single mutable record describing the active simulated patient.
///
/// Created by case generation, mutated continuously by the tick loop and
/// by user actions, destroyed by clearing the case. Everything in it is
/// serializable — the whole record is persisted as one JSON blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientState {
    pub case_id: Uuid,
    pub demographics: Demographics,
    /// Current condition label (from the scenario).
    pub condition: String,
    pub vitals: Vitals,
    pub risk_factors: Vec<String>,
    pub history: Vec<HistoryEntry>,
    /// Symptoms revealed so far, accumulated across phase transitions.
    pub symptoms: Vec<String>,
    /// Exam findings revealed so far.
    pub exam_findings: Vec<ExamFinding>,
    pub lab_results: Vec<LabResult>,
    pub medications: Vec<Medication>,
    /// Id of the active scenario; re-resolved against the catalog on load.
    pub scenario_id: String,
    /// Must name a phase present in the active scenario.
    pub current_phase: PhaseName,
    pub phase_started_at: DateTime<Utc>,
    /// The 5 most recent alerts, newest last.
    pub alerts: Vec<Alert>,
    pub score: i64,
    /// Append-only, hash-chained record of everything that happened.
    pub timeline: Vec<TimelineEntry>,
}
