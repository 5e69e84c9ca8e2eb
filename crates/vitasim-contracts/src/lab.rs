//! Laboratory order and result types.
//!
//! A `LabResult` is created the moment a test is ordered and completes
//! asynchronously once its simulated turnaround time elapses. Status only
//! ever advances forward — `complete()` is the single mutator and it
//! never moves a result back to `Ordered`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a lab order. Forward-only: `Ordered` → `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabStatus {
    Ordered,
    Completed,
}

/// A reported lab value — numeric for quantitative assays, free text for
/// qualitative results and normal placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabValue {
    Number(f64),
    Text(String),
}

impl LabValue {
    /// The numeric value, if this result is quantitative.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LabValue::Number(n) => Some(*n),
            LabValue::Text(_) => None,
        }
    }
}

/// One ordered laboratory test and (eventually) its result.
///
/// The value is fixed at order time from the phase active at that moment;
/// completion only flips the status and never re-evaluates the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub id: Uuid,
    /// Test name as displayed to the user (e.g. "Troponina T").
    pub test_name: String,
    /// Panel/category label (e.g. "kardiologiczne").
    pub category: String,
    pub value: LabValue,
    pub unit: String,
    pub reference_range: String,
    pub is_abnormal: bool,
    /// When the order was placed.
    pub ordered_at: DateTime<Utc>,
    /// When the result becomes available. Persisted, so a pending order
    /// survives a stop/restart of the simulation.
    pub result_at: DateTime<Utc>,
    pub status: LabStatus,
}

impl LabResult {
    /// True when the order is still pending and its turnaround has elapsed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == LabStatus::Ordered && now >= self.result_at
    }

    /// Advance the status to `Completed`.
    ///
    /// The only status mutator. Calling it on an already-completed result
    /// is a no-op, so the status can never regress.
    pub fn complete(&mut self) {
        if self.status == LabStatus::Ordered {
            self.status = LabStatus::Completed;
        }
    }
}
