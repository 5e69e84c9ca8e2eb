//! Medication order and record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of an administered medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatus {
    Active,
    Discontinued,
    Completed,
}

/// The caller-facing prescription request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationOrder {
    /// Drug name as typed by the user (e.g. "Aspirina").
    pub name: String,
    /// Dose with unit (e.g. "300mg").
    pub dosage: String,
    /// Administration route (e.g. "PO", "IV").
    pub route: String,
}

/// A medication on the patient's record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    pub dosage: String,
    pub route: String,
    /// Dosing schedule, when one was specified.
    pub frequency: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: MedicationStatus,
}

impl Medication {
    /// Create an active medication record from a prescription order.
    pub fn from_order(order: &MedicationOrder, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: order.name.clone(),
            dosage: order.dosage.clone(),
            route: order.route.clone(),
            frequency: None,
            started_at: now,
            ended_at: None,
            status: MedicationStatus::Active,
        }
    }
}
