//! Vital-sign types and the consciousness scale.
//!
//! `Vitals` is the full numeric snapshot carried by the patient state;
//! `VitalsTarget` is the partial per-phase profile the trending engine
//! pulls the snapshot toward. Numeric fields must stay finite — the
//! trending engine clamps and rounds every value it produces.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// AVPU consciousness scale.
///
/// Categorical, never trended — a phase target sets it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consciousness {
    Alert,
    Verbal,
    Pain,
    Unresponsive,
}

impl Consciousness {
    pub fn as_str(self) -> &'static str {
        match self {
            Consciousness::Alert => "alert",
            Consciousness::Verbal => "verbal",
            Consciousness::Pain => "pain",
            Consciousness::Unresponsive => "unresponsive",
        }
    }
}

impl fmt::Display for Consciousness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One full vital-sign snapshot.
///
/// Updated once per tick by the trending engine. `glucose` is only
/// populated for scenarios that track it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Heart rate, beats per minute.
    pub heart_rate: f64,
    /// Systolic blood pressure, mmHg.
    pub systolic_bp: f64,
    /// Diastolic blood pressure, mmHg.
    pub diastolic_bp: f64,
    /// Peripheral oxygen saturation, percent.
    pub oxygen_saturation: f64,
    /// Core temperature, degrees Celsius.
    pub temperature: f64,
    /// Respiratory rate, breaths per minute.
    pub respiratory_rate: f64,
    /// Capillary glucose, mg/dL. Absent unless the scenario tracks it.
    pub glucose: Option<f64>,
    /// AVPU consciousness level.
    pub consciousness: Consciousness,
    /// Wall-clock time (UTC) of the last update.
    pub updated_at: DateTime<Utc>,
}

impl Vitals {
    /// The snapshot of a patient who has arrested: all numeric fields zero,
    /// consciousness `Unresponsive`. Applied on entry to the terminal phase.
    pub fn flatline(now: DateTime<Utc>) -> Self {
        Self {
            heart_rate: 0.0,
            systolic_bp: 0.0,
            diastolic_bp: 0.0,
            oxygen_saturation: 0.0,
            temperature: 0.0,
            respiratory_rate: 0.0,
            glucose: None,
            consciousness: Consciousness::Unresponsive,
            updated_at: now,
        }
    }

    /// Return true when every numeric field holds a finite value.
    pub fn is_finite(&self) -> bool {
        let mut fields = vec![
            self.heart_rate,
            self.systolic_bp,
            self.diastolic_bp,
            self.oxygen_saturation,
            self.temperature,
            self.respiratory_rate,
        ];
        if let Some(g) = self.glucose {
            fields.push(g);
        }
        fields.iter().all(|v| v.is_finite())
    }
}

/// The partial vitals profile a phase pulls the patient toward.
///
/// Fields left `None` are not trended — they only receive the smaller
/// stability noise so the patient still "looks alive".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalsTarget {
    pub heart_rate: Option<f64>,
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,
    pub oxygen_saturation: Option<f64>,
    pub temperature: Option<f64>,
    pub respiratory_rate: Option<f64>,
    pub glucose: Option<f64>,
    pub consciousness: Option<Consciousness>,
}
