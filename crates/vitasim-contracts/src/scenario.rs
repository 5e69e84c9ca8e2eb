//! Disease scenario templates and the read-only catalog.
//!
//! A `Scenario` describes a disease course as an ordered sequence of
//! phases. Scenarios are immutable at runtime and shared across cases —
//! the session only ever reads them through the `ScenarioCatalog`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lab::LabValue;
use crate::patient::{HistoryEntry, Sex};
use crate::vitals::{Vitals, VitalsTarget};

/// The trigger name a scenario uses for its treatment-response edge.
///
/// The intervention policy nominates this trigger when a prescribed
/// medication matches the scenario's treatment keywords.
pub const TREATMENT_STARTED: &str = "treatment_started";

/// The fixed set of clinical phase names.
///
/// Phases are referenced by name, not identity — multiple scenarios reuse
/// the same names with different content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseName {
    Incubation,
    Prodromal,
    Acute,
    Complication,
    Recovery,
    Terminal,
}

impl PhaseName {
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseName::Incubation => "incubation",
            PhaseName::Prodromal => "prodromal",
            PhaseName::Acute => "acute",
            PhaseName::Complication => "complication",
            PhaseName::Recovery => "recovery",
            PhaseName::Terminal => "terminal",
        }
    }

    /// True for the absorbing end state. A terminal patient is never
    /// trended and never transitions again.
    pub fn is_terminal(self) -> bool {
        matches!(self, PhaseName::Terminal)
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scenario difficulty shown on the case selection screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

/// How long a phase lasts, in seconds of simulated time.
///
/// The timeout rule fires on `max_secs`; `min_secs` documents the
/// clinically expected lower bound. A `max_secs` of 0 means the phase is
/// never auto-exited (used by `terminal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min_secs: u64,
    pub max_secs: u64,
}

/// A physical-exam finding revealed by a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamFinding {
    /// Body system the finding belongs to (e.g. "układ krążenia").
    pub body_system: String,
    pub description: String,
}

/// A lab abnormality a phase defines for a named test.
///
/// A test ordered while the phase is active carries this value; tests
/// without a matching abnormality come back with a normal placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabAbnormality {
    pub test_name: String,
    pub category: String,
    pub value: LabValue,
    pub unit: String,
    pub reference_range: String,
}

/// A named out-of-order transition edge.
///
/// Triggers bypass the timeout rule: when one fires (and its weighted coin
/// flip succeeds) the case jumps straight to `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionTrigger {
    /// Trigger name (e.g. `treatment_started`).
    pub name: String,
    pub target: PhaseName,
    /// Probability in `[0, 1]` that the trigger actually advances the case.
    pub probability: f64,
}

/// One named stage of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: PhaseName,
    pub duration: DurationRange,
    /// The partial vitals profile this phase pulls the patient toward.
    pub target_vitals: VitalsTarget,
    /// Symptoms newly revealed on entry to this phase.
    pub symptoms: Vec<String>,
    /// Exam findings newly revealed on entry to this phase.
    pub exam_findings: Vec<ExamFinding>,
    /// Lab abnormalities active while this phase is current.
    pub lab_abnormalities: Vec<LabAbnormality>,
}

/// The demographic envelope a scenario draws its patient from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    /// Name pool sampled per generated case.
    pub names: Vec<String>,
    /// Inclusive age range sampled per generated case.
    pub age_range: (u8, u8),
    pub sex: Sex,
}

/// An immutable disease scenario template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Stable catalog id (e.g. "ami_inferior_wall").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Condition label applied to the generated patient.
    pub condition: String,
    pub difficulty: Difficulty,
    /// Ordered phase sequence; the timeout rule walks this array.
    pub phases: Vec<Phase>,
    pub initial_history: Vec<HistoryEntry>,
    pub starting_vitals: Vitals,
    pub risk_factors: Vec<String>,
    pub profile: PatientProfile,
    /// Named out-of-order edges (treatment response, complications).
    pub triggers: Vec<TransitionTrigger>,
    /// Lower-case substrings matched against prescribed medication names
    /// to nominate the `treatment_started` trigger.
    pub treatment_keywords: Vec<String>,
}

impl Scenario {
    /// Look up a phase definition by name.
    pub fn phase(&self, name: PhaseName) -> Option<&Phase> {
        self.phases.iter().find(|p| p.name == name)
    }

    /// The phase that follows `name` in declaration order, if any.
    pub fn phase_after(&self, name: PhaseName) -> Option<&Phase> {
        let idx = self.phases.iter().position(|p| p.name == name)?;
        self.phases.get(idx + 1)
    }

    /// Look up a transition trigger by name.
    pub fn trigger(&self, name: &str) -> Option<&TransitionTrigger> {
        self.triggers.iter().find(|t| t.name == name)
    }
}

/// The read-only collection of scenario templates shared across cases.
///
/// The catalog is never persisted — a reloaded case re-resolves its
/// scenario by id against the catalog the session was built with.
#[derive(Debug, Clone, Default)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    /// Look up a scenario by its catalog id.
    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// All scenarios in declaration order.
    pub fn all(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
