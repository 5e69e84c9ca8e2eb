//! Core trait definitions for the simulation session.
//!
//! These three traits define the session's replaceable seams:
//!
//! - `InterventionPolicy` — decides whether a prescription nominates a
//!   scenario trigger (the shipped implementation is keyword-based)
//! - `StateStore`         — durable home of the single persisted case blob
//! - `Clock`              — source of wall-clock time, injectable so tests
//!   and the demo drive simulated time deterministically
//!
//! The session wires them together; swapping an implementation never
//! touches the transition engine.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use vitasim_contracts::error::SimResult;
use vitasim_contracts::medication::MedicationOrder;
use vitasim_contracts::patient::PatientState;
use vitasim_contracts::scenario::{PhaseName, Scenario};

/// Everything the intervention policy needs to make a decision.
#[derive(Debug)]
pub struct InterventionContext<'a> {
    /// The prescription as submitted by the user.
    pub medication: &'a MedicationOrder,
    /// The phase the patient is in at prescription time.
    pub current_phase: PhaseName,
    /// The active scenario, for its keywords and trigger table.
    pub scenario: &'a Scenario,
}

/// The decision emitted by the intervention policy for one prescription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterventionVerdict {
    /// The medication does not engage the state machine.
    NoEffect,
    /// The medication nominates a named scenario trigger. The session
    /// resolves the trigger and runs its weighted coin flip — nomination
    /// alone does not guarantee a transition.
    Trigger { name: String },
}

/// Strategy deciding whether a prescribed medication advances the case.
///
/// Implementations must be deterministic — the probabilistic part of an
/// intervention (the trigger's coin flip) belongs to the session, which
/// owns the injected random source.
pub trait InterventionPolicy: Send + Sync {
    /// Evaluate one prescription against the active scenario.
    fn evaluate(&self, ctx: &InterventionContext<'_>) -> InterventionVerdict;
}

/// The durable home of the persisted case blob.
///
/// One blob, one slot: the simulation persists the entire `PatientState`
/// after every mutation and reloads it on session construction. The
/// scenario catalog is never persisted — a loaded state re-resolves its
/// scenario by id.
pub trait StateStore: Send + Sync {
    /// Load the persisted case, if one exists.
    ///
    /// An unreadable or unparsable blob is a recoverable condition:
    /// implementations log it and return `Ok(None)` rather than failing
    /// the session.
    fn load(&self) -> SimResult<Option<PatientState>>;

    /// Persist the current case, replacing any previous blob.
    fn save(&self, state: &PatientState) -> SimResult<()>;

    /// Remove the persisted blob, if any. Idempotent.
    fn clear(&self) -> SimResult<()>;
}

/// Source of wall-clock time.
///
/// The session reads time exclusively through this trait so that tests
/// and the demo can compress hours of simulated course into milliseconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The production clock: real UTC wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A hand-driven clock for tests and compressed demo runs.
///
/// Time only moves when `advance` or `set` is called.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().expect("manual clock lock poisoned");
        *now = *now + delta;
    }

    /// Jump the clock to an absolute instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.lock().expect("manual clock lock poisoned");
        *now = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("manual clock lock poisoned")
    }
}
