//! The simulation session: the single owner of the active patient case.
//!
//! One `SimulationSession` drives one case at a time through the pipeline
//!
//!   Vitals Trending → Phase Transition check → Order Fulfillment
//!
//! on every clock tick, then notifies subscribers and persists the state.
//! User actions (ordering labs, prescribing medication) mutate the case
//! between ticks and run the same notify/persist epilogue.
//!
//! All access to the patient state is serialized behind a single mutex —
//! the session assumes exactly one writer at a time, never overlapping
//! ticks with user actions. Observers only ever receive cloned snapshots,
//! so nothing outside the session can bypass the transition rules.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration as StdDuration;

use chrono::Duration;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use vitasim_contracts::error::{SimError, SimResult};
use vitasim_contracts::medication::{Medication, MedicationOrder};
use vitasim_contracts::patient::{Demographics, PatientState};
use vitasim_contracts::scenario::{PatientProfile, ScenarioCatalog};
use vitasim_contracts::scenario::ExamFinding;
use vitasim_contracts::timeline::{ActionKind, Performer};
use vitasim_contracts::vitals::Vitals;

use vitasim_journal as journal;

use crate::orders;
use crate::traits::{Clock, InterventionContext, InterventionPolicy, InterventionVerdict, StateStore};
use crate::transition;
use crate::trend::{self, TrendSettings};

/// Tuning knobs for a simulation session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Wall-clock interval between automatic ticks.
    pub tick_interval: StdDuration,
    /// Simulated turnaround between a lab order and its result.
    pub lab_turnaround_secs: i64,
    /// Seed for the session's random source. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
    /// When true, generating a case starts the tick thread automatically.
    /// Tests and compressed demo runs set this to false and call `tick()`
    /// by hand.
    pub auto_tick: bool,
    pub trend: TrendSettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: StdDuration::from_secs(1),
            lab_turnaround_secs: 300,
            rng_seed: None,
            auto_tick: true,
            trend: TrendSettings::default(),
        }
    }
}

/// A subscriber callback. Receives the current snapshot, or `None` after
/// the case is cleared.
pub type Listener = Box<dyn Fn(Option<&PatientState>) + Send + Sync>;

struct SessionInner {
    catalog: Arc<ScenarioCatalog>,
    policy: Box<dyn InterventionPolicy>,
    store: Box<dyn StateStore>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
    state: Mutex<Option<PatientState>>,
    rng: Mutex<ChaCha8Rng>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
    running: AtomicBool,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

/// Disposer returned by `subscribe`. Dropping it without calling
/// `unsubscribe` leaves the listener registered for the session's
/// lifetime.
pub struct Subscription {
    id: u64,
    inner: Weak<SessionInner>,
}

impl Subscription {
    /// Remove the listener this subscription registered.
    pub fn unsubscribe(self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .listeners
                .lock()
                .expect("listener registry lock poisoned")
                .retain(|(id, _)| *id != self.id);
        }
    }
}

/// A cheap-to-clone handle to one simulation session.
///
/// Clones share the same underlying case, clock, and subscriber registry;
/// the tick thread holds one.
#[derive(Clone)]
pub struct SimulationSession {
    inner: Arc<SessionInner>,
}

impl SimulationSession {
    /// Build a session and attempt to resume any persisted case.
    ///
    /// A persisted blob that fails validation — unknown scenario id,
    /// unknown phase, or a timeline whose hash chain does not verify — is
    /// discarded with a warning rather than surfaced as an error. A
    /// resumed case does not restart the tick thread; call `start()`.
    pub fn new(
        catalog: Arc<ScenarioCatalog>,
        policy: Box<dyn InterventionPolicy>,
        store: Box<dyn StateStore>,
        clock: Arc<dyn Clock>,
        config: SessionConfig,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let session = Self {
            inner: Arc::new(SessionInner {
                catalog,
                policy,
                store,
                clock,
                config,
                state: Mutex::new(None),
                rng: Mutex::new(rng),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
                running: AtomicBool::new(false),
                ticker: Mutex::new(None),
            }),
        };
        session.restore_persisted();
        session
    }

    // ── Case lifecycle ────────────────────────────────────────────────────────

    /// Generate a new case from the named scenario, or a uniformly random
    /// one when `scenario_id` is `None`.
    ///
    /// Initializes the patient from the scenario's starting vitals,
    /// history, and first phase, records the admission on the timeline,
    /// and (unless `auto_tick` is off) starts the clock. Returns the
    /// initial snapshot.
    ///
    /// # Errors
    ///
    /// `SimError::UnknownScenario` when the id matches no catalog entry —
    /// no partial state is created. `SimError::ConfigError` for an empty
    /// catalog or a scenario without phases.
    pub fn generate_new_case(&self, scenario_id: Option<&str>) -> SimResult<PatientState> {
        let scenario = match scenario_id {
            Some(id) => self
                .inner
                .catalog
                .get(id)
                .ok_or_else(|| SimError::UnknownScenario { id: id.to_string() })?,
            None => {
                let all = self.inner.catalog.all();
                if all.is_empty() {
                    return Err(SimError::ConfigError {
                        reason: "scenario catalog is empty".to_string(),
                    });
                }
                let idx = self.lock_rng().gen_range(0..all.len());
                &all[idx]
            }
        };

        let first_phase = scenario.phases.first().ok_or_else(|| SimError::ConfigError {
            reason: format!("scenario '{}' defines no phases", scenario.id),
        })?;

        let now = self.inner.clock.now();
        let demographics = sample_demographics(&scenario.profile, &mut self.lock_rng());

        let mut state = PatientState {
            case_id: uuid::Uuid::new_v4(),
            demographics,
            condition: scenario.condition.clone(),
            vitals: Vitals { updated_at: now, ..scenario.starting_vitals.clone() },
            risk_factors: scenario.risk_factors.clone(),
            history: scenario.initial_history.clone(),
            symptoms: first_phase.symptoms.clone(),
            exam_findings: first_phase.exam_findings.clone(),
            lab_results: Vec::new(),
            medications: Vec::new(),
            scenario_id: scenario.id.clone(),
            current_phase: first_phase.name,
            phase_started_at: now,
            alerts: Vec::new(),
            score: 0,
            timeline: Vec::new(),
        };

        journal::append(
            &mut state.timeline,
            ActionKind::Observation,
            format!("Przyjęcie pacjenta: {}", scenario.name),
            Performer::System,
            now,
        );

        info!(
            case_id = %state.case_id,
            scenario = %scenario.id,
            phase = %state.current_phase,
            "new case generated"
        );

        let snapshot = state.clone();
        *self.lock_state() = Some(state);
        self.after_mutation();

        if self.inner.config.auto_tick {
            self.start();
        }

        Ok(snapshot)
    }

    /// Stop the clock and clear the in-memory and persisted case.
    ///
    /// Subscribers are notified with `None`. Idempotent.
    pub fn clear_state(&self) -> SimResult<()> {
        self.stop();
        *self.lock_state() = None;
        self.broadcast(None);
        self.inner.store.clear()?;
        info!("patient case cleared");
        Ok(())
    }

    /// The current snapshot, or `None` when no case is active.
    ///
    /// Always a clone — mutating the returned value has no effect on the
    /// session.
    pub fn get_current_state(&self) -> Option<PatientState> {
        self.lock_state().clone()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    /// Register a listener.
    ///
    /// The listener is invoked immediately with the current snapshot
    /// (replay-of-one) and again after every subsequent change. A panic in
    /// one listener is caught and logged without blocking the others.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<&PatientState>) + Send + Sync + 'static,
    {
        let snapshot = self.lock_state().clone();
        listener(snapshot.as_ref());

        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .expect("listener registry lock poisoned")
            .push((id, Box::new(listener)));

        debug!(listener = id, "subscriber registered");
        Subscription { id, inner: Arc::downgrade(&self.inner) }
    }

    // ── User actions ──────────────────────────────────────────────────────────

    /// Order a lab test.
    ///
    /// The result value is fixed from the phase active right now; the
    /// result completes once the configured turnaround elapses.
    pub fn order_lab(&self, test_name: &str) -> SimResult<()> {
        let now = self.inner.clock.now();
        {
            let mut guard = self.lock_state();
            let state = guard.as_mut().ok_or(SimError::NoActiveCase)?;
            let scenario = self.inner.catalog.get(&state.scenario_id).ok_or_else(|| {
                SimError::UnknownScenario { id: state.scenario_id.clone() }
            })?;

            let phase = scenario.phase(state.current_phase);
            let result = orders::build_lab_result(
                phase,
                test_name,
                now,
                Duration::seconds(self.inner.config.lab_turnaround_secs),
            );
            debug!(test = %test_name, abnormal = result.is_abnormal, "lab ordered");
            state.lab_results.push(result);

            journal::append(
                &mut state.timeline,
                ActionKind::LabOrder,
                format!("Zlecono badanie: {test_name}"),
                Performer::User,
                now,
            );
        }
        self.after_mutation();
        Ok(())
    }

    /// Prescribe a medication.
    ///
    /// Always records the medication and a timeline entry. When the
    /// intervention policy nominates a scenario trigger, the trigger's
    /// weighted coin flip decides whether the case jumps to the trigger's
    /// target phase, bypassing the timeout rule.
    pub fn prescribe_medication(&self, order: MedicationOrder) -> SimResult<()> {
        let now = self.inner.clock.now();
        {
            let mut guard = self.lock_state();
            let state = guard.as_mut().ok_or(SimError::NoActiveCase)?;
            let scenario = self.inner.catalog.get(&state.scenario_id).ok_or_else(|| {
                SimError::UnknownScenario { id: state.scenario_id.clone() }
            })?;

            state.medications.push(Medication::from_order(&order, now));
            info!(name = %order.name, dosage = %order.dosage, route = %order.route, "medication prescribed");

            journal::append(
                &mut state.timeline,
                ActionKind::Medication,
                format!("Podano lek: {} {} {}", order.name, order.dosage, order.route),
                Performer::User,
                now,
            );

            let ctx = InterventionContext {
                medication: &order,
                current_phase: state.current_phase,
                scenario,
            };
            if let InterventionVerdict::Trigger { name } = self.inner.policy.evaluate(&ctx) {
                match scenario.trigger(&name) {
                    Some(trigger) => {
                        let success = self
                            .lock_rng()
                            .gen_bool(trigger.probability.clamp(0.0, 1.0));
                        if success {
                            info!(trigger = %name, target = %trigger.target, "intervention advanced the case");
                            state.score += 25;
                            transition::apply(state, scenario, trigger.target, now);
                        } else {
                            debug!(trigger = %name, "intervention did not take effect");
                        }
                    }
                    None => {
                        warn!(trigger = %name, scenario = %scenario.id, "policy nominated a trigger the scenario does not define");
                    }
                }
            }
        }
        self.after_mutation();
        Ok(())
    }

    /// Record a physical examination of one body system.
    ///
    /// Returns the findings already revealed for that system. Examination
    /// does not reveal anything new on its own — findings surface through
    /// phase transitions.
    pub fn perform_examination(&self, body_system: &str) -> SimResult<Vec<ExamFinding>> {
        let now = self.inner.clock.now();
        let findings = {
            let mut guard = self.lock_state();
            let state = guard.as_mut().ok_or(SimError::NoActiveCase)?;

            journal::append(
                &mut state.timeline,
                ActionKind::Examination,
                format!("Badanie przedmiotowe: {body_system}"),
                Performer::User,
                now,
            );

            state
                .exam_findings
                .iter()
                .filter(|f| f.body_system.eq_ignore_ascii_case(body_system))
                .cloned()
                .collect()
        };
        self.after_mutation();
        Ok(findings)
    }

    // ── Tick loop ─────────────────────────────────────────────────────────────

    /// Run one synchronous update step: trending, the phase timeout check,
    /// and lab fulfillment, then notify and persist.
    ///
    /// A missing case is a quiet no-op. A current phase the scenario does
    /// not define makes the whole cycle a logged no-op — the recoverable
    /// posture for stale or corrupted state.
    pub fn tick(&self) {
        let now = self.inner.clock.now();
        {
            let mut guard = self.lock_state();
            let Some(state) = guard.as_mut() else { return };

            let Some(scenario) = self.inner.catalog.get(&state.scenario_id) else {
                warn!(scenario = %state.scenario_id, "active scenario missing from catalog; skipping tick");
                return;
            };
            let Some(phase) = scenario.phase(state.current_phase) else {
                warn!(
                    phase = %state.current_phase,
                    scenario = %scenario.id,
                    "current phase not defined by scenario; skipping tick"
                );
                return;
            };

            // Terminal patients are neither trended nor transitioned; only
            // already-pending lab orders still complete.
            if !state.current_phase.is_terminal() {
                let mut rng = self.lock_rng();
                state.vitals = trend::advance_vitals(
                    &state.vitals,
                    &phase.target_vitals,
                    &self.inner.config.trend,
                    now,
                    &mut *rng,
                );
            }

            if let Some(next) = transition::timed_out(state, scenario, now) {
                transition::apply(state, scenario, next, now);
            }

            orders::fulfill_due(state, now);
        }
        self.after_mutation();
    }

    /// Start the tick thread. A no-op when already running.
    pub fn start(&self) {
        let mut ticker = self.inner.ticker.lock().expect("ticker lock poisoned");
        if ticker.is_some() {
            debug!("simulation clock already running");
            return;
        }

        self.inner.running.store(true, Ordering::SeqCst);
        let session = self.clone();
        let interval = self.inner.config.tick_interval;

        *ticker = Some(thread::spawn(move || {
            debug!("simulation clock started");
            while session.inner.running.load(Ordering::SeqCst) {
                thread::sleep(interval);
                if !session.inner.running.load(Ordering::SeqCst) {
                    break;
                }
                session.tick();
            }
            debug!("simulation clock stopped");
        }));
    }

    /// Stop the tick thread and wait for it to exit. A no-op when not
    /// running.
    pub fn stop(&self) {
        self.inner.running.store(false, Ordering::SeqCst);
        let handle = self.inner.ticker.lock().expect("ticker lock poisoned").take();
        match handle {
            Some(handle) => {
                let _ = handle.join();
            }
            None => debug!("stop requested but simulation clock not running"),
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn lock_state(&self) -> MutexGuard<'_, Option<PatientState>> {
        self.inner.state.lock().expect("patient state lock poisoned")
    }

    fn lock_rng(&self) -> MutexGuard<'_, ChaCha8Rng> {
        self.inner.rng.lock().expect("rng lock poisoned")
    }

    /// Notify subscribers with the current snapshot, then persist it.
    ///
    /// Runs outside the state lock so listeners may call back into the
    /// session.
    fn after_mutation(&self) {
        let snapshot = self.lock_state().clone();
        self.broadcast(snapshot.as_ref());
        if let Some(state) = snapshot.as_ref() {
            if let Err(e) = self.inner.store.save(state) {
                warn!(error = %e, "failed to persist patient state");
            }
        }
    }

    fn broadcast(&self, state: Option<&PatientState>) {
        let listeners = self.inner.listeners.lock().expect("listener registry lock poisoned");
        for (id, listener) in listeners.iter() {
            let outcome = catch_unwind(AssertUnwindSafe(|| listener(state)));
            if outcome.is_err() {
                warn!(listener = id, "listener panicked during broadcast");
            }
        }
    }

    /// Attempt to resume a persisted case on construction.
    fn restore_persisted(&self) {
        match self.inner.store.load() {
            Ok(Some(state)) => match validate_loaded(&state, &self.inner.catalog) {
                Ok(()) => {
                    info!(case_id = %state.case_id, scenario = %state.scenario_id, "resumed persisted case");
                    *self.lock_state() = Some(state);
                }
                Err(reason) => {
                    warn!(reason = %reason, "discarding persisted case");
                    if let Err(e) = self.inner.store.clear() {
                        warn!(error = %e, "failed to clear discarded persisted case");
                    }
                }
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to load persisted case; starting empty"),
        }
    }
}

/// Validate a reloaded blob before trusting it as the active case.
fn validate_loaded(state: &PatientState, catalog: &ScenarioCatalog) -> Result<(), String> {
    let scenario = catalog
        .get(&state.scenario_id)
        .ok_or_else(|| format!("unknown scenario '{}'", state.scenario_id))?;
    if scenario.phase(state.current_phase).is_none() {
        return Err(format!(
            "phase '{}' not defined by scenario '{}'",
            state.current_phase, scenario.id
        ));
    }
    if !journal::verify_chain(&state.timeline) {
        return Err("timeline hash chain failed verification".to_string());
    }
    Ok(())
}

fn sample_demographics(profile: &PatientProfile, rng: &mut ChaCha8Rng) -> Demographics {
    let name = if profile.names.is_empty() {
        "NN".to_string()
    } else {
        profile.names[rng.gen_range(0..profile.names.len())].clone()
    };
    let (lo, hi) = profile.age_range;
    let age = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
    Demographics { name, age, sex: profile.sex }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
