//! The phase transition engine.
//!
//! Two ways a phase ends:
//!
//! 1. **Timeout** — elapsed time in the phase exceeds its maximum
//!    duration; the case advances to the next phase in the scenario's
//!    declaration order, exactly one step per check.
//! 2. **Trigger** — a named edge (e.g. `treatment_started`) resolved by
//!    the intervention path jumps straight to its target phase,
//!    bypassing the timeout rule.
//!
//! Both paths funnel through `apply`, which owns the transition side
//! effects: symptom/finding reveal, alerting, the timeline entry, and the
//! terminal flatline. `terminal` is absorbing — `apply` refuses to leave
//! it and `timed_out` never fires inside it.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use vitasim_contracts::patient::{Alert, AlertSeverity, PatientState};
use vitasim_contracts::scenario::{PhaseName, Scenario};
use vitasim_contracts::timeline::{ActionKind, Performer};
use vitasim_contracts::vitals::Vitals;

use vitasim_journal as journal;

/// Check the timeout rule for the current phase.
///
/// Returns the phase to advance to when the phase has outlived its
/// maximum duration and a successor exists in the scenario's phase array.
/// A phase with `max_secs == 0` (terminal) never times out. Only ever
/// yields one step — a caller that checks again after applying the
/// transition starts a fresh elapsed window, so several ticks past the
/// boundary still produce a single advance per check.
pub fn timed_out(state: &PatientState, scenario: &Scenario, now: DateTime<Utc>) -> Option<PhaseName> {
    if state.current_phase.is_terminal() {
        return None;
    }

    let phase = scenario.phase(state.current_phase)?;
    if phase.duration.max_secs == 0 {
        return None;
    }

    let elapsed = now.signed_duration_since(state.phase_started_at);
    if elapsed.num_seconds() > phase.duration.max_secs as i64 {
        scenario.phase_after(state.current_phase).map(|next| next.name)
    } else {
        None
    }
}

/// Apply a transition to `target`, running every transition side effect.
///
/// No-ops (with a warning) when the target phase is not defined by the
/// scenario, and unconditionally when the patient is already terminal.
pub fn apply(state: &mut PatientState, scenario: &Scenario, target: PhaseName, now: DateTime<Utc>) {
    if state.current_phase.is_terminal() {
        warn!(target = %target, "transition ignored: terminal phase is absorbing");
        return;
    }

    let Some(phase) = scenario.phase(target) else {
        warn!(
            phase = %target,
            scenario = %scenario.id,
            "transition ignored: target phase not defined by scenario"
        );
        return;
    };

    let from = state.current_phase;
    state.current_phase = target;
    state.phase_started_at = now;

    // Reveal the new phase's symptoms and findings, deduplicated against
    // what the patient already shows.
    let mut fresh_symptoms: Vec<String> = Vec::new();
    for symptom in &phase.symptoms {
        if !state.symptoms.contains(symptom) {
            state.symptoms.push(symptom.clone());
            fresh_symptoms.push(symptom.clone());
        }
    }
    for finding in &phase.exam_findings {
        let already_known = state
            .exam_findings
            .iter()
            .any(|f| f.body_system == finding.body_system && f.description == finding.description);
        if !already_known {
            state.exam_findings.push(finding.clone());
        }
    }

    if target.is_terminal() {
        state.vitals = Vitals::flatline(now);
        journal::push_alert(
            &mut state.alerts,
            Alert {
                message: "Pacjent nie reaguje, stan krytyczny".to_string(),
                severity: AlertSeverity::Critical,
                raised_at: now,
            },
        );
    } else if !fresh_symptoms.is_empty() {
        journal::push_alert(
            &mut state.alerts,
            Alert {
                message: format!("Nowe objawy: {}", fresh_symptoms.join(", ")),
                severity: AlertSeverity::Warning,
                raised_at: now,
            },
        );
    }

    journal::append(
        &mut state.timeline,
        ActionKind::Observation,
        format!("Zmiana stanu pacjenta: {target}"),
        Performer::System,
        now,
    );

    info!(from = %from, to = %target, "phase transition applied");
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use vitasim_contracts::patient::{Demographics, PatientState, Sex};
    use vitasim_contracts::scenario::{
        Difficulty, DurationRange, ExamFinding, PatientProfile, Phase, PhaseName, Scenario,
    };
    use vitasim_contracts::vitals::{Consciousness, Vitals, VitalsTarget};

    use super::{apply, timed_out};

    fn ts(offset_secs: i64) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap() + chrono::Duration::seconds(offset_secs)
    }

    fn make_vitals() -> Vitals {
        Vitals {
            heart_rate: 80.0,
            systolic_bp: 120.0,
            diastolic_bp: 80.0,
            oxygen_saturation: 98.0,
            temperature: 36.6,
            respiratory_rate: 14.0,
            glucose: None,
            consciousness: Consciousness::Alert,
            updated_at: ts(0),
        }
    }

    fn make_phase(name: PhaseName, max_secs: u64, symptoms: &[&str]) -> Phase {
        Phase {
            name,
            duration: DurationRange { min_secs: 0, max_secs },
            target_vitals: VitalsTarget::default(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            exam_findings: vec![],
            lab_abnormalities: vec![],
        }
    }

    fn make_scenario(phases: Vec<Phase>) -> Scenario {
        Scenario {
            id: "test_scenario".to_string(),
            name: "Test".to_string(),
            condition: "test".to_string(),
            difficulty: Difficulty::Easy,
            phases,
            initial_history: vec![],
            starting_vitals: make_vitals(),
            risk_factors: vec![],
            profile: PatientProfile {
                names: vec!["Jan Kowalski".to_string()],
                age_range: (40, 60),
                sex: Sex::Male,
            },
            triggers: vec![],
            treatment_keywords: vec![],
        }
    }

    fn make_state(phase: PhaseName) -> PatientState {
        PatientState {
            case_id: Uuid::new_v4(),
            demographics: Demographics {
                name: "Jan Kowalski".to_string(),
                age: 55,
                sex: Sex::Male,
            },
            condition: "test".to_string(),
            vitals: make_vitals(),
            risk_factors: vec![],
            history: vec![],
            symptoms: vec![],
            exam_findings: vec![],
            lab_results: vec![],
            medications: vec![],
            scenario_id: "test_scenario".to_string(),
            current_phase: phase,
            phase_started_at: ts(0),
            alerts: vec![],
            score: 0,
            timeline: vec![],
        }
    }

    /// Elapsed time at exactly the maximum duration does not yet time out;
    /// one second past it does.
    #[test]
    fn timeout_boundary_is_exclusive() {
        let scenario = make_scenario(vec![
            make_phase(PhaseName::Prodromal, 900, &[]),
            make_phase(PhaseName::Acute, 1800, &[]),
        ]);
        let state = make_state(PhaseName::Prodromal);

        assert_eq!(timed_out(&state, &scenario, ts(900)), None);
        assert_eq!(timed_out(&state, &scenario, ts(901)), Some(PhaseName::Acute));
    }

    /// Far past the boundary, a single check still yields a single step.
    #[test]
    fn single_advance_per_check() {
        let scenario = make_scenario(vec![
            make_phase(PhaseName::Prodromal, 60, &[]),
            make_phase(PhaseName::Acute, 60, &[]),
            make_phase(PhaseName::Complication, 60, &[]),
        ]);
        let mut state = make_state(PhaseName::Prodromal);

        // 10 minutes have passed — enough to blow through every phase, but
        // one check advances exactly one step.
        let now = ts(600);
        let next = timed_out(&state, &scenario, now).unwrap();
        assert_eq!(next, PhaseName::Acute);
        apply(&mut state, &scenario, next, now);

        assert_eq!(state.current_phase, PhaseName::Acute);
        // The elapsed window restarted, so an immediate re-check is quiet.
        assert_eq!(timed_out(&state, &scenario, now), None);
    }

    /// The last phase in the array has no successor and never advances.
    #[test]
    fn last_phase_has_no_timeout_successor() {
        let scenario = make_scenario(vec![
            make_phase(PhaseName::Prodromal, 60, &[]),
            make_phase(PhaseName::Recovery, 60, &[]),
        ]);
        let state = make_state(PhaseName::Recovery);
        assert_eq!(timed_out(&state, &scenario, ts(10_000)), None);
    }

    /// Terminal is absorbing: no timeout, and apply() refuses to leave it.
    #[test]
    fn terminal_is_absorbing() {
        let scenario = make_scenario(vec![
            make_phase(PhaseName::Acute, 60, &[]),
            make_phase(PhaseName::Terminal, 0, &[]),
        ]);
        let mut state = make_state(PhaseName::Terminal);

        assert_eq!(timed_out(&state, &scenario, ts(1_000_000)), None);

        apply(&mut state, &scenario, PhaseName::Acute, ts(10));
        assert_eq!(state.current_phase, PhaseName::Terminal);
        assert!(state.timeline.is_empty(), "an ignored transition records nothing");
    }

    /// A transition merges the new phase's symptoms (deduplicated), raises
    /// an alert naming them, and appends the timeline entry.
    #[test]
    fn apply_reveals_symptoms_and_records() {
        let scenario = make_scenario(vec![
            make_phase(PhaseName::Prodromal, 60, &["nudności"]),
            make_phase(PhaseName::Acute, 60, &["ból w klatce piersiowej", "nudności"]),
        ]);
        let mut state = make_state(PhaseName::Prodromal);
        state.symptoms = vec!["nudności".to_string()];

        apply(&mut state, &scenario, PhaseName::Acute, ts(100));

        assert_eq!(state.current_phase, PhaseName::Acute);
        assert_eq!(state.phase_started_at, ts(100));
        assert_eq!(
            state.symptoms,
            vec!["nudności".to_string(), "ból w klatce piersiowej".to_string()]
        );

        // Only the genuinely new symptom is alerted.
        assert_eq!(state.alerts.len(), 1);
        assert_eq!(state.alerts[0].message, "Nowe objawy: ból w klatce piersiowej");

        assert_eq!(state.timeline.len(), 1);
        assert_eq!(state.timeline[0].description, "Zmiana stanu pacjenta: acute");
    }

    /// Entering terminal flatlines the vitals and raises a critical alert.
    #[test]
    fn entering_terminal_flatlines() {
        let scenario = make_scenario(vec![
            make_phase(PhaseName::Complication, 60, &[]),
            make_phase(PhaseName::Terminal, 0, &[]),
        ]);
        let mut state = make_state(PhaseName::Complication);

        apply(&mut state, &scenario, PhaseName::Terminal, ts(50));

        assert_eq!(state.current_phase, PhaseName::Terminal);
        assert_eq!(state.vitals.heart_rate, 0.0);
        assert_eq!(state.vitals.consciousness, Consciousness::Unresponsive);
        assert_eq!(state.alerts.len(), 1);
        assert_eq!(state.alerts[0].severity, vitasim_contracts::patient::AlertSeverity::Critical);
        assert_eq!(state.timeline[0].description, "Zmiana stanu pacjenta: terminal");
    }

    /// A transition to a phase the scenario does not define is ignored.
    #[test]
    fn unknown_target_phase_is_ignored() {
        let scenario = make_scenario(vec![make_phase(PhaseName::Prodromal, 60, &[])]);
        let mut state = make_state(PhaseName::Prodromal);

        apply(&mut state, &scenario, PhaseName::Complication, ts(10));

        assert_eq!(state.current_phase, PhaseName::Prodromal);
        assert!(state.timeline.is_empty());
    }

    /// Already-known exam findings are not duplicated on re-entry.
    #[test]
    fn exam_findings_deduplicated() {
        let finding = ExamFinding {
            body_system: "układ krążenia".to_string(),
            description: "tony serca ciche".to_string(),
        };
        let mut phase = make_phase(PhaseName::Acute, 60, &[]);
        phase.exam_findings = vec![finding.clone()];
        let scenario = make_scenario(vec![make_phase(PhaseName::Prodromal, 60, &[]), phase]);

        let mut state = make_state(PhaseName::Prodromal);
        state.exam_findings = vec![finding];

        apply(&mut state, &scenario, PhaseName::Acute, ts(10));
        assert_eq!(state.exam_findings.len(), 1);
    }
}
