//! # vitasim-policy
//!
//! Keyword-driven intervention policy for the vitasim simulation core.
//!
//! The portal's treatment model is deliberately simple: a prescribed
//! medication whose name matches a scenario's treatment keywords nominates
//! the scenario's `treatment_started` trigger, and the trigger's weighted
//! coin flip decides whether the case jumps to recovery. This crate keeps
//! that behavior behind the `InterventionPolicy` seam so a richer model
//! (drug class, dosing, phase awareness) can replace it without touching
//! the transition engine.

pub mod engine;
pub mod rule;

pub use engine::KeywordPolicy;
pub use rule::{KeywordRule, PolicyConfig};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use vitasim_contracts::medication::MedicationOrder;
    use vitasim_contracts::patient::Sex;
    use vitasim_contracts::scenario::{
        Difficulty, DurationRange, PatientProfile, Phase, PhaseName, Scenario, TransitionTrigger,
        TREATMENT_STARTED,
    };
    use vitasim_contracts::vitals::{Consciousness, Vitals, VitalsTarget};
    use vitasim_core::traits::{InterventionContext, InterventionPolicy, InterventionVerdict};

    use super::KeywordPolicy;

    fn make_scenario() -> Scenario {
        Scenario {
            id: "ami_test".to_string(),
            name: "Zawał testowy".to_string(),
            condition: "zawał".to_string(),
            difficulty: Difficulty::Moderate,
            phases: vec![Phase {
                name: PhaseName::Acute,
                duration: DurationRange { min_secs: 0, max_secs: 1800 },
                target_vitals: VitalsTarget::default(),
                symptoms: vec![],
                exam_findings: vec![],
                lab_abnormalities: vec![],
            }],
            initial_history: vec![],
            starting_vitals: Vitals {
                heart_rate: 90.0,
                systolic_bp: 140.0,
                diastolic_bp: 90.0,
                oxygen_saturation: 96.0,
                temperature: 36.9,
                respiratory_rate: 18.0,
                glucose: None,
                consciousness: Consciousness::Alert,
                updated_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            },
            risk_factors: vec![],
            profile: PatientProfile {
                names: vec!["Jan Kowalski".to_string()],
                age_range: (50, 70),
                sex: Sex::Male,
            },
            triggers: vec![TransitionTrigger {
                name: TREATMENT_STARTED.to_string(),
                target: PhaseName::Recovery,
                probability: 0.8,
            }],
            treatment_keywords: vec!["aspir".to_string(), "nitrogli".to_string()],
        }
    }

    fn order(name: &str) -> MedicationOrder {
        MedicationOrder {
            name: name.to_string(),
            dosage: "300mg".to_string(),
            route: "PO".to_string(),
        }
    }

    fn ctx<'a>(
        medication: &'a MedicationOrder,
        phase: PhaseName,
        scenario: &'a Scenario,
    ) -> InterventionContext<'a> {
        InterventionContext { medication, current_phase: phase, scenario }
    }

    /// A medication whose name contains a scenario keyword nominates the
    /// treatment trigger, case-insensitively.
    #[test]
    fn scenario_keyword_nominates_treatment_trigger() {
        let policy = KeywordPolicy::default();
        let scenario = make_scenario();

        for name in ["Aspirina", "aspiryna", "ASPIRIN 300", "Nitrogliceryna"] {
            let med = order(name);
            let verdict = policy.evaluate(&ctx(&med, PhaseName::Acute, &scenario));
            assert_eq!(
                verdict,
                InterventionVerdict::Trigger { name: TREATMENT_STARTED.to_string() },
                "'{name}' should nominate the treatment trigger"
            );
        }
    }

    /// Unrelated medications have no effect on the state machine.
    #[test]
    fn unrelated_medication_is_no_effect() {
        let policy = KeywordPolicy::default();
        let scenario = make_scenario();
        let med = order("Paracetamol");
        assert_eq!(
            policy.evaluate(&ctx(&med, PhaseName::Acute, &scenario)),
            InterventionVerdict::NoEffect
        );
    }

    /// A patient already recovering (or terminal) is never re-triggered,
    /// even by a matching medication.
    #[test]
    fn recovery_and_terminal_are_never_retriggered() {
        let policy = KeywordPolicy::default();
        let scenario = make_scenario();
        let med = order("Aspirina");

        for phase in [PhaseName::Recovery, PhaseName::Terminal] {
            assert_eq!(
                policy.evaluate(&ctx(&med, phase, &scenario)),
                InterventionVerdict::NoEffect,
                "no nomination while in {phase}"
            );
        }
    }

    /// Extra mappings load from TOML and apply after scenario keywords.
    #[test]
    fn configured_rule_matches_after_scenario_keywords() {
        let policy = KeywordPolicy::from_toml_str(
            r#"
            [[rules]]
            id = "thrombolysis"
            description = "Thrombolytics count as starting treatment"
            keyword = "alteplaz"
            trigger = "treatment_started"
            "#,
        )
        .unwrap();
        let scenario = make_scenario();

        let med = order("Alteplaza");
        assert_eq!(
            policy.evaluate(&ctx(&med, PhaseName::Acute, &scenario)),
            InterventionVerdict::Trigger { name: TREATMENT_STARTED.to_string() }
        );
    }

    /// Malformed TOML is a configuration error, not a panic.
    #[test]
    fn malformed_toml_is_config_error() {
        let result = KeywordPolicy::from_toml_str("rules = 'not a table'");
        assert!(result.is_err());
        let msg = result.err().unwrap().to_string();
        assert!(msg.contains("configuration error"), "got: {msg}");
    }

    /// An empty document yields a policy with no extra rules.
    #[test]
    fn empty_toml_yields_default_policy() {
        let policy = KeywordPolicy::from_toml_str("").unwrap();
        let scenario = make_scenario();
        let med = order("Paracetamol");
        assert_eq!(
            policy.evaluate(&ctx(&med, PhaseName::Acute, &scenario)),
            InterventionVerdict::NoEffect
        );
    }
}
