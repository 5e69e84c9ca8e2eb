//! Anaphylaxis after an insect sting.
//!
//! The fastest built-in course: a minutes-long acute phase where only
//! prompt adrenaline reliably turns the case around. All clinical values
//! are fictional teaching data.

use chrono::Utc;

use vitasim_contracts::lab::LabValue;
use vitasim_contracts::patient::{HistoryEntry, Sex};
use vitasim_contracts::scenario::{
    Difficulty, DurationRange, ExamFinding, LabAbnormality, PatientProfile, Phase, PhaseName,
    Scenario, TransitionTrigger, TREATMENT_STARTED,
};
use vitasim_contracts::vitals::{Consciousness, Vitals, VitalsTarget};

pub fn scenario() -> Scenario {
    Scenario {
        id: "anaphylaxis_insect".to_string(),
        name: "Wstrząs anafilaktyczny po użądleniu osy".to_string(),
        condition: "Anafilaksja".to_string(),
        difficulty: Difficulty::Hard,
        phases: vec![prodromal(), acute(), terminal(), recovery()],
        initial_history: vec![HistoryEntry {
            description: "Uczulenie na jad owadów błonkoskrzydłych w wywiadzie".to_string(),
        }],
        starting_vitals: Vitals {
            heart_rate: 92.0,
            systolic_bp: 128.0,
            diastolic_bp: 82.0,
            oxygen_saturation: 97.0,
            temperature: 36.7,
            respiratory_rate: 17.0,
            glucose: None,
            consciousness: Consciousness::Alert,
            updated_at: Utc::now(),
        },
        risk_factors: vec!["wcześniejsza reakcja uogólniona po użądleniu".to_string()],
        profile: PatientProfile {
            names: vec![
                "Tomasz Szymański".to_string(),
                "Paweł Woźniak".to_string(),
                "Agnieszka Kozłowska".to_string(),
            ],
            age_range: (24, 45),
            sex: Sex::Male,
        },
        triggers: vec![TransitionTrigger {
            name: TREATMENT_STARTED.to_string(),
            target: PhaseName::Recovery,
            probability: 0.8,
        }],
        treatment_keywords: vec!["adrenalin".to_string(), "epinefr".to_string()],
    }
}

fn prodromal() -> Phase {
    Phase {
        name: PhaseName::Prodromal,
        duration: DurationRange { min_secs: 120, max_secs: 240 },
        target_vitals: VitalsTarget {
            heart_rate: Some(108.0),
            ..VitalsTarget::default()
        },
        symptoms: vec![
            "świąd i pokrzywka".to_string(),
            "uczucie ściskania w gardle".to_string(),
        ],
        exam_findings: vec![ExamFinding {
            body_system: "skóra".to_string(),
            description: "uogólniona pokrzywka, obrzęk warg".to_string(),
        }],
        lab_abnormalities: vec![],
    }
}

fn acute() -> Phase {
    Phase {
        name: PhaseName::Acute,
        duration: DurationRange { min_secs: 180, max_secs: 300 },
        target_vitals: VitalsTarget {
            heart_rate: Some(138.0),
            systolic_bp: Some(74.0),
            diastolic_bp: Some(42.0),
            oxygen_saturation: Some(85.0),
            respiratory_rate: Some(32.0),
            consciousness: Some(Consciousness::Verbal),
            ..VitalsTarget::default()
        },
        symptoms: vec![
            "duszność ze świstem krtaniowym".to_string(),
            "zawroty głowy".to_string(),
        ],
        exam_findings: vec![ExamFinding {
            body_system: "układ oddechowy".to_string(),
            description: "świst wdechowy, obrzęk języka".to_string(),
        }],
        lab_abnormalities: vec![LabAbnormality {
            test_name: "Tryptaza".to_string(),
            category: "immunologiczne".to_string(),
            value: LabValue::Number(45.0),
            unit: "µg/L".to_string(),
            reference_range: "< 11.4".to_string(),
        }],
    }
}

fn terminal() -> Phase {
    Phase {
        name: PhaseName::Terminal,
        duration: DurationRange { min_secs: 0, max_secs: 0 },
        target_vitals: VitalsTarget::default(),
        symptoms: vec![],
        exam_findings: vec![],
        lab_abnormalities: vec![],
    }
}

fn recovery() -> Phase {
    Phase {
        name: PhaseName::Recovery,
        duration: DurationRange { min_secs: 0, max_secs: 0 },
        target_vitals: VitalsTarget {
            heart_rate: Some(96.0),
            systolic_bp: Some(112.0),
            diastolic_bp: Some(70.0),
            oxygen_saturation: Some(96.0),
            respiratory_rate: Some(20.0),
            consciousness: Some(Consciousness::Alert),
            ..VitalsTarget::default()
        },
        symptoms: vec!["ustępowanie duszności".to_string()],
        exam_findings: vec![],
        lab_abnormalities: vec![],
    }
}
