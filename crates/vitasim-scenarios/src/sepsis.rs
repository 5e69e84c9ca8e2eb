//! Community-acquired pneumonia progressing to septic shock.
//!
//! The longest built-in course: an incubation window with near-normal
//! vitals, a febrile prodrome, acute pneumonia, then septic shock.
//! Effective antibiotics can pull the case into recovery. All clinical
//! values are fictional teaching data.

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
        id: "sepsis_pneumonia".to_string(),
        name: "Sepsa w przebiegu pozaszpitalnego zapalenia płuc".to_string(),
        condition: "Zapalenie płuc z posocznicą".to_string(),
        difficulty: Difficulty::Hard,
        phases: vec![incubation(), prodromal(), acute(), complication(), terminal(), recovery()],
        initial_history: vec![
            HistoryEntry { description: "Przewlekła obturacyjna choroba płuc".to_string() },
            HistoryEntry { description: "Cukrzyca typu 2".to_string() },
        ],
        starting_vitals: Vitals {
            heart_rate: 84.0,
            systolic_bp: 130.0,
            diastolic_bp: 82.0,
            oxygen_saturation: 95.0,
            temperature: 37.2,
            respiratory_rate: 18.0,
            glucose: Some(145.0),
            consciousness: Consciousness::Alert,
            updated_at: Utc::now(),
        },
        risk_factors: vec![
            "wiek powyżej 65 lat".to_string(),
            "przewlekła choroba płuc".to_string(),
            "cukrzyca".to_string(),
        ],
        profile: PatientProfile {
            names: vec![
                "Helena Dąbrowska".to_string(),
                "Zofia Kamińska".to_string(),
                "Irena Lewandowska".to_string(),
            ],
            age_range: (66, 84),
            sex: Sex::Female,
        },
        triggers: vec![TransitionTrigger {
            name: TREATMENT_STARTED.to_string(),
            target: PhaseName::Recovery,
            probability: 0.8,
        }],
        treatment_keywords: vec![
            "antybiot".to_string(),
            "ceftriakson".to_string(),
            "amoksycyl".to_string(),
            "lewofloksacyn".to_string(),
        ],
    }
}

fn incubation() -> Phase {
    Phase {
        name: PhaseName::Incubation,
        duration: DurationRange { min_secs: 900, max_secs: 1200 },
        target_vitals: VitalsTarget {
            temperature: Some(37.6),
            ..VitalsTarget::default()
        },
        symptoms: vec!["osłabienie".to_string()],
        exam_findings: vec![],
        lab_abnormalities: vec![],
    }
}

fn prodromal() -> Phase {
    Phase {
        name: PhaseName::Prodromal,
        duration: DurationRange { min_secs: 600, max_secs: 900 },
        target_vitals: VitalsTarget {
            heart_rate: Some(98.0),
            temperature: Some(38.4),
            respiratory_rate: Some(22.0),
            ..VitalsTarget::default()
        },
        symptoms: vec!["kaszel z odkrztuszaniem".to_string(), "dreszcze".to_string()],
        exam_findings: vec![ExamFinding {
            body_system: "układ oddechowy".to_string(),
            description: "trzeszczenia u podstawy płuca prawego".to_string(),
        }],
        lab_abnormalities: vec![LabAbnormality {
            test_name: "CRP".to_string(),
            category: "zapalne".to_string(),
            value: LabValue::Number(96.0),
            unit: "mg/L".to_string(),
            reference_range: "< 5".to_string(),
        }],
    }
}

fn acute() -> Phase {
    Phase {
        name: PhaseName::Acute,
        duration: DurationRange { min_secs: 900, max_secs: 1500 },
        target_vitals: VitalsTarget {
            heart_rate: Some(118.0),
            systolic_bp: Some(102.0),
            diastolic_bp: Some(60.0),
            oxygen_saturation: Some(89.0),
            temperature: Some(39.6),
            respiratory_rate: Some(28.0),
            glucose: Some(210.0),
            ..VitalsTarget::default()
        },
        symptoms: vec![
            "duszność spoczynkowa".to_string(),
            "ból opłucnowy po stronie prawej".to_string(),
        ],
        exam_findings: vec![ExamFinding {
            body_system: "układ oddechowy".to_string(),
            description: "stłumienie odgłosu opukowego, szmer oskrzelowy".to_string(),
        }],
        lab_abnormalities: vec![
            LabAbnormality {
                test_name: "CRP".to_string(),
                category: "zapalne".to_string(),
                value: LabValue::Number(284.0),
                unit: "mg/L".to_string(),
                reference_range: "< 5".to_string(),
            },
            LabAbnormality {
                test_name: "Prokalcytonina".to_string(),
                category: "zapalne".to_string(),
                value: LabValue::Number(8.5),
                unit: "ng/mL".to_string(),
                reference_range: "< 0.5".to_string(),
            },
            LabAbnormality {
                test_name: "Leukocyty".to_string(),
                category: "morfologia".to_string(),
                value: LabValue::Number(22.4),
                unit: "tys/µL".to_string(),
                reference_range: "4.0 - 10.0".to_string(),
            },
        ],
    }
}

fn complication() -> Phase {
    Phase {
        name: PhaseName::Complication,
        duration: DurationRange { min_secs: 600, max_secs: 900 },
        target_vitals: VitalsTarget {
            heart_rate: Some(132.0),
            systolic_bp: Some(78.0),
            diastolic_bp: Some(44.0),
            oxygen_saturation: Some(84.0),
            temperature: Some(40.1),
            respiratory_rate: Some(32.0),
            consciousness: Some(Consciousness::Pain),
            ..VitalsTarget::default()
        },
        symptoms: vec!["splątanie".to_string(), "skąpomocz".to_string()],
        exam_findings: vec![ExamFinding {
            body_system: "skóra".to_string(),
            description: "skóra marmurkowata, wydłużony nawrót kapilarny".to_string(),
        }],
        lab_abnormalities: vec![LabAbnormality {
            test_name: "Mleczany".to_string(),
            category: "gazometria".to_string(),
            value: LabValue::Number(6.8),
            unit: "mmol/L".to_string(),
            reference_range: "0.5 - 2.2".to_string(),
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
            heart_rate: Some(88.0),
            systolic_bp: Some(118.0),
            diastolic_bp: Some(74.0),
            oxygen_saturation: Some(94.0),
            temperature: Some(37.4),
            respiratory_rate: Some(20.0),
            consciousness: Some(Consciousness::Alert),
            ..VitalsTarget::default()
        },
        symptoms: vec!["ustępująca gorączka".to_string()],
        exam_findings: vec![],
        lab_abnormalities: vec![LabAbnormality {
            test_name: "CRP".to_string(),
            category: "zapalne".to_string(),
            value: LabValue::Number(64.0),
            unit: "mg/L".to_string(),
            reference_range: "< 5".to_string(),
        }],
    }
}
