//! New-onset diabetic ketoacidosis.
//!
//! The only built-in course that trends glucose. Insulin starts the
//! recovery trigger. All clinical values are fictional teaching data.

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
        id: "dka_new_onset".to_string(),
        name: "Kwasica ketonowa w świeżo rozpoznanej cukrzycy".to_string(),
        condition: "Cukrzycowa kwasica ketonowa".to_string(),
        difficulty: Difficulty::Moderate,
        phases: vec![prodromal(), acute(), complication(), terminal(), recovery()],
        initial_history: vec![HistoryEntry {
            description: "Od kilku tygodni wzmożone pragnienie i utrata masy ciała".to_string(),
        }],
        starting_vitals: Vitals {
            heart_rate: 96.0,
            systolic_bp: 118.0,
            diastolic_bp: 76.0,
            oxygen_saturation: 98.0,
            temperature: 36.9,
            respiratory_rate: 18.0,
            glucose: Some(320.0),
            consciousness: Consciousness::Alert,
            updated_at: Utc::now(),
        },
        risk_factors: vec!["wywiad rodzinny cukrzycy typu 1".to_string()],
        profile: PatientProfile {
            names: vec![
                "Kasia Wójcik".to_string(),
                "Michał Krawczyk".to_string(),
                "Ola Mazur".to_string(),
            ],
            age_range: (16, 24),
            sex: Sex::Female,
        },
        triggers: vec![TransitionTrigger {
            name: TREATMENT_STARTED.to_string(),
            target: PhaseName::Recovery,
            probability: 0.8,
        }],
        treatment_keywords: vec!["insulin".to_string()],
    }
}

fn prodromal() -> Phase {
    Phase {
        name: PhaseName::Prodromal,
        duration: DurationRange { min_secs: 600, max_secs: 900 },
        target_vitals: VitalsTarget {
            heart_rate: Some(104.0),
            glucose: Some(380.0),
            ..VitalsTarget::default()
        },
        symptoms: vec![
            "silne pragnienie".to_string(),
            "wielomocz".to_string(),
            "zmęczenie".to_string(),
        ],
        exam_findings: vec![],
        lab_abnormalities: vec![LabAbnormality {
            test_name: "Glukoza".to_string(),
            category: "biochemia".to_string(),
            value: LabValue::Number(385.0),
            unit: "mg/dL".to_string(),
            reference_range: "70 - 99".to_string(),
        }],
    }
}

fn acute() -> Phase {
    Phase {
        name: PhaseName::Acute,
        duration: DurationRange { min_secs: 900, max_secs: 1500 },
        target_vitals: VitalsTarget {
            heart_rate: Some(122.0),
            systolic_bp: Some(100.0),
            diastolic_bp: Some(62.0),
            respiratory_rate: Some(30.0),
            glucose: Some(480.0),
            ..VitalsTarget::default()
        },
        symptoms: vec![
            "nudności i wymioty".to_string(),
            "ból brzucha".to_string(),
            "zapach acetonu z ust".to_string(),
        ],
        exam_findings: vec![ExamFinding {
            body_system: "układ oddechowy".to_string(),
            description: "oddech Kussmaula".to_string(),
        }],
        lab_abnormalities: vec![
            LabAbnormality {
                test_name: "Glukoza".to_string(),
                category: "biochemia".to_string(),
                value: LabValue::Number(487.0),
                unit: "mg/dL".to_string(),
                reference_range: "70 - 99".to_string(),
            },
            LabAbnormality {
                test_name: "Ciała ketonowe w moczu".to_string(),
                category: "badanie moczu".to_string(),
                value: LabValue::Text("+++".to_string()),
                unit: String::new(),
                reference_range: "nieobecne".to_string(),
            },
            LabAbnormality {
                test_name: "Potas".to_string(),
                category: "elektrolity".to_string(),
                value: LabValue::Number(5.8),
                unit: "mmol/L".to_string(),
                reference_range: "3.5 - 5.1".to_string(),
            },
        ],
    }
}

fn complication() -> Phase {
    Phase {
        name: PhaseName::Complication,
        duration: DurationRange { min_secs: 600, max_secs: 900 },
        target_vitals: VitalsTarget {
            heart_rate: Some(134.0),
            systolic_bp: Some(86.0),
            diastolic_bp: Some(50.0),
            respiratory_rate: Some(34.0),
            glucose: Some(540.0),
            consciousness: Some(Consciousness::Verbal),
            ..VitalsTarget::default()
        },
        symptoms: vec!["senność".to_string(), "odwodnienie".to_string()],
        exam_findings: vec![ExamFinding {
            body_system: "skóra".to_string(),
            description: "suche śluzówki, obniżone napięcie skóry".to_string(),
        }],
        lab_abnormalities: vec![LabAbnormality {
            test_name: "Gazometria".to_string(),
            category: "gazometria".to_string(),
            value: LabValue::Text("pH 7.08, HCO3 6 mmol/L".to_string()),
            unit: String::new(),
            reference_range: "pH 7.35 - 7.45".to_string(),
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
            systolic_bp: Some(112.0),
            diastolic_bp: Some(72.0),
            respiratory_rate: Some(18.0),
            glucose: Some(180.0),
            consciousness: Some(Consciousness::Alert),
            ..VitalsTarget::default()
        },
        symptoms: vec!["ustępowanie nudności".to_string()],
        exam_findings: vec![],
        lab_abnormalities: vec![LabAbnormality {
            test_name: "Glukoza".to_string(),
            category: "biochemia".to_string(),
            value: LabValue::Number(196.0),
            unit: "mg/dL".to_string(),
            reference_range: "70 - 99".to_string(),
        }],
    }
}
