//! Inferior-wall myocardial infarction.
//!
//! The untreated course runs prodromal discomfort → acute infarction →
//! conduction-block complication → arrest. Starting treatment (aspirin,
//! nitroglycerin, heparin, morphine) can short-circuit the course into
//! recovery via the `treatment_started` trigger. All clinical values are
//! fictional teaching data.

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
        id: "ami_inferior_wall".to_string(),
        name: "Zawał mięśnia sercowego ściany dolnej".to_string(),
        condition: "Ostry zespół wieńcowy".to_string(),
        difficulty: Difficulty::Moderate,
        phases: vec![prodromal(), acute(), complication(), terminal(), recovery()],
        initial_history: vec![
            HistoryEntry { description: "Nadciśnienie tętnicze od 10 lat".to_string() },
            HistoryEntry { description: "Hipercholesterolemia leczona statyną".to_string() },
        ],
        starting_vitals: Vitals {
            heart_rate: 88.0,
            systolic_bp: 145.0,
            diastolic_bp: 92.0,
            oxygen_saturation: 96.0,
            temperature: 36.8,
            respiratory_rate: 16.0,
            glucose: None,
            consciousness: Consciousness::Alert,
            updated_at: Utc::now(),
        },
        risk_factors: vec![
            "palenie tytoniu".to_string(),
            "otyłość".to_string(),
            "siedzący tryb życia".to_string(),
        ],
        profile: PatientProfile {
            names: vec![
                "Jan Kowalski".to_string(),
                "Andrzej Nowak".to_string(),
                "Stanisław Wiśniewski".to_string(),
                "Marek Zieliński".to_string(),
            ],
            age_range: (52, 71),
            sex: Sex::Male,
        },
        triggers: vec![
            TransitionTrigger {
                name: TREATMENT_STARTED.to_string(),
                target: PhaseName::Recovery,
                probability: 0.8,
            },
            TransitionTrigger {
                name: "complication_onset".to_string(),
                target: PhaseName::Complication,
                probability: 0.3,
            },
        ],
        treatment_keywords: vec![
            "aspir".to_string(),
            "nitrogli".to_string(),
            "heparyn".to_string(),
            "morfin".to_string(),
        ],
    }
}

fn prodromal() -> Phase {
    Phase {
        name: PhaseName::Prodromal,
        duration: DurationRange { min_secs: 600, max_secs: 900 },
        target_vitals: VitalsTarget {
            heart_rate: Some(95.0),
            systolic_bp: Some(150.0),
            ..VitalsTarget::default()
        },
        symptoms: vec![
            "uczucie dyskomfortu w klatce piersiowej".to_string(),
            "niepokój".to_string(),
        ],
        exam_findings: vec![],
        lab_abnormalities: vec![],
    }
}

fn acute() -> Phase {
    Phase {
        name: PhaseName::Acute,
        duration: DurationRange { min_secs: 1200, max_secs: 1800 },
        target_vitals: VitalsTarget {
            // Inferior-wall ischemia runs vagal: bradycardia with a
            // pressure drop, not tachycardia.
            heart_rate: Some(54.0),
            systolic_bp: Some(98.0),
            diastolic_bp: Some(64.0),
            oxygen_saturation: Some(93.0),
            respiratory_rate: Some(22.0),
            ..VitalsTarget::default()
        },
        symptoms: vec![
            "silny ból w klatce piersiowej promieniujący do żuchwy".to_string(),
            "nudności".to_string(),
            "zimne poty".to_string(),
        ],
        exam_findings: vec![
            ExamFinding {
                body_system: "układ krążenia".to_string(),
                description: "tony serca ciche, bradykardia zatokowa".to_string(),
            },
            ExamFinding {
                body_system: "skóra".to_string(),
                description: "skóra blada, chłodna, spocona".to_string(),
            },
        ],
        lab_abnormalities: vec![
            LabAbnormality {
                test_name: "Troponina T".to_string(),
                category: "kardiologiczne".to_string(),
                value: LabValue::Number(450.0),
                unit: "ng/L".to_string(),
                reference_range: "< 14".to_string(),
            },
            LabAbnormality {
                test_name: "CK-MB".to_string(),
                category: "kardiologiczne".to_string(),
                value: LabValue::Number(87.0),
                unit: "U/L".to_string(),
                reference_range: "< 25".to_string(),
            },
        ],
    }
}

fn complication() -> Phase {
    Phase {
        name: PhaseName::Complication,
        duration: DurationRange { min_secs: 600, max_secs: 1200 },
        target_vitals: VitalsTarget {
            heart_rate: Some(40.0),
            systolic_bp: Some(80.0),
            diastolic_bp: Some(50.0),
            oxygen_saturation: Some(88.0),
            respiratory_rate: Some(26.0),
            consciousness: Some(Consciousness::Verbal),
            ..VitalsTarget::default()
        },
        symptoms: vec!["zawroty głowy".to_string(), "narastająca duszność".to_string()],
        exam_findings: vec![ExamFinding {
            body_system: "układ krążenia".to_string(),
            description: "rytm niemiarowy, blok przedsionkowo-komorowy II stopnia".to_string(),
        }],
        lab_abnormalities: vec![LabAbnormality {
            test_name: "Troponina T".to_string(),
            category: "kardiologiczne".to_string(),
            value: LabValue::Number(1280.0),
            unit: "ng/L".to_string(),
            reference_range: "< 14".to_string(),
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
            heart_rate: Some(72.0),
            systolic_bp: Some(125.0),
            diastolic_bp: Some(80.0),
            oxygen_saturation: Some(97.0),
            respiratory_rate: Some(15.0),
            consciousness: Some(Consciousness::Alert),
            ..VitalsTarget::default()
        },
        symptoms: vec!["stopniowe ustępowanie dolegliwości".to_string()],
        exam_findings: vec![],
        lab_abnormalities: vec![LabAbnormality {
            test_name: "Troponina T".to_string(),
            category: "kardiologiczne".to_string(),
            value: LabValue::Number(210.0),
            unit: "ng/L".to_string(),
            reference_range: "< 14".to_string(),
        }],
    }
}
