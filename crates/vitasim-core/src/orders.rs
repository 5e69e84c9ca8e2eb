//! The lab order fulfillment queue.
//!
//! Ordering is synchronous: the result record is created immediately, its
//! value fixed from the phase active at order time. Completion is
//! asynchronous: each tick flips every pending result whose turnaround
//! has elapsed. Completed results are never re-evaluated, so a test
//! ordered just before a phase transition keeps reflecting the phase it
//! was ordered under.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use vitasim_contracts::lab::{LabResult, LabStatus, LabValue};
use vitasim_contracts::patient::{Alert, AlertSeverity, PatientState};
use vitasim_contracts::scenario::Phase;

use vitasim_journal as journal;

/// Score awarded when an abnormal result comes back — the learner ordered
/// a test that caught real pathology.
const ABNORMAL_RESULT_SCORE: i64 = 10;

/// Placeholder value for tests the active phase defines no abnormality for.
const NORMAL_PLACEHOLDER: &str = "W normie";

/// Build the result record for a newly ordered test.
///
/// When the active phase defines an abnormality for `test_name`
/// (case-insensitive match), the result carries its value, unit, and
/// reference range with the abnormal flag set. Otherwise the result is a
/// normal placeholder. Either way the record starts `Ordered` with
/// `result_at = now + turnaround`.
pub fn build_lab_result(
    phase: Option<&Phase>,
    test_name: &str,
    now: DateTime<Utc>,
    turnaround: Duration,
) -> LabResult {
    let abnormality = phase.and_then(|p| {
        p.lab_abnormalities
            .iter()
            .find(|a| a.test_name.eq_ignore_ascii_case(test_name))
    });

    match abnormality {
        Some(a) => LabResult {
            id: Uuid::new_v4(),
            test_name: a.test_name.clone(),
            category: a.category.clone(),
            value: a.value.clone(),
            unit: a.unit.clone(),
            reference_range: a.reference_range.clone(),
            is_abnormal: true,
            ordered_at: now,
            result_at: now + turnaround,
            status: LabStatus::Ordered,
        },
        None => LabResult {
            id: Uuid::new_v4(),
            test_name: test_name.to_string(),
            category: "ogólne".to_string(),
            value: LabValue::Text(NORMAL_PLACEHOLDER.to_string()),
            unit: String::new(),
            reference_range: String::new(),
            is_abnormal: false,
            ordered_at: now,
            result_at: now + turnaround,
            status: LabStatus::Ordered,
        },
    }
}

/// Complete every pending lab whose turnaround has elapsed.
///
/// Each completion raises an alert naming the test; abnormal results also
/// bump the score. Returns the names of the tests completed this tick.
pub fn fulfill_due(state: &mut PatientState, now: DateTime<Utc>) -> Vec<String> {
    let mut completed = Vec::new();
    let mut abnormal_count: i64 = 0;

    for lab in state.lab_results.iter_mut() {
        if lab.is_due(now) {
            lab.complete();
            debug!(test = %lab.test_name, abnormal = lab.is_abnormal, "lab result completed");
            if lab.is_abnormal {
                abnormal_count += 1;
            }
            completed.push(lab.test_name.clone());
        }
    }

    for test in &completed {
        journal::push_alert(
            &mut state.alerts,
            Alert {
                message: format!("Wynik badania dostępny: {test}"),
                severity: AlertSeverity::Info,
                raised_at: now,
            },
        );
    }
    state.score += ABNORMAL_RESULT_SCORE * abnormal_count;

    completed
}

// ── Tests ─────────────────────────────────────────────────────────────────────
