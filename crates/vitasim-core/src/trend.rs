//! The vitals trending engine.
//!
//! One step of exponential smoothing plus bounded uniform jitter:
//!
//!   `next = current + (target - current) * smoothing + noise(amplitude)`
//!
//! Fields the active phase targets use the larger trend amplitude; fields
//! it leaves alone receive only the smaller stability jitter so the
//! patient still "looks alive" while not actively trending. Every output
//! is clamped to physiologic bounds and rounded to one decimal place.
//!
//! `advance_vitals` is pure with respect to its inputs plus the injected
//! random source — substituting a seeded generator (and
//! `noise_scale = 0.0`) makes the engine fully deterministic for tests.

use chrono::{DateTime, Utc};
use rand::Rng;

use vitasim_contracts::vitals::{Vitals, VitalsTarget};

/// Tuning knobs for the trending step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSettings {
    /// Exponential smoothing factor applied to targeted fields.
    pub smoothing: f64,
    /// Global multiplier on every noise amplitude. `0.0` silences jitter
    /// entirely, which the property tests rely on.
    pub noise_scale: f64,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self { smoothing: 0.05, noise_scale: 1.0 }
    }
}

/// Per-field amplitudes and physiologic clamp bounds.
///
/// Declared as explicit constants per field — field access is typed and
/// spelled out in `advance_vitals`, never keyed dynamically.
struct FieldSpec {
    /// Jitter amplitude while the field is being trended.
    trend_noise: f64,
    /// Smaller jitter amplitude while the field is idle.
    idle_noise: f64,
    min: f64,
    max: f64,
}

const HEART_RATE: FieldSpec = FieldSpec { trend_noise: 2.0, idle_noise: 0.6, min: 20.0, max: 250.0 };
const SYSTOLIC_BP: FieldSpec = FieldSpec { trend_noise: 2.0, idle_noise: 0.6, min: 40.0, max: 260.0 };
const DIASTOLIC_BP: FieldSpec = FieldSpec { trend_noise: 1.5, idle_noise: 0.5, min: 20.0, max: 160.0 };
const OXYGEN_SATURATION: FieldSpec =
    FieldSpec { trend_noise: 0.4, idle_noise: 0.2, min: 50.0, max: 100.0 };
const TEMPERATURE: FieldSpec = FieldSpec { trend_noise: 0.1, idle_noise: 0.05, min: 33.0, max: 43.0 };
const RESPIRATORY_RATE: FieldSpec =
    FieldSpec { trend_noise: 0.8, idle_noise: 0.3, min: 4.0, max: 70.0 };
const GLUCOSE: FieldSpec = FieldSpec { trend_noise: 3.0, idle_noise: 1.0, min: 20.0, max: 1000.0 };

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Advance one numeric field: smooth toward the target when one is set,
/// jitter either way, then clamp and round.
fn step_field(
    current: f64,
    target: Option<f64>,
    spec: &FieldSpec,
    settings: &TrendSettings,
    rng: &mut impl Rng,
) -> f64 {
    let pulled = match target {
        Some(t) => current + (t - current) * settings.smoothing,
        None => current,
    };

    let amplitude = match target {
        Some(_) => spec.trend_noise,
        None => spec.idle_noise,
    } * settings.noise_scale;

    let noise = if amplitude > 0.0 {
        rng.gen_range(-amplitude..=amplitude)
    } else {
        0.0
    };

    round1((pulled + noise).clamp(spec.min, spec.max))
}

/// Produce the next vitals snapshot from the current one and the active
/// phase's partial target.
///
/// Consciousness is categorical: a targeted level is applied directly,
/// otherwise the current level is kept. Glucose tracking starts the first
/// time a phase targets it and is dropped never — a scenario without
/// glucose targets leaves the field `None` throughout.
pub fn advance_vitals(
    current: &Vitals,
    target: &VitalsTarget,
    settings: &TrendSettings,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Vitals {
    let glucose = match (current.glucose, target.glucose) {
        (Some(g), t) => Some(step_field(g, t, &GLUCOSE, settings, rng)),
        // The scenario just started tracking glucose: seed it at the target.
        (None, Some(t)) => Some(round1(t)),
        (None, None) => None,
    };

    Vitals {
        heart_rate: step_field(current.heart_rate, target.heart_rate, &HEART_RATE, settings, rng),
        systolic_bp: step_field(current.systolic_bp, target.systolic_bp, &SYSTOLIC_BP, settings, rng),
        diastolic_bp: step_field(
            current.diastolic_bp,
            target.diastolic_bp,
            &DIASTOLIC_BP,
            settings,
            rng,
        ),
        oxygen_saturation: step_field(
            current.oxygen_saturation,
            target.oxygen_saturation,
            &OXYGEN_SATURATION,
            settings,
            rng,
        ),
        temperature: step_field(current.temperature, target.temperature, &TEMPERATURE, settings, rng),
        respiratory_rate: step_field(
            current.respiratory_rate,
            target.respiratory_rate,
            &RESPIRATORY_RATE,
            settings,
            rng,
        ),
        glucose,
        consciousness: target.consciousness.unwrap_or(current.consciousness),
        updated_at: now,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use vitasim_contracts::vitals::{Consciousness, Vitals, VitalsTarget};

    use super::{advance_vitals, TrendSettings};

    fn ts() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
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
            updated_at: ts(),
        }
    }

    fn silent() -> TrendSettings {
        TrendSettings { noise_scale: 0.0, ..TrendSettings::default() }
    }

    /// With zero noise, repeated steps strictly shrink the distance to the
    /// target until within one decimal step, and never overshoot.
    #[test]
    fn converges_without_overshoot() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let settings = silent();
        let target = VitalsTarget { heart_rate: Some(120.0), ..VitalsTarget::default() };

        let mut vitals = make_vitals();
        let mut distance = (vitals.heart_rate - 120.0).abs();

        for _ in 0..400 {
            vitals = advance_vitals(&vitals, &target, &settings, ts(), &mut rng);
            let next_distance = (vitals.heart_rate - 120.0).abs();
            assert!(
                next_distance <= distance,
                "distance must never grow: {next_distance} > {distance}"
            );
            assert!(
                vitals.heart_rate <= 120.0,
                "trending from below must not overshoot the target"
            );
            distance = next_distance;
        }

        assert!(distance <= 1.0, "must settle near the target, got distance {distance}");
    }

    /// At equilibrium the per-step movement is bounded by the field's
    /// noise amplitude.
    #[test]
    fn noise_bounded_by_amplitude() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let settings = TrendSettings::default();
        let target = VitalsTarget { heart_rate: Some(80.0), ..VitalsTarget::default() };

        let vitals = make_vitals();
        for _ in 0..100 {
            let next = advance_vitals(&vitals, &target, &settings, ts(), &mut rng);
            // Trend amplitude for heart rate is 2.0; rounding adds ≤ 0.05.
            assert!((next.heart_rate - 80.0).abs() <= 2.1);
        }
    }

    /// Fields absent from the target still receive stability jitter but
    /// only within the smaller idle amplitude.
    #[test]
    fn idle_fields_jitter_within_idle_amplitude() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let settings = TrendSettings::default();
        let target = VitalsTarget::default();

        let vitals = make_vitals();
        for _ in 0..100 {
            let next = advance_vitals(&vitals, &target, &settings, ts(), &mut rng);
            // Idle amplitudes are 0.05 and 0.6; rounding adds ≤ 0.05.
            assert!((next.temperature - 36.6).abs() <= 0.11);
            assert!((next.heart_rate - 80.0).abs() <= 0.66);
        }
    }

    /// With zero noise and no target, the snapshot is unchanged apart from
    /// the timestamp.
    #[test]
    fn silent_idle_step_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let vitals = make_vitals();
        let later = ts() + chrono::Duration::seconds(1);
        let next = advance_vitals(&vitals, &VitalsTarget::default(), &silent(), later, &mut rng);
        assert_eq!(next.heart_rate, vitals.heart_rate);
        assert_eq!(next.temperature, vitals.temperature);
        assert_eq!(next.updated_at, later);
    }

    /// Every output is rounded to one decimal place.
    #[test]
    fn outputs_rounded_to_one_decimal() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let target = VitalsTarget {
            heart_rate: Some(113.0),
            temperature: Some(38.7),
            ..VitalsTarget::default()
        };
        let mut vitals = make_vitals();
        for _ in 0..50 {
            vitals = advance_vitals(&vitals, &target, &TrendSettings::default(), ts(), &mut rng);
            for value in [vitals.heart_rate, vitals.temperature, vitals.systolic_bp] {
                let scaled = value * 10.0;
                assert!(
                    (scaled - scaled.round()).abs() < 1e-6,
                    "value {value} is not rounded to one decimal"
                );
            }
        }
    }

    /// Saturation can never be jittered above 100 percent.
    #[test]
    fn saturation_clamped_at_ceiling() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let target = VitalsTarget { oxygen_saturation: Some(100.0), ..VitalsTarget::default() };
        let mut vitals = make_vitals();
        vitals.oxygen_saturation = 99.9;
        for _ in 0..200 {
            vitals = advance_vitals(&vitals, &target, &TrendSettings::default(), ts(), &mut rng);
            assert!(vitals.oxygen_saturation <= 100.0);
            assert!(vitals.is_finite());
        }
    }

    /// A targeted consciousness level is applied directly; an untargeted
    /// one is kept.
    #[test]
    fn consciousness_is_categorical() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let vitals = make_vitals();

        let keep = advance_vitals(&vitals, &VitalsTarget::default(), &silent(), ts(), &mut rng);
        assert_eq!(keep.consciousness, Consciousness::Alert);

        let target =
            VitalsTarget { consciousness: Some(Consciousness::Pain), ..VitalsTarget::default() };
        let set = advance_vitals(&vitals, &target, &silent(), ts(), &mut rng);
        assert_eq!(set.consciousness, Consciousness::Pain);
    }

    /// Glucose stays untracked until a phase targets it, then trends.
    #[test]
    fn glucose_starts_tracking_at_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        let vitals = make_vitals();

        let untracked = advance_vitals(&vitals, &VitalsTarget::default(), &silent(), ts(), &mut rng);
        assert!(untracked.glucose.is_none());

        let target = VitalsTarget { glucose: Some(350.0), ..VitalsTarget::default() };
        let tracked = advance_vitals(&vitals, &target, &silent(), ts(), &mut rng);
        assert_eq!(tracked.glucose, Some(350.0));

        // Subsequent steps trend the now-present value.
        let mut current = tracked;
        current.glucose = Some(100.0);
        let next = advance_vitals(&current, &target, &silent(), ts(), &mut rng);
        let g = next.glucose.unwrap();
        assert!(g > 100.0 && g < 350.0);
    }
}
