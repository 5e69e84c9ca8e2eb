//! Keyword-driven intervention policy implementation.
//!
//! `KeywordPolicy` implements the `InterventionPolicy` trait from
//! vitasim-core. It decides only *whether* a prescription nominates a
//! scenario trigger — the trigger's weighted coin flip stays with the
//! session, which owns the injected random source.
//!
//! Evaluation algorithm:
//!
//! 1. A patient already in recovery (or terminal) is never re-triggered.
//! 2. If the medication name contains any of the scenario's own
//!    `treatment_keywords` (case-insensitive substring), nominate the
//!    scenario's `treatment_started` trigger.
//! 3. Otherwise iterate the configured rules in declaration order and
//!    nominate the first match.
//! 4. No match → `NoEffect`.

use std::path::Path;

use tracing::debug;

use vitasim_contracts::error::{SimError, SimResult};
use vitasim_contracts::scenario::{PhaseName, TREATMENT_STARTED};
use vitasim_core::traits::{InterventionContext, InterventionPolicy, InterventionVerdict};

use crate::rule::PolicyConfig;

/// An `InterventionPolicy` implementation that matches medication names
/// against keyword sets.
///
/// The default policy carries no extra rules and defers entirely to the
/// keywords embedded in each scenario. Construct via `from_toml_str` or
/// `from_file` to add deployment-specific mappings.
///
/// ```rust,ignore
/// use vitasim_policy::engine::KeywordPolicy;
///
/// let policy = KeywordPolicy::from_file(Path::new("policies/interventions.toml"))?;
/// ```
#[derive(Debug, Default)]
pub struct KeywordPolicy {
    config: PolicyConfig,
}

impl KeywordPolicy {
    /// Parse `s` as TOML and build a `KeywordPolicy`.
    ///
    /// Returns `SimError::ConfigError` if the TOML is malformed or does
    /// not match the expected `PolicyConfig` schema.
    pub fn from_toml_str(s: &str) -> SimResult<Self> {
        let config: PolicyConfig = toml::from_str(s).map_err(|e| SimError::ConfigError {
            reason: format!("failed to parse intervention policy TOML: {}", e),
        })?;
        Ok(Self { config })
    }

    /// Read the file at `path` and parse it as TOML policy configuration.
    pub fn from_file(path: &Path) -> SimResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SimError::ConfigError {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}

impl InterventionPolicy for KeywordPolicy {
    fn evaluate(&self, ctx: &InterventionContext<'_>) -> InterventionVerdict {
        // An already-recovering (or terminal) patient is never re-triggered.
        if matches!(ctx.current_phase, PhaseName::Recovery | PhaseName::Terminal) {
            return InterventionVerdict::NoEffect;
        }

        let name = ctx.medication.name.to_lowercase();

        // Scenario-embedded treatment keywords take precedence.
        if ctx
            .scenario
            .treatment_keywords
            .iter()
            .any(|k| name.contains(&k.to_lowercase()))
        {
            debug!(
                medication = %ctx.medication.name,
                scenario = %ctx.scenario.id,
                "medication matched scenario treatment keywords"
            );
            return InterventionVerdict::Trigger { name: TREATMENT_STARTED.to_string() };
        }

        for rule in &self.config.rules {
            if rule.matches(&ctx.medication.name) {
                debug!(
                    rule_id = %rule.id,
                    medication = %ctx.medication.name,
                    trigger = %rule.trigger,
                    "configured rule matched"
                );
                return InterventionVerdict::Trigger { name: rule.trigger.clone() };
            }
        }

        InterventionVerdict::NoEffect
    }
}
