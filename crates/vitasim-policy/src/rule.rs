//! Intervention rule types and configuration schema.
//!
//! A `PolicyConfig` is deserialized from TOML and holds an ordered list of
//! `KeywordRule`s. Rules are evaluated in declaration order — the first
//! matching rule wins. Scenario-embedded treatment keywords are always
//! checked before the configured rules, so a TOML file only needs entries
//! for mappings the scenarios themselves do not carry.

use serde::{Deserialize, Serialize};

/// A single keyword-to-trigger rule loaded from TOML.
///
/// The rule matches when the prescribed medication's name contains
/// `keyword` (case-insensitive). A match nominates the scenario trigger
/// named by `trigger`; whether the trigger actually fires is decided by
/// its own probability in the scenario definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Stable identifier used in log messages.
    pub id: String,

    /// Human-readable explanation of what this rule maps.
    pub description: String,

    /// Lower-case substring matched against the medication name.
    pub keyword: String,

    /// The scenario trigger this rule nominates (e.g. "treatment_started").
    pub trigger: String,
}

impl KeywordRule {
    /// Return true if this rule matches the given medication name.
    ///
    /// Matching is a case-insensitive substring test, mirroring how the
    /// scenario-embedded treatment keywords are matched.
    pub fn matches(&self, medication_name: &str) -> bool {
        medication_name
            .to_lowercase()
            .contains(&self.keyword.to_lowercase())
    }
}

/// The top-level structure deserialized from a TOML policy file.
///
/// Rules are evaluated in the order they appear in the `rules` array.
///
/// Example:
/// ```toml
/// [[rules]]
/// id = "thrombolysis"
/// description = "Thrombolytics count as starting treatment"
/// keyword = "alteplaz"
/// trigger = "treatment_started"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Ordered list of rules. First match wins.
    #[serde(default)]
    pub rules: Vec<KeywordRule>,
}
