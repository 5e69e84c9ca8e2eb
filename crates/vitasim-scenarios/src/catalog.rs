//! The built-in scenario catalog.

use vitasim_contracts::scenario::ScenarioCatalog;

use crate::{ami, anaphylaxis, dka, sepsis};

/// All built-in disease scenarios, in catalog order.
///
/// The catalog is read-only and shared across cases; build it once and
/// hand it to every session behind an `Arc`.
pub fn builtin_catalog() -> ScenarioCatalog {
    ScenarioCatalog::new(vec![
        ami::scenario(),
        sepsis::scenario(),
        dka::scenario(),
        anaphylaxis::scenario(),
    ])
}
