//! # vitasim-scenarios
//!
//! Built-in disease scenario catalog for the vitasim patient simulation
//! core.
//!
//! Four teaching courses, each an ordered sequence of phases with target
//! vitals, revealed symptoms and findings, and per-phase lab
//! abnormalities:
//!
//! 1. **Zawał ściany dolnej** — inferior-wall myocardial infarction
//! 2. **Sepsa** — pneumonia progressing to septic shock
//! 3. **Kwasica ketonowa** — new-onset diabetic ketoacidosis
//! 4. **Anafilaksja** — insect-sting anaphylaxis
//!
//! All data is hardcoded and fictional. This crate also hosts the
//! end-to-end tests that wire the whole workspace together.

pub mod ami;
pub mod anaphylaxis;
pub mod catalog;
pub mod dka;
pub mod sepsis;

pub use catalog::builtin_catalog;

// ── Tests ─────────────────────────────────────────────────────────────────────
