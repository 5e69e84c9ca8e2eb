//! # vitasim-store
//!
//! `StateStore` implementations for the vitasim simulation core.
//!
//! - `InMemoryStateStore` — single serialized slot behind a mutex, the
//!   reference implementation and the default for tests and demos.
//! - `JsonFileStateStore` — one JSON document at a fixed path, the durable
//!   equivalent of the portal's single storage key.
//!
//! Both stores treat an unparsable blob as recoverable corruption: the
//! blob is discarded with a warning and the session starts with no active
//! case.

pub mod file;
pub mod memory;

pub use file::JsonFileStateStore;
pub use memory::InMemoryStateStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
