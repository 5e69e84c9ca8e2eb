//! # vitasim-contracts
//!
//! Shared types and contracts for the vitasim patient simulation core.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions, light container methods, and error
//! types.

pub mod error;
pub mod lab;
pub mod medication;
pub mod patient;
pub mod scenario;
pub mod timeline;
pub mod vitals;
