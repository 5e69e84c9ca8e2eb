//! # vitasim-core
//!
//! The time-driven patient simulation session for vitasim.
//!
//! This crate provides:
//! - The three trait seams (`InterventionPolicy`, `StateStore`, `Clock`)
//! - The vitals trending engine (`trend`)
//! - The phase transition engine (`transition`)
//! - The lab order fulfillment queue (`orders`)
//! - The `SimulationSession` that wires them into the per-tick pipeline
//!   and fans state changes out to subscribers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vitasim_core::{SimulationSession, SessionConfig, traits::SystemClock};
//!
//! let session = SimulationSession::new(catalog, policy, store, clock, SessionConfig::default());
//! session.generate_new_case(Some("ami_inferior_wall"))?;
//! session.order_lab("Troponina T")?;
//! ```

pub mod orders;
pub mod session;
pub mod traits;
pub mod transition;
pub mod trend;

pub use session::{SessionConfig, SimulationSession, Subscription};
pub use trend::TrendSettings;
