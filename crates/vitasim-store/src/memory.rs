//! In-memory implementation of `StateStore`.
//!
//! `InMemoryStateStore` is the reference implementation of the
//! `StateStore` trait. It keeps the persisted blob as a serialized JSON
//! string behind a `Mutex` — serializing for real means the store
//! exercises exactly the same round-trip (and the same corruption
//! recovery) as the file-backed store.

use std::sync::Mutex;

use tracing::warn;

use vitasim_contracts::error::{SimError, SimResult};
use vitasim_contracts::patient::PatientState;
use vitasim_core::traits::StateStore;

/// An in-memory, single-slot state store.
///
/// # Thread safety
///
/// All operations acquire a `Mutex` internally; the store can be shared
/// across threads without additional synchronization.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    slot: Mutex<Option<String>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored blob with raw text.
    ///
    /// Diagnostic hook: lets tests and tools exercise the corrupt-blob
    /// recovery path without reaching into the struct.
    pub fn inject_raw(&self, blob: impl Into<String>) {
        *self.slot.lock().expect("state slot lock poisoned") = Some(blob.into());
    }
}

impl StateStore for InMemoryStateStore {
    /// Parse and return the stored case, if any.
    ///
    /// An unparsable blob is discarded with a warning and reported as
    /// `Ok(None)` — persistence corruption is recoverable, never fatal.
    fn load(&self) -> SimResult<Option<PatientState>> {
        let slot = self.slot.lock().expect("state slot lock poisoned");
        let Some(blob) = slot.as_ref() else {
            return Ok(None);
        };

        match serde_json::from_str::<PatientState>(blob) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(error = %e, "stored case blob is unparsable; discarding");
                Ok(None)
            }
        }
    }

    fn save(&self, state: &PatientState) -> SimResult<()> {
        let blob = serde_json::to_string(state).map_err(|e| SimError::StoreFailed {
            reason: format!("failed to serialize patient state: {}", e),
        })?;
        *self.slot.lock().expect("state slot lock poisoned") = Some(blob);
        Ok(())
    }

    fn clear(&self) -> SimResult<()> {
        *self.slot.lock().expect("state slot lock poisoned") = None;
        Ok(())
    }
}
