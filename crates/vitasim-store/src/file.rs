//! Single-file JSON implementation of `StateStore`.
//!
//! The entire `PatientState` is written as one JSON document at a fixed
//! path — the durable equivalent of the portal's single storage key. A
//! missing file means no persisted case; an unparsable file is treated as
//! corruption and discarded on load.

use std::io;
use std::path::PathBuf;

use tracing::warn;

use vitasim_contracts::error::{SimError, SimResult};
use vitasim_contracts::patient::PatientState;
use vitasim_core::traits::StateStore;

/// A `StateStore` backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    path: PathBuf,
}

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl StateStore for JsonFileStateStore {
    /// Read and parse the persisted case.
    ///
    /// A missing file is `Ok(None)`. An unreadable file is an error. An
    /// unparsable file is logged and reported as `Ok(None)` — the session
    /// starts fresh rather than failing.
    fn load(&self) -> SimResult<Option<PatientState>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SimError::StoreFailed {
                    reason: format!("failed to read '{}': {}", self.path.display(), e),
                })
            }
        };

        match serde_json::from_str::<PatientState>(&contents) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "persisted case file is unparsable; discarding"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, state: &PatientState) -> SimResult<()> {
        let blob = serde_json::to_string_pretty(state).map_err(|e| SimError::StoreFailed {
            reason: format!("failed to serialize patient state: {}", e),
        })?;
        std::fs::write(&self.path, blob).map_err(|e| SimError::StoreFailed {
            reason: format!("failed to write '{}': {}", self.path.display(), e),
        })
    }

    /// Remove the persisted file. Idempotent — a missing file is fine.
    fn clear(&self) -> SimResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SimError::StoreFailed {
                reason: format!("failed to remove '{}': {}", self.path.display(), e),
            }),
        }
    }
}
