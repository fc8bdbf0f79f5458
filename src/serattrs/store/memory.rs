use super::RecordHost;
use crate::error::{AttrError, Result};

/// In-memory host for testing.
///
/// Persisting only flips the record to "not new" and counts the save. A
/// vetoing record declines every save, the way a cancelling before-save
/// callback would.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecord {
    blob: Option<Vec<u8>>,
    persisted: bool,
    veto: bool,
    simulate_persist_error: bool,
    saves: usize,
}

impl MemoryRecord {
    /// A brand-new, never persisted record with an empty blob.
    pub fn new() -> Self {
        Self::default()
    }

    /// A record loaded from storage with the given blob.
    pub fn existing(blob: Option<Vec<u8>>) -> Self {
        Self {
            blob,
            persisted: true,
            ..Self::default()
        }
    }

    /// Decline every persistence attempt.
    pub fn with_veto(mut self) -> Self {
        self.veto = true;
        self
    }

    /// Fail every persistence attempt with an error.
    pub fn with_persist_error(mut self) -> Self {
        self.simulate_persist_error = true;
        self
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl RecordHost for MemoryRecord {
    fn blob(&self) -> Option<&[u8]> {
        self.blob.as_deref()
    }

    fn set_blob(&mut self, bytes: Option<Vec<u8>>) {
        self.blob = bytes;
    }

    fn is_new_record(&self) -> bool {
        !self.persisted
    }

    fn persist(&mut self) -> Result<bool> {
        if self.simulate_persist_error {
            return Err(AttrError::Io(std::io::Error::other("simulated persist error")));
        }
        if self.veto {
            return Ok(false);
        }
        self.persisted = true;
        self.saves += 1;
        Ok(true)
    }
}
