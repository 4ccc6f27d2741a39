// crates/geoverride-core/src/settings/memory.rs
use super::{merge_into, SettingsDocument, SettingsStore};
use crate::error::Result;
use std::sync::{Mutex, PoisonError};

/// In-process settings store with `PATCH` merge semantics.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    doc: Mutex<SettingsDocument>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: SettingsDocument) -> Self {
        Self {
            doc: Mutex::new(doc),
        }
    }

    /// Copy of the current document.
    pub fn snapshot(&self) -> SettingsDocument {
        self.doc
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn fetch(&self) -> Result<SettingsDocument> {
        Ok(self.snapshot())
    }

    fn patch(&self, changes: &SettingsDocument) -> Result<()> {
        let mut doc = self.doc.lock().unwrap_or_else(PoisonError::into_inner);
        merge_into(&mut doc, changes);
        Ok(())
    }
}
