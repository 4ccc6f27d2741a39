// crates/geoverride-core/src/settings/file.rs
use super::{merge_into, SettingsDocument, SettingsStore};
use crate::error::{GeoOverrideError, Result};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Settings document kept in a local JSON file.
///
/// A missing file reads as an empty document. Writes go to a temporary file
/// that is renamed over the original, so a failed save leaves the old file.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, doc: &SettingsDocument) -> Result<()> {
        let text = serde_json::to_string_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn fetch(&self) -> Result<SettingsDocument> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SettingsDocument::new()),
            Err(e) => return Err(GeoOverrideError::Io(e)),
        };
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(doc) => Ok(doc),
            _ => {
                warn!(path = %self.path.display(), "settings file is not a JSON object, treating as empty");
                Ok(SettingsDocument::new())
            }
        }
    }

    fn patch(&self, changes: &SettingsDocument) -> Result<()> {
        let mut doc = self.fetch()?;
        merge_into(&mut doc, changes);
        self.write(&doc)
    }
}
