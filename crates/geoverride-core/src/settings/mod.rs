// crates/geoverride-core/src/settings/mod.rs

//! # Settings store
//!
//! The admin backend keeps all site settings in one flat key → value
//! document. `GET /settings` returns it, `PATCH /settings` merges the
//! top-level keys it is given. The override document lives under
//! [`GEO_CUSTOM_KEY`] and is always written as a whole.

use crate::error::Result;
use crate::model::GeoOverride;
use serde_json::{Map, Value};
use tracing::{debug, info};

mod file;
#[cfg(feature = "http")]
mod http;
mod memory;

pub use file::FileSettingsStore;
#[cfg(feature = "http")]
pub use http::HttpSettingsStore;
pub use memory::MemorySettingsStore;

/// Settings key holding the persisted override document.
pub const GEO_CUSTOM_KEY: &str = "geo.custom";

/// Flat key → value settings document.
pub type SettingsDocument = Map<String, Value>;

/// Where settings documents come from and go to.
pub trait SettingsStore {
    /// Returns the whole settings document.
    fn fetch(&self) -> Result<SettingsDocument>;

    /// Merges the given top-level keys into the stored document.
    fn patch(&self, changes: &SettingsDocument) -> Result<()>;
}

impl<S: SettingsStore + ?Sized> SettingsStore for &S {
    fn fetch(&self) -> Result<SettingsDocument> {
        (**self).fetch()
    }

    fn patch(&self, changes: &SettingsDocument) -> Result<()> {
        (**self).patch(changes)
    }
}

/// Loads the override document; a missing key gives an empty document.
///
/// Some backends store setting values as JSON text, so a string value is
/// parsed before normalizing. Text that is not JSON counts as empty.
pub fn load_override<S: SettingsStore + ?Sized>(store: &S) -> Result<GeoOverride> {
    let doc = store.fetch()?;
    let overrides = match doc.get(GEO_CUSTOM_KEY) {
        None => {
            debug!(key = GEO_CUSTOM_KEY, "settings key absent, starting empty");
            GeoOverride::new()
        }
        Some(Value::String(text)) => GeoOverride::from_json_str(text).unwrap_or_else(|e| {
            debug!(key = GEO_CUSTOM_KEY, error = %e, "settings value is not JSON, starting empty");
            GeoOverride::new()
        }),
        Some(value) => GeoOverride::from_value(value),
    };
    info!(states = overrides.states().len(), "loaded geo override");
    Ok(overrides)
}

/// Replaces the stored override document with `overrides` in one PATCH.
///
/// Other settings keys are untouched. On failure the caller keeps its
/// in-memory document and may simply retry.
pub fn save_override<S: SettingsStore + ?Sized>(store: &S, overrides: &GeoOverride) -> Result<()> {
    let mut changes = SettingsDocument::new();
    changes.insert(GEO_CUSTOM_KEY.to_owned(), overrides.to_value());
    store.patch(&changes)?;
    info!(states = overrides.states().len(), "saved geo override");
    Ok(())
}

/// Shallow merge used by the local stores, mirroring `PATCH /settings`.
pub(crate) fn merge_into(target: &mut SettingsDocument, changes: &SettingsDocument) {
    for (key, value) in changes {
        target.insert(key.clone(), value.clone());
    }
}
