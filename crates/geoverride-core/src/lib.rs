// crates/geoverride-core/src/lib.rs

//! # geoverride-core
//!
//! Editable override documents layered over a read-only directory of
//! states → districts → cities.
//!
//! The override document adds or renames entries and hides codes of the
//! base directory. It is edited in memory through [`GeoOverride`] and saved
//! as a whole under the `"geo.custom"` key of a settings document.
//!
//! ```rust
//! use geoverride_core::{EntryPatch, GeoOverride, Scope};
//!
//! let mut doc = GeoOverride::new();
//! let id = doc.add_state();
//! doc.update_entry(&Scope::States, id, EntryPatch::code("RJ").with_name_en("Rajasthan"))
//!     .unwrap();
//! doc.hide_code(&Scope::districts("RJ"), "RJ-33");
//!
//! let json = doc.to_value();
//! assert_eq!(json["states"][0]["code"], "RJ");
//! assert_eq!(json["remove"]["districts"]["RJ"][0], "RJ-33");
//! ```

pub mod common;
pub mod config;
pub mod directory;
pub mod error;
pub mod model;
pub mod normalize;
pub mod persist;
pub mod prelude;
pub mod reconcile;
pub mod resolve;
pub mod session;
pub mod settings;
pub mod text;

// Re-exports
pub use crate::error::{GeoOverrideError, Result};
pub use crate::model::{Entry, EntryId, EntryPatch, GeoOverride, HiddenCodes, Level, Scope};
pub use crate::persist::{PersistedEntry, PersistedHidden, PersistedOverride};
pub use crate::directory::{BaseDirectory, DirectoryEntry};
pub use crate::common::{DirectoryStats, Origin, ResolvedEntry, SearchHit};
pub use crate::resolve::ResolvedDirectory;
pub use crate::session::{Session, SharedSession};
pub use crate::settings::{
    load_override, save_override, FileSettingsStore, MemorySettingsStore, SettingsDocument,
    SettingsStore, GEO_CUSTOM_KEY,
};
#[cfg(feature = "http")]
pub use crate::settings::HttpSettingsStore;
