// crates/geoverride-core/src/prelude.rs
pub use crate::config::ConsoleConfig;
pub use crate::error::{GeoOverrideError, Result};
pub use crate::model::{Entry, EntryId, EntryPatch, GeoOverride, Level, Scope};
pub use crate::directory::BaseDirectory;
pub use crate::resolve::ResolvedDirectory;
pub use crate::session::{Session, SharedSession};
pub use crate::settings::{load_override, save_override, SettingsStore};
