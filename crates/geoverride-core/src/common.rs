// crates/geoverride-core/src/common.rs
use crate::model::{Level, Scope};
use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for a resolved directory.
///
/// Returned by [`crate::ResolvedDirectory::stats`], these counts only include
/// visible entries below visible parents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStats {
    pub states: usize,
    pub districts: usize,
    pub cities: usize,
}

/// Where a resolved entry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Untouched base directory entry.
    Base,
    /// Base directory entry renamed by the override document.
    Overridden,
    /// Entry that only exists in the override document.
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEntry {
    pub code: String,
    pub name_en: String,
    pub name_hi: String,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub level: Level,
    pub scope: Scope,
    pub entry: ResolvedEntry,
}
