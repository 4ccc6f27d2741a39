// crates/geoverride-core/src/directory/mod.rs

//! # Base Directory
//!
//! The read-only states → districts → cities directory that override
//! documents are layered on. It is supplied externally (a JSON export,
//! optionally gzip-compressed) and never modified by this crate.
//!
//! **Structure:** `states`, `districts[state]`, `cities[state][district]`,
//! the same keying as the override document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod loader;

pub use loader::SNAPSHOT_SUFFIX;

/// One state, district or city of the base directory.
///
/// No `skip_serializing_if` here: the binary snapshot needs every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub code: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub name_hi: String,
}

impl DirectoryEntry {
    pub fn new(code: impl Into<String>, name_en: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name_en: name_en.into(),
            name_hi: String::new(),
        }
    }

    pub fn with_name_hi(mut self, name: impl Into<String>) -> Self {
        self.name_hi = name.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseDirectory {
    #[serde(default)]
    pub states: Vec<DirectoryEntry>,
    #[serde(default)]
    pub districts: BTreeMap<String, Vec<DirectoryEntry>>,
    #[serde(default)]
    pub cities: BTreeMap<String, BTreeMap<String, Vec<DirectoryEntry>>>,
}

impl BaseDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> &[DirectoryEntry] {
        &self.states
    }

    pub fn districts(&self, state: &str) -> &[DirectoryEntry] {
        self.districts.get(state).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cities(&self, state: &str, district: &str) -> &[DirectoryEntry] {
        self.cities
            .get(state)
            .and_then(|m| m.get(district))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
