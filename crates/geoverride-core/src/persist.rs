// crates/geoverride-core/src/persist.rs

//! The persisted shape of an override document.
//!
//! This is what gets stored under `"geo.custom"`: ids stripped, drafts
//! dropped, and no empty names, lists or maps.

use crate::error::Result;
use crate::model::{Entry, GeoOverride};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEntry {
    pub code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name_en: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name_hi: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedHidden {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub districts: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cities: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl PersistedHidden {
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.districts.is_empty() && self.cities.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedOverride {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<PersistedEntry>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub districts: BTreeMap<String, Vec<PersistedEntry>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cities: BTreeMap<String, BTreeMap<String, Vec<PersistedEntry>>>,
    #[serde(default, skip_serializing_if = "PersistedHidden::is_empty")]
    pub remove: PersistedHidden,
}

impl GeoOverride {
    /// Minimal persisted form of the document.
    pub fn serialize(&self) -> PersistedOverride {
        PersistedOverride {
            states: persist_list(&self.states),
            districts: persist_map(&self.districts, |list| persist_list(list)),
            cities: persist_map(&self.cities, |by_district| {
                persist_map(by_district, |list| persist_list(list))
            }),
            remove: PersistedHidden {
                states: persist_set(&self.hidden.states),
                districts: persist_map(&self.hidden.districts, persist_set),
                cities: persist_map(&self.hidden.cities, |by_district| {
                    persist_map(by_district, persist_set)
                }),
            },
        }
    }

    /// The persisted form as JSON, ready to be written under `"geo.custom"`.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self.serialize()).unwrap_or_else(|_| Value::Object(Default::default()))
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.serialize())?)
    }
}

fn persist_list(list: &[Entry]) -> Vec<PersistedEntry> {
    list.iter()
        .filter(|e| !e.is_draft())
        .map(|e| PersistedEntry {
            code: e.code.trim().to_owned(),
            name_en: e.name_en.clone(),
            name_hi: e.name_hi.clone(),
        })
        .collect()
}

fn persist_set(set: &BTreeSet<String>) -> Vec<String> {
    set.iter().filter(|c| !c.trim().is_empty()).cloned().collect()
}

trait IsEmpty {
    fn is_empty(&self) -> bool;
}

impl<T> IsEmpty for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<K, V> IsEmpty for BTreeMap<K, V> {
    fn is_empty(&self) -> bool {
        BTreeMap::is_empty(self)
    }
}

/// Maps every value, then drops blank keys and values that came out empty.
fn persist_map<V, P, F>(map: &BTreeMap<String, V>, f: F) -> BTreeMap<String, P>
where
    F: Fn(&V) -> P,
    P: IsEmpty,
{
    map.iter()
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.clone(), f(value)))
        .filter(|(_, persisted)| !persisted.is_empty())
        .collect()
}
