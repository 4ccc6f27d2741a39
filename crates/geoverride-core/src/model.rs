// crates/geoverride-core/src/model.rs
use crate::error::GeoOverrideError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Districts keyed by state code.
pub type DistrictMap = BTreeMap<String, Vec<Entry>>;
/// Cities keyed by state code, then district code.
pub type CityMap = BTreeMap<String, BTreeMap<String, Vec<Entry>>>;

/// In-memory identifier of an [`Entry`].
///
/// Ids are handed out by the owning [`GeoOverride`] and are never persisted:
/// a document loaded twice gets different ids for the same entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub(crate) u64);

impl EntryId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntryId {
    fn from(raw: u64) -> Self {
        EntryId(raw)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Depth in the states → districts → cities hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    State,
    District,
    City,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::State => "state",
            Level::District => "district",
            Level::City => "city",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Addresses one sibling list of the document: a level plus its parent keys.
///
/// Textual form (used by the CLI): `states`, `districts:RJ`,
/// `cities:RJ/RJ-01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Scope {
    States,
    Districts { state: String },
    Cities { state: String, district: String },
}

impl Scope {
    pub fn districts(state: impl Into<String>) -> Self {
        Scope::Districts {
            state: trimmed(state.into()),
        }
    }

    pub fn cities(state: impl Into<String>, district: impl Into<String>) -> Self {
        Scope::Cities {
            state: trimmed(state.into()),
            district: trimmed(district.into()),
        }
    }

    /// The same scope with trimmed parent keys.
    ///
    /// Document maps are always keyed by trimmed codes; the fields are public,
    /// so a scope built by hand or deserialized may still carry padding.
    pub fn normalized(&self) -> Scope {
        match self {
            Scope::States => Scope::States,
            Scope::Districts { state } => Scope::districts(state.as_str()),
            Scope::Cities { state, district } => Scope::cities(state.as_str(), district.as_str()),
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Scope::States => Level::State,
            Scope::Districts { .. } => Level::District,
            Scope::Cities { .. } => Level::City,
        }
    }

    /// `false` when a parent key is blank; such scopes never hold data.
    pub fn has_parent_keys(&self) -> bool {
        match self {
            Scope::States => true,
            Scope::Districts { state } => !state.trim().is_empty(),
            Scope::Cities { state, district } => {
                !state.trim().is_empty() && !district.trim().is_empty()
            }
        }
    }
}

fn trimmed(key: String) -> String {
    if key.trim().len() == key.len() {
        key
    } else {
        key.trim().to_owned()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::States => f.write_str("states"),
            Scope::Districts { state } => write!(f, "districts:{state}"),
            Scope::Cities { state, district } => write!(f, "cities:{state}/{district}"),
        }
    }
}

impl FromStr for Scope {
    type Err = GeoOverrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (kind, rest) = match s.split_once(':') {
            Some((kind, rest)) => (kind.trim(), Some(rest.trim())),
            None => (s, None),
        };

        match (kind, rest) {
            ("states", None) => Ok(Scope::States),
            ("districts", Some(state)) if !state.is_empty() => Ok(Scope::districts(state)),
            ("cities", Some(path)) => match path.split_once('/') {
                Some((state, district))
                    if !state.trim().is_empty() && !district.trim().is_empty() =>
                {
                    Ok(Scope::cities(state.trim(), district.trim()))
                }
                _ => Err(GeoOverrideError::InvalidData(format!(
                    "city scope must look like 'cities:STATE/DISTRICT', got '{s}'"
                ))),
            },
            _ => Err(GeoOverrideError::InvalidData(format!(
                "unknown scope '{s}' (expected 'states', 'districts:STATE' or 'cities:STATE/DISTRICT')"
            ))),
        }
    }
}

/// One custom state, district or city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub(crate) id: EntryId,
    pub code: String,
    pub name_en: String,
    pub name_hi: String,
}

impl Entry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// A draft has no code yet and is dropped on serialization.
    pub fn is_draft(&self) -> bool {
        self.code.trim().is_empty()
    }
}

/// Partial update merged into an [`Entry`] by [`GeoOverride::update_entry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryPatch {
    pub code: Option<String>,
    pub name_en: Option<String>,
    pub name_hi: Option<String>,
}

impl EntryPatch {
    pub fn code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    pub fn with_name_en(mut self, name: impl Into<String>) -> Self {
        self.name_en = Some(name.into());
        self
    }

    pub fn with_name_hi(mut self, name: impl Into<String>) -> Self {
        self.name_hi = Some(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.name_en.is_none() && self.name_hi.is_none()
    }
}

/// Codes of the base directory suppressed from display, per level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenCodes {
    pub states: BTreeSet<String>,
    pub districts: BTreeMap<String, BTreeSet<String>>,
    pub cities: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl HiddenCodes {
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.districts.is_empty() && self.cities.is_empty()
    }

    pub fn get(&self, scope: &Scope) -> Option<&BTreeSet<String>> {
        match scope {
            Scope::States => Some(&self.states),
            Scope::Districts { state } => self.districts.get(state.trim()),
            Scope::Cities { state, district } => self
                .cities
                .get(state.trim())
                .and_then(|m| m.get(district.trim())),
        }
    }

    pub(crate) fn get_mut(&mut self, scope: &Scope) -> Option<&mut BTreeSet<String>> {
        match scope {
            Scope::States => Some(&mut self.states),
            Scope::Districts { state } => self.districts.get_mut(state.trim()),
            Scope::Cities { state, district } => self
                .cities
                .get_mut(state.trim())
                .and_then(|m| m.get_mut(district.trim())),
        }
    }

    pub(crate) fn get_or_insert(&mut self, scope: &Scope) -> &mut BTreeSet<String> {
        match scope {
            Scope::States => &mut self.states,
            Scope::Districts { state } => {
                self.districts.entry(state.trim().to_owned()).or_default()
            }
            Scope::Cities { state, district } => self
                .cities
                .entry(state.trim().to_owned())
                .or_default()
                .entry(district.trim().to_owned())
                .or_default(),
        }
    }

    pub(crate) fn prune(&mut self) {
        self.districts.retain(|_, set| !set.is_empty());
        self.cities.retain(|_, by_district| {
            by_district.retain(|_, set| !set.is_empty());
            !by_district.is_empty()
        });
    }
}

/// The override document: custom entries at three levels plus hidden codes.
///
/// Districts and cities are keyed by their parent codes, which may belong to
/// either a custom entry or an entry of the base directory.
#[derive(Debug, Clone, Default)]
pub struct GeoOverride {
    pub(crate) states: Vec<Entry>,
    pub(crate) districts: DistrictMap,
    pub(crate) cities: CityMap,
    pub(crate) hidden: HiddenCodes,
    next_id: u64,
}

impl GeoOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> &[Entry] {
        &self.states
    }

    pub fn districts(&self) -> &DistrictMap {
        &self.districts
    }

    pub fn cities(&self) -> &CityMap {
        &self.cities
    }

    pub fn hidden(&self) -> &HiddenCodes {
        &self.hidden
    }

    pub(crate) fn fresh_id(&mut self) -> EntryId {
        self.next_id += 1;
        EntryId(self.next_id)
    }

    pub(crate) fn new_entry(&mut self, code: String, name_en: String, name_hi: String) -> Entry {
        Entry {
            id: self.fresh_id(),
            code,
            name_en,
            name_hi,
        }
    }

    // Parent keys are trimmed on every lookup so padded scopes address the
    // same lists as clean ones.

    pub(crate) fn list(&self, scope: &Scope) -> Option<&Vec<Entry>> {
        match scope {
            Scope::States => Some(&self.states),
            Scope::Districts { state } => self.districts.get(state.trim()),
            Scope::Cities { state, district } => self
                .cities
                .get(state.trim())
                .and_then(|m| m.get(district.trim())),
        }
    }

    pub(crate) fn list_mut(&mut self, scope: &Scope) -> Option<&mut Vec<Entry>> {
        match scope {
            Scope::States => Some(&mut self.states),
            Scope::Districts { state } => self.districts.get_mut(state.trim()),
            Scope::Cities { state, district } => self
                .cities
                .get_mut(state.trim())
                .and_then(|m| m.get_mut(district.trim())),
        }
    }

    pub(crate) fn list_or_insert(&mut self, scope: &Scope) -> &mut Vec<Entry> {
        match scope {
            Scope::States => &mut self.states,
            Scope::Districts { state } => {
                self.districts.entry(state.trim().to_owned()).or_default()
            }
            Scope::Cities { state, district } => self
                .cities
                .entry(state.trim().to_owned())
                .or_default()
                .entry(district.trim().to_owned())
                .or_default(),
        }
    }

    /// Drops empty sibling lists and empty maps left behind by edits.
    pub(crate) fn prune(&mut self) {
        self.districts.retain(|_, list| !list.is_empty());
        self.cities.retain(|_, by_district| {
            by_district.retain(|_, list| !list.is_empty());
            !by_district.is_empty()
        });
        self.hidden.prune();
    }
}
