// crates/geoverride-core/src/reconcile.rs

//! # Editing operations
//!
//! Every edit keeps the document consistent with its keying rules:
//!
//! - codes are unique among siblings (blank drafts excepted);
//! - renaming a code moves every map keyed by it (custom children and
//!   hidden children) to the new code;
//! - removing an entry drops every map keyed by its code.
//!
//! Hidden codes at the *same* level as a renamed entry are left alone: they
//! name base directory entries, not custom ones.

use crate::error::{GeoOverrideError, Result};
use crate::model::{Entry, EntryId, EntryPatch, GeoOverride, Scope};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

impl GeoOverride {
    // -----------------------------------------------------------------------
    // ADDING
    // -----------------------------------------------------------------------

    /// Appends a blank state and returns its id.
    pub fn add_state(&mut self) -> EntryId {
        let entry = self.new_entry(String::new(), String::new(), String::new());
        let id = entry.id;
        self.states.push(entry);
        id
    }

    /// Appends a blank district under `state`. No-op for a blank state code.
    pub fn add_district(&mut self, state: &str) -> Option<EntryId> {
        self.add(&Scope::districts(state))
    }

    /// Appends a blank city under `state`/`district`. No-op for blank keys.
    pub fn add_city(&mut self, state: &str, district: &str) -> Option<EntryId> {
        self.add(&Scope::cities(state, district))
    }

    /// Appends a blank entry to any scope.
    pub fn add(&mut self, scope: &Scope) -> Option<EntryId> {
        if !scope.has_parent_keys() {
            return None;
        }
        let entry = self.new_entry(String::new(), String::new(), String::new());
        let id = entry.id;
        self.list_or_insert(scope).push(entry);
        Some(id)
    }

    /// Adds an entry and fills it from `patch` in one step.
    ///
    /// If the patch is rejected the blank entry is rolled back, so the
    /// document is left as it was.
    pub fn insert(&mut self, scope: &Scope, patch: EntryPatch) -> Result<EntryId> {
        let id = self.add(scope).ok_or_else(|| {
            GeoOverrideError::InvalidData(format!("scope '{scope}' has a blank parent code"))
        })?;
        if let Err(e) = self.update_entry(scope, id, patch) {
            self.remove_entry(scope, id);
            return Err(e);
        }
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // READING
    // -----------------------------------------------------------------------

    /// Entries of one sibling list; empty when nothing was added there.
    pub fn entries(&self, scope: &Scope) -> &[Entry] {
        self.list(scope).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entry(&self, scope: &Scope, id: EntryId) -> Option<&Entry> {
        self.entries(scope).iter().find(|e| e.id == id)
    }

    pub fn find_by_code(&self, scope: &Scope, code: &str) -> Option<&Entry> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        self.entries(scope).iter().find(|e| e.code == code)
    }

    pub fn is_hidden(&self, scope: &Scope, code: &str) -> bool {
        self.hidden
            .get(scope)
            .is_some_and(|set| set.contains(code.trim()))
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
            && self.districts.values().all(Vec::is_empty)
            && self
                .cities
                .values()
                .all(|m| m.values().all(Vec::is_empty))
            && self.hidden.is_empty()
    }

    // -----------------------------------------------------------------------
    // UPDATING
    // -----------------------------------------------------------------------

    /// Merges `patch` into the entry `id` of `scope`.
    ///
    /// A code change rekeys the entry's descendant maps (custom and hidden)
    /// from the old code to the new one. On error nothing is modified.
    pub fn update_entry(&mut self, scope: &Scope, id: EntryId, patch: EntryPatch) -> Result<&Entry> {
        let scope = &scope.normalized();
        let level = scope.level().as_str();
        let not_found = || GeoOverrideError::EntryNotFound { level, id: id.get() };

        let siblings = self.list(scope).ok_or_else(not_found)?;
        let pos = siblings
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(not_found)?;
        let old_code = siblings[pos].code.clone();
        let new_code = patch.code.as_deref().map(|c| c.trim().to_owned());

        let rename = match new_code {
            Some(ref code) if *code != old_code => {
                if !code.is_empty() && siblings.iter().any(|e| e.id != id && e.code == *code) {
                    return Err(GeoOverrideError::DuplicateCode {
                        level,
                        code: code.clone(),
                    });
                }
                if code.is_empty() && self.has_descendants(scope, &old_code) {
                    return Err(GeoOverrideError::BlankCode {
                        level,
                        code: old_code,
                    });
                }
                Some(code.clone())
            }
            _ => None,
        };

        if let Some(ref code) = rename {
            if !old_code.trim().is_empty() && !code.is_empty() {
                self.rekey_descendants(scope, &old_code, code);
            }
        }

        let entry = self
            .list_mut(scope)
            .and_then(|list| list.get_mut(pos))
            .ok_or_else(not_found)?;
        if let Some(code) = rename {
            entry.code = code;
        }
        if let Some(name) = patch.name_en {
            entry.name_en = name.trim().to_owned();
        }
        if let Some(name) = patch.name_hi {
            entry.name_hi = name.trim().to_owned();
        }
        Ok(&*entry)
    }

    /// `true` if any custom or hidden map is keyed by `code` below `scope`.
    fn has_descendants(&self, scope: &Scope, code: &str) -> bool {
        if code.trim().is_empty() {
            return false;
        }
        match scope {
            Scope::States => {
                self.districts.get(code).is_some_and(|l| !l.is_empty())
                    || self
                        .cities
                        .get(code)
                        .is_some_and(|m| m.values().any(|l| !l.is_empty()))
                    || self.hidden.districts.get(code).is_some_and(|s| !s.is_empty())
                    || self
                        .hidden
                        .cities
                        .get(code)
                        .is_some_and(|m| m.values().any(|s| !s.is_empty()))
            }
            Scope::Districts { state } => {
                self.cities
                    .get(state)
                    .and_then(|m| m.get(code))
                    .is_some_and(|l| !l.is_empty())
                    || self
                        .hidden
                        .cities
                        .get(state)
                        .and_then(|m| m.get(code))
                        .is_some_and(|s| !s.is_empty())
            }
            Scope::Cities { .. } => false,
        }
    }

    fn rekey_descendants(&mut self, scope: &Scope, old: &str, new: &str) {
        match scope {
            Scope::States => {
                if let Some(moved) = self.districts.remove(old) {
                    debug!(from = old, to = new, count = moved.len(), "rekey districts");
                    merge_entries(self.districts.entry(new.to_owned()).or_default(), moved);
                }
                if let Some(moved) = self.cities.remove(old) {
                    debug!(from = old, to = new, "rekey cities");
                    let target = self.cities.entry(new.to_owned()).or_default();
                    for (district, list) in moved {
                        merge_entries(target.entry(district).or_default(), list);
                    }
                }
                if let Some(moved) = self.hidden.districts.remove(old) {
                    debug!(from = old, to = new, "rekey hidden districts");
                    self.hidden
                        .districts
                        .entry(new.to_owned())
                        .or_default()
                        .extend(moved);
                }
                if let Some(moved) = self.hidden.cities.remove(old) {
                    debug!(from = old, to = new, "rekey hidden cities");
                    merge_hidden_map(self.hidden.cities.entry(new.to_owned()).or_default(), moved);
                }
            }
            Scope::Districts { state } => {
                if let Some(by_district) = self.cities.get_mut(state) {
                    if let Some(moved) = by_district.remove(old) {
                        debug!(state = %state, from = old, to = new, "rekey cities");
                        merge_entries(by_district.entry(new.to_owned()).or_default(), moved);
                    }
                }
                if let Some(by_district) = self.hidden.cities.get_mut(state) {
                    if let Some(moved) = by_district.remove(old) {
                        debug!(state = %state, from = old, to = new, "rekey hidden cities");
                        by_district.entry(new.to_owned()).or_default().extend(moved);
                    }
                }
            }
            Scope::Cities { .. } => {}
        }
        self.prune();
    }

    // -----------------------------------------------------------------------
    // REMOVING
    // -----------------------------------------------------------------------

    /// Removes the entry and every custom or hidden map keyed by its code.
    pub fn remove_entry(&mut self, scope: &Scope, id: EntryId) -> Option<Entry> {
        let scope = &scope.normalized();
        let list = self.list_mut(scope)?;
        let pos = list.iter().position(|e| e.id == id)?;
        let removed = list.remove(pos);

        let code = removed.code.as_str();
        if !code.is_empty() {
            match scope {
                Scope::States => {
                    self.districts.remove(code);
                    self.cities.remove(code);
                    self.hidden.districts.remove(code);
                    self.hidden.cities.remove(code);
                }
                Scope::Districts { state } => {
                    if let Some(by_district) = self.cities.get_mut(state) {
                        by_district.remove(code);
                    }
                    if let Some(by_district) = self.hidden.cities.get_mut(state) {
                        by_district.remove(code);
                    }
                }
                Scope::Cities { .. } => {}
            }
            debug!(scope = %scope, code, "removed entry with descendants");
        }
        self.prune();
        Some(removed)
    }

    // -----------------------------------------------------------------------
    // HIDDEN CODES
    // -----------------------------------------------------------------------

    /// Marks a base directory code as hidden. Returns `false` if it already was.
    pub fn hide_code(&mut self, scope: &Scope, code: &str) -> bool {
        let code = code.trim();
        if code.is_empty() || !scope.has_parent_keys() {
            return false;
        }
        self.hidden.get_or_insert(scope).insert(code.to_owned())
    }

    /// Un-hides a code. Returns `false` if it was not hidden.
    pub fn unhide_code(&mut self, scope: &Scope, code: &str) -> bool {
        let code = code.trim();
        let removed = self
            .hidden
            .get_mut(scope)
            .is_some_and(|set| set.remove(code));
        if removed {
            self.hidden.prune();
        }
        removed
    }
}

/// Appends `moved` to `target`, skipping codes `target` already has.
fn merge_entries(target: &mut Vec<Entry>, moved: Vec<Entry>) {
    for entry in moved {
        if entry.is_draft() || !target.iter().any(|e| e.code == entry.code) {
            target.push(entry);
        }
    }
}

fn merge_hidden_map(
    target: &mut BTreeMap<String, BTreeSet<String>>,
    moved: BTreeMap<String, BTreeSet<String>>,
) {
    for (district, codes) in moved {
        target.entry(district).or_default().extend(codes);
    }
}
