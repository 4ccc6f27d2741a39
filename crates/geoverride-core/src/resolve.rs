// crates/geoverride-core/src/resolve.rs

//! # Resolved view
//!
//! What the console shows: the base directory with an override document
//! applied. For every sibling list:
//!
//! 1. base entries whose code is hidden are dropped;
//! 2. base entries with a custom entry of the same code take the custom
//!    names (blank custom names fall back to the base names);
//! 3. custom entries with new codes are appended in document order.
//!
//! Drafts (custom entries without a code) never show up.

use crate::common::{DirectoryStats, Origin, ResolvedEntry, SearchHit};
use crate::directory::{BaseDirectory, DirectoryEntry};
use crate::model::{Entry, GeoOverride, Level, Scope};
use crate::text::contains_folded;
use std::collections::BTreeSet;

pub struct ResolvedDirectory<'a> {
    base: &'a BaseDirectory,
    overrides: &'a GeoOverride,
}

impl<'a> ResolvedDirectory<'a> {
    pub fn new(base: &'a BaseDirectory, overrides: &'a GeoOverride) -> Self {
        Self { base, overrides }
    }

    pub fn states(&self) -> Vec<ResolvedEntry> {
        self.resolve(&Scope::States, self.base.states())
    }

    pub fn districts(&self, state: &str) -> Vec<ResolvedEntry> {
        self.resolve(&Scope::districts(state), self.base.districts(state))
    }

    pub fn cities(&self, state: &str, district: &str) -> Vec<ResolvedEntry> {
        self.resolve(
            &Scope::cities(state, district),
            self.base.cities(state, district),
        )
    }

    /// Resolves any sibling list.
    pub fn entries(&self, scope: &Scope) -> Vec<ResolvedEntry> {
        match scope {
            Scope::States => self.states(),
            Scope::Districts { state } => self.districts(state),
            Scope::Cities { state, district } => self.cities(state, district),
        }
    }

    /// Accent- and case-insensitive name search over every visible entry.
    ///
    /// Matches the English or Hindi name. Results are ordered states first,
    /// then each state's districts and their cities.
    pub fn find_by_name(&self, query: &str) -> Vec<SearchHit> {
        let mut hits = Vec::new();
        if query.trim().is_empty() {
            return hits;
        }
        let matches = |e: &ResolvedEntry| {
            contains_folded(&e.name_en, query) || contains_folded(&e.name_hi, query)
        };

        self.walk(|scope, entry| {
            if matches(entry) {
                hits.push(SearchHit {
                    level: scope.level(),
                    scope: scope.clone(),
                    entry: entry.clone(),
                });
            }
        });
        hits
    }

    pub fn stats(&self) -> DirectoryStats {
        let mut stats = DirectoryStats::default();
        self.walk(|scope, _| match scope.level() {
            Level::State => stats.states += 1,
            Level::District => stats.districts += 1,
            Level::City => stats.cities += 1,
        });
        stats
    }

    /// Visits every visible entry, depth-first below visible parents only.
    fn walk<F: FnMut(&Scope, &ResolvedEntry)>(&self, mut visit: F) {
        for state in self.states() {
            visit(&Scope::States, &state);
            let district_scope = Scope::districts(state.code.clone());
            for district in self.districts(&state.code) {
                visit(&district_scope, &district);
                let city_scope = Scope::cities(state.code.clone(), district.code.clone());
                for city in self.cities(&state.code, &district.code) {
                    visit(&city_scope, &city);
                }
            }
        }
    }

    fn resolve(&self, scope: &Scope, base: &[DirectoryEntry]) -> Vec<ResolvedEntry> {
        let custom = self.overrides.entries(scope);
        let empty = BTreeSet::new();
        let hidden = self.overrides.hidden().get(scope).unwrap_or(&empty);

        let mut out: Vec<ResolvedEntry> = base
            .iter()
            .filter(|b| !hidden.contains(&b.code))
            .map(|b| match custom.iter().find(|c| c.code == b.code) {
                Some(c) => ResolvedEntry {
                    code: b.code.clone(),
                    name_en: pick(&c.name_en, &b.name_en),
                    name_hi: pick(&c.name_hi, &b.name_hi),
                    origin: Origin::Overridden,
                },
                None => ResolvedEntry::from_base(b),
            })
            .collect();

        out.extend(
            custom
                .iter()
                .filter(|c| !c.is_draft())
                .filter(|c| !base.iter().any(|b| b.code == c.code))
                .map(ResolvedEntry::from_custom),
        );
        out
    }
}

fn pick(custom: &str, base: &str) -> String {
    if custom.is_empty() {
        base.to_owned()
    } else {
        custom.to_owned()
    }
}

impl ResolvedEntry {
    fn from_base(b: &DirectoryEntry) -> Self {
        Self {
            code: b.code.clone(),
            name_en: b.name_en.clone(),
            name_hi: b.name_hi.clone(),
            origin: Origin::Base,
        }
    }

    fn from_custom(c: &Entry) -> Self {
        Self {
            code: c.code.clone(),
            name_en: c.name_en.clone(),
            name_hi: c.name_hi.clone(),
            origin: Origin::Custom,
        }
    }
}
