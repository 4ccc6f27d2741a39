//! Editing example for geoverride-rs
//!
//! Loads an override from an in-memory settings store, renames a state and
//! saves the whole document back.

use geoverride_core::prelude::*;
use geoverride_core::{MemorySettingsStore, GEO_CUSTOM_KEY};
use serde_json::json;

fn main() -> Result<()> {
    println!("=== geoverride-rs Editing Example ===\n");

    let mut settings = geoverride_core::SettingsDocument::new();
    settings.insert(
        GEO_CUSTOM_KEY.to_owned(),
        json!({
            "states": [{"code": "RJ", "nameEn": "Rajasthan"}],
            "districts": {"RJ": [{"code": "RJ-01", "nameEn": "Jaipur"}]}
        }),
    );
    let store = MemorySettingsStore::with_document(settings);

    let mut doc = load_override(&store)?;
    println!("Loaded: {}", doc.to_value());

    // Example 1: rename a state, districts follow
    if let Some(id) = doc.find_by_code(&Scope::States, "RJ").map(|e| e.id()) {
        doc.update_entry(&Scope::States, id, EntryPatch::code("RAJ"))?;
    }
    println!("After rename: {}", doc.to_value());

    // Example 2: hide a base district, twice
    let scope = Scope::districts("RAJ");
    println!("hide RJ-33 -> changed: {}", doc.hide_code(&scope, "RJ-33"));
    println!("hide RJ-33 -> changed: {}", doc.hide_code(&scope, "RJ-33"));

    // Example 3: a conflicting code is rejected and nothing changes
    match doc.insert(&Scope::States, EntryPatch::code("RAJ")) {
        Ok(_) => println!("unexpectedly accepted a duplicate"),
        Err(e) => println!("rejected: {e}"),
    }

    save_override(&store, &doc)?;
    println!("\nSaved settings: {}", serde_json::Value::Object(store.snapshot()));
    Ok(())
}
