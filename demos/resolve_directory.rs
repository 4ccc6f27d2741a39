//! Resolved view example for geoverride-rs
//!
//! Applies an override document to a small base directory and searches it.

use geoverride_core::prelude::*;
use geoverride_core::DirectoryEntry;

fn main() -> Result<()> {
    println!("=== geoverride-rs Resolved View Example ===\n");

    let mut base = BaseDirectory::new();
    base.states = vec![
        DirectoryEntry::new("RJ", "Rajasthan").with_name_hi("राजस्थान"),
        DirectoryEntry::new("GJ", "Gujarat"),
    ];
    base.districts.insert(
        "RJ".into(),
        vec![
            DirectoryEntry::new("RJ-01", "Jaipur"),
            DirectoryEntry::new("RJ-33", "Old District"),
        ],
    );

    let mut doc = GeoOverride::new();
    doc.hide_code(&Scope::districts("RJ"), "RJ-33");
    doc.insert(
        &Scope::districts("RJ"),
        EntryPatch::code("RJ-35").with_name_en("Kotputli-Behror"),
    )?;

    let view = ResolvedDirectory::new(&base, &doc);
    for state in view.states() {
        println!("{} {} ({:?})", state.code, state.name_en, state.origin);
        for district in view.districts(&state.code) {
            println!("  - {} {} ({:?})", district.code, district.name_en, district.origin);
        }
    }

    println!("\nSearch 'kotputli':");
    for hit in view.find_by_name("kotputli") {
        println!("  [{}] {} {}", hit.scope, hit.entry.code, hit.entry.name_en);
    }

    let stats = view.stats();
    println!(
        "\nStates: {}, Districts: {}, Cities: {}",
        stats.states, stats.districts, stats.cities
    );
    Ok(())
}
