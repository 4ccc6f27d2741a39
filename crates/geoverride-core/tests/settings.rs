use geoverride_core::{
    load_override, save_override, EntryPatch, FileSettingsStore, GeoOverride,
    MemorySettingsStore, Scope, SettingsDocument, SettingsStore, GEO_CUSTOM_KEY,
};
use serde_json::json;

fn document(value: serde_json::Value) -> SettingsDocument {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

#[test]
fn missing_key_loads_empty_document() {
    let store = MemorySettingsStore::with_document(document(json!({"site.title": "Samaj"})));
    assert!(load_override(&store).unwrap().is_empty());
}

#[test]
fn save_replaces_only_the_override_key() {
    let store = MemorySettingsStore::with_document(document(json!({
        "site.title": "Samaj",
        GEO_CUSTOM_KEY: {"states": [{"code": "OLD"}], "remove": {"states": ["X"]}}
    })));

    let mut doc = GeoOverride::new();
    doc.insert(&Scope::States, EntryPatch::code("RJ").with_name_en("Rajasthan"))
        .unwrap();
    save_override(&store, &doc).unwrap();

    let saved = store.snapshot();
    assert_eq!(saved["site.title"], "Samaj");
    assert_eq!(
        saved[GEO_CUSTOM_KEY],
        json!({"states": [{"code": "RJ", "nameEn": "Rajasthan"}]})
    );

    let reloaded = load_override(&store).unwrap();
    assert_eq!(reloaded.to_value(), doc.to_value());
}

#[test]
fn malformed_stored_value_loads_empty() {
    for bad in [json!(42), json!("not json"), json!(["RJ"])] {
        let store = MemorySettingsStore::with_document(document(json!({ GEO_CUSTOM_KEY: bad })));
        assert!(load_override(&store).unwrap().is_empty());
    }
}

#[test]
fn json_text_values_are_parsed() {
    let store = MemorySettingsStore::with_document(document(json!({
        GEO_CUSTOM_KEY: "{\"remove\":{\"states\":[\"GJ\"]}}"
    })));
    let doc = load_override(&store).unwrap();
    assert!(doc.is_hidden(&Scope::States, "GJ"));
}

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"site.title": "Samaj"}"#).unwrap();
    let store = FileSettingsStore::new(&path);

    let mut doc = load_override(&store).unwrap();
    doc.hide_code(&Scope::cities("RJ", "RJ-01"), "C9");
    save_override(&store, &doc).unwrap();

    let raw = store.fetch().unwrap();
    assert_eq!(raw["site.title"], "Samaj");
    let again = load_override(&store).unwrap();
    assert!(again.is_hidden(&Scope::cities("RJ", "RJ-01"), "C9"));
}

#[test]
fn file_store_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSettingsStore::new(dir.path().join("absent.json"));
    assert!(store.fetch().unwrap().is_empty());
}
