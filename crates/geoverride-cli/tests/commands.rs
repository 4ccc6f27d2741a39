use clap::Parser;
use geoverride_cli::args::CliArgs;
use serde_json::{json, Value};
use std::path::Path;

/// Runs against `settings` with an empty config next to it, so the user's
/// own config file never leaks into the test.
fn run(settings: &Path, argv: &[&str]) -> anyhow::Result<String> {
    let config = settings.with_file_name("config.toml");
    if !config.exists() {
        std::fs::write(&config, "").unwrap();
    }
    let mut full = vec![
        "geoverride",
        "--config",
        config.to_str().unwrap(),
        "--file",
        settings.to_str().unwrap(),
    ];
    full.extend_from_slice(argv);
    let args = CliArgs::try_parse_from(full)?;
    let mut out = Vec::new();
    geoverride_cli::run(args, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn stored(settings: &Path) -> Value {
    let text = std::fs::read_to_string(settings).unwrap();
    let doc: Value = serde_json::from_str(&text).unwrap();
    doc["geo.custom"].clone()
}

#[test]
fn add_rename_and_hide_round_trip_through_the_file() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = tmp.path().join("settings.json");
    std::fs::write(&settings, r#"{"site.title": "Samaj"}"#).unwrap();

    run(&settings, &["add-state", "--code", "RJ", "--name-en", "Rajasthan"]).unwrap();
    run(&settings, &["add-district", "RJ", "--code", "RJ-35", "--name-en", "Kotputli"]).unwrap();
    run(&settings, &["hide", "districts:RJ", "RJ-33"]).unwrap();
    run(&settings, &["rename", "states", "RJ", "RAJ"]).unwrap();

    assert_eq!(
        stored(&settings),
        json!({
            "states": [{"code": "RAJ", "nameEn": "Rajasthan"}],
            "districts": {"RAJ": [{"code": "RJ-35", "nameEn": "Kotputli"}]},
            "remove": {"districts": {"RAJ": ["RJ-33"]}}
        })
    );

    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&settings).unwrap()).unwrap();
    assert_eq!(raw["site.title"], "Samaj");
}

#[test]
fn hiding_twice_reports_and_keeps_one_entry() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = tmp.path().join("settings.json");

    run(&settings, &["hide", "states", "GJ"]).unwrap();
    let second = run(&settings, &["hide", "states", "GJ"]).unwrap();
    assert!(second.contains("already hidden"));
    assert_eq!(stored(&settings)["remove"]["states"], json!(["GJ"]));
}

#[test]
fn unknown_code_is_an_error_and_nothing_is_written() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = tmp.path().join("settings.json");

    let err = run(&settings, &["remove", "states", "XX"]).unwrap_err();
    assert!(err.to_string().contains("no custom entry"));
    assert!(!settings.exists());
}

#[test]
fn bad_scope_is_rejected_by_the_parser() {
    assert!(CliArgs::try_parse_from(["geoverride", "hide", "provinces", "X"]).is_err());
    assert!(CliArgs::try_parse_from(["geoverride", "hide", "cities:RJ", "X"]).is_err());
}

#[test]
fn resolved_and_search_use_the_base_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = tmp.path().join("settings.json");
    let base = tmp.path().join("base.json");
    std::fs::write(
        &base,
        r#"{"states": [{"code": "RJ", "nameEn": "Rajasthan"}, {"code": "GJ", "nameEn": "Gujarat"}]}"#,
    )
    .unwrap();

    run(&settings, &["hide", "states", "GJ"]).unwrap();
    run(&settings, &["add-state", "--code", "MP", "--name-en", "Madhya Pradesh"]).unwrap();

    let base_arg = base.to_str().unwrap();
    let listed = run(&settings, &["--base", base_arg, "resolved"]).unwrap();
    assert_eq!(listed, "RJ Rajasthan\nMP Madhya Pradesh (custom)\n");

    let found = run(&settings, &["--base", base_arg, "search", "pradesh"]).unwrap();
    assert_eq!(found, "[states] MP Madhya Pradesh (custom)\n");

    let stats = run(&settings, &["--base", base_arg, "stats"]).unwrap();
    assert!(stats.contains("States: 2"));
}
