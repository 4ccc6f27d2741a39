use geoverride_core::{BaseDirectory, EntryPatch, GeoOverride, Origin, ResolvedDirectory, Scope};
use std::path::Path;

const BASE_JSON: &str = r#"{
    "states": [
        {"code": "RJ", "nameEn": "Rajasthan", "nameHi": "राजस्थान"},
        {"code": "GJ", "nameEn": "Gujarat"}
    ],
    "districts": {
        "RJ": [{"code": "RJ-01", "nameEn": "Jaipur"}, {"code": "RJ-02", "nameEn": "Ajmer"}]
    },
    "cities": {
        "RJ": {"RJ-01": [{"code": "JP-1", "nameEn": "Sanganer"}]}
    }
}"#;

fn write_base(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("base.json");
    std::fs::write(&path, BASE_JSON).unwrap();
    path
}

#[test]
fn loads_plain_json() {
    let tmp = tempfile::tempdir().unwrap();
    let base = BaseDirectory::load_from_path(write_base(tmp.path())).unwrap();
    assert_eq!(base.states().len(), 2);
    assert_eq!(base.districts("RJ").len(), 2);
    assert_eq!(base.cities("RJ", "RJ-01")[0].code, "JP-1");
    assert!(base.cities("GJ", "GJ-01").is_empty());
}

#[cfg(feature = "compact")]
#[test]
fn loads_gzipped_json() {
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("base.json.gz");
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(BASE_JSON.as_bytes()).unwrap();
    std::fs::write(&path, enc.finish().unwrap()).unwrap();

    let base = BaseDirectory::load_from_path(&path).unwrap();
    assert_eq!(base.states()[0].name_hi, "राजस्थान");
}

#[test]
fn missing_file_is_not_found() {
    let err = BaseDirectory::load_from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, geoverride_core::GeoOverrideError::NotFound(_)));
}

#[test]
fn cached_load_writes_and_reuses_snapshot() {
    let tmp = tempfile::tempdir().unwrap();
    let json = write_base(tmp.path());

    let first = BaseDirectory::load_cached(&json).unwrap();
    let snapshot = tmp.path().join(format!(
        "base.json.{}",
        geoverride_core::directory::SNAPSHOT_SUFFIX
    ));
    assert!(snapshot.exists());

    let from_snapshot = BaseDirectory::read_snapshot(&snapshot).unwrap();
    assert_eq!(from_snapshot, first);
    assert_eq!(BaseDirectory::load_cached(&json).unwrap(), first);
}

#[test]
fn resolved_view_over_loaded_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let base = BaseDirectory::load_from_path(write_base(tmp.path())).unwrap();

    let mut doc = GeoOverride::new();
    doc.hide_code(&Scope::districts("RJ"), "RJ-02");
    doc.insert(
        &Scope::districts("RJ"),
        EntryPatch::code("RJ-35").with_name_en("Kotputli"),
    )
    .unwrap();

    let view = ResolvedDirectory::new(&base, &doc);
    let districts = view.districts("RJ");
    let codes: Vec<_> = districts.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, ["RJ-01", "RJ-35"]);
    assert_eq!(districts[1].origin, Origin::Custom);

    let stats = view.stats();
    assert_eq!((stats.states, stats.districts, stats.cities), (2, 2, 1));

    let hits = view.find_by_name("sanganer");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].scope, Scope::cities("RJ", "RJ-01"));
}

fn set_mtime(path: &Path, time: std::time::SystemTime) {
    std::fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

fn mtime(path: &Path) -> std::time::SystemTime {
    std::fs::metadata(path).unwrap().modified().unwrap()
}

const EDITED_JSON: &str = r#"{"states": [{"code": "MP", "nameEn": "Madhya Pradesh"}]}"#;

#[test]
fn cached_load_refreshes_a_stale_snapshot() {
    let tmp = tempfile::tempdir().unwrap();
    let json = write_base(tmp.path());
    let snapshot = tmp.path().join(format!(
        "base.json.{}",
        geoverride_core::directory::SNAPSHOT_SUFFIX
    ));
    assert_eq!(BaseDirectory::load_cached(&json).unwrap().states().len(), 2);

    std::fs::write(&json, EDITED_JSON).unwrap();
    set_mtime(&json, mtime(&snapshot) + std::time::Duration::from_secs(60));

    let reloaded = BaseDirectory::load_cached(&json).unwrap();
    assert_eq!(reloaded.states().len(), 1);
    assert_eq!(reloaded.states()[0].code, "MP");
    assert_eq!(BaseDirectory::read_snapshot(&snapshot).unwrap(), reloaded);
}

#[test]
fn snapshot_with_the_same_mtime_is_not_trusted() {
    let tmp = tempfile::tempdir().unwrap();
    let json = write_base(tmp.path());
    let snapshot = tmp.path().join(format!(
        "base.json.{}",
        geoverride_core::directory::SNAPSHOT_SUFFIX
    ));
    BaseDirectory::load_cached(&json).unwrap();

    std::fs::write(&json, EDITED_JSON).unwrap();
    set_mtime(&json, mtime(&snapshot));

    assert_eq!(BaseDirectory::load_cached(&json).unwrap().states()[0].code, "MP");
}
