// crates/geoverride-core/src/normalize.rs

//! # Loading persisted overrides
//!
//! Settings blobs are edited by hand and by older consoles, so loading is
//! forgiving: anything of the wrong shape is treated as empty and logged at
//! `debug` level. Loading never fails on structure.
//!
//! Rules:
//! - non-object roots/maps and non-array lists become empty;
//! - entries need a non-blank `code` (string or number), others are dropped;
//! - all strings are trimmed;
//! - the first entry wins when a sibling list repeats a code;
//! - blank map keys are dropped.

use crate::error::Result;
use crate::model::{GeoOverride, Scope};
use crate::persist::PersistedOverride;
use serde_json::{Map, Value};
use tracing::debug;

impl GeoOverride {
    /// Builds a document from any JSON value, coercing malformed parts to empty.
    pub fn from_value(raw: &Value) -> Self {
        let mut doc = GeoOverride::new();
        let Some(root) = as_object(Some(raw), "override root") else {
            return doc;
        };

        for item in as_array(root.get("states"), "states") {
            doc.push_normalized(&Scope::States, item);
        }

        for (state, list) in keyed(root.get("districts"), "districts") {
            let scope = Scope::districts(state);
            for item in as_array(Some(list), "district list") {
                doc.push_normalized(&scope, item);
            }
        }

        for (state, by_district) in keyed(root.get("cities"), "cities") {
            for (district, list) in keyed(Some(by_district), "city districts") {
                let scope = Scope::cities(state.clone(), district);
                for item in as_array(Some(list), "city list") {
                    doc.push_normalized(&scope, item);
                }
            }
        }

        if let Some(remove) = as_object(root.get("remove"), "remove") {
            for code in codes(remove.get("states"), "hidden states") {
                doc.hide_code(&Scope::States, &code);
            }
            for (state, list) in keyed(remove.get("districts"), "hidden districts") {
                let scope = Scope::districts(state);
                for code in codes(Some(list), "hidden district list") {
                    doc.hide_code(&scope, &code);
                }
            }
            for (state, by_district) in keyed(remove.get("cities"), "hidden cities") {
                for (district, list) in keyed(Some(by_district), "hidden city districts") {
                    let scope = Scope::cities(state.clone(), district);
                    for code in codes(Some(list), "hidden city list") {
                        doc.hide_code(&scope, &code);
                    }
                }
            }
        }

        doc.prune();
        doc
    }

    /// Parses JSON text. Fails only if the text is not JSON at all.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(s)?;
        Ok(Self::from_value(&raw))
    }

    pub fn from_persisted(persisted: &PersistedOverride) -> Self {
        match serde_json::to_value(persisted) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::new(),
        }
    }

    fn push_normalized(&mut self, scope: &Scope, item: &Value) {
        let Some(fields) = as_object(Some(item), "entry") else {
            return;
        };
        let Some(code) = fields.get("code").and_then(code_of) else {
            debug!(scope = %scope, "dropping entry without code");
            return;
        };
        if self.find_by_code(scope, &code).is_some() {
            debug!(scope = %scope, code = %code, "dropping duplicate code");
            return;
        }

        let name_en = text_of(fields.get("nameEn"));
        let name_hi = text_of(fields.get("nameHi"));
        let entry = self.new_entry(code, name_en, name_hi);
        self.list_or_insert(scope).push(entry);
    }
}

fn as_object<'a>(value: Option<&'a Value>, what: &str) -> Option<&'a Map<String, Value>> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(other) => {
            debug!(what, kind = kind_of(other), "expected an object, treating as empty");
            None
        }
    }
}

fn as_array<'a>(value: Option<&'a Value>, what: &str) -> &'a [Value] {
    match value {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items,
        Some(other) => {
            debug!(what, kind = kind_of(other), "expected an array, treating as empty");
            &[]
        }
    }
}

/// Object members with trimmed, non-blank keys.
fn keyed<'a>(value: Option<&'a Value>, what: &str) -> Vec<(String, &'a Value)> {
    as_object(value, what)
        .map(|map| {
            map.iter()
                .map(|(k, v)| (k.trim().to_owned(), v))
                .filter(|(k, _)| !k.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn codes(value: Option<&Value>, what: &str) -> Vec<String> {
    as_array(value, what).iter().filter_map(code_of).collect()
}

fn code_of(value: &Value) -> Option<String> {
    let code = match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!code.is_empty()).then_some(code)
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_owned(),
        _ => String::new(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_root_is_empty() {
        for raw in [json!(null), json!([1, 2]), json!("geo"), json!(42)] {
            assert!(GeoOverride::from_value(&raw).is_empty(), "{raw}");
        }
    }

    #[test]
    fn wrong_shapes_are_coerced() {
        let raw = json!({
            "states": {"RJ": "not a list"},
            "districts": [],
            "cities": {"RJ": ["not a map"]},
            "remove": "nope"
        });
        assert!(GeoOverride::from_value(&raw).is_empty());
    }

    #[test]
    fn entries_are_trimmed_and_deduplicated() {
        let raw = json!({
            "states": [
                {"code": " RJ ", "nameEn": " Rajasthan "},
                {"code": "RJ", "nameEn": "Second"},
                {"code": "", "nameEn": "Draft"},
                {"nameEn": "No code"},
                "junk",
                {"code": 27, "nameHi": 5}
            ]
        });
        let doc = GeoOverride::from_value(&raw);
        let states = doc.states();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].code, "RJ");
        assert_eq!(states[0].name_en, "Rajasthan");
        assert_eq!(states[1].code, "27");
        assert_eq!(states[1].name_hi, "");
    }

    #[test]
    fn hidden_codes_ignore_blanks_and_duplicates() {
        let raw = json!({
            "remove": {
                "states": ["XX", " XX", "", null, 7],
                "districts": {" ": ["D1"], "RJ": ["D1", "D1"]}
            }
        });
        let doc = GeoOverride::from_value(&raw);
        let hidden = doc.hidden();
        assert_eq!(hidden.states.len(), 2);
        assert!(hidden.states.contains("7"));
        assert_eq!(hidden.districts.len(), 1);
        assert_eq!(hidden.districts["RJ"].len(), 1);
    }

    #[test]
    fn invalid_json_text_is_an_error() {
        assert!(GeoOverride::from_json_str("{not json").is_err());
        assert!(GeoOverride::from_json_str("[]").unwrap().is_empty());
    }
}
