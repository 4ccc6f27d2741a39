//! geoverride-wasm — WebAssembly bindings for geoverride-core
//!
//! The admin console's Locations and Settings pages edit the `"geo.custom"`
//! override document in the browser. This crate gives them the same
//! reconciler the CLI uses, so renames and removals keep every dependent
//! map consistent.
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { GeoOverrideEditor } from 'geoverride-wasm';
//!
//! async function main() {
//!   await init();
//!   const settings = await (await fetch('/settings')).json();
//!   const editor = new GeoOverrideEditor(settings['geo.custom']);
//!
//!   const id = editor.addState();
//!   editor.updateEntry('states', id, { code: 'RJ', nameEn: 'Rajasthan' });
//!   editor.hideCode({ kind: 'districts', state: 'RJ' }, 'RJ-33');
//!
//!   await fetch('/settings', {
//!     method: 'PATCH',
//!     body: JSON.stringify({ 'geo.custom': editor.serialize() }),
//!   });
//! }
//! main();
//! ```
//!
//! Notes
//! -----
//! - Scopes are either strings (`"states"`, `"districts:RJ"`,
//!   `"cities:RJ/RJ-01"`) or objects (`{ kind: "cities", state, district }`).
//! - Entry ids are plain numbers, valid only for the editor that issued them.
//! - `serialize()` returns plain JS objects/arrays (no `Map`s), ready for
//!   `JSON.stringify`.
use geoverride_core::{EntryId, EntryPatch, GeoOverride, Scope};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"geoverride-wasm ready".into());
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryView<'a> {
    id: u64,
    code: &'a str,
    name_en: &'a str,
    name_hi: &'a str,
}

/* --------------------------------------------------------------------------
   Editor
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub struct GeoOverrideEditor {
    doc: GeoOverride,
}

#[wasm_bindgen]
impl GeoOverrideEditor {
    /// Loads a persisted override. Anything malformed loads as empty.
    #[wasm_bindgen(constructor)]
    pub fn new(raw: JsValue) -> GeoOverrideEditor {
        let value: Value = if raw.is_undefined() || raw.is_null() {
            Value::Null
        } else if let Some(text) = raw.as_string() {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        } else {
            serde_wasm_bindgen::from_value(raw).unwrap_or(Value::Null)
        };
        GeoOverrideEditor {
            doc: GeoOverride::from_value(&value),
        }
    }

    #[wasm_bindgen(js_name = addState)]
    pub fn add_state(&mut self) -> f64 {
        self.doc.add_state().get() as f64
    }

    #[wasm_bindgen(js_name = addDistrict)]
    pub fn add_district(&mut self, state: &str) -> Option<f64> {
        self.doc.add_district(state).map(|id| id.get() as f64)
    }

    #[wasm_bindgen(js_name = addCity)]
    pub fn add_city(&mut self, state: &str, district: &str) -> Option<f64> {
        self.doc.add_city(state, district).map(|id| id.get() as f64)
    }

    /// Merges `{ code?, nameEn?, nameHi? }` into an entry.
    #[wasm_bindgen(js_name = updateEntry)]
    pub fn update_entry(&mut self, scope: JsValue, id: f64, patch: JsValue) -> Result<(), JsError> {
        let scope = parse_scope(scope)?;
        let patch: EntryPatch = serde_wasm_bindgen::from_value(patch)
            .map_err(|e| JsError::new(&format!("invalid patch: {e}")))?;
        self.doc
            .update_entry(&scope, entry_id(id), patch)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(())
    }

    #[wasm_bindgen(js_name = removeEntry)]
    pub fn remove_entry(&mut self, scope: JsValue, id: f64) -> Result<bool, JsError> {
        let scope = parse_scope(scope)?;
        Ok(self.doc.remove_entry(&scope, entry_id(id)).is_some())
    }

    #[wasm_bindgen(js_name = hideCode)]
    pub fn hide_code(&mut self, scope: JsValue, code: &str) -> Result<bool, JsError> {
        Ok(self.doc.hide_code(&parse_scope(scope)?, code))
    }

    #[wasm_bindgen(js_name = unhideCode)]
    pub fn unhide_code(&mut self, scope: JsValue, code: &str) -> Result<bool, JsError> {
        Ok(self.doc.unhide_code(&parse_scope(scope)?, code))
    }

    #[wasm_bindgen(js_name = isHidden)]
    pub fn is_hidden(&self, scope: JsValue, code: &str) -> Result<bool, JsError> {
        Ok(self.doc.is_hidden(&parse_scope(scope)?, code))
    }

    /// `[{ id, code, nameEn, nameHi }]` of one sibling list, drafts included.
    pub fn entries(&self, scope: JsValue) -> Result<JsValue, JsError> {
        let scope = parse_scope(scope)?;
        let items: Vec<_> = self
            .doc
            .entries(&scope)
            .iter()
            .map(|e| EntryView {
                id: e.id().get(),
                code: &e.code,
                name_en: &e.name_en,
                name_hi: &e.name_hi,
            })
            .collect();
        to_js(&items)
    }

    /// Persisted shape, ready to be sent as `"geo.custom"`.
    pub fn serialize(&self) -> Result<JsValue, JsError> {
        to_js(&self.doc.serialize())
    }

    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }
}

/* --------------------------------------------------------------------------
   Helpers
-------------------------------------------------------------------------- */

fn parse_scope(scope: JsValue) -> Result<Scope, JsError> {
    let parsed = match scope.as_string() {
        Some(text) => text.parse::<Scope>().map_err(|e| e.to_string()),
        None => serde_wasm_bindgen::from_value::<Scope>(scope).map_err(|e| e.to_string()),
    };
    parsed.map_err(|e| JsError::new(&format!("invalid scope: {e}")))
}

fn entry_id(id: f64) -> EntryId {
    EntryId::from(id as u64)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}
