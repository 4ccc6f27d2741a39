// crates/geoverride-core/src/config.rs

//! Console configuration, read from `~/.geoverride/config.toml`.
//!
//! ```toml
//! [api]
//! base_url = "https://admin.example.org/api"
//! token = "${GEOVERRIDE_TOKEN}"
//!
//! [directory]
//! path = "/srv/geo/base.json.gz"
//! ```
//!
//! `${VAR}` references are expanded from the environment.

use crate::error::{GeoOverrideError, Result};
use crate::session::Session;
use serde::Deserialize;
use std::{env, path::Path, path::PathBuf};

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "GEOVERRIDE_CONFIG";

#[derive(Debug, Default, Deserialize)]
pub struct ConsoleConfig {
    pub api: Option<ApiConfig>,
    pub directory: Option<DirectoryConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DirectoryConfig {
    pub path: Option<String>,
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&env::var(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

impl ConsoleConfig {
    /// Loads the default config file, if any.
    ///
    /// A missing file gives the defaults; a file that cannot be read or
    /// parsed is logged and ignored.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Ignoring config at {:?}: {}", path, err);
                Self::default()
            }
        }
    }

    /// Loads an explicitly requested config file. Any failure is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GeoOverrideError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| GeoOverrideError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| GeoOverrideError::Config(e.to_string()))
    }

    /// `$GEOVERRIDE_CONFIG`, else `~/.geoverride/config.toml`.
    pub fn path() -> Option<PathBuf> {
        match env::var_os(CONFIG_ENV) {
            Some(p) if !p.is_empty() => Some(PathBuf::from(p)),
            _ => dirs::home_dir().map(|home| home.join(".geoverride").join("config.toml")),
        }
    }

    /// A session built from `[api]`, when both URL and token are set.
    pub fn session(&self) -> Option<Session> {
        let api = self.api.as_ref()?;
        let base_url = expand_env_vars(api.base_url.as_deref()?);
        let token = expand_env_vars(api.token.as_deref()?);
        if base_url.trim().is_empty() {
            return None;
        }
        let session = Session::login(base_url, token);
        session.is_active().then_some(session)
    }

    pub fn directory_path(&self) -> Option<PathBuf> {
        let raw = self.directory.as_ref()?.path.as_deref()?;
        let expanded = expand_env_vars(raw);
        (!expanded.trim().is_empty()).then(|| PathBuf::from(expanded.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_and_unknown_vars() {
        env::set_var("GEOVERRIDE_TEST_TOKEN", "t0k");
        assert_eq!(expand_env_vars("a${GEOVERRIDE_TEST_TOKEN}b"), "at0kb");
        assert_eq!(expand_env_vars("${GEOVERRIDE_SURELY_UNSET_VAR}"), "");
        assert_eq!(expand_env_vars("keep ${ open"), "keep ${ open");
        assert_eq!(expand_env_vars("${}x"), "x");
    }

    #[test]
    fn session_needs_url_and_token() {
        let config = ConsoleConfig::from_toml_str(
            r#"
            [api]
            base_url = "https://admin.example.org/api/"
            token = "abc"

            [directory]
            path = "/srv/geo/base.json"
            "#,
        )
        .unwrap();
        let session = config.session().unwrap();
        assert_eq!(session.base_url(), "https://admin.example.org/api");
        assert_eq!(config.directory_path(), Some(PathBuf::from("/srv/geo/base.json")));

        let no_token = ConsoleConfig::from_toml_str("[api]\nbase_url = \"http://x\"\n").unwrap();
        assert!(no_token.session().is_none());
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        assert!(matches!(
            ConsoleConfig::from_toml_str("[api"),
            Err(GeoOverrideError::Config(_))
        ));
    }
}
