// crates/geoverride-core/src/error.rs
use thiserror::Error;

/// Errors raised by the override document, its loaders and the settings store.
///
/// Malformed override JSON is *not* an error: it is coerced to empty
/// collections by [`crate::normalize`]. Only I/O, transport and editing
/// conflicts end up here.
#[derive(Debug, Error)]
pub enum GeoOverrideError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary snapshot error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// No entry with this id exists in the addressed sibling list.
    #[error("No {level} entry with id {id}")]
    EntryNotFound { level: &'static str, id: u64 },

    /// A sibling in the same list already uses this code.
    #[error("{level} code '{code}' is already in use")]
    DuplicateCode { level: &'static str, code: String },

    /// The entry owns descendant data and its code cannot be cleared.
    #[error("{level} code '{code}' has dependent entries and cannot be blank")]
    BlankCode { level: &'static str, code: String },

    #[error("Not authorized: session is missing or expired")]
    Unauthorized,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GeoOverrideError>;

#[cfg(feature = "http")]
impl From<reqwest::Error> for GeoOverrideError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return GeoOverrideError::InvalidData(format!("undecodable settings response: {e}"));
        }
        match e.status() {
            Some(status) => GeoOverrideError::Http {
                status: status.as_u16(),
                body: e.to_string(),
            },
            None => GeoOverrideError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)),
        }
    }
}
