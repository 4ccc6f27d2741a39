// crates/geoverride-core/src/settings/http.rs
use super::{SettingsDocument, SettingsStore};
use crate::error::{GeoOverrideError, Result};
use crate::session::{Session, SharedSession};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::PoisonError;
use tracing::{debug, warn};

const SETTINGS_PATH: &str = "/settings";

/// `GET`/`PATCH /settings` against the admin REST backend.
///
/// Every request reads the bearer token from the injected session. A `401`
/// logs the session out so later calls fail fast with
/// [`GeoOverrideError::Unauthorized`].
#[derive(Debug, Clone)]
pub struct HttpSettingsStore {
    client: Client,
    session: SharedSession,
}

impl HttpSettingsStore {
    pub fn new(session: SharedSession) -> Self {
        Self::with_client(Client::new(), session)
    }

    pub fn with_client(client: Client, session: SharedSession) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    fn settings_url(&self) -> Result<(String, String)> {
        let session = self.session.read().unwrap_or_else(PoisonError::into_inner);
        Ok((session.url(SETTINGS_PATH), session.bearer()?))
    }

    fn send(&self, request: RequestBuilder, bearer: String) -> Result<Response> {
        let response = request.header(AUTHORIZATION, bearer).send()?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "settings request");

        if status == StatusCode::UNAUTHORIZED {
            warn!("settings endpoint rejected the session, logging out");
            self.session
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .logout();
            return Err(GeoOverrideError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GeoOverrideError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

impl SettingsStore for HttpSettingsStore {
    fn fetch(&self) -> Result<SettingsDocument> {
        let (url, bearer) = self.settings_url()?;
        let response = self.send(self.client.get(&url), bearer)?;
        match response.json::<Value>()? {
            Value::Object(doc) => Ok(doc),
            _ => {
                warn!(url = %url, "settings response is not a JSON object, treating as empty");
                Ok(SettingsDocument::new())
            }
        }
    }

    fn patch(&self, changes: &SettingsDocument) -> Result<()> {
        let (url, bearer) = self.settings_url()?;
        self.send(self.client.patch(&url).json(changes), bearer)?;
        Ok(())
    }
}

impl From<Session> for HttpSettingsStore {
    fn from(session: Session) -> Self {
        Self::new(session.shared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serves one canned HTTP response on a local port and returns the
    /// request head it received.
    fn serve_once(status: &str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let status = status.to_owned();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_ascii_lowercase();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let body_len = text[..head_end]
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + body_len {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (base_url, handle)
    }

    #[test]
    fn fetch_sends_bearer_and_returns_the_document() {
        let (base_url, server) = serve_once("200 OK", r#"{"geo.custom":{"states":[]},"theme":"dark"}"#);
        let store = HttpSettingsStore::from(Session::login(base_url, "secret"));

        let doc = store.fetch().unwrap();
        assert_eq!(doc["theme"], "dark");

        let request = server.join().unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /settings "));
        assert!(request.contains("authorization: bearer secret"));
    }

    #[test]
    fn unauthorized_response_logs_the_session_out() {
        let (base_url, server) = serve_once("401 Unauthorized", "{}");
        let session = Session::login(base_url, "expired").shared();
        let store = HttpSettingsStore::new(session.clone());

        assert!(matches!(store.fetch(), Err(GeoOverrideError::Unauthorized)));
        assert!(!session.read().unwrap().is_active());
        server.join().unwrap();

        // Later calls fail without touching the network.
        assert!(matches!(store.fetch(), Err(GeoOverrideError::Unauthorized)));
    }

    #[test]
    fn other_failures_carry_status_and_body() {
        let (base_url, server) = serve_once("500 Internal Server Error", "settings backend down");
        let session = Session::login(base_url, "t").shared();
        let store = HttpSettingsStore::new(session.clone());

        match store.patch(&SettingsDocument::new()) {
            Err(GeoOverrideError::Http { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "settings backend down");
            }
            other => panic!("expected an HTTP error, got {other:?}"),
        }
        assert!(session.read().unwrap().is_active());
        server.join().unwrap();
    }

    #[test]
    fn non_json_body_is_invalid_data() {
        let (base_url, server) = serve_once("200 OK", "<html>login</html>");
        let store = HttpSettingsStore::from(Session::login(base_url, "t"));

        assert!(matches!(store.fetch(), Err(GeoOverrideError::InvalidData(_))));
        server.join().unwrap();
    }

    #[test]
    fn logged_out_session_fails_before_any_request() {
        let mut session = Session::login("http://127.0.0.1:9", "token");
        session.logout();
        let store = HttpSettingsStore::from(session);

        assert!(matches!(store.fetch(), Err(GeoOverrideError::Unauthorized)));
        assert!(matches!(
            store.patch(&SettingsDocument::new()),
            Err(GeoOverrideError::Unauthorized)
        ));
    }

    #[test]
    fn settings_url_joins_base_and_path() {
        let store = HttpSettingsStore::from(Session::login("https://admin.example.org/api/", "t"));
        let (url, bearer) = store.settings_url().unwrap();
        assert_eq!(url, "https://admin.example.org/api/settings");
        assert_eq!(bearer, "Bearer t");
    }
}
