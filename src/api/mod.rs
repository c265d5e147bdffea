//! HTTP client for the voice-agent backend.
//!
//! Talks to a single backend origin using the synchronous `ureq` client.
//! Every resource lives under the API prefix (`/api` by default); the only
//! exception is the `/health` probe, which the backend serves at the origin
//! root.
//!
//! Requests are issued exactly once, apart from re-sending to the target of a
//! 307/308 redirect. There are no retries, no client-side timeout and no
//! backoff: whatever the transport or the backend reports is normalized into
//! an [`ApiError`] and handed straight back to the caller.
pub mod error;
pub mod resources;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::schema::ApiConfig;
use crate::models::HealthStatus;

pub use error::ApiError;
pub use resources::Backend;

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Synchronous backend client.
///
/// Holds no state besides the resolved URLs, so it is cheap to clone and
/// every view can own its own copy.
#[derive(Debug, Clone)]
pub struct ApiClient {
    origin: String,
    api_base: String,
}

impl ApiClient {
    /// Build a client for `origin` with resources under `prefix`.
    pub fn new(origin: &str, prefix: &str) -> Self {
        let origin = origin.trim().trim_end_matches('/').to_string();
        let prefix = prefix.trim().trim_matches('/');
        let api_base = if prefix.is_empty() {
            origin.clone()
        } else {
            format!("{origin}/{prefix}")
        };
        Self { origin, api_base }
    }

    /// Build a client from the resolved config.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url, &config.prefix)
    }

    /// The backend origin, without the API prefix.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Origin plus API prefix; resource paths are appended to this.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// `GET /health` at the origin root.
    pub fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = format!("{}/health", self.origin);
        send(Method::Get, &url, None)
    }

    /// `GET {api_base}{path}`.
    pub(crate) fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        send(Method::Get, &self.api_url(path), None)
    }

    /// `POST {api_base}{path}` with a JSON body.
    pub(crate) fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = encode(body)?;
        send(Method::Post, &self.api_url(path), Some(&body))
    }

    /// `PUT {api_base}{path}` with a JSON body.
    pub(crate) fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = encode(body)?;
        send(Method::Put, &self.api_url(path), Some(&body))
    }

    /// `DELETE {api_base}{path}`.
    pub(crate) fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        send(Method::Delete, &self.api_url(path), None)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

fn encode<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))
}

/// Issue one request and decode the JSON response.
///
/// A 307/308 is re-sent once to its `Location` with the same method and
/// body. `ureq` only follows those itself for GET and HEAD. Any other
/// status outside 2xx becomes [`ApiError::Status`].
fn send<T: DeserializeOwned>(method: Method, url: &str, body: Option<&str>) -> Result<T, ApiError> {
    let mut response = dispatch(method, url, body)?;

    if matches!(response.status(), 307 | 308) {
        let location = response.header("Location").map(str::to_string);
        if let Some(location) = location {
            let target = resolve_location(url, &location);
            debug!(method = method.as_str(), from = %url, to = %target, "following redirect");
            response = dispatch(method, &target, body)?;
        }
    }

    let status = response.status();
    if !(200..300).contains(&status) {
        let text = response.into_string().unwrap_or_default();
        let detail = error::extract_detail(&text);
        warn!(
            method = method.as_str(),
            %url,
            status,
            detail = detail.as_deref().unwrap_or(""),
            "backend returned an error"
        );
        return Err(ApiError::Status { status, detail });
    }

    response.into_json::<T>().map_err(|e| {
        warn!(method = method.as_str(), %url, error = %e, "undecodable backend response");
        ApiError::Decode(e.to_string())
    })
}

/// Send one request and hand back whatever response arrived, error
/// statuses included.
fn dispatch(method: Method, url: &str, body: Option<&str>) -> Result<ureq::Response, ApiError> {
    debug!(method = method.as_str(), %url, "backend request");

    let request = ureq::request(method.as_str(), url)
        .set("Content-Type", "application/json")
        .set("Accept", "application/json");

    let result = match body {
        Some(body) => request.send_string(body),
        None => request.call(),
    };

    match result {
        Ok(response) | Err(ureq::Error::Status(_, response)) => Ok(response),
        Err(ureq::Error::Transport(transport)) => {
            warn!(method = method.as_str(), %url, error = %transport, "backend unreachable");
            Err(ApiError::Transport(transport.to_string()))
        }
    }
}

/// Resolve a `Location` header against the URL that produced it.
fn resolve_location(url: &str, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }

    let authority_end = url
        .find("://")
        .map(|i| i + 3)
        .and_then(|start| url[start..].find('/').map(|i| start + i))
        .unwrap_or(url.len());

    if location.starts_with('/') {
        format!("{}{location}", &url[..authority_end])
    } else {
        let path_start = url.rfind('/').filter(|&i| i >= authority_end);
        match path_start {
            Some(i) => format!("{}/{location}", &url[..i]),
            None => format!("{}/{location}", &url[..authority_end]),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_default_config() {
        let client = ApiClient::from_config(&ApiConfig::default());
        assert_eq!(client.origin(), "http://localhost:8000");
        assert_eq!(client.api_base(), "http://localhost:8000/api");
    }

    #[test]
    fn client_normalizes_slashes() {
        let client = ApiClient::new("http://backend:9000/", "/api/");
        assert_eq!(client.origin(), "http://backend:9000");
        assert_eq!(client.api_base(), "http://backend:9000/api");
        assert_eq!(client.api_url("/agents"), "http://backend:9000/api/agents");
        assert_eq!(client.api_url("calls/trigger"), "http://backend:9000/api/calls/trigger");
    }

    #[test]
    fn client_without_prefix_uses_origin() {
        let client = ApiClient::new("http://backend:9000", "");
        assert_eq!(client.api_base(), "http://backend:9000");
        assert_eq!(client.api_url("/agents"), "http://backend:9000/agents");
    }

    #[test]
    fn resolve_location_forms() {
        let url = "http://backend:9000/api/agents";
        assert_eq!(resolve_location(url, "/api/agents/"), "http://backend:9000/api/agents/");
        assert_eq!(resolve_location(url, "agents/"), "http://backend:9000/api/agents/");
        assert_eq!(
            resolve_location(url, "https://other:443/x"),
            "https://other:443/x"
        );
        assert_eq!(
            resolve_location("http://backend:9000", "/health"),
            "http://backend:9000/health"
        );
    }

    #[test]
    fn unreachable_backend_is_a_transport_error() {
        // Port 9 (discard) on localhost is closed on any sane test host.
        let client = ApiClient::new("http://127.0.0.1:9", "/api");
        let err = client.get::<serde_json::Value>("/agents").unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
        assert_eq!(err.detail(), None);
    }
}
