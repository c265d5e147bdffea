//! Uniform error shape for every backend request.

use serde_json::Value;
use thiserror::Error;

/// Failure of a single backend request.
///
/// Transport problems and non-2xx responses collapse into this one type so
/// views only have to ask for [`ApiError::detail`] and pick a fallback.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("backend returned HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },

    /// The request never produced an HTTP response (refused, DNS, TLS, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// A 2xx response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("could not encode request body: {0}")]
    Encode(String),
}

impl ApiError {
    /// Human-readable message supplied by the backend, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status code, when the backend responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend detail, or `fallback` when there is none.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.detail().unwrap_or(fallback)
    }
}

/// Pull a readable message out of an error response body.
///
/// Understands `{"detail": "..."}`, FastAPI validation errors
/// (`{"detail": [{"msg": "..."}, ...]}`) and `{"error": "..."}`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let detail = value.get("detail").or_else(|| value.get("error"))?;

    match detail {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_plain_detail() {
        assert_eq!(
            extract_detail(r#"{"detail": "Agent not found"}"#).as_deref(),
            Some("Agent not found")
        );
    }

    #[test]
    fn extract_validation_list() {
        let body = r#"{"detail": [
            {"loc": ["body", "driver_phone"], "msg": "string does not match regex"},
            {"loc": ["body", "load_number"], "msg": "field required"}
        ]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("string does not match regex; field required")
        );
    }

    #[test]
    fn extract_error_key() {
        assert_eq!(
            extract_detail(r#"{"error": "not found"}"#).as_deref(),
            Some("not found")
        );
    }

    #[test]
    fn extract_returns_none_for_unusable_bodies() {
        assert_eq!(extract_detail(""), None);
        assert_eq!(extract_detail("<html>502 Bad Gateway</html>"), None);
        assert_eq!(extract_detail(r#"{"detail": ""}"#), None);
        assert_eq!(extract_detail(r#"{"detail": 42}"#), None);
        assert_eq!(extract_detail(r#"{"message": "hi"}"#), None);
    }

    #[test]
    fn message_or_prefers_detail() {
        let err = ApiError::Status {
            status: 422,
            detail: Some("System prompt must contain placeholders".to_string()),
        };
        assert_eq!(
            err.message_or("Operation failed"),
            "System prompt must contain placeholders"
        );
        assert_eq!(err.status(), Some(422));

        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.message_or("Operation failed"), "Operation failed");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn display_includes_status_and_detail() {
        let err = ApiError::Status {
            status: 500,
            detail: None,
        };
        assert_eq!(err.to_string(), "backend returned HTTP 500: no detail");
    }
}
