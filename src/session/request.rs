use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AdminError;

/// One logical request against the backend.
///
/// `path` is relative to the configured base URL. A request is replayed at
/// most once; the replay flag travels with it so a second 401 is final.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    replay: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            replay: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, AdminError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn is_replay(&self) -> bool {
        self.replay
    }

    /// The same request (method, path, body), marked as a replay.
    pub(crate) fn into_replay(mut self) -> Self {
        self.replay = true;
        self
    }
}

/// A successful (2xx) backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AdminError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// Pull a human-readable message out of an error body.
///
/// The backend answers `{"message": ".."}`; anything else falls back to the
/// raw text, then to the status reason.
pub(crate) fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    #[test]
    fn replay_keeps_method_path_and_body() {
        let original = ApiRequest::put("/clientes/7")
            .json(&json!({"nome": "Ana"}))
            .unwrap();
        assert!(!original.is_replay());
        let replay = original.clone().into_replay();
        assert!(replay.is_replay());
        assert_eq!(replay.method, original.method);
        assert_eq!(replay.path, original.path);
        assert_eq!(replay.body, original.body);
    }

    #[test]
    fn error_message_prefers_json_message() {
        let msg = error_message(StatusCode::BAD_REQUEST, r#"{"message":"CPF inválido"}"#);
        assert_eq!(msg, "CPF inválido");
    }

    #[test]
    fn error_message_falls_back_to_reason() {
        assert_eq!(error_message(StatusCode::UNAUTHORIZED, ""), "Unauthorized");
        assert_eq!(error_message(StatusCode::NOT_FOUND, "gone"), "gone");
    }

    #[test]
    fn response_json_decodes_body() {
        let response = ApiResponse {
            status: 200,
            body: r#"[{"id":1}]"#.to_string(),
        };
        let rows: Vec<serde_json::Value> = response.json().unwrap();
        assert_eq!(rows.len(), 1);
        assert!(ApiResponse { status: 204, body: String::new() }.is_empty());
    }
}
