use serde::{Deserialize, Serialize};

/// Error body returned by the backend on non-2xx responses (`{"detail": ...}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ApiError {
    /// Parses an error body, falling back to the raw text when it is not JSON.
    pub fn message_from_body(body: &str) -> String {
        let body = body.trim();
        match serde_json::from_str::<ApiError>(body) {
            Ok(ApiError {
                detail: Some(serde_json::Value::String(detail)),
            }) => detail,
            Ok(ApiError {
                detail: Some(other),
            }) => other.to_string(),
            _ => body.to_string(),
        }
    }
}
