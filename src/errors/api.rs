use serde_json::Value;
use thiserror::Error;

/// Failure class of a client request, decided once at the transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    Conflict,
    NotFound,
    Connectivity,
    CorruptSession,
    Unknown,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ErrorKind::Validation,
            401 | 403 => ErrorKind::Unauthorized,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            _ => ErrorKind::Unknown,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, None, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, Some(401), message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, Some(409), message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, Some(404), message)
    }

    pub fn corrupt_session(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CorruptSession, Some(401), message)
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connectivity, None, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, None, message)
    }

    /// Builds the error for a non-2xx response. The display message is taken
    /// from `message`, then `error`, then `statusText` in the body.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = ["message", "error", "statusText"]
            .iter()
            .find_map(|field| match body.get(field) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(v @ (Value::Object(_) | Value::Array(_))) => Some(v.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| format!("Request failed with status code {}", status));

        Self::new(ErrorKind::from_status(status), Some(status), message)
    }

    /// The wire shape shared by the backend and the local simulation.
    pub fn to_body(&self) -> Value {
        let status = self.status.unwrap_or(500);
        serde_json::json!({
            "message": self.message,
            "error": reason_phrase(status),
            "status": status,
        })
    }
}

pub(crate) fn reason_phrase(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        _ => "Internal Server Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_from_status() {
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Conflict);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(400), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(502), ErrorKind::Unknown);
    }

    #[test]
    fn test_message_extraction_order() {
        let err = ApiError::from_response(409, &json!({"message": "taken", "error": "Conflict"}));
        assert_eq!(err.message, "taken");
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err = ApiError::from_response(500, &json!({"error": "boom"}));
        assert_eq!(err.message, "boom");

        let err = ApiError::from_response(503, &Value::Null);
        assert_eq!(err.message, "Request failed with status code 503");
        assert_eq!(err.status, Some(503));
    }

    #[test]
    fn test_nested_message_is_stringified() {
        let err = ApiError::from_response(400, &json!({"message": {"field": "email"}}));
        assert_eq!(err.message, r#"{"field":"email"}"#);
    }

    #[test]
    fn test_body_round_trips_message() {
        let err = ApiError::conflict("already registered");
        let body = err.to_body();
        assert_eq!(body["status"], 409);
        assert_eq!(body["error"], "Conflict");
        assert_eq!(ApiError::from_response(409, &body), err);
    }
}
