use axum::{
    response::{IntoResponse, Response, Json},
    http::StatusCode,
};
use serde_json::json;
use crate::errors::{AppError, api::reason_phrase};

// The IntoResponse trait implementation converts AppError into a JSON error body
// with the same { message, error, status } shape the client expects.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),

            // Internal failures are logged here and never echoed verbatim
            AppError::Storage(e) => {
                tracing::error!("Storage failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage unavailable".to_string())
            }
            AppError::Hash(e) => {
                tracing::error!("Password hashing failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
            // The AI proxy answers in its own `{ error, errorType }` shape
            AppError::Ai(e) => {
                tracing::error!("AI generation failed: {}", e);
                let body = json!({ "error": e.to_string(), "errorType": e.kind() });
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        error_body(status, message)
    }
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    let body = json!({
        "message": message.into(),
        "error": reason_phrase(status.as_u16()),
        "status": status.as_u16(),
    });
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiError;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_conflict_uses_shared_error_shape() {
        let res = AppError::Conflict("Email is already registered.".into()).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body = body_of(res).await;
        assert_eq!(body["message"], "Email is already registered.");
        assert_eq!(body["error"], "Conflict");
        assert_eq!(body["status"], 409);
    }

    #[tokio::test]
    async fn test_ai_failure_reports_error_type() {
        let res = AppError::Ai(AiError::Http { status: 429, body: "quota".into() }).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(res).await;
        assert_eq!(body["errorType"], "Http");
        assert_eq!(body["error"], "http 429: quota");
    }
}
