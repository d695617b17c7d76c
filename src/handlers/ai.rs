use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use crate::ai::GenerationConfig;
use crate::app::AppState;
use crate::errors::AppError;

/// Forwards `{ "prompt": "..." }` to the text generator and returns
/// `{ "text", "model" }`. Accepts any method so that the rejections below
/// carry a JSON body.
pub async fn generate(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    if method != Method::POST {
        return error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    }

    let payload: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let prompt = match payload.get("prompt") {
        Some(prompt) if !is_empty_value(prompt) => prompt,
        _ => return error(StatusCode::BAD_REQUEST, "Prompt is required"),
    };

    let Some(generator) = state.generator.as_ref() else {
        tracing::error!("AI proxy called without GEMINI_API_KEY");
        return error(StatusCode::INTERNAL_SERVER_ERROR, "GEMINI_API_KEY not configured or empty");
    };

    let prompt = match prompt.as_str().map(str::trim) {
        Some(p) if !p.is_empty() => p,
        _ => return error(StatusCode::BAD_REQUEST, "Prompt must be a non-empty string"),
    };

    tracing::info!("Forwarding prompt ({} chars) to {}", prompt.len(), state.ai.model);
    match generator.generate(prompt, &GenerationConfig::default()).await {
        Ok(text) => Json(json!({ "text": text, "model": state.ai.model })).into_response(),
        Err(e) => AppError::Ai(e).into_response(),
    }
}

// null, false, 0 and "" count as no prompt at all
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
