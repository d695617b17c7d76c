use axum::{
    middleware::Next,
    response::{IntoResponse, Response},
    extract::{Request, State},
    http::Method,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use crate::app::AppState;
use crate::errors::AppError;
use crate::models::User;

/// Routes reachable without a session.
const PUBLIC_PATHS: [&str; 3] = ["/api/auth/register", "/api/auth/login", "/api/ai/generate"];

/// The authenticated caller, inserted as a request extension.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path();

    if PUBLIC_PATHS.contains(&path) || req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return AppError::Unauthorized("Session required".into()).into_response();
    };

    match state.repository.session_user(bearer.token()).await {
        Ok(Some(user)) => {
            tracing::debug!("Authenticated request from {}", user.email);
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Ok(None) => AppError::Unauthorized("Invalid or expired session".into()).into_response(),
        Err(e) => AppError::Storage(e).into_response(),
    }
}
