use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{any, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use crate::ai::TextGenerator;
use crate::config::AiConfig;
use crate::handlers;
use crate::middleware;
use crate::services::Repository;

// Application state that can be shared between handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Repository,
    /// `None` when no API key is configured; the AI proxy then answers 500.
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub ai: AiConfig,
    pub bcrypt_cost: u32,
}

pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, header::InvalidHeaderValue> {
    let origin = HeaderValue::from_str(allowed_origin)?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::OPTIONS,
            Method::PATCH,
            Method::DELETE,
            Method::POST,
            Method::PUT,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_LENGTH,
            header::CONTENT_TYPE,
            header::DATE,
            HeaderName::from_static("accept-version"),
            HeaderName::from_static("content-md5"),
            HeaderName::from_static("x-api-version"),
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-requested-with"),
        ]))
}

pub fn router(state: AppState, cors: CorsLayer, max_body_size: usize) -> Router {
    Router::new()
        // Auth routes
        .route("/api/auth/register", post(handlers::handle_register))
        .route("/api/auth/login", post(handlers::handle_login))
        .route("/api/auth/me", get(handlers::current_user))

        // Task routes
        .route("/api/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/api/tasks/:task_id",
            put(handlers::update_task)
                .patch(handlers::update_task)
                .delete(handlers::delete_task),
        )

        // Admin routes
        .route("/api/admin/users", get(handlers::list_users))

        // AI proxy
        .route("/api/ai/generate", any(handlers::generate))

        .layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
