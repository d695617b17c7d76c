use axum::extract::{Extension, Json, State};
use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::User;

pub async fn list_users(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<Json<Vec<User>>> {
    if !user.is_admin() {
        tracing::warn!("Non-admin {} requested the user list", user.id);
        return Err(AppError::Forbidden("Administrator role required.".into()));
    }

    Ok(Json(state.repository.list_users().await?))
}
