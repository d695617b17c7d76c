use axum::{
    extract::{Extension, Json, State},
};
use bcrypt::{hash, verify};
use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, Role, User, UserRecord};

pub async fn handle_register(
    State(state): State<AppState>,
    Json(form): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    tracing::info!("Registration attempt for {}", form.email);
    form.validate().map_err(AppError::Validation)?;

    if state.repository.get_user(&form.email).await?.is_some() {
        tracing::info!("Email already registered: {}", form.email);
        return Err(email_taken());
    }

    let password_hash = hash(form.password.as_bytes(), state.bcrypt_cost)?;
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name: form.name.trim().to_string(),
        email: form.email,
        role: Role::User,
    };

    let created = state
        .repository
        .create_user(&UserRecord { user: user.clone(), password_hash })
        .await
        .map_err(|e| {
            tracing::error!("Failed to save user {}: {}", user.email, e);
            AppError::Storage(e)
        })?;

    // Lost a race with a concurrent registration for the same email
    if !created {
        tracing::info!("Email already registered: {}", user.email);
        return Err(email_taken());
    }

    let token = state.repository.create_session(&user.email).await?;
    tracing::info!("Registered user {}", user.id);
    Ok(Json(AuthResponse { token, user }))
}

pub async fn handle_login(
    State(state): State<AppState>,
    Json(form): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    tracing::info!("Login attempt for {}", form.email);

    let Some(record) = state.repository.get_user(&form.email).await? else {
        tracing::info!("User not found: {}", form.email);
        return Err(invalid_credentials());
    };

    if !verify(&form.password, &record.password_hash)? {
        tracing::info!("Invalid password for {}", form.email);
        return Err(invalid_credentials());
    }

    let token = state.repository.create_session(&record.user.email).await?;
    Ok(Json(AuthResponse { token, user: record.user }))
}

pub async fn current_user(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Authentication failed. Invalid email or password.".into())
}

fn email_taken() -> AppError {
    AppError::Conflict("Email is already registered.".into())
}
