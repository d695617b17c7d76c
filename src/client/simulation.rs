use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use crate::errors::{ApiError, ErrorKind, StorageError};
use crate::models::{
    AuthResponse, LoginRequest, NewTask, RegisterRequest, Role, SimulatedUser, Task, TaskPatch,
    User,
};
use super::local_store::{LocalStore, TASKS, USERS};
use super::transport::{ApiResponse, Method, RequestDescriptor, Transport, TransportError};

/// Tokens minted here carry this prefix followed by base64 of the user JSON.
pub const SIM_TOKEN_PREFIX: &str = "sim_jwt_";

/// Owner id used when a task request carries a token that cannot be decoded.
pub const FALLBACK_USER_ID: &str = "demo";

const DEFAULT_NAME: &str = "Operator";
const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub fn mint_token(user: &User) -> Result<String, ApiError> {
    let payload = serde_json::to_vec(user)
        .map_err(|e| ApiError::unknown(format!("Failed to encode session: {}", e)))?;
    Ok(format!("{}{}", SIM_TOKEN_PREFIX, STANDARD.encode(payload)))
}

/// `None` when the token is not a simulation token or does not decode.
pub fn decode_token(token: &str) -> Option<User> {
    let encoded = token.strip_prefix(SIM_TOKEN_PREFIX)?;
    let bytes = STANDARD.decode(encoded).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Emulates the REST backend on top of a [`LocalStore`].
///
/// Routing is by substring of the request path, tried in a fixed order:
/// register, login, session introspection, tasks. The first match wins.
#[derive(Clone)]
pub struct LocalSimulation {
    store: LocalStore,
    delay: Duration,
}

impl LocalSimulation {
    pub fn new(store: LocalStore, delay: Duration) -> Self {
        Self { store, delay }
    }

    pub async fn handle(&self, request: &RequestDescriptor) -> Result<ApiResponse, ApiError> {
        tracing::warn!("{} {} -> local simulation", request.method, request.path);
        tokio::time::sleep(self.delay).await;

        let path = request.path.as_str();
        if path.contains("/auth/register") {
            return self.register(parse_body(request)?).await;
        }
        if path.contains("/auth/login") {
            return self.login(parse_body(request)?).await;
        }
        if path.contains("/auth/me") {
            return self.me().await;
        }
        if path.contains("/tasks") {
            return self.tasks(request).await;
        }

        Err(ApiError::not_found("Service endpoint offline"))
    }

    async fn register(&self, form: RegisterRequest) -> Result<ApiResponse, ApiError> {
        let mut users: Vec<SimulatedUser> = self.store.read(USERS).await;
        if users.iter().any(|u| u.user.email == form.email) {
            return Err(ApiError::conflict("This email is already registered."));
        }

        let name = if form.name.trim().is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            form.name
        };
        let user = User {
            id: next_user_id(&users),
            name,
            email: form.email,
            role: Role::User,
        };

        users.push(SimulatedUser {
            user: user.clone(),
            password: form.password,
        });
        self.store.write(USERS, &users).await.map_err(storage_failure)?;

        tracing::info!("Registered local user {}", user.id);
        auth_response(user)
    }

    async fn login(&self, form: LoginRequest) -> Result<ApiResponse, ApiError> {
        let users: Vec<SimulatedUser> = self.store.read(USERS).await;
        if users.is_empty() {
            return Err(ApiError::unauthorized(
                "No users registered locally. Please register first.",
            ));
        }

        let user = users
            .into_iter()
            .find(|u| u.user.email == form.email && u.password == form.password)
            .ok_or_else(|| ApiError::unauthorized("Invalid email or password."))?;

        auth_response(user.user)
    }

    async fn me(&self) -> Result<ApiResponse, ApiError> {
        let token = self
            .store
            .token()
            .await
            .ok_or_else(|| ApiError::unauthorized("Session required"))?;

        if !token.starts_with(SIM_TOKEN_PREFIX) {
            return Err(ApiError::unauthorized(
                "Backend session mismatch. Please re-authenticate.",
            ));
        }

        let user = decode_token(&token).ok_or_else(|| {
            ApiError::corrupt_session("Corrupt session: re-authentication required.")
        })?;
        Ok(ApiResponse::ok(to_value(&user)?))
    }

    async fn tasks(&self, request: &RequestDescriptor) -> Result<ApiResponse, ApiError> {
        let token = self
            .store
            .token()
            .await
            .ok_or_else(|| ApiError::unauthorized("Access denied"))?;

        let user_id = decode_token(&token)
            .map(|u| u.id)
            .unwrap_or_else(|| FALLBACK_USER_ID.to_string());

        let mut tasks: Vec<Task> = self.store.read(TASKS).await;

        let response = match request.method {
            Method::Get => {
                let owned: Vec<&Task> = tasks.iter().filter(|t| t.user_id == user_id).collect();
                ApiResponse::ok(to_value(&owned)?)
            }
            Method::Post => {
                let new_task: NewTask = parse_body(request)?;
                let task = new_task.into_task(random_task_id(), user_id);
                tasks.push(task.clone());
                self.store.write(TASKS, &tasks).await.map_err(storage_failure)?;
                ApiResponse::ok(to_value(&task)?)
            }
            Method::Put | Method::Patch => {
                let id = last_segment(&request.path);
                let patch: TaskPatch = match &request.body {
                    Some(_) => parse_body(request)?,
                    None => TaskPatch::default(),
                };

                // Unknown ids are not an error here: the store is rewritten
                // unchanged and the body is null.
                let updated = tasks.iter_mut().find(|t| t.id == id).map(|task| {
                    patch.apply(task);
                    task.clone()
                });
                self.store.write(TASKS, &tasks).await.map_err(storage_failure)?;
                ApiResponse::ok(to_value(&updated)?)
            }
            Method::Delete => {
                let id = last_segment(&request.path);
                tasks.retain(|t| t.id != id);
                self.store.write(TASKS, &tasks).await.map_err(storage_failure)?;
                ApiResponse { status: 204, body: json!({}) }
            }
        };

        Ok(response)
    }
}

#[async_trait]
impl Transport for LocalSimulation {
    async fn send(&self, request: &RequestDescriptor) -> Result<ApiResponse, TransportError> {
        self.handle(request).await.map_err(TransportError::Rejected)
    }
}

fn auth_response(user: User) -> Result<ApiResponse, ApiError> {
    let token = mint_token(&user)?;
    Ok(ApiResponse::ok(to_value(&AuthResponse { token, user })?))
}

/// Millisecond timestamp, bumped past any id already taken.
fn next_user_id(users: &[SimulatedUser]) -> String {
    let mut millis = Utc::now().timestamp_millis();
    loop {
        let id = format!("u_{}", millis);
        if !users.iter().any(|u| u.user.id == id) {
            return id;
        }
        millis += 1;
    }
}

fn random_task_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("t_{}", suffix)
}

fn last_segment(path: &str) -> String {
    let segment = path.rsplit('/').next().unwrap_or_default();
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

fn parse_body<T: DeserializeOwned>(request: &RequestDescriptor) -> Result<T, ApiError> {
    let body = request.body.clone().unwrap_or(Value::Null);
    serde_json::from_value(body)
        .map_err(|e| ApiError::new(ErrorKind::Validation, Some(400), format!("Malformed request body: {}", e)))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::unknown(format!("Failed to encode response: {}", e)))
}

fn storage_failure(e: StorageError) -> ApiError {
    tracing::error!("Local persistence failed: {}", e);
    ApiError::unknown("Local persistence failed")
}
