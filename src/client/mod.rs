//! Dual-mode request layer.
//!
//! Every request goes to the live backend first. When no response comes back
//! at all (refused connection, timeout) the same request is replayed against
//! [`LocalSimulation`], and the caller cannot tell which side answered. A 401
//! from the live backend instead resets the session and sends the user to
//! the login view.

pub mod local_store;
pub mod simulation;
pub mod transport;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use crate::config::ClientConfig;
use crate::errors::ApiError;
use crate::models::{AuthResponse, LoginRequest, NewTask, RegisterRequest, Task, TaskPatch, User};
use crate::state::{Navigator, View};

pub use local_store::LocalStore;
pub use simulation::LocalSimulation;
pub use transport::{
    ApiResponse, Method, RemoteTransport, RequestDescriptor, Transport, TransportError,
};

/// What to do with a failed live request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Replay against the local simulation.
    Simulate,
    /// Drop the persisted token and navigate to the login view.
    ResetSession,
    /// Hand the error to the caller unchanged.
    Propagate,
}

pub fn fallback_decision(error: &TransportError, on_auth_view: bool) -> Recovery {
    match error {
        TransportError::Network(_) | TransportError::Timeout => Recovery::Simulate,
        TransportError::Rejected(e) if e.status == Some(401) && !on_auth_view => {
            Recovery::ResetSession
        }
        TransportError::Rejected(_) => Recovery::Propagate,
    }
}

#[derive(Clone)]
pub struct ApiClient {
    remote: Arc<dyn Transport>,
    local: Arc<dyn Transport>,
    store: LocalStore,
    navigator: Navigator,
}

impl ApiClient {
    pub fn new(
        remote: Arc<dyn Transport>,
        local: Arc<dyn Transport>,
        store: LocalStore,
        navigator: Navigator,
    ) -> Self {
        Self {
            remote,
            local,
            store,
            navigator,
        }
    }

    /// Live backend at `config.base_url`, falling back to a simulation over `store`.
    pub fn from_config(
        config: &ClientConfig,
        store: LocalStore,
        navigator: Navigator,
    ) -> Result<Self, ApiError> {
        let remote = RemoteTransport::new(config.base_url.clone(), config.timeout())
            .map_err(TransportError::into_api_error)?;
        let local = LocalSimulation::new(store.clone(), config.simulation_delay());
        Ok(Self::new(Arc::new(remote), Arc::new(local), store, navigator))
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        let mut request = RequestDescriptor::new(method, path, body);
        request.bearer = self.store.token().await;

        let error = match self.remote.send(&request).await {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };

        match fallback_decision(&error, self.navigator.current().is_auth_view()) {
            Recovery::Simulate => {
                tracing::warn!("Backend unreachable ({}), using local simulation", error);
                self.local
                    .send(&request)
                    .await
                    .map_err(TransportError::into_api_error)
            }
            Recovery::ResetSession => {
                tracing::info!("Backend rejected the session, returning to login");
                if let Err(e) = self.store.clear_token().await {
                    tracing::error!("Failed to clear token: {}", e);
                }
                self.navigator.navigate(View::Login);
                Err(error.into_api_error())
            }
            Recovery::Propagate => Err(error.into_api_error()),
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiResponse, ApiError> {
        self.request(Method::Post, path, body).await
    }

    pub async fn put(&self, path: &str, body: Option<Value>) -> Result<ApiResponse, ApiError> {
        self.request(Method::Put, path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request(Method::Delete, path, None).await
    }

    pub async fn register(&self, form: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        form.validate().map_err(ApiError::validation)?;
        let response = self.post("/auth/register", Some(to_body(form)?)).await?;
        auth_payload(response)
    }

    pub async fn login(&self, form: &LoginRequest) -> Result<AuthResponse, ApiError> {
        form.validate().map_err(ApiError::validation)?;
        let response = self.post("/auth/login", Some(to_body(form)?)).await?;
        auth_payload(response)
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        decode(self.get("/auth/me").await?)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        decode(self.get("/tasks").await?)
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        task.validate().map_err(ApiError::validation)?;
        decode(self.post("/tasks", Some(to_body(task)?)).await?)
    }

    /// `None` when the simulation had no task with that id.
    pub async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Option<Task>, ApiError> {
        let path = format!("/tasks/{}", urlencoding::encode(id));
        decode(self.put(&path, Some(to_body(patch)?)).await?)
    }

    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/tasks/{}", urlencoding::encode(id));
        self.delete(&path).await.map(|_| ())
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::unknown(format!("Failed to encode request: {}", e)))
}

fn decode<T: DeserializeOwned>(response: ApiResponse) -> Result<T, ApiError> {
    serde_json::from_value(response.body)
        .map_err(|e| ApiError::unknown(format!("Invalid response payload: {}", e)))
}

fn auth_payload(response: ApiResponse) -> Result<AuthResponse, ApiError> {
    let auth: AuthResponse = decode(response)?;
    if auth.token.is_empty() {
        return Err(ApiError::unknown("Invalid response payload: missing token"));
    }
    Ok(auth)
}
