//! Application-wide client state, passed around explicitly as an [`AppContext`].

mod auth;
mod navigation;
mod theme;

use std::sync::Arc;
use crate::client::{ApiClient, LocalStore};
use crate::config::ClientConfig;
use crate::errors::ApiError;
use crate::models::User;
use crate::storage::{FileStore, KeyValueStore};

pub use auth::{AuthState, AuthStore};
pub use navigation::{guard, Guard, Navigator, View};
pub use theme::{Theme, ThemeStore};

#[derive(Clone)]
pub struct AppContext {
    pub client: ApiClient,
    pub auth: AuthStore,
    pub theme: ThemeStore,
    pub navigator: Navigator,
}

impl AppContext {
    /// Wires the stores together and hydrates the session before returning.
    pub async fn mount(
        config: &ClientConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let store = LocalStore::new(storage);
        let navigator = Navigator::default();
        let client = ApiClient::from_config(config, store.clone(), navigator.clone())?;
        Ok(Self::assemble(client, store, navigator).await)
    }

    /// Mounts over the on-disk store at `config.storage_path`, so the session,
    /// theme and simulated collections survive restarts.
    pub async fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let storage = FileStore::new(&config.storage_path);
        tracing::info!("Client storage at {}", storage.path().display());
        Self::mount(config, Arc::new(storage)).await
    }

    pub async fn assemble(client: ApiClient, store: LocalStore, navigator: Navigator) -> Self {
        let auth = AuthStore::new();
        let theme = ThemeStore::load(store).await;
        auth.init(&client).await;
        Self {
            client,
            auth,
            theme,
            navigator,
        }
    }

    pub async fn login(&self, token: String, user: User) {
        self.auth.login(self.client.store(), token, user).await;
    }

    pub async fn logout(&self) {
        self.auth.logout(self.client.store()).await;
    }

    /// Navigate to `view`, or wherever the auth guard sends us instead.
    pub fn open(&self, view: View) -> Guard {
        let outcome = guard(view, &self.auth.snapshot());
        match outcome {
            Guard::Allow => self.navigator.navigate(view),
            Guard::Redirect(target) => self.navigator.navigate(target),
            Guard::Pending => {}
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::local_store::TOKEN_KEY;
    use crate::models::RegisterRequest;
    use crate::storage::MemoryStore;

    fn offline_config() -> ClientConfig {
        ClientConfig {
            base_url: "http://127.0.0.1:9/api".to_string(),
            timeout_ms: 2000,
            simulation_delay_ms: 0,
            ..ClientConfig::default()
        }
    }

    #[tokio::test]
    async fn test_mount_without_token_settles_logged_out() {
        let ctx = AppContext::mount(&offline_config(), Arc::new(MemoryStore::new()))
            .await
            .unwrap();
        assert_eq!(ctx.auth.snapshot(), AuthState::logged_out());
        assert_eq!(ctx.open(View::Tasks), Guard::Redirect(View::Login));
        assert_eq!(ctx.navigator.current(), View::Login);
    }

    #[tokio::test]
    async fn test_session_survives_remount() {
        let storage = Arc::new(MemoryStore::new());
        let ctx = AppContext::mount(&offline_config(), storage.clone()).await.unwrap();

        let auth = ctx
            .client
            .register(&RegisterRequest {
                name: "Ada".into(),
                email: "ada@x.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        ctx.login(auth.token.clone(), auth.user.clone()).await;
        assert!(ctx.auth.snapshot().is_authenticated);

        let remounted = AppContext::mount(&offline_config(), storage).await.unwrap();
        let state = remounted.auth.snapshot();
        assert!(state.is_authenticated);
        assert_eq!(state.user, Some(auth.user));
        assert_eq!(state.token, Some(auth.token));
        assert_eq!(remounted.open(View::Tasks), Guard::Allow);
    }

    #[tokio::test]
    async fn test_invalid_token_is_cleared_on_mount() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(TOKEN_KEY, "sim_jwt_garbage").await.unwrap();

        let ctx = AppContext::mount(&offline_config(), storage.clone()).await.unwrap();
        assert_eq!(ctx.auth.snapshot(), AuthState::logged_out());
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_resets_state() {
        let storage = Arc::new(MemoryStore::new());
        let ctx = AppContext::mount(&offline_config(), storage.clone()).await.unwrap();
        let user = User {
            id: "u_1".into(),
            name: "Ada".into(),
            email: "ada@x.com".into(),
            role: Default::default(),
        };

        ctx.login("tok".into(), user).await;
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("tok"));

        ctx.logout().await;
        assert_eq!(ctx.auth.snapshot(), AuthState::logged_out());
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_backed_context_restores_session_and_theme() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            storage_path: dir.path().join("dayone_storage.json").display().to_string(),
            ..offline_config()
        };

        let ctx = AppContext::from_config(&config).await.unwrap();
        let auth = ctx
            .client
            .register(&RegisterRequest {
                name: "Ada".into(),
                email: "ada@x.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        ctx.login(auth.token.clone(), auth.user.clone()).await;
        ctx.theme.toggle().await;
        assert!(dir.path().join("dayone_storage.json").exists());

        let reopened = AppContext::from_config(&config).await.unwrap();
        let state = reopened.auth.snapshot();
        assert!(state.is_authenticated);
        assert_eq!(state.user, Some(auth.user));
        assert_eq!(reopened.theme.current(), Theme::Light);
    }
}
