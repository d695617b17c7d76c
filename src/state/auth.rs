use tokio::sync::watch;
use crate::client::{ApiClient, LocalStore};
use crate::models::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub loading: bool,
}

impl Default for AuthState {
    /// Process start: nothing known yet.
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            loading: true,
        }
    }
}

impl AuthState {
    pub fn authenticated(user: User, token: String) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            is_authenticated: true,
            loading: false,
        }
    }

    pub fn logged_out() -> Self {
        Self {
            loading: false,
            ..Self::default()
        }
    }
}

/// Process-wide auth state with change notification.
#[derive(Debug, Clone)]
pub struct AuthStore {
    tx: watch::Sender<AuthState>,
}

impl AuthStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(AuthState::default());
        Self { tx }
    }

    pub fn snapshot(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    /// Hydrate from the persisted token, if any, by asking the backend (or
    /// its local stand-in) who the token belongs to.
    pub async fn init(&self, client: &ApiClient) {
        let store = client.store();
        let Some(token) = store.token().await else {
            self.tx.send_replace(AuthState::logged_out());
            return;
        };

        match client.me().await {
            Ok(user) => {
                tracing::info!("Session restored for {}", user.email);
                self.tx.send_replace(AuthState::authenticated(user, token));
            }
            Err(e) => {
                tracing::warn!("Session verification failed: {}", e);
                clear_token(store).await;
                self.tx.send_replace(AuthState::logged_out());
            }
        }
    }

    pub async fn login(&self, store: &LocalStore, token: String, user: User) {
        if let Err(e) = store.set_token(&token).await {
            tracing::error!("Failed to persist token: {}", e);
        }
        self.tx.send_replace(AuthState::authenticated(user, token));
    }

    pub async fn logout(&self, store: &LocalStore) {
        clear_token(store).await;
        self.tx.send_replace(AuthState::logged_out());
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}

async fn clear_token(store: &LocalStore) {
    if let Err(e) = store.clear_token().await {
        tracing::error!("Failed to clear token: {}", e);
    }
}
