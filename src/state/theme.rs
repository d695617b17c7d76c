use tokio::sync::watch;
use crate::client::local_store::THEME_KEY;
use crate::client::LocalStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Anything but an explicit "light" is dark.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }
}

/// Dark/light preference, persisted independently of auth.
#[derive(Clone)]
pub struct ThemeStore {
    store: LocalStore,
    tx: watch::Sender<Theme>,
}

impl ThemeStore {
    pub async fn load(store: LocalStore) -> Self {
        let theme = Theme::parse(store.get(THEME_KEY).await.as_deref());
        let (tx, _) = watch::channel(theme);
        Self { store, tx }
    }

    pub fn current(&self) -> Theme {
        *self.tx.borrow()
    }

    pub fn is_dark_mode(&self) -> bool {
        self.current() == Theme::Dark
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.tx.subscribe()
    }

    pub async fn toggle(&self) -> Theme {
        let next = match self.current() {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
        if let Err(e) = self.store.set(THEME_KEY, next.as_str()).await {
            tracing::error!("Failed to persist theme: {}", e);
        }
        self.tx.send_replace(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_defaults_to_dark_and_persists_toggle() {
        let store = LocalStore::new(Arc::new(MemoryStore::new()));
        let theme = ThemeStore::load(store.clone()).await;
        assert!(theme.is_dark_mode());

        assert_eq!(theme.toggle().await, Theme::Light);
        assert_eq!(store.get(THEME_KEY).await.as_deref(), Some("light"));

        let reloaded = ThemeStore::load(store).await;
        assert_eq!(reloaded.current(), Theme::Light);
    }
}
