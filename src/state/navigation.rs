use tokio::sync::watch;
use super::auth::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    Login,
    Register,
    Dashboard,
    Tasks,
    StudyAssistant,
    Admin,
}

impl View {
    pub fn is_auth_view(self) -> bool {
        matches!(self, View::Login | View::Register)
    }

    pub fn requires_auth(self) -> bool {
        matches!(
            self,
            View::Dashboard | View::Tasks | View::StudyAssistant | View::Admin
        )
    }

    pub fn admin_only(self) -> bool {
        self == View::Admin
    }

    pub fn path(self) -> &'static str {
        match self {
            View::Landing => "/",
            View::Login => "/login",
            View::Register => "/register",
            View::Dashboard => "/dashboard",
            View::Tasks => "/tasks",
            View::StudyAssistant => "/study",
            View::Admin => "/admin",
        }
    }
}

/// Outcome of checking a view against the current auth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Allow,
    /// Session hydration has not finished yet.
    Pending,
    Redirect(View),
}

pub fn guard(view: View, auth: &AuthState) -> Guard {
    if !view.requires_auth() {
        return Guard::Allow;
    }
    if auth.loading {
        return Guard::Pending;
    }
    if !auth.is_authenticated {
        return Guard::Redirect(View::Login);
    }
    if view.admin_only() && !auth.user.as_ref().map_or(false, |u| u.is_admin()) {
        return Guard::Redirect(View::Dashboard);
    }
    Guard::Allow
}

/// Current view, observable by subscribers. Clones share the same channel.
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: watch::Sender<View>,
}

impl Navigator {
    pub fn new(initial: View) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> View {
        *self.tx.borrow()
    }

    pub fn navigate(&self, view: View) {
        tracing::debug!("Navigating to {}", view.path());
        self.tx.send_replace(view);
    }

    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.tx.subscribe()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(View::Landing)
    }
}
