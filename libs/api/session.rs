use tokio::sync::{RwLock, RwLockReadGuard};

use crate::{ServerError, User};

#[derive(Debug, Default, Clone)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    pub server_error: Option<ServerError>,
    pub app_loaded: bool,
}

/// Session wide state shared by the gateway and the stores: bearer token,
/// signed in user and the last server error.
#[derive(Debug, Default)]
pub struct Session(RwLock<SessionState>);

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self(RwLock::new(SessionState {
            token: Some(token.into()),
            ..SessionState::default()
        }))
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.0.read().await
    }

    pub async fn token(&self) -> Option<String> {
        self.0.read().await.token.clone()
    }

    pub async fn set_token(&self, token: Option<String>) {
        self.0.write().await.token = token;
    }

    pub async fn user(&self) -> Option<User> {
        self.0.read().await.user.clone()
    }

    /// Signs a user in; the token carried by the user replaces the current one.
    pub async fn set_user(&self, user: User) {
        let mut state = self.0.write().await;
        state.token = Some(user.token.clone());
        state.user = Some(user);
    }

    pub async fn server_error(&self) -> Option<ServerError> {
        self.0.read().await.server_error.clone()
    }

    pub async fn set_server_error(&self, error: ServerError) {
        self.0.write().await.server_error = Some(error);
    }

    pub async fn set_app_loaded(&self) {
        self.0.write().await.app_loaded = true;
    }

    /// Back to the signed out state. `app_loaded` survives since the app
    /// stays initialised after a logout.
    pub async fn reset(&self) {
        let mut state = self.0.write().await;
        let app_loaded = state.app_loaded;
        *state = SessionState {
            app_loaded,
            ..SessionState::default()
        };
    }
}
