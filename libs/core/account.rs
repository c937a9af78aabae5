use std::sync::Arc;

use huddle_api::{AgentBox, Session, User, UserFormValues};
use tracing::{info, warn};
use typed_builder::TypedBuilder;

use crate::{
    errors::{StoreError, StoreResult},
    ActivityStore,
};

/// Sign in, sign up and follow operations. Signing in or out also refreshes
/// the activity cache since its flags depend on who is looking.
#[derive(TypedBuilder)]
pub struct AccountService {
    agent: AgentBox,
    session: Arc<Session>,
    activity_store: Arc<ActivityStore>,
}

impl AccountService {
    pub async fn is_logged_in(&self) -> bool {
        self.session.user().await.is_some()
    }

    pub async fn login(&self, form: UserFormValues) -> StoreResult<User> {
        let user = self.agent.login(form).await?;
        self.sign_in(user).await
    }

    pub async fn register(&self, form: UserFormValues) -> StoreResult<User> {
        let user = self.agent.register(form).await?;
        self.sign_in(user).await
    }

    /// Fetches the user owning the stored token.
    pub async fn get_user(&self) -> StoreResult<User> {
        if self.session.token().await.is_none() {
            return Err(StoreError::NotSignedIn);
        }

        match self.agent.current_user().await {
            Ok(user) => self.sign_in(user).await,
            Err(error) => {
                warn!("couldn't fetch the current user: {error}");
                Err(error.into())
            }
        }
    }

    pub async fn logout(&self) {
        self.session.reset().await;
        self.activity_store.reset().await;
        info!("signed out");
    }

    /// Follows or unfollows `username`, then mirrors it in the cached attendees.
    pub async fn toggle_following(&self, username: &str) -> StoreResult<()> {
        if !self.is_logged_in().await {
            return Err(StoreError::NotSignedIn);
        }

        self.agent.update_following(username.to_string()).await?;
        self.activity_store
            .update_attendee_following(username)
            .await;
        Ok(())
    }

    async fn sign_in(&self, user: User) -> StoreResult<User> {
        self.session.set_user(user.clone()).await;
        self.activity_store.redecorate().await;
        info!(username = %user.username, "signed in");
        Ok(user)
    }
}
