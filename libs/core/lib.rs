use std::sync::Arc;

use huddle_api::{EventEmitter, EventListener, Session, UiSignal};
use tracing::warn;

mod account;
mod activity_store;
mod errors;
mod load;
mod paging;
mod predicate;
mod state;

#[cfg(test)]
mod fixtures;

pub use account::AccountService;
pub use activity_store::{ActivityStore, StoreChange};
pub use errors::{StoreError, StoreResult};
pub use load::{load, load_with_agent};
pub use paging::PagingParams;
pub use predicate::{Predicate, PredicateFilter, PredicateKey};
pub use state::{ActivityState, GROUP_LABEL_FORMAT};

/// Everything a front-end needs, wired around one session.
pub struct Core {
    session: Arc<Session>,
    activity_store: Arc<ActivityStore>,
    account: AccountService,
    signals: EventEmitter<UiSignal>,
}

impl Core {
    /// Restores the signed in user when a token is stored, then marks the
    /// app as loaded. An expired token only leaves the session signed out.
    pub async fn initialize(&self) {
        if self.session.token().await.is_some() {
            if let Err(error) = self.account.get_user().await {
                warn!("stored session is no longer valid: {error}");
                self.session.reset().await;
            }
        }
        self.session.set_app_loaded().await;
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn activities(&self) -> &Arc<ActivityStore> {
        &self.activity_store
    }

    pub fn account(&self) -> &AccountService {
        &self.account
    }

    /// Toasts and navigation requests raised by the gateway.
    pub fn subscribe_signals(&self) -> EventListener<UiSignal> {
        self.signals.subscribe()
    }
}
