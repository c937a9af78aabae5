use std::sync::Arc;

use huddle_api::{AgentBox, EventEmitter, HttpAgent, Session, UiSignal};
use huddle_config::Config;

use crate::{AccountService, ActivityStore, Core};

/// Wires a [`Core`] talking to the backend configured in `config`.
pub fn load(config: &Config, session: Arc<Session>) -> eyre::Result<Core> {
    let signals = EventEmitter::new();
    let agent = HttpAgent::new(&config.api, session.clone(), signals.clone())?;
    Ok(load_with_agent(
        config,
        AgentBox::new(agent),
        session,
        signals,
    ))
}

pub fn load_with_agent(
    config: &Config,
    agent: AgentBox,
    session: Arc<Session>,
    signals: EventEmitter<UiSignal>,
) -> Core {
    let activity_store = Arc::new(ActivityStore::new(
        agent.clone(),
        session.clone(),
        config.store.page_size,
    ));

    let account = AccountService::builder()
        .agent(agent)
        .session(session.clone())
        .activity_store(activity_store.clone())
        .build();

    Core {
        session,
        activity_store,
        account,
        signals,
    }
}

#[cfg(test)]
mod tests {
    use huddle_api::InMemoryAgent;
    use huddle_config::ApiConfig;

    use super::*;
    use crate::{fixtures::user, PagingParams};

    #[tokio::test]
    async fn initialize_restores_the_stored_user() {
        let agent = Arc::new(InMemoryAgent::new().with_viewer(user("bob")));
        let session = Arc::new(Session::with_token("token-bob"));
        let core = load_with_agent(
            &Config::default(),
            AgentBox::shared(agent),
            session.clone(),
            EventEmitter::new(),
        );

        core.initialize().await;

        let state = session.read().await;
        assert!(state.app_loaded);
        assert_eq!(state.user.as_ref().map(|u| u.username.as_str()), Some("bob"));
    }

    #[tokio::test]
    async fn initialize_drops_a_rejected_token() {
        let agent = Arc::new(InMemoryAgent::new());
        let session = Arc::new(Session::with_token("expired"));
        let core = load_with_agent(
            &Config::default(),
            AgentBox::shared(agent),
            session.clone(),
            EventEmitter::new(),
        );

        core.initialize().await;

        let state = session.read().await;
        assert!(state.app_loaded);
        assert_eq!(state.token, None);
        assert_eq!(state.user, None);
    }

    #[tokio::test]
    async fn load_uses_the_configured_page_size() -> eyre::Result<()> {
        let mut config = Config::default();
        config.store.page_size = 5;
        let core = load(&config, Arc::new(Session::new()))?;

        let paging = core.activities().read().await.paging_params;
        assert_eq!(paging, PagingParams::first_page(5));
        Ok(())
    }

    #[test]
    fn load_rejects_a_base_url_without_path_support() {
        let config = Config {
            api: ApiConfig {
                base_url: "mailto:someone@example.com".into(),
                ..ApiConfig::default()
            },
            ..Config::default()
        };

        assert!(load(&config, Arc::new(Session::new())).is_err());
    }
}
