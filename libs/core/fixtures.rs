use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use huddle_api::{Activity, AgentBox, InMemoryAgent, Profile, Session, User};

use crate::ActivityStore;

pub fn user(username: &str) -> User {
    User {
        username: username.into(),
        display_name: username.to_uppercase(),
        token: format!("token-{username}"),
        image: None,
    }
}

pub fn profile(username: &str) -> Profile {
    Profile::from(&user(username))
}

pub fn date(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 18, 0, 0).unwrap()
}

/// An activity hosted by `host`, attended by the host and `guests`.
pub fn activity(id: &str, day: u32, host: &str, guests: &[&str]) -> Activity {
    let mut attendees = vec![profile(host)];
    attendees.extend(guests.iter().map(|g| profile(g)));
    Activity {
        id: id.into(),
        title: format!("{id} title"),
        date: date(5, day),
        description: String::new(),
        category: "music".into(),
        city: "Lyon".into(),
        venue: "Le Sucre".into(),
        host_username: host.into(),
        is_cancelled: false,
        is_going: false,
        is_host: false,
        host: None,
        attendees,
    }
}

/// A store backed by `agent`, signed in as `viewer`.
pub async fn store_for(agent: &Arc<InMemoryAgent>, viewer: &User) -> (ActivityStore, Arc<Session>) {
    agent.set_viewer(Some(viewer.clone()));
    let session = Arc::new(Session::new());
    session.set_user(viewer.clone()).await;
    let store = ActivityStore::new(AgentBox::shared(agent.clone()), session.clone(), 2);
    (store, session)
}
