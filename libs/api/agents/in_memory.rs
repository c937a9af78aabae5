use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
    time::Duration,
};

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::{
    Activity, ActivityFormValues, ActivityId, Agent, ApiError, ApiResult, PaginatedResult,
    Pagination, PinFuture, Profile, QueryParams, User, UserFormValues,
};

/// This agent is used for testing, it plays the backend in process: data
/// lives in memory, every call is recorded, failures and latency can be
/// injected.
#[derive(Default)]
pub struct InMemoryAgent {
    activities: DashMap<ActivityId, Activity>,
    /// email -> (password, user)
    accounts: DashMap<String, (String, User)>,
    viewer: Mutex<Option<User>>,
    failures: Mutex<VecDeque<ApiError>>,
    latencies: DashMap<ActivityId, Duration>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user the fake backend considers authenticated.
    pub fn with_viewer(self, user: User) -> Self {
        self.set_viewer(Some(user));
        self
    }

    pub fn with_activities(self, activities: impl IntoIterator<Item = Activity>) -> Self {
        for activity in activities {
            self.activities.insert(activity.id.clone(), activity);
        }
        self
    }

    pub fn with_account(self, email: &str, password: &str, user: User) -> Self {
        self.accounts
            .insert(email.to_string(), (password.to_string(), user));
        self
    }

    pub fn set_viewer(&self, user: Option<User>) {
        *lock(&self.viewer) = user;
    }

    /// The next call, whatever it is, fails with `error`.
    pub fn fail_next(&self, error: ApiError) {
        lock(&self.failures).push_back(error);
    }

    /// Delays the details call of one activity.
    pub fn set_latency(&self, id: &str, latency: Duration) {
        self.latencies.insert(id.to_string(), latency);
    }

    pub fn activity(&self, id: &str) -> Option<Activity> {
        self.activities.get(id).map(|a| a.value().clone())
    }

    /// Every call received so far, as `METHOD /path`.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn begin(&self, call: String) -> ApiResult<()> {
        tracing::trace!(%call, "in memory agent");
        lock(&self.calls).push(call);
        match lock(&self.failures).pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn viewer(&self) -> ApiResult<User> {
        lock(&self.viewer).clone().ok_or(ApiError::Unauthorized)
    }

    fn list(&self, params: &QueryParams) -> ApiResult<PaginatedResult<Vec<Activity>>> {
        let page_number = parse_param(params, "pageNumber", 1)?.max(1);
        let page_size = parse_param(params, "pageSize", 10)?.max(1);
        let start_date = params
            .get("startDate")
            .map(|raw| {
                DateTime::parse_from_rfc3339(raw)
                    .map(|d| d.with_timezone(&Utc))
                    .map_err(|e| ApiError::Validation(vec![format!("startDate: {e}")]))
            })
            .transpose()?;
        let viewer = lock(&self.viewer).clone();
        let viewer_name = viewer.as_ref().map(|u| u.username.as_str());

        let mut matching: Vec<Activity> = self
            .activities
            .iter()
            .map(|a| a.value().clone())
            .filter(|a| start_date.map_or(true, |start| a.date >= start))
            .filter(|a| match params.get("isGoing") {
                Some("true") => viewer_name.is_some_and(|name| a.attendee(name).is_some()),
                _ => true,
            })
            .filter(|a| match params.get("isHost") {
                Some("true") => viewer_name == Some(a.host_username.as_str()),
                _ => true,
            })
            .collect();
        matching.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

        let total_items = matching.len() as u32;
        let total_pages = total_items.div_ceil(page_size);
        let data = matching
            .into_iter()
            .skip(((page_number - 1) * page_size) as usize)
            .take(page_size as usize)
            .collect();

        Ok(PaginatedResult::new(
            data,
            Some(Pagination {
                current_page: page_number,
                items_per_page: page_size,
                total_items,
                total_pages,
            }),
        ))
    }

    fn toggle_attendance(&self, id: &str) -> ApiResult<()> {
        let viewer = self.viewer()?;
        let mut activity = self.activities.get_mut(id).ok_or(ApiError::NotFound)?;

        if activity.host_username == viewer.username {
            activity.is_cancelled = !activity.is_cancelled;
        } else if activity.attendee(&viewer.username).is_some() {
            activity.attendees.retain(|a| a.username != viewer.username);
        } else {
            activity.attendees.push(Profile::from(&viewer));
        }
        Ok(())
    }

    fn toggle_following(&self, username: &str) -> ApiResult<()> {
        let viewer = self.viewer()?;
        if viewer.username == username {
            return Err(ApiError::BadRequest("You cannot follow yourself".into()));
        }

        let mut found = self
            .accounts
            .iter()
            .any(|a| a.value().1.username == username);
        for mut activity in self.activities.iter_mut() {
            for attendee in activity.attendees.iter_mut() {
                if attendee.username == username {
                    attendee.toggle_following();
                    found = true;
                }
            }
        }

        if found {
            Ok(())
        } else {
            Err(ApiError::NotFound)
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    // a poisoned fake only means another test thread panicked
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn parse_param(params: &QueryParams, key: &str, default: u32) -> ApiResult<u32> {
    params
        .get(key)
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|e| ApiError::Validation(vec![format!("{key}: {e}")]))
        })
        .unwrap_or(Ok(default))
}

impl Agent for InMemoryAgent {
    fn list_activities(
        &self,
        params: QueryParams,
    ) -> PinFuture<'_, ApiResult<PaginatedResult<Vec<Activity>>>> {
        Box::pin(async move {
            self.begin(format!("GET /activities?{params}"))?;
            self.list(&params)
        })
    }

    fn activity_details(&self, id: ActivityId) -> PinFuture<'_, ApiResult<Activity>> {
        Box::pin(async move {
            self.begin(format!("GET /activities/{id}"))?;
            let latency = self.latencies.get(&id).map(|l| *l.value());
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            self.activity(&id).ok_or(ApiError::NotFound)
        })
    }

    fn create_activity(&self, activity: ActivityFormValues) -> PinFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            self.begin("POST /activities".to_string())?;
            let viewer = self.viewer()?;
            let id = activity
                .id
                .clone()
                .ok_or_else(|| ApiError::Validation(vec!["Id is required".into()]))?;
            if activity.title.trim().is_empty() {
                return Err(ApiError::Validation(vec!["Title is required".into()]));
            }
            let mut created = Activity::from_form(id.clone(), &activity, &viewer);
            // flags are relative to whoever reads the activity, not stored
            created.is_going = false;
            created.is_host = false;
            self.activities.insert(id, created);
            Ok(())
        })
    }

    fn update_activity(&self, activity: ActivityFormValues) -> PinFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            let id = activity.id.clone().unwrap_or_default();
            self.begin(format!("PUT /activities/{id}"))?;
            let mut existing = self.activities.get_mut(&id).ok_or(ApiError::NotFound)?;
            let merged = activity.merge_into(&existing);
            *existing = merged;
            Ok(())
        })
    }

    fn delete_activity(&self, id: ActivityId) -> PinFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            self.begin(format!("DELETE /activities/{id}"))?;
            self.activities
                .remove(&id)
                .map(|_| ())
                .ok_or(ApiError::NotFound)
        })
    }

    fn attend_activity(&self, id: ActivityId) -> PinFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            self.begin(format!("POST /activities/{id}/attend"))?;
            self.toggle_attendance(&id)
        })
    }

    fn update_following(&self, username: String) -> PinFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            self.begin(format!("POST /follow/{username}"))?;
            self.toggle_following(&username)
        })
    }

    fn current_user(&self) -> PinFuture<'_, ApiResult<User>> {
        Box::pin(async move {
            self.begin("GET /account".to_string())?;
            self.viewer()
        })
    }

    fn login(&self, user: UserFormValues) -> PinFuture<'_, ApiResult<User>> {
        Box::pin(async move {
            self.begin("POST /account/login".to_string())?;
            let account = self
                .accounts
                .get(&user.email)
                .map(|a| a.value().clone())
                .filter(|(password, _)| *password == user.password)
                .map(|(_, account)| account)
                .ok_or(ApiError::Unauthorized)?;
            self.set_viewer(Some(account.clone()));
            Ok(account)
        })
    }

    fn register(&self, user: UserFormValues) -> PinFuture<'_, ApiResult<User>> {
        Box::pin(async move {
            self.begin("POST /account/register".to_string())?;

            let mut errors = HashMap::new();
            if self.accounts.contains_key(&user.email) {
                errors.insert("email", "Email taken");
            }
            let username = user.username.clone().unwrap_or_default();
            if username.is_empty() {
                errors.insert("username", "Username is required");
            } else if self
                .accounts
                .iter()
                .any(|a| a.value().1.username == username)
            {
                errors.insert("username", "Username taken");
            }
            if !errors.is_empty() {
                let mut messages: Vec<String> = errors.into_values().map(String::from).collect();
                messages.sort();
                return Err(ApiError::Validation(messages));
            }

            let registered = User {
                display_name: user.display_name.clone().unwrap_or_else(|| username.clone()),
                token: format!("token-{username}"),
                username,
                image: None,
            };
            self.accounts
                .insert(user.email, (user.password, registered.clone()));
            self.set_viewer(Some(registered.clone()));
            Ok(registered)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user(username: &str) -> User {
        User {
            username: username.into(),
            display_name: username.into(),
            token: format!("token-{username}"),
            image: None,
        }
    }

    fn activity(id: &str, day: u32, host: &str, attendees: &[&str]) -> Activity {
        Activity {
            id: id.into(),
            title: format!("activity {id}"),
            date: Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap(),
            description: String::new(),
            category: String::new(),
            city: String::new(),
            venue: String::new(),
            host_username: host.into(),
            is_cancelled: false,
            is_going: false,
            is_host: false,
            host: None,
            attendees: attendees.iter().map(|a| Profile::from(&user(a))).collect(),
        }
    }

    #[tokio::test]
    async fn list_filters_and_paginates() -> eyre::Result<()> {
        let agent = InMemoryAgent::new()
            .with_viewer(user("alice"))
            .with_activities([
                activity("a", 3, "bob", &["bob", "alice"]),
                activity("b", 1, "alice", &["alice"]),
                activity("c", 2, "bob", &["bob"]),
            ]);

        let going = agent
            .list_activities(
                QueryParams::new()
                    .with("pageNumber", 1)
                    .with("pageSize", 1)
                    .with("isGoing", true),
            )
            .await?;
        assert_eq!(going.data.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), ["b"]);
        assert_eq!(going.pagination.map(|p| p.total_pages), Some(2));

        let hosting = agent
            .list_activities(QueryParams::new().with("isHost", true))
            .await?;
        assert_eq!(hosting.data.len(), 1);

        let upcoming = agent
            .list_activities(QueryParams::new().with("startDate", "2024-06-02T00:00:00.000Z"))
            .await?;
        assert_eq!(
            upcoming.data.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(),
            ["c", "a"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn injected_failure_applies_to_next_call_only() {
        let agent = InMemoryAgent::new().with_activities([activity("a", 1, "bob", &["bob"])]);
        agent.fail_next(ApiError::Forbidden);

        assert_eq!(agent.activity_details("a".into()).await, Err(ApiError::Forbidden));
        assert!(agent.activity_details("a".into()).await.is_ok());
        assert_eq!(agent.call_count("GET /activities/a"), 2);
    }

    #[tokio::test]
    async fn attend_toggles_membership_or_cancellation() -> eyre::Result<()> {
        let agent = InMemoryAgent::new()
            .with_viewer(user("alice"))
            .with_activities([
                activity("a", 1, "bob", &["bob"]),
                activity("b", 2, "alice", &["alice"]),
            ]);

        agent.attend_activity("a".into()).await?;
        agent.attend_activity("b".into()).await?;

        assert!(agent.activity("a").and_then(|a| a.attendee("alice").cloned()).is_some());
        assert_eq!(agent.activity("b").map(|a| a.is_cancelled), Some(true));
        Ok(())
    }

    #[tokio::test]
    async fn register_then_login() -> eyre::Result<()> {
        let agent = InMemoryAgent::new();
        let form = UserFormValues {
            email: "dana@example.com".into(),
            password: "secret".into(),
            display_name: Some("Dana".into()),
            username: Some("dana".into()),
        };

        let registered = agent.register(form.clone()).await?;
        let duplicate = agent.register(form.clone()).await;
        agent.set_viewer(None);
        let logged_in = agent.login(form).await?;

        assert_eq!(registered, logged_in);
        assert_eq!(
            duplicate,
            Err(ApiError::Validation(vec![
                "Email taken".into(),
                "Username taken".into()
            ]))
        );
        assert_eq!(agent.current_user().await?, registered);
        Ok(())
    }
}
