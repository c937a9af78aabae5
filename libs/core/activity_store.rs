use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use chrono::{TimeZone, Utc};

use huddle_api::{
    Activity, ActivityFormValues, AgentBox, EventEmitter, EventListener, Profile, Session,
};
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, warn};
use ulid::Ulid;

use crate::{
    errors::{StoreError, StoreResult},
    paging::PagingParams,
    predicate::PredicateFilter,
    state::ActivityState,
};

/// Published after every committed mutation of the store state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChange {
    pub version: u64,
}

/// Client side cache of activities.
///
/// State is only mutated through [`ActivityStore::commit`]: the change is
/// applied under the write lock and a single [`StoreChange`] is published
/// once it is complete, so observers never read a half applied mutation.
/// The lock is never held across a backend call.
pub struct ActivityStore {
    agent: AgentBox,
    session: Arc<Session>,
    state: RwLock<ActivityState>,
    changes: EventEmitter<StoreChange>,
    version: AtomicU64,
    default_page_size: u32,
    /// bumped whenever the registry is cleared; list responses fetched
    /// under an older epoch are discarded
    registry_epoch: AtomicU64,
    /// only the newest claim may set the selection
    selection_ticket: AtomicU64,
}

impl ActivityStore {
    pub fn new(agent: AgentBox, session: Arc<Session>, page_size: u32) -> Self {
        Self {
            agent,
            session,
            state: RwLock::new(ActivityState::new(page_size)),
            changes: EventEmitter::new(),
            version: AtomicU64::new(0),
            default_page_size: page_size,
            registry_epoch: AtomicU64::new(0),
            selection_ticket: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> EventListener<StoreChange> {
        self.changes.subscribe()
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, ActivityState> {
        self.state.read().await
    }

    pub async fn snapshot(&self) -> ActivityState {
        self.state.read().await.clone()
    }

    pub async fn activities_by_date(&self) -> Vec<Activity> {
        let state = self.state.read().await;
        state.activities_by_date().into_iter().cloned().collect()
    }

    pub async fn grouped_activities(&self) -> Vec<(String, Vec<Activity>)> {
        self.grouped_activities_in(&Utc).await
    }

    /// Same as [`ActivityStore::grouped_activities`] with day labels taken in `tz`.
    pub async fn grouped_activities_in<Tz>(&self, tz: &Tz) -> Vec<(String, Vec<Activity>)>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let state = self.state.read().await;
        state
            .grouped_activities_in(tz)
            .into_iter()
            .map(|(label, group)| (label, group.into_iter().cloned().collect()))
            .collect()
    }

    pub async fn selected_activity(&self) -> Option<Activity> {
        self.state.read().await.selected_activity().cloned()
    }

    async fn commit<R>(&self, mutation: impl FnOnce(&mut ActivityState) -> R) -> R {
        let mut state = self.state.write().await;
        let result = mutation(&mut state);
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        // published under the guard so versions reach listeners in order
        self.changes.notify(&StoreChange { version });
        drop(state);
        result
    }

    fn claim_selection(&self) -> u64 {
        self.selection_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn owns_selection(&self, ticket: u64) -> bool {
        self.selection_ticket.load(Ordering::SeqCst) == ticket
    }

    /// Fetches the page described by the paging params and predicate and
    /// merges it into the registry. Failures are logged and only leave the
    /// store unloaded.
    pub async fn load_activities(&self) {
        let epoch = self.registry_epoch.load(Ordering::SeqCst);
        self.claim_selection();
        let params = self
            .commit(|state| {
                state.loading_initial = true;
                state.selected = None;
                state.query_params()
            })
            .await;
        let viewer = self.session.user().await;

        match self.agent.list_activities(params).await {
            Ok(result) => {
                self.commit(|state| {
                    if self.registry_epoch.load(Ordering::SeqCst) != epoch {
                        debug!("discarding activities fetched for a previous predicate");
                        return;
                    }
                    for mut activity in result.data {
                        activity.decorate_for(viewer.as_ref());
                        state.registry.insert(activity.id.clone(), activity);
                    }
                    state.pagination = result.pagination;
                    state.loading_initial = false;
                })
                .await;
            }
            Err(error) => {
                warn!("couldn't load activities: {error}");
                self.commit(|state| {
                    if self.registry_epoch.load(Ordering::SeqCst) == epoch {
                        state.loading_initial = false;
                    }
                })
                .await;
            }
        }
    }

    /// Loads the page after the last one the server returned. Returns
    /// false, without calling the backend, when that was the last page.
    /// A failed fetch leaves the pagination as it was, so the same page is
    /// requested again on the next call.
    pub async fn load_next_page(&self) -> bool {
        let has_next = self
            .commit(|state| match state.pagination {
                Some(pagination) if pagination.has_next_page() => {
                    state.paging_params = PagingParams::new(
                        pagination.current_page + 1,
                        state.paging_params.page_size,
                    );
                    true
                }
                _ => false,
            })
            .await;

        if has_next {
            self.load_activities().await;
        }
        has_next
    }

    /// Selects an activity, fetching it only when it is not cached yet.
    pub async fn load_activity(&self, id: &str) -> Option<Activity> {
        let ticket = self.claim_selection();
        let cached = self
            .commit(|state| match state.registry.get(id).cloned() {
                Some(activity) => {
                    state.selected = Some(activity.id.clone());
                    state.loading_initial = false;
                    Some(activity)
                }
                None => {
                    state.loading_initial = true;
                    None
                }
            })
            .await;

        if cached.is_some() {
            return cached;
        }

        let viewer = self.session.user().await;
        match self.agent.activity_details(id.to_string()).await {
            Ok(mut activity) => {
                activity.decorate_for(viewer.as_ref());
                self.commit(|state| {
                    state
                        .registry
                        .insert(activity.id.clone(), activity.clone());
                    if self.owns_selection(ticket) {
                        state.selected = Some(activity.id.clone());
                        state.loading_initial = false;
                    } else {
                        debug!(%id, "a newer selection superseded this fetch");
                    }
                })
                .await;
                Some(activity)
            }
            Err(error) => {
                warn!(%id, "couldn't load activity: {error}");
                self.commit(|state| {
                    if self.owns_selection(ticket) {
                        state.loading_initial = false;
                    }
                })
                .await;
                None
            }
        }
    }

    /// Posts a new activity and caches it with the signed in user as its
    /// host and only attendee. A form without id gets a fresh ULID.
    pub async fn create_activity(&self, mut form: ActivityFormValues) -> StoreResult<Activity> {
        let user = self.session.user().await.ok_or(StoreError::NotSignedIn)?;
        let id = form
            .id
            .get_or_insert_with(|| Ulid::new().to_string())
            .clone();

        if let Err(error) = self.agent.create_activity(form.clone()).await {
            warn!("couldn't create activity: {error}");
            return Err(error.into());
        }

        let activity = Activity::from_form(id, &form, &user);
        let ticket = self.claim_selection();
        self.commit(|state| {
            state
                .registry
                .insert(activity.id.clone(), activity.clone());
            if self.owns_selection(ticket) {
                state.selected = Some(activity.id.clone());
            }
            state.edit_mode = false;
        })
        .await;

        Ok(activity)
    }

    /// Puts the form and merges it over the cached activity: fields the
    /// form carries win, everything else is kept.
    pub async fn update_activity(&self, form: ActivityFormValues) -> StoreResult<()> {
        let id = form.id.clone().ok_or(StoreError::MissingId)?;

        if let Err(error) = self.agent.update_activity(form.clone()).await {
            warn!(%id, "couldn't update activity: {error}");
            return Err(error.into());
        }

        let ticket = self.claim_selection();
        self.commit(|state| {
            let Some(existing) = state.registry.get(&id) else {
                debug!(%id, "updated activity is not cached");
                return;
            };
            let merged = form.merge_into(existing);
            state.registry.insert(id.clone(), merged);
            if self.owns_selection(ticket) {
                state.selected = Some(id.clone());
            }
            state.edit_mode = false;
        })
        .await;

        Ok(())
    }

    pub async fn delete_activity(&self, id: &str) -> StoreResult<()> {
        self.commit(|state| state.loading = true).await;

        let result = self.agent.delete_activity(id.to_string()).await;

        self.commit(|state| {
            if result.is_ok() {
                state.registry.remove(id);
                if state.selected.as_deref() == Some(id) {
                    state.selected = None;
                }
            }
            state.loading = false;
        })
        .await;

        result.map_err(|error| {
            warn!(%id, "couldn't delete activity: {error}");
            error.into()
        })
    }

    /// Joins or leaves the selected activity once the backend accepted it.
    pub async fn update_attendance(&self) -> StoreResult<()> {
        let user = self.session.user().await.ok_or(StoreError::NotSignedIn)?;
        let id = self.selected_id().await?;
        self.commit(|state| state.loading = true).await;

        let result = self.agent.attend_activity(id.clone()).await;

        self.commit(|state| {
            if let (Ok(()), Some(activity)) = (&result, state.registry.get_mut(&id)) {
                if activity.is_going {
                    activity.attendees.retain(|a| a.username != user.username);
                    activity.is_going = false;
                } else {
                    activity.attendees.push(Profile::from(&user));
                    activity.is_going = true;
                }
            }
            state.loading = false;
        })
        .await;

        result.map_err(|error| {
            warn!(%id, "couldn't update attendance: {error}");
            error.into()
        })
    }

    /// Flips the cancellation of the selected activity once the backend accepted it.
    pub async fn cancel_activity_toggle(&self) -> StoreResult<()> {
        let id = self.selected_id().await?;
        self.commit(|state| state.loading = true).await;

        let result = self.agent.attend_activity(id.clone()).await;

        self.commit(|state| {
            if let (Ok(()), Some(activity)) = (&result, state.registry.get_mut(&id)) {
                activity.is_cancelled = !activity.is_cancelled;
            }
            state.loading = false;
        })
        .await;

        result.map_err(|error| {
            warn!(%id, "couldn't toggle cancellation: {error}");
            error.into()
        })
    }

    /// Flips the follow state of `username` wherever it shows up in the
    /// cache, as attendee or as resolved host.
    pub async fn update_attendee_following(&self, username: &str) {
        self.commit(|state| {
            for activity in state.registry.values_mut() {
                for attendee in activity.attendees.iter_mut() {
                    if attendee.username == username {
                        attendee.toggle_following();
                    }
                }
                if let Some(host) = activity.host.as_mut() {
                    if host.username == username {
                        host.toggle_following();
                    }
                }
            }
        })
        .await;
    }

    /// Changes the filter. The registry is emptied and paging restarts on
    /// the first page before the matching activities are loaded.
    pub async fn set_predicate(&self, filter: PredicateFilter) {
        self.set_predicates([filter]).await;
    }

    /// Applies every filter in order, then clears and reloads once.
    pub async fn set_predicates(&self, filters: impl IntoIterator<Item = PredicateFilter>) {
        let page_size = self.default_page_size;
        self.commit(|state| {
            for filter in filters {
                state.predicate.apply(filter);
            }
            self.registry_epoch.fetch_add(1, Ordering::SeqCst);
            state.paging_params = PagingParams::first_page(page_size);
            state.registry.clear();
            state.pagination = None;
        })
        .await;

        self.load_activities().await;
    }

    pub async fn set_paging_params(&self, paging_params: PagingParams) {
        self.commit(|state| state.paging_params = paging_params).await;
    }

    pub async fn set_edit_mode(&self, edit_mode: bool) {
        self.commit(|state| state.edit_mode = edit_mode).await;
    }

    pub async fn clear_selected_activity(&self) {
        self.claim_selection();
        self.commit(|state| state.selected = None).await;
    }

    /// Recomputes `is_going`, `is_host` and `host` after the signed in user changed.
    pub async fn redecorate(&self) {
        let viewer = self.session.user().await;
        self.commit(|state| {
            for activity in state.registry.values_mut() {
                activity.decorate_for(viewer.as_ref());
            }
        })
        .await;
    }

    /// Drops everything cached, e.g. on logout.
    pub async fn reset(&self) {
        let page_size = self.default_page_size;
        self.claim_selection();
        self.commit(|state| {
            self.registry_epoch.fetch_add(1, Ordering::SeqCst);
            *state = ActivityState::new(page_size);
        })
        .await;
    }

    async fn selected_id(&self) -> StoreResult<String> {
        self.state
            .read()
            .await
            .selected
            .clone()
            .ok_or(StoreError::NothingSelected)
    }
}
