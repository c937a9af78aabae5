use std::sync::Arc;

use derive_more::Deref;

use crate::{
    Activity, ActivityFormValues, ActivityId, ApiResult, PaginatedResult, PinFuture, QueryParams,
    User, UserFormValues,
};

#[derive(Clone, Deref)]
#[deref(forward)]
pub struct AgentBox(Arc<dyn Agent>);

impl AgentBox {
    pub fn new(agent: impl Agent + 'static) -> Self {
        Self(Arc::new(agent))
    }

    /// Wraps an agent the caller keeps a handle on, e.g. a fake inspected by tests.
    pub fn shared<A: Agent + 'static>(agent: Arc<A>) -> Self {
        Self(agent)
    }
}

/// Every call the client makes to the backend.
pub trait Agent: Send + Sync {
    /// `GET /activities`
    fn list_activities(
        &self,
        params: QueryParams,
    ) -> PinFuture<'_, ApiResult<PaginatedResult<Vec<Activity>>>>;

    /// `GET /activities/{id}`
    fn activity_details(&self, id: ActivityId) -> PinFuture<'_, ApiResult<Activity>>;

    /// `POST /activities`
    fn create_activity(&self, activity: ActivityFormValues) -> PinFuture<'_, ApiResult<()>>;

    /// `PUT /activities/{id}`
    fn update_activity(&self, activity: ActivityFormValues) -> PinFuture<'_, ApiResult<()>>;

    /// `DELETE /activities/{id}`
    fn delete_activity(&self, id: ActivityId) -> PinFuture<'_, ApiResult<()>>;

    /// `POST /activities/{id}/attend`, toggles attendance, or cancellation for the host
    fn attend_activity(&self, id: ActivityId) -> PinFuture<'_, ApiResult<()>>;

    /// `POST /follow/{username}`
    fn update_following(&self, username: String) -> PinFuture<'_, ApiResult<()>>;

    /// `GET /account`
    fn current_user(&self) -> PinFuture<'_, ApiResult<User>>;

    /// `POST /account/login`
    fn login(&self, user: UserFormValues) -> PinFuture<'_, ApiResult<User>>;

    /// `POST /account/register`
    fn register(&self, user: UserFormValues) -> PinFuture<'_, ApiResult<User>>;
}
