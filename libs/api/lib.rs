use std::{future::Future, pin::Pin};

mod models {
    pub(crate) mod activity;
    pub(crate) mod pagination;
    pub(crate) mod profile;
    pub(crate) mod user;
}

mod agent;
mod errors;
mod event_emitter;
mod failure;
mod query;
mod session;
mod signal;

pub mod agents {
    pub mod http;
    pub mod in_memory;
}

pub use agent::{Agent, AgentBox};
pub use agents::{http::HttpAgent, in_memory::InMemoryAgent};
pub use errors::{ApiError, ApiResult, ServerError};
pub use event_emitter::{EventEmitter, EventListener};
pub use failure::{interpret_failure, Failure};
pub use models::{
    activity::{Activity, ActivityFormValues, ActivityId, ActivityUpdate},
    pagination::{PaginatedResult, Pagination},
    profile::Profile,
    user::{User, UserFormValues},
};
pub use query::QueryParams;
pub use session::{Session, SessionState};
pub use signal::{Route, UiSignal};

pub use patronus::Patch;

pub type PinFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
