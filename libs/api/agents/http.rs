use std::{sync::Arc, time::Duration};

use huddle_config::ApiConfig;
use reqwest::{header::HeaderMap, Method, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_derive::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    interpret_failure, Activity, ActivityFormValues, ActivityId, Agent, ApiError, ApiResult,
    EventEmitter, PaginatedResult, Pagination, PinFuture, QueryParams, Session, UiSignal, User,
    UserFormValues,
};

const PAGINATION_HEADER: &str = "pagination";

/// Gateway to the REST service. Adds the bearer token of the session to
/// every request and turns failed responses into [`ApiError`] plus the
/// matching [`UiSignal`]s.
pub struct HttpAgent {
    client: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
    signals: EventEmitter<UiSignal>,
}

/// The list endpoint either wraps items and pagination in one object or
/// returns a bare array with pagination in a response header.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody {
    Envelope {
        data: Vec<Activity>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
    Items(Vec<Activity>),
}

impl HttpAgent {
    pub fn new(
        config: &ApiConfig,
        session: Arc<Session>,
        signals: EventEmitter<UiSignal>,
    ) -> ApiResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ApiError::Transport(format!("invalid base url '{}': {e}", config.base_url))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "base url '{}' cannot carry a path",
                config.base_url
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            session,
            signals,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejected bases that cannot carry a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        query: Option<&QueryParams>,
        body: Option<Value>,
    ) -> ApiResult<Response> {
        trace!(%method, %url, "api request");

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(token) = self.session.token().await {
            request = request.bearer_auth(token);
        }
        if let Some(query) = query {
            request = request.query(query.pairs());
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        debug!(%method, %url, status = status.as_u16(), "api request failed");

        let failure = interpret_failure(&method, status.as_u16(), &text);
        if let ApiError::Server(server_error) = &failure.error {
            self.session.set_server_error(server_error.clone()).await;
        }
        for signal in failure.signals.iter() {
            self.signals.notify(signal);
        }

        Err(failure.error)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let response = self.send(Method::GET, url, None, None).await?;
        decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, url: Url, body: &B) -> ApiResult<T> {
        let response = self
            .send(Method::POST, url, None, Some(to_body(body)?))
            .await?;
        decode(response).await
    }

    async fn execute(&self, method: Method, url: Url, body: Option<Value>) -> ApiResult<()> {
        self.send(method, url, None, body).await?;
        Ok(())
    }
}

fn to_body<B: Serialize>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

fn pagination_from_headers(headers: &HeaderMap) -> Option<Pagination> {
    let raw = headers.get(PAGINATION_HEADER)?.to_str().ok()?;
    serde_json::from_str(raw).ok()
}

impl Agent for HttpAgent {
    fn list_activities(
        &self,
        params: QueryParams,
    ) -> PinFuture<'_, ApiResult<PaginatedResult<Vec<Activity>>>> {
        Box::pin(async move {
            let url = self.endpoint(&["activities"]);
            let response = self.send(Method::GET, url, Some(&params), None).await?;
            let header_pagination = pagination_from_headers(response.headers());

            Ok(match decode::<ListBody>(response).await? {
                ListBody::Envelope { data, pagination } => {
                    PaginatedResult::new(data, pagination.or(header_pagination))
                }
                ListBody::Items(data) => PaginatedResult::new(data, header_pagination),
            })
        })
    }

    fn activity_details(&self, id: ActivityId) -> PinFuture<'_, ApiResult<Activity>> {
        Box::pin(async move { self.get(self.endpoint(&["activities", id.as_str()])).await })
    }

    fn create_activity(&self, activity: ActivityFormValues) -> PinFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            let body = to_body(&activity)?;
            self.execute(Method::POST, self.endpoint(&["activities"]), Some(body))
                .await
        })
    }

    fn update_activity(&self, activity: ActivityFormValues) -> PinFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            let id = activity
                .id
                .clone()
                .ok_or_else(|| ApiError::Validation(vec!["Id is required".into()]))?;
            let body = to_body(&activity)?;
            self.execute(
                Method::PUT,
                self.endpoint(&["activities", id.as_str()]),
                Some(body),
            )
            .await
        })
    }

    fn delete_activity(&self, id: ActivityId) -> PinFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            self.execute(
                Method::DELETE,
                self.endpoint(&["activities", id.as_str()]),
                None,
            )
            .await
        })
    }

    fn attend_activity(&self, id: ActivityId) -> PinFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            let url = self.endpoint(&["activities", id.as_str(), "attend"]);
            self.execute(Method::POST, url, Some(serde_json::json!({})))
                .await
        })
    }

    fn update_following(&self, username: String) -> PinFuture<'_, ApiResult<()>> {
        Box::pin(async move {
            let url = self.endpoint(&["follow", username.as_str()]);
            self.execute(Method::POST, url, Some(serde_json::json!({})))
                .await
        })
    }

    fn current_user(&self) -> PinFuture<'_, ApiResult<User>> {
        Box::pin(async move { self.get(self.endpoint(&["account"])).await })
    }

    fn login(&self, user: UserFormValues) -> PinFuture<'_, ApiResult<User>> {
        Box::pin(async move { self.post(self.endpoint(&["account", "login"]), &user).await })
    }

    fn register(&self, user: UserFormValues) -> PinFuture<'_, ApiResult<User>> {
        Box::pin(async move { self.post(self.endpoint(&["account", "register"]), &user).await })
    }
}
