use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

/// Payload of a 500 response, kept in the session for the error view.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerError {
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 400 with field errors, every message of every field
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthorised")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("server error: {}", .0.message)]
    Server(ServerError),
    #[error("unexpected response status {status}: {body}")]
    Http { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("couldn't decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn validation_messages(&self) -> Option<&[String]> {
        match self {
            Self::Validation(messages) => Some(messages),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
