use huddle_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("no activity is selected")]
    NothingSelected,
    #[error("you need to be signed in")]
    NotSignedIn,
    #[error("the activity form has no id")]
    MissingId,
}

impl StoreError {
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
