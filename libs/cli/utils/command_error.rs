use huddle_api::ApiError;
use huddle_core::StoreError;

use crate::utils::exit_code::ExitCode;

pub enum Error {
    ExitWithError(ExitCode, eyre::Report),
    Exit(ExitCode),
}

pub type Result<T> = std::result::Result<T, Error>;

impl<E> From<E> for Error
where
    E: Into<eyre::Report>,
{
    #[track_caller]
    fn from(error: E) -> Self {
        let r: eyre::Report = error.into();
        Self::ExitWithError(ExitCode::Error, r)
    }
}

pub fn exit_code_of(error: &StoreError) -> ExitCode {
    match error {
        StoreError::Api(ApiError::Validation(_) | ApiError::BadRequest(_)) => ExitCode::DataError,
        StoreError::Api(ApiError::NotFound) => ExitCode::NoInput,
        StoreError::Api(ApiError::Unauthorized | ApiError::Forbidden) | StoreError::NotSignedIn => {
            ExitCode::PermissionDenied
        }
        StoreError::Api(ApiError::Server(_) | ApiError::Transport(_)) => ExitCode::Unavailable,
        _ => ExitCode::Error,
    }
}

/// Validation messages are listed one per line, every other store error is
/// reported with the exit code matching its cause.
pub fn store(error: StoreError) -> Error {
    let code = exit_code_of(&error);
    if let Some(messages) = error.api().and_then(ApiError::validation_messages) {
        crate::utils::display::print_errors(messages);
        return Error::Exit(code);
    }
    Error::ExitWithError(code, error.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_api::ServerError;

    #[test]
    fn store_errors_map_to_exit_codes() {
        let cases = [
            (StoreError::Api(ApiError::Validation(vec![])), ExitCode::DataError),
            (StoreError::Api(ApiError::NotFound), ExitCode::NoInput),
            (StoreError::NotSignedIn, ExitCode::PermissionDenied),
            (StoreError::Api(ApiError::Forbidden), ExitCode::PermissionDenied),
            (
                StoreError::Api(ApiError::Server(ServerError {
                    status_code: 500,
                    message: "boom".into(),
                    details: None,
                })),
                ExitCode::Unavailable,
            ),
            (StoreError::NothingSelected, ExitCode::Error),
        ];

        for (error, code) in cases {
            assert_eq!(exit_code_of(&error), code, "{error}");
        }
    }

    #[test]
    fn validation_errors_exit_without_report() {
        let error = store(StoreError::Api(ApiError::Validation(vec![
            "Title is required".into(),
        ])));

        assert!(matches!(error, Error::Exit(ExitCode::DataError)));
    }
}
