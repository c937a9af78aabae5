use reqwest::Method;
use serde_json::Value;

use crate::{ApiError, Route, ServerError, UiSignal};

/// What a failed response means for the caller and for the view layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub error: ApiError,
    pub signals: Vec<UiSignal>,
}

impl Failure {
    fn silent(error: ApiError) -> Self {
        Self {
            error,
            signals: Vec::new(),
        }
    }

    fn with_signal(error: ApiError, signal: UiSignal) -> Self {
        Self {
            error,
            signals: vec![signal],
        }
    }
}

/// Maps a non success status and its raw body to an error and the UI
/// side effects that go with it.
pub fn interpret_failure(method: &Method, status: u16, body: &str) -> Failure {
    let payload: Option<Value> = serde_json::from_str(body).ok();

    match status {
        400 => bad_request(method, payload.as_ref(), body),
        401 => Failure::with_signal(ApiError::Unauthorized, UiSignal::Toast("unauthorised".into())),
        403 => Failure::with_signal(ApiError::Forbidden, UiSignal::Toast("forbidden".into())),
        404 => Failure::with_signal(ApiError::NotFound, UiSignal::Navigate(Route::NotFound)),
        500 => {
            let server_error = payload
                .and_then(|p| serde_json::from_value::<ServerError>(p).ok())
                .map(|mut e| {
                    if e.status_code == 0 {
                        e.status_code = 500;
                    }
                    e
                })
                .unwrap_or_else(|| ServerError {
                    status_code: 500,
                    message: body.to_string(),
                    details: None,
                });
            Failure::with_signal(
                ApiError::Server(server_error),
                UiSignal::Navigate(Route::ServerError),
            )
        }
        _ => Failure::silent(ApiError::Http {
            status,
            body: body.to_string(),
        }),
    }
}

fn bad_request(method: &Method, payload: Option<&Value>, body: &str) -> Failure {
    let field_errors = payload
        .and_then(|p| p.get("errors"))
        .and_then(Value::as_object);

    let Some(field_errors) = field_errors else {
        let message = match payload {
            Some(Value::String(s)) => s.clone(),
            _ => body.to_string(),
        };
        return Failure::with_signal(ApiError::BadRequest(message.clone()), UiSignal::Toast(message));
    };

    let mut signals = Vec::new();
    if *method == Method::GET && field_errors.contains_key("id") {
        signals.push(UiSignal::Navigate(Route::NotFound));
    }

    let messages = field_errors
        .values()
        .flat_map(|value| -> Vec<String> {
            match value {
                Value::Array(items) => items.iter().filter_map(message_of).collect(),
                other => message_of(other).into_iter().collect(),
            }
        })
        .collect();

    Failure {
        error: ApiError::Validation(messages),
        signals,
    }
}

fn message_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_flattened() {
        let failure = interpret_failure(
            &Method::POST,
            400,
            r#"{"title":"One or more validation errors occurred.","errors":{"Title":["Title is required"],"Date":["Date is required","Date must be in the future"]}}"#,
        );

        let ApiError::Validation(messages) = failure.error else {
            panic!("expected validation error, got {:?}", failure.error);
        };
        assert_eq!(messages.len(), 3);
        assert!(messages.contains(&"Title is required".to_string()));
        assert!(messages.contains(&"Date must be in the future".to_string()));
        assert!(failure.signals.is_empty());
    }

    #[test]
    fn get_with_id_error_navigates_to_not_found() {
        let failure = interpret_failure(
            &Method::GET,
            400,
            r#"{"errors":{"id":["The value 'nope' is not valid."]}}"#,
        );

        assert_eq!(failure.signals, vec![UiSignal::Navigate(Route::NotFound)]);
        assert_eq!(
            failure.error,
            ApiError::Validation(vec!["The value 'nope' is not valid.".into()])
        );
    }

    #[test]
    fn put_with_id_error_does_not_navigate() {
        let failure = interpret_failure(&Method::PUT, 400, r#"{"errors":{"id":["bad"]}}"#);

        assert!(failure.signals.is_empty());
    }

    #[test]
    fn plain_bad_request_is_toasted() {
        let failure = interpret_failure(&Method::POST, 400, r#""Problem creating activity""#);

        assert_eq!(
            failure.error,
            ApiError::BadRequest("Problem creating activity".into())
        );
        assert_eq!(
            failure.signals,
            vec![UiSignal::Toast("Problem creating activity".into())]
        );
    }

    #[test]
    fn auth_failures_only_notify() {
        let unauthorized = interpret_failure(&Method::GET, 401, "");
        let forbidden = interpret_failure(&Method::GET, 403, "");

        assert_eq!(unauthorized.error, ApiError::Unauthorized);
        assert_eq!(unauthorized.signals, vec![UiSignal::Toast("unauthorised".into())]);
        assert_eq!(forbidden.error, ApiError::Forbidden);
        assert_eq!(forbidden.signals, vec![UiSignal::Toast("forbidden".into())]);
    }

    #[test]
    fn not_found_navigates() {
        let failure = interpret_failure(&Method::DELETE, 404, "");

        assert_eq!(failure.error, ApiError::NotFound);
        assert_eq!(failure.signals, vec![UiSignal::Navigate(Route::NotFound)]);
    }

    #[test]
    fn server_error_payload_is_kept() {
        let failure = interpret_failure(
            &Method::GET,
            500,
            r#"{"statusCode":500,"message":"Object reference not set","details":"at Handler.cs:42"}"#,
        );

        assert_eq!(
            failure.error,
            ApiError::Server(ServerError {
                status_code: 500,
                message: "Object reference not set".into(),
                details: Some("at Handler.cs:42".into()),
            })
        );
        assert_eq!(failure.signals, vec![UiSignal::Navigate(Route::ServerError)]);
    }

    #[test]
    fn server_error_with_opaque_body() {
        let failure = interpret_failure(&Method::GET, 500, "upstream exploded");

        let ApiError::Server(server_error) = failure.error else {
            panic!("expected server error");
        };
        assert_eq!(server_error.status_code, 500);
        assert_eq!(server_error.message, "upstream exploded");
    }

    #[test]
    fn other_statuses_propagate_without_signals() {
        let failure = interpret_failure(&Method::GET, 418, "teapot");

        assert_eq!(
            failure.error,
            ApiError::Http {
                status: 418,
                body: "teapot".into()
            }
        );
        assert!(failure.signals.is_empty());
    }
}
