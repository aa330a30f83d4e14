use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::response::{create_response, default_message, message_codes};
use service::{FailureKind, ServiceError};
use thiserror::Error;

/// Handler error rendered through the response envelope:
/// `{"data": null, "message": <detail>, "message_code": <code>}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: Option<String>,
    pub message_code: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let (_, code) = default_message(status);
        Self { status, message: Some(message.into()), message_code: code.to_string() }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e.kind() {
            FailureKind::BadRequest => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            FailureKind::NotFound => Self::new(StatusCode::NOT_FOUND, e.to_string()),
            FailureKind::Conflict => Self::new(StatusCode::CONFLICT, e.to_string()),
            // The cause was logged where it was converted; callers get the table default.
            FailureKind::Internal => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: None,
                message_code: message_codes::INTERNAL_SERVER_ERROR.to_string(),
            },
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        let mut err = Self::new(rejection.status(), rejection.body_text());
        if rejection.status().is_client_error() {
            err.message_code = message_codes::BAD_REQUEST.to_string();
        }
        err
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        create_response::<()>(self.status, None, self.message, Some(self.message_code))
    }
}

/// Failures that stop the process before the listener is bound.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unreachable: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_failures_map_to_statuses() {
        let cases = [
            (ServiceError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (ServiceError::Conflict("x".into()), StatusCode::CONFLICT, "CONFLICT"),
        ];
        for (e, status, code) in cases {
            let api = JsonApiError::from(e);
            assert_eq!(api.status, status);
            assert_eq!(api.message.as_deref(), Some("x"));
            assert_eq!(api.message_code, code);
        }
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let api = JsonApiError::from(ServiceError::Internal("connection reset by peer".into()));
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, None);
        assert_eq!(api.message_code, "INTERNAL_SERVER_ERROR");
    }
}
