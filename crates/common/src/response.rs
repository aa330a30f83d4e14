//! Uniform response envelope.
//!
//! Every body produced through this module has the shape
//! `{"data": ..., "message": "...", "message_code": "..."}`. When a caller
//! does not supply a message, the default message and code for the status
//! are taken from [`default_message`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Machine-readable codes carried in `message_code`.
pub mod message_codes {
    pub const SUCCESS: &str = "SUCCESS";
    pub const CREATED: &str = "CREATED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const CONFLICT: &str = "CONFLICT";
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
    pub const ERROR: &str = "ERROR";
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub message: String,
    pub message_code: Option<String>,
}

/// Default `(message, message_code)` for a status.
pub fn default_message(status: StatusCode) -> (&'static str, &'static str) {
    match status {
        StatusCode::OK => ("Success", message_codes::SUCCESS),
        StatusCode::CREATED => ("Resource created successfully", message_codes::CREATED),
        StatusCode::NOT_FOUND => ("Resource not found", message_codes::NOT_FOUND),
        StatusCode::BAD_REQUEST => ("Bad Request", message_codes::BAD_REQUEST),
        StatusCode::UNAUTHORIZED => ("Unauthorized", message_codes::UNAUTHORIZED),
        StatusCode::CONFLICT => ("Conflict with current state of the resource", message_codes::CONFLICT),
        StatusCode::INTERNAL_SERVER_ERROR => ("An internal server error occurred", message_codes::INTERNAL_SERVER_ERROR),
        _ => ("An error occurred", message_codes::ERROR),
    }
}

/// Build the envelope body without committing to a transport response.
///
/// The default code is only substituted together with the default message;
/// a caller-supplied message keeps whatever code the caller passed.
pub fn build_envelope<T>(
    status: StatusCode,
    data: Option<T>,
    message: Option<String>,
    message_code: Option<String>,
) -> Envelope<T> {
    match message {
        Some(message) => Envelope { data, message, message_code },
        None => {
            let (message, code) = default_message(status);
            Envelope {
                data,
                message: message.to_string(),
                message_code: message_code.or_else(|| Some(code.to_string())),
            }
        }
    }
}

/// Envelope paired with its HTTP status.
#[derive(Debug)]
pub struct EnvelopeResponse<T> {
    pub status: StatusCode,
    pub body: Envelope<T>,
}

impl<T: Serialize> IntoResponse for EnvelopeResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub fn create_response<T: Serialize>(
    status: StatusCode,
    data: Option<T>,
    message: Option<String>,
    message_code: Option<String>,
) -> Response {
    EnvelopeResponse { status, body: build_envelope(status, data, message, message_code) }.into_response()
}

pub fn success_response<T: Serialize>(data: Option<T>) -> Response {
    create_response(StatusCode::OK, data, None, None)
}

pub fn created_response<T: Serialize>(data: Option<T>) -> Response {
    create_response(StatusCode::CREATED, data, None, None)
}

pub fn not_found_response() -> Response {
    create_response::<()>(StatusCode::NOT_FOUND, None, None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_status_table() {
        let cases = [
            (StatusCode::OK, "Success", "SUCCESS"),
            (StatusCode::CREATED, "Resource created successfully", "CREATED"),
            (StatusCode::NOT_FOUND, "Resource not found", "NOT_FOUND"),
            (StatusCode::BAD_REQUEST, "Bad Request", "BAD_REQUEST"),
            (StatusCode::UNAUTHORIZED, "Unauthorized", "UNAUTHORIZED"),
            (StatusCode::CONFLICT, "Conflict with current state of the resource", "CONFLICT"),
            (StatusCode::INTERNAL_SERVER_ERROR, "An internal server error occurred", "INTERNAL_SERVER_ERROR"),
        ];
        for (status, message, code) in cases {
            let env = build_envelope::<()>(status, None, None, None);
            assert_eq!(env.message, message, "{status}");
            assert_eq!(env.message_code.as_deref(), Some(code), "{status}");
        }
    }

    #[test]
    fn unlisted_status_falls_back_to_generic_error() {
        let env = build_envelope::<()>(StatusCode::SERVICE_UNAVAILABLE, None, None, None);
        assert_eq!(env.message, "An error occurred");
        assert_eq!(env.message_code.as_deref(), Some("ERROR"));
    }

    #[test]
    fn explicit_code_wins_over_default() {
        let env = build_envelope::<()>(StatusCode::NOT_FOUND, None, None, Some("ENTERPRISE_MISSING".into()));
        assert_eq!(env.message, "Resource not found");
        assert_eq!(env.message_code.as_deref(), Some("ENTERPRISE_MISSING"));
    }

    #[test]
    fn explicit_message_keeps_caller_code() {
        let env = build_envelope::<()>(StatusCode::BAD_REQUEST, None, Some("bad id".into()), None);
        assert_eq!(env.message, "bad id");
        assert_eq!(env.message_code, None);
    }

    #[test]
    fn envelope_serializes_with_null_data() {
        let env = build_envelope::<()>(StatusCode::CONFLICT, None, None, None);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "data": null,
                "message": "Conflict with current state of the resource",
                "message_code": "CONFLICT"
            })
        );
    }

    #[test]
    fn helpers_set_status() {
        assert_eq!(success_response(Some(1)).status(), StatusCode::OK);
        assert_eq!(created_response(Some(1)).status(), StatusCode::CREATED);
        assert_eq!(not_found_response().status(), StatusCode::NOT_FOUND);
    }
}
