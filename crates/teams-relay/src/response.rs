//! JSON error responses.
//!
//! Error bodies are always `{"detail": "..."}` with a fixed, caller-safe message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub const INVALID_REQUEST: &str = "Invalid request.";
pub const SEND_FAILED: &str = "Failed to send message.";
pub const TIMED_OUT: &str = "Request timed out.";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: &'static str,
}

pub fn error(status: StatusCode, detail: &'static str) -> Response {
    (status, Json(ErrorBody { detail })).into_response()
}

pub fn bad_request() -> Response {
    error(StatusCode::BAD_REQUEST, INVALID_REQUEST)
}

pub fn internal_error() -> Response {
    error(StatusCode::INTERNAL_SERVER_ERROR, SEND_FAILED)
}
