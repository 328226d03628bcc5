//! Response builders shared by the webhook handler.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Returns a 200 OK response with `{"status": "ok"}`.
#[must_use]
pub fn ok_status() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: StatusCode, message: &str) -> Response {
    (status_code, Json(json!({ "error": message }))).into_response()
}
