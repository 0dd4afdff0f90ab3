use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub fn text_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, message.into()).into_response()
}
