pub mod albums;
pub mod artists;
pub mod songs;

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::body::{parse_body, RequestBody};
use crate::routes::dispatch;
use crate::state::{AppState, HealthResponse};
use crate::utils::text_response;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(catalog_request)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

// Store stays locked for the whole handler run.
async fn catalog_request(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    bytes: Bytes,
) -> Response {
    let path = uri.path();
    info!("{} {}", method, path);

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let body = match parse_body(content_type, &bytes) {
        Ok(body) => body,
        Err(err) => {
            warn!("Rejected body for {} {}: {}", method, path, err);
            return ApiError::InvalidBody(err.to_string()).into_response();
        }
    };
    if !body.is_empty() {
        debug!(?body, "Parsed request body");
    }

    let mut catalog = state.catalog.write();
    match dispatch(&mut catalog, &method, path, &body) {
        Ok(reply) => reply.into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(&'static str),
    ValidationFailed(String),
    NoRouteMatched,
    InvalidBody(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NoRouteMatched => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(message) => write!(f, "{}", message),
            ApiError::ValidationFailed(message) => write!(f, "{}", message),
            ApiError::NoRouteMatched => write!(f, "Endpoint not found"),
            ApiError::InvalidBody(message) => write!(f, "invalid request body: {}", message),
            ApiError::Internal(message) => write!(f, "internal error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        text_response(self.status(), self.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyBody {
    Json(Value),
    Text(&'static str),
}

#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: ReplyBody,
}

impl Reply {
    pub fn ok<T: Serialize>(payload: &T) -> Result<Self, ApiError> {
        Ok(Self {
            status: StatusCode::OK,
            body: ReplyBody::Json(serde_json::to_value(payload)?),
        })
    }

    pub fn created<T: Serialize>(payload: &T) -> Result<Self, ApiError> {
        Ok(Self {
            status: StatusCode::CREATED,
            body: ReplyBody::Json(serde_json::to_value(payload)?),
        })
    }

    pub fn deleted() -> Result<Self, ApiError> {
        Ok(Self {
            status: StatusCode::OK,
            body: ReplyBody::Text("Successfully deleted"),
        })
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.body {
            ReplyBody::Json(value) => (self.status, Json(value)).into_response(),
            ReplyBody::Text(message) => text_response(self.status, message),
        }
    }
}

pub(crate) fn required_text(body: &RequestBody, key: &str) -> Result<String, ApiError> {
    body.text(key)
        .ok_or_else(|| ApiError::ValidationFailed(format!("{} is required", key)))
}
