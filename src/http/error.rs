//! Error type for the HTTP adapter.

use std::error::Error;
use std::fmt;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::error::StoreError;
use crate::etag::EntityTag;

/// Everything a contact request can fail with.
#[derive(Debug)]
pub enum ApiError {
    /// No contact with this id (or title).
    NotFound(String),
    /// The request's entity-tag preconditions did not hold.
    PreconditionFailed { current: EntityTag },
    /// A different contact already holds the client-supplied id.
    Conflict(u64),
    /// Malformed or inconsistent request body.
    Validation(String),
    /// Store infrastructure fault.
    Store(StoreError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(what) => write!(f, "not found: {}", what),
            ApiError::PreconditionFailed { current } => {
                write!(f, "precondition failed, current entity tag is {}", current)
            }
            ApiError::Conflict(id) => write!(f, "contact {} already exists", id),
            ApiError::Validation(msg) => write!(f, "invalid request: {}", msg),
            ApiError::Store(e) => write!(f, "store error: {}", e),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl ApiError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::PreconditionFailed { .. } => 412,
            ApiError::Conflict(_) => 409,
            ApiError::Validation(_) => 400,
            ApiError::Store(_) => 500,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if let ApiError::Store(e) = &self {
            error!(error = %e, "contact store failure");
        }
        let body = Json(json!({ "error": self.to_string() }));
        match self {
            ApiError::PreconditionFailed { current } => {
                (status, [(header::ETAG, current.to_string())], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}
