//! HTTP-facing error mapping.
//!
//! Every client-visible failure collapses to `404 Not Found`; storage failures
//! become `500` and are logged.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use log::error;
use squirrel_core::{DbError, RepoError};
use thiserror::Error;

const TEXT_PLAIN: &str = "text/plain";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown route, malformed id, or no live record with that id.
    #[error("404 Not Found")]
    NotFound,
    #[error("storage failure: {0}")]
    Internal(String),
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => plain_text(StatusCode::NOT_FOUND, "404 Not Found"),
            Self::Internal(message) => {
                error!("event=http_error module=server status=error error={message}");
                plain_text(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
            }
        }
    }
}

/// Failure while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to open squirrel database: {0}")]
    Db(#[from] DbError),
    #[error("server i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

fn plain_text(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
}
