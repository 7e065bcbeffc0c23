use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::views;

/// Failures that terminate a request.
///
/// User-correctable problems (bad form input, duplicate email) never reach
/// this type; handlers flash a message and redirect or re-render instead.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("not found")]
    NotFound,

    #[error("forbidden")]
    Forbidden,

    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("session error: {0}")]
    SessionError(#[from] jsonwebtoken::errors::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("could not generate a unique {0}")]
    GenerationExhausted(&'static str),

    #[error(transparent)]
    ServerError(#[from] anyhow::Error),
}

pub type RequestResult<T> = Result<T, RequestError>;

impl RequestError {
    /// True when the underlying database error is a UNIQUE constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            RequestError::DatabaseError(sqlx::Error::Database(e)) => e.is_unique_violation(),
            _ => false,
        }
    }

    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            RequestError::NotFound => (StatusCode::NOT_FOUND, "Page Not Found"),
            RequestError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            RequestError::DatabaseError(e) => {
                tracing::error!(error = %e, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            RequestError::SessionError(e) => {
                tracing::error!(error = %e, "session cookie error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            RequestError::PasswordHash(e) => {
                tracing::error!(error = %e, "password hashing error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            RequestError::GenerationExhausted(what) => {
                tracing::error!(what, "unique value generation exhausted");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            RequestError::ServerError(e) => {
                tracing::error!(error = %e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let page = views::error_page(status, message);
        (status, Html(page.into_string())).into_response()
    }
}
