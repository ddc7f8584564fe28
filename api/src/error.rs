use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::Envelope;

use crate::members::MemberError;

/// Everything a handler or the start-up path can fail with.
///
/// Each variant knows which status and envelope it turns into.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{action}: {source}")]
    Member {
        action: &'static str,
        #[source]
        source: MemberError,
    },
    #[error("{action}: {reason}")]
    BadRequest {
        action: &'static str,
        reason: String,
    },
    #[error("Member with id {0} not found")]
    UnknownId(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
pub type AppResult<T> = Result<T, AppError>;

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            Self::Member {
                source: source @ MemberError::NotFound(_),
                ..
            } => (StatusCode::NOT_FOUND, Envelope::failure(source.to_string())),
            Self::Member {
                action,
                source: MemberError::Storage(err),
            } => {
                tracing::error!("{action}: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::failure(action).with_error("Storage unavailable"),
                )
            }
            Self::Member { action, source } => (
                StatusCode::BAD_REQUEST,
                Envelope::failure(action).with_error(source.to_string()),
            ),
            Self::BadRequest { action, reason } => (
                StatusCode::BAD_REQUEST,
                Envelope::failure(action).with_error(reason),
            ),
            Self::UnknownId(id) => (
                StatusCode::NOT_FOUND,
                Envelope::failure(format!("Member with id {id} not found")),
            ),
            Self::Internal(err) => {
                tracing::error!("Unhandled error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::failure("Something went wrong"),
                )
            }
        };

        (status, Json(envelope)).into_response()
    }
}

/// Attaches the envelope message used when a repository call fails.
pub trait OnFailure<T> {
    fn on_failure(self, action: &'static str) -> AppResult<T>;
}

impl<T> OnFailure<T> for Result<T, MemberError> {
    fn on_failure(self, action: &'static str) -> AppResult<T> {
        self.map_err(|source| AppError::Member { action, source })
    }
}

// Start-up failures all end up as `Internal`
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.into())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.into())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Internal(err.into())
    }
}
