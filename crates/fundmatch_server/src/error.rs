//! HTTP error taxonomy.
//!
//! Every core failure is recovered here and rendered as a JSON body.
//! Storage causes are logged, never echoed to the caller.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fundmatch_core::db::DbError;
use fundmatch_core::{CannotInvestReason, RepoError, ServiceError, ValidationError};
use log::error;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown id, or a path id that is not a UUID.
    #[error("not found")]
    NotFound,

    #[error("invalid payload: {0}")]
    Validation(ValidationError),

    /// Body is not JSON or has wrongly typed values.
    #[error("malformed body: {0}")]
    MalformedBody(String),

    #[error("cannot edit funded project")]
    EditFundedProject,

    #[error("project has been funded")]
    ProjectFunded,

    #[error("cannot invest: {0}")]
    CannotInvest(CannotInvestReason),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_)
            | Self::MalformedBody(_)
            | Self::EditFundedProject
            | Self::ProjectFunded
            | Self::CannotInvest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::NotFound => json!({ "details": "Not found." }),
            Self::Validation(errors) => json!(errors),
            Self::MalformedBody(message) => json!({ "non_field_errors": [message] }),
            Self::EditFundedProject => json!({ "details": "Cannot edit funded project." }),
            Self::ProjectFunded => json!({ "details": "This project has been funded." }),
            Self::CannotInvest(reason) => json!({ "details": reason.to_string() }),
            Self::Internal(cause) => {
                error!("event=http_error module=server status=error cause={cause}");
                json!({ "details": "Internal server error." })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::ProjectNotFound(_) | ServiceError::InvestorNotFound(_) => Self::NotFound,
            ServiceError::Validation(errors) => Self::Validation(errors),
            ServiceError::EditFundedProject(_) => Self::EditFundedProject,
            ServiceError::ProjectAlreadyFunded(_) => Self::ProjectFunded,
            ServiceError::CannotInvest(reason) => Self::CannotInvest(reason),
            ServiceError::Repo(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        ServiceError::from(value).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::MalformedBody(value.body_text())
    }
}

/// Failures that stop the server before it accepts requests.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("logging: {0}")]
    Logging(String),

    #[error("database: {0}")]
    Database(#[from] DbError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
