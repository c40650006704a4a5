use crate::auth::AuthError;
use crate::repository::RepositoryError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use log::{error, warn};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Failures surfaced to API clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest,
    #[error("resource not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable")]
    Unprocessable,
    #[error(transparent)]
    Auth(AuthError),
    #[error("Internal Server Error")]
    Server,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Auth(err) => err.status_code(),
            Self::Server => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body of every failed request
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Always false
    pub success: bool,
    /// HTTP status code of the response
    pub error: u16,
    /// Authentication failure kind, present only for token and permission errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();
        let code = match &self {
            Self::Auth(err) => Some(err.code().to_string()),
            _ => None,
        };
        let body = ErrorBody {
            success: false,
            error: status_code.as_u16(),
            code,
            message: self.to_string(),
        };
        (status_code, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            // Not the token's fault: the issuer could not be reached
            AuthError::KeySetUnavailable(_) => Self::Server,
            err => Self::Auth(err),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Empty | RepositoryError::EmptyTitle => Self::BadRequest,
            RepositoryError::NotFound(_) => Self::NotFound,
            err => {
                error!("Drink store failure: {}", err);
                Self::Server
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        match rejection {
            JsonRejection::JsonDataError(_) => Self::Unprocessable,
            _ => Self::BadRequest,
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        warn!("Rejected request path: {}", rejection.body_text());
        Self::NotFound
    }
}
