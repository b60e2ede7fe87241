use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use backoffice_core::{Error as CoreError, ErrorKind};
use serde::Serialize;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => match e.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::StateConflict => StatusCode::CONFLICT,
                ErrorKind::ExternalFeed => StatusCode::BAD_GATEWAY,
                ErrorKind::Calculation | ErrorKind::Persistence | ErrorKind::Internal => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::Core(e) => {
                let message = if e.is_user_facing() || e.kind() == ErrorKind::ExternalFeed {
                    e.to_string()
                } else {
                    "The request could not be completed".to_string()
                };
                ErrorBody {
                    code: e.code(),
                    kind: e.kind(),
                    message,
                }
            }
            ApiError::Internal(_) => ErrorBody {
                code: "INTERNAL_ERROR",
                kind: ErrorKind::Internal,
                message: "The request could not be completed".to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(self.body())).into_response()
    }
}
