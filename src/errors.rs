use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidSubmission(String),

    #[error("{1}")]
    RequestRejected(StatusCode, String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Env error: {0}")]
    EnvError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error")]
    InternalError,
}

impl AppError {
    pub fn to_response(&self) -> (StatusCode, String) {
        match self {
            AppError::InvalidSubmission(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::RequestRejected(status, msg) => (*status, msg.clone()),
            AppError::StorageFailure(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::EnvError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected server error".into(),
            ),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::StorageFailure(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_response().into_response()
    }
}
