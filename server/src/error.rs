//! Error types for the gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::rpc::BackendError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("method not allowed")]
    MethodNotAllowed,

    /// A backend call failed. `message` is what the caller sees, `source`
    /// is only logged.
    #[error("{message}")]
    Backend {
        message: String,
        #[source]
        source: BackendError,
    },

    #[error("notification service unavailable")]
    BadGateway(#[source] reqwest::Error),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn backend(message: impl Into<String>, source: BackendError) -> Self {
        AppError::Backend {
            message: message.into(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Backend { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Backend { message, source } => {
                tracing::error!(error = %source, "{}", message);
            }
            AppError::BadGateway(e) => {
                tracing::error!(error = %e, "Notification upstream unreachable");
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
            }
            _ => {}
        }

        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
