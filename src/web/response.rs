//! Mapping of ledger errors onto HTTP responses.
//!
//! Caller-caused errors carry a specific message. Upstream failures are logged in
//! full here and answered with a generic message only.

use crate::errors::Error;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, error};

const GENERIC_FAILURE: &str = "服务器错误，请稍后重试";
const MALFORMED_BODY: &str = "请求格式错误";

/// Body of every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// User-facing message
    pub message: String,
}

impl Error {
    /// HTTP status and user-facing message for this error.
    #[must_use]
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::ParticipantNotFound { .. } => (StatusCode::NOT_FOUND, "用户不存在".to_string()),
            Self::BoothNotFound { .. } => (StatusCode::NOT_FOUND, "摊位不存在".to_string()),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "密码错误".to_string()),
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "未登录".to_string()),
            Self::SessionExpired => (StatusCode::UNAUTHORIZED, "登录已过期".to_string()),
            Self::InsufficientFunds { .. } => (
                StatusCode::BAD_REQUEST,
                "余额不足，请检查账户余额".to_string(),
            ),
            Self::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Config { .. }
            | Self::Database(_)
            | Self::PasswordHash { .. }
            | Self::Token { .. }
            | Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_FAILURE.to_string(),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.is_upstream() {
            error!(error = %self, "Request failed on an upstream call");
        }
        let (status, message) = self.status_and_message();
        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        debug!(rejection = %rejection.body_text(), "Rejected request body");
        Self::Validation {
            message: MALFORMED_BODY.to_string(),
        }
    }
}
