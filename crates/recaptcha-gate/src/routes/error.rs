//! Mapping of handler failures to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use recaptcha_common::{ApiErrorBody, VerificationError};

/// Everything a handler can fail with
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed shape validation
    #[error("invalid payload")]
    InvalidPayload,

    /// Siteverify rejected the token or could not be used
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// Anything outside the verification taxonomy
    #[error("internal error: {0}")]
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidPayload => {
                (StatusCode::BAD_REQUEST, Json(ApiErrorBody::bad_request())).into_response()
            }
            Self::Verification(err) => verification_response(err),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "Unhandled error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

fn verification_response(err: VerificationError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if err.is_upstream_failure() {
        return (status, "Bad Gateway").into_response();
    }

    let message = err.to_string();
    let errors = match err {
        VerificationError::NoSuccess { errors } => errors,
        _ => Vec::new(),
    };
    (status, Json(ApiErrorBody::new(message, errors))).into_response()
}
