//! Login-like demo endpoint guarded by reCAPTCHA v2.

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
};
use std::net::SocketAddr;

use recaptcha_common::constants::{headers, routes};
use recaptcha_common::{DemoPayload, VerificationError};

use super::ApiError;
use crate::state::AppState;

/// Verify the submitted reCAPTCHA token, then hand the login over.
///
/// Returns:
/// - 200: Token verified, empty body
/// - 400: Invalid payload, token rejected, or hostname mismatch
/// - 502: Siteverify unreachable or misbehaving
/// - 500: Login handler failed
pub async fn demo_recaptcha_v2(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request_headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    if !is_json_content_type(&request_headers) {
        tracing::warn!(
            route = routes::DEMO_RECAPTCHA_V2,
            content_type = ?request_headers.get(CONTENT_TYPE),
            "Invalid payload: not application/json"
        );
        return Err(ApiError::InvalidPayload);
    }

    let payload = DemoPayload::from_json(&body).map_err(|err| {
        tracing::warn!(
            route = routes::DEMO_RECAPTCHA_V2,
            error = %err,
            "Invalid payload"
        );
        ApiError::InvalidPayload
    })?;

    let remote_ip = client_ip(&request_headers, peer, state.config.server.trust_forwarded_for);

    if let Err(err) = state
        .siteverify
        .verify(&payload.recaptcha_response_token, &remote_ip)
        .await
    {
        log_rejection(&err, &remote_ip);
        return Err(err.into());
    }

    state
        .login_handler
        .accept(&payload)
        .map_err(ApiError::Internal)?;

    tracing::info!(remote_ip = %remote_ip, "Request succeeded");
    Ok(StatusCode::OK)
}

/// `application/json`, parameters such as `charset` allowed
fn is_json_content_type(request_headers: &HeaderMap) -> bool {
    request_headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Caller address sent to siteverify as `remoteip`
fn client_ip(request_headers: &HeaderMap, peer: SocketAddr, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = request_headers
            .get(headers::X_FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}

fn log_rejection(err: &VerificationError, remote_ip: &str) {
    match err {
        VerificationError::Transport(source) => {
            tracing::warn!(kind = err.kind(), error = %source, "Siteverify unreachable");
        }
        VerificationError::UpstreamStatus { status, body } => {
            tracing::warn!(kind = err.kind(), status, body = %body, "{}", err);
        }
        VerificationError::Parsing { body, .. } => {
            tracing::warn!(kind = err.kind(), body = %body, "{}", err);
        }
        VerificationError::NoSuccess { errors } => {
            tracing::warn!(kind = err.kind(), remote_ip, errors = ?errors, "Token rejected");
        }
        VerificationError::HostnameMismatch { .. } => {
            tracing::warn!(kind = err.kind(), remote_ip, "{}", err);
        }
    }
}
