//! Siteverify HTTP client.

use anyhow::{Context, Result};
use recaptcha_common::constants::form_fields;
use recaptcha_common::{SiteVerifyResponse, VerificationError};
use reqwest::header::ACCEPT;

use crate::config::RecaptchaConfig;

/// Verifies reCAPTCHA tokens against the siteverify API
pub struct SiteVerifyClient {
    http: reqwest::Client,
    endpoint: reqwest::Url,
    secret: String,
    expected_hostname: String,
}

impl SiteVerifyClient {
    pub fn new(config: &RecaptchaConfig) -> Result<Self> {
        let endpoint = config.siteverify_url()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            // 3xx is an upstream status failure
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("Failed to build siteverify HTTP client")?;

        Ok(Self {
            http,
            endpoint,
            secret: config.secret.clone(),
            expected_hostname: config.hostname.clone(),
        })
    }

    /// Verify a challenge response token.
    ///
    /// The token is forwarded as-is; an empty token comes back from the
    /// upstream as `missing-input-response`.
    ///
    /// See <https://developers.google.com/recaptcha/docs/verify>
    pub async fn verify(&self, token: &str, remote_ip: &str) -> Result<(), VerificationError> {
        let params = [
            (form_fields::SECRET, self.secret.as_str()),
            (form_fields::RESPONSE, token),
            (form_fields::REMOTE_IP, remote_ip),
        ];

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|err| VerificationError::Transport(Box::new(err)))?;

        let status = response.status();
        if !status.is_success() {
            // Kept for diagnostics only
            let body = response.text().await.unwrap_or_default();
            return Err(VerificationError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| VerificationError::Transport(Box::new(err)))?;

        let decoded = match SiteVerifyResponse::from_json(&body) {
            Ok(decoded) => decoded,
            Err(source) => return Err(VerificationError::Parsing { source, body }),
        };

        if !decoded.success {
            return Err(VerificationError::NoSuccess {
                errors: decoded.error_details(),
            });
        }

        // https://developers.google.com/recaptcha/docs/domain_validation
        let hostname = decoded.hostname.unwrap_or_default();
        if hostname != self.expected_hostname {
            return Err(VerificationError::HostnameMismatch { hostname });
        }

        tracing::debug!(
            hostname = %hostname,
            challenge_ts = ?decoded.challenge_ts,
            "siteverify accepted token"
        );

        Ok(())
    }
}
