//! Verification error taxonomy.

use thiserror::Error;

use crate::types::ErrorDetail;

/// Boxed transport-level cause (DNS, connect, timeout, body read)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every way a siteverify call can fail.
///
/// `Ok(())` is the only other outcome of a verification.
#[derive(Debug, Error)]
pub enum VerificationError {
    /// The upstream could not be reached or did not answer in time
    #[error("recaptcha siteverify request failed: {0}")]
    Transport(#[source] BoxError),

    /// The upstream answered with a non 2xx status
    #[error("recaptcha siteverify failed with a non 2xx status: {status}")]
    UpstreamStatus { status: u16, body: String },

    /// The upstream body is not the expected JSON shape
    #[error("recaptcha siteverify response parsing failed: {source}")]
    Parsing {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// The upstream rejected the token (`success: false`)
    #[error("no success")]
    NoSuccess { errors: Vec<ErrorDetail> },

    /// The token is valid but was issued for another site
    #[error("hostname mismatch. hostname={hostname}")]
    HostnameMismatch { hostname: String },
}

impl VerificationError {
    /// Returns the HTTP status code clients see for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Transport(_) | Self::UpstreamStatus { .. } | Self::Parsing { .. } => 502,
            Self::NoSuccess { .. } | Self::HostnameMismatch { .. } => 400,
        }
    }

    /// Returns true when the upstream itself misbehaved or was unreachable
    pub fn is_upstream_failure(&self) -> bool {
        self.status_code() == 502
    }

    /// Short machine-friendly name, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::UpstreamStatus { .. } => "upstream_status",
            Self::Parsing { .. } => "parsing",
            Self::NoSuccess { .. } => "no_success",
            Self::HostnameMismatch { .. } => "hostname_mismatch",
        }
    }
}
