//! Core types shared across reCAPTCHA Gate components.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decode a JSON document that must be an object.
///
/// Derived struct deserializers also accept arrays positionally, which
/// neither the siteverify body nor the inbound payload may be.
fn decode_object<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    let object: Map<String, Value> = serde_json::from_slice(bytes)?;
    serde_json::from_value(Value::Object(object))
}

/// Decoded siteverify response body.
///
/// Success example:
/// ```json
/// { "success": true, "challenge_ts": "2022-07-16T11:10:30Z", "hostname": "localhost" }
/// ```
///
/// Failure example:
/// ```json
/// { "success": false, "error-codes": ["missing-input-secret"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteVerifyResponse {
    pub success: bool,

    /// Present only when `success` is false
    #[serde(rename = "error-codes", default, skip_serializing_if = "Option::is_none")]
    pub error_codes: Option<Vec<String>>,

    /// Hostname of the site where the challenge was solved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Challenge load timestamp (ISO 8601), not validated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_ts: Option<String>,
}

impl SiteVerifyResponse {
    /// Decode an upstream body; anything but a JSON object is rejected
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        decode_object(body.as_bytes())
    }

    /// Map the upstream error codes, in order, to code/reason pairs
    pub fn error_details(&self) -> Vec<ErrorDetail> {
        self.error_codes
            .iter()
            .flatten()
            .map(|code| ErrorDetail::from_code(code))
            .collect()
    }
}

/// Error codes documented for the siteverify API.
///
/// See <https://developers.google.com/recaptcha/docs/verify#error_code_reference>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiteVerifyErrorCode {
    MissingInputSecret,
    InvalidInputSecret,
    MissingInputResponse,
    InvalidInputResponse,
    BadRequest,
    TimeoutOrDuplicate,
}

impl SiteVerifyErrorCode {
    pub const ALL: [SiteVerifyErrorCode; 6] = [
        Self::MissingInputSecret,
        Self::InvalidInputSecret,
        Self::MissingInputResponse,
        Self::InvalidInputResponse,
        Self::BadRequest,
        Self::TimeoutOrDuplicate,
    ];

    /// Wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingInputSecret => "missing-input-secret",
            Self::InvalidInputSecret => "invalid-input-secret",
            Self::MissingInputResponse => "missing-input-response",
            Self::InvalidInputResponse => "invalid-input-response",
            Self::BadRequest => "bad-request",
            Self::TimeoutOrDuplicate => "timeout-or-duplicate",
        }
    }

    /// Human readable explanation
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingInputSecret => "The secret parameter is missing",
            Self::InvalidInputSecret => "The secret parameter is invalid or malformed",
            Self::MissingInputResponse => "The response parameter is missing",
            Self::InvalidInputResponse => "The response parameter is invalid or malformed",
            Self::BadRequest => "The request is invalid or malformed",
            Self::TimeoutOrDuplicate => {
                "The response is no longer valid: either is too old or has been used previously"
            }
        }
    }

    /// Look up a wire code; `None` for codes outside the reference table
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|known| known.as_str() == code)
    }
}

impl fmt::Display for SiteVerifyErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One upstream error code with its explanation, as returned to API clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,

    /// Absent for codes outside the reference table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ErrorDetail {
    pub fn from_code(code: &str) -> Self {
        Self {
            code: code.to_string(),
            reason: SiteVerifyErrorCode::from_code(code).map(|known| known.reason().to_string()),
        }
    }
}

/// JSON error body returned on 400 responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    pub errors: Vec<ErrorDetail>,
}

impl ApiErrorBody {
    pub fn new(message: impl Into<String>, errors: Vec<ErrorDetail>) -> Self {
        Self {
            message: message.into(),
            errors,
        }
    }

    /// Body for payloads that fail shape validation
    pub fn bad_request() -> Self {
        Self::new("Bad Request", Vec::new())
    }
}

/// Login-like form submission guarded by reCAPTCHA v2.
///
/// Every field must be a JSON string; unknown fields are ignored.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoPayload {
    pub username: String,
    pub password: String,
    pub recaptcha_response_token: String,
}

impl DemoPayload {
    /// Decode a request body; anything but a JSON object is rejected
    pub fn from_json(body: &[u8]) -> serde_json::Result<Self> {
        decode_object(body)
    }
}

impl fmt::Debug for DemoPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DemoPayload")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("recaptcha_response_token", &self.recaptcha_response_token)
            .finish()
    }
}
