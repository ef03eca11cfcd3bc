//! Shared constants for reCAPTCHA Gate components.

/// Default HTTP listen host
pub const DEFAULT_LISTEN_HOST: &str = "localhost";

/// Default HTTP listen port
pub const DEFAULT_LISTEN_PORT: u16 = 8081;

/// Default hostname the tokens must have been issued for
pub const DEFAULT_EXPECTED_HOSTNAME: &str = "localhost";

/// Google reCAPTCHA API base URL
pub const SITEVERIFY_BASE_URL: &str = "https://www.google.com/recaptcha/api";

/// Siteverify operation path, appended to the base URL
pub const SITEVERIFY_PATH: &str = "/siteverify";

/// Upstream call timeout (seconds)
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 5;

/// HTTP route paths
pub mod routes {
    /// Demo login endpoint guarded by reCAPTCHA v2
    pub const DEMO_RECAPTCHA_V2: &str = "/api/demo-recaptcha-v2-endpoint";

    /// Liveness probe
    pub const HEALTH: &str = "/health";
}

/// Siteverify form field names
pub mod form_fields {
    pub const SECRET: &str = "secret";
    pub const RESPONSE: &str = "response";
    pub const REMOTE_IP: &str = "remoteip";
}

/// HTTP header names
pub mod headers {
    /// Client address chain set by reverse proxies
    pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
}
