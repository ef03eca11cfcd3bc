//! Configuration management for reCAPTCHA Gate.

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use recaptcha_common::constants::{
    DEFAULT_EXPECTED_HOSTNAME, DEFAULT_LISTEN_HOST, DEFAULT_LISTEN_PORT,
    DEFAULT_UPSTREAM_TIMEOUT_SECS, SITEVERIFY_BASE_URL, SITEVERIFY_PATH,
};

/// Environment variable prefix, e.g. `RECAPTCHA_GATE__SERVER__PORT=9000`
const ENV_PREFIX: &str = "RECAPTCHA_GATE";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Siteverify upstream configuration
    #[serde(default)]
    pub recaptcha: RecaptchaConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Take the caller address from `X-Forwarded-For` when present.
    /// Only enable behind a reverse proxy that overwrites the header.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            trust_forwarded_for: false,
        }
    }
}

/// Siteverify upstream configuration
#[derive(Clone, Deserialize)]
pub struct RecaptchaConfig {
    /// Shared secret registered with reCAPTCHA
    #[serde(default)]
    pub secret: String,

    /// Hostname the tokens must have been issued for
    #[serde(default = "default_expected_hostname")]
    pub hostname: String,

    /// API base URL, `/siteverify` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upstream call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            hostname: default_expected_hostname(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl fmt::Debug for RecaptchaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecaptchaConfig")
            .field("secret", &"<redacted>")
            .field("hostname", &self.hostname)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RecaptchaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full siteverify endpoint URL
    pub fn siteverify_url(&self) -> Result<reqwest::Url> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), SITEVERIFY_PATH);
        let url = reqwest::Url::parse(&url)
            .with_context(|| format!("Invalid recaptcha base_url: {}", self.base_url))?;
        ensure!(
            matches!(url.scheme(), "http" | "https"),
            "recaptcha base_url must be http or https, got {}",
            url.scheme()
        );
        Ok(url)
    }
}

// Default value functions
fn default_host() -> String { DEFAULT_LISTEN_HOST.to_string() }
fn default_port() -> u16 { DEFAULT_LISTEN_PORT }
fn default_expected_hostname() -> String { DEFAULT_EXPECTED_HOSTNAME.to_string() }
fn default_base_url() -> String { SITEVERIFY_BASE_URL.to_string() }
fn default_timeout() -> u64 { DEFAULT_UPSTREAM_TIMEOUT_SECS }

impl AppConfig {
    /// Load configuration from file and environment, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut builder = config::Config::builder();

        if Path::new(config_path).exists() {
            builder = builder.add_source(config::File::with_name(config_path));
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
        }

        let mut config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load config")?
            .try_deserialize()
            .context("Failed to parse config")?;

        // Apply CLI overrides
        if let Some(ref host) = args.host {
            config.server.host = host.clone();
        }
        if let Some(port) = args.port {
            config.server.port = port;
        }
        if let Some(ref secret) = args.recaptcha_secret {
            config.recaptcha.secret = secret.clone();
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.recaptcha.hostname.is_empty(),
            "recaptcha.hostname must not be empty"
        );
        ensure!(
            self.recaptcha.timeout_secs > 0,
            "recaptcha.timeout_secs must be greater than zero"
        );
        self.recaptcha.siteverify_url()?;
        Ok(())
    }

    /// Address passed to the TCP listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Args;

    fn args(config: &str) -> Args {
        Args {
            config: config.to_string(),
            host: None,
            port: None,
            recaptcha_secret: None,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::load("does/not/exist.toml", &args("does/not/exist.toml")).unwrap();
        assert_eq!(config.listen_addr(), "localhost:8081");
        assert_eq!(config.recaptcha.hostname, "localhost");
        assert_eq!(config.recaptcha.timeout(), Duration::from_secs(5));
        assert!(!config.server.trust_forwarded_for);
        assert_eq!(
            config.recaptcha.siteverify_url().unwrap().as_str(),
            "https://www.google.com/recaptcha/api/siteverify"
        );
    }

    #[test]
    fn test_file_and_cli_overrides() {
        let path = std::env::temp_dir().join(format!("recaptcha-gate-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
[server]
host = "0.0.0.0"
port = 9000

[recaptcha]
secret = "from-file"
hostname = "example.com"
base_url = "http://127.0.0.1:3000/recaptcha/api/"
timeout_secs = 2
"#,
        )
        .unwrap();
        let path = path.to_string_lossy().to_string();

        let config = AppConfig::load(&path, &args(&path)).unwrap();
        assert_eq!(config.listen_addr(), "0.0.0.0:9000");
        assert_eq!(config.recaptcha.secret, "from-file");
        assert_eq!(config.recaptcha.hostname, "example.com");
        assert_eq!(
            config.recaptcha.siteverify_url().unwrap().as_str(),
            "http://127.0.0.1:3000/recaptcha/api/siteverify"
        );

        let mut cli = args(&path);
        cli.port = Some(9100);
        cli.recaptcha_secret = Some("from-cli".to_string());
        let config = AppConfig::load(&path, &cli).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.recaptcha.secret, "from-cli");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.recaptcha.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.recaptcha.timeout_secs = 5;
        config.recaptcha.hostname.clear();
        assert!(config.validate().is_err());

        config.recaptcha.hostname = "localhost".to_string();
        config.recaptcha.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.recaptcha.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = RecaptchaConfig {
            secret: "6LeIxAcTAAAAAGG".to_string(),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("6LeIxAcTAAAAAGG"));
    }
}
