//! Application state and shared resources.

use anyhow::Result;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::login::{AcknowledgeLogin, LoginHandler};
use crate::siteverify::SiteVerifyClient;

/// Shared application state, read-only after startup
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// Siteverify client
    pub siteverify: Arc<SiteVerifyClient>,

    /// Receives verified logins
    pub login_handler: Arc<dyn LoginHandler>,
}

impl AppState {
    /// Create new application state with the default login handler
    pub fn new(config: AppConfig) -> Result<Self> {
        let siteverify = Arc::new(SiteVerifyClient::new(&config.recaptcha)?);

        Ok(Self {
            config: Arc::new(config),
            siteverify,
            login_handler: Arc::new(AcknowledgeLogin),
        })
    }

    /// Replace the login handler
    #[cfg(test)]
    pub fn with_login_handler(mut self, handler: Arc<dyn LoginHandler>) -> Self {
        self.login_handler = handler;
        self
    }
}
