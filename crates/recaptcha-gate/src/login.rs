//! Hook invoked with a login submission once its token has been verified.

use anyhow::Result;
use recaptcha_common::DemoPayload;

/// Acts on a login whose reCAPTCHA token passed verification.
///
/// An error here is not part of the verification taxonomy and surfaces to
/// the caller as a 500.
pub trait LoginHandler: Send + Sync {
    fn accept(&self, login: &DemoPayload) -> Result<()>;
}

/// Default handler: acknowledges the login without acting on it
#[derive(Debug, Default)]
pub struct AcknowledgeLogin;

impl LoginHandler for AcknowledgeLogin {
    fn accept(&self, login: &DemoPayload) -> Result<()> {
        tracing::debug!(username = %login.username, "Login accepted");
        Ok(())
    }
}
