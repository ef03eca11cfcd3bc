//! reCAPTCHA v2 siteverify integration.
//!
//! One form-encoded POST per verification, classified into
//! [`VerificationError`](recaptcha_common::VerificationError) variants.

mod client;

pub use client::SiteVerifyClient;
