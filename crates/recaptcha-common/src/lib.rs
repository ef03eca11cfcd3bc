//! # reCAPTCHA Common
//!
//! Shared types and utilities used by the reCAPTCHA Gate service.
//!
//! ## Modules
//! - `types` - Siteverify wire format, inbound payloads, API error bodies
//! - `error` - The verification error taxonomy
//! - `constants` - Defaults, upstream endpoints, route paths

pub mod constants;
pub mod error;
pub mod types;

pub use error::VerificationError;
pub use types::*;
