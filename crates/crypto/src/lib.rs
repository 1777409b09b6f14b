//! Cryptographic primitives for webhook verification.
//!
//! This crate provides:
//! - Keyed digests (HMAC-SHA256/SHA1/SHA512, hex or base64)
//! - Constant-time comparison for security
//! - Provider-specific webhook verification (Shopify)
//!
//! # Example
//!
//! ```rust
//! use shopguard_crypto::{compute_digest, verify_shopify_webhook, Algorithm, Encoding};
//!
//! let body = br#"{"id":1}"#;
//! let signature = compute_digest(body, "shhh", Algorithm::Sha256, Encoding::Base64).unwrap();
//!
//! assert!(verify_shopify_webhook(body, "shhh", Some(&signature)));
//! assert!(!verify_shopify_webhook(body, "shhh", None));
//! ```

#![warn(missing_docs)]

mod error;
mod hmac_impl;
mod provider;
mod timing;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::{CryptoError, Result};
pub use hmac_impl::{compute_digest, hmac_sha1, hmac_sha256, verify_signature, Algorithm, Encoding};
pub use provider::{verify_shopify_webhook, Provider, SHOPIFY_HMAC_HEADER};
pub use timing::{constant_time_compare, constant_time_eq};
