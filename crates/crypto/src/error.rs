//! Error types for the crypto crate.

use thiserror::Error;

/// Result type alias for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur during crypto operations.
///
/// Only configuration-class problems are errors. A signature that does not
/// match is a normal `false` from the verification functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature verification failed
    #[error("Signature mismatch")]
    SignatureMismatch,

    /// Invalid key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Hash algorithm identifier is not one we can compute
    #[error("Unsupported HMAC algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Digest encoding identifier is not one we can render
    #[error("Unsupported digest encoding: {0}")]
    UnsupportedEncoding(String),
}
