//! HMAC implementations for various hash algorithms.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::{CryptoError, Result};

type HmacSha256 = Hmac<Sha256>;
type HmacSha1 = Hmac<Sha1>;
type HmacSha512 = Hmac<Sha512>;

/// Hash function underlying the HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// HMAC-SHA256, the Shopify convention
    #[default]
    Sha256,
    /// HMAC-SHA1, still used by some legacy senders
    Sha1,
    /// HMAC-SHA512
    Sha512,
}

impl Algorithm {
    /// Canonical lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha1 => "sha1",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha1" => Ok(Self::Sha1),
            "sha512" => Ok(Self::Sha512),
            _ => Err(CryptoError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

/// Text rendering of the raw MAC bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// Lowercase hexadecimal
    Hex,
    /// Standard base64 with padding
    #[default]
    Base64,
}

impl Encoding {
    /// Canonical lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Base64 => "base64",
        }
    }

    fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(bytes),
            Self::Base64 => base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "base64" => Ok(Self::Base64),
            _ => Err(CryptoError::UnsupportedEncoding(s.to_string())),
        }
    }
}

fn mac_bytes<M: Mac + KeyInit>(key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(key)
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Compute the keyed digest of `body` under `secret`.
///
/// The body must be the exact bytes received; any re-serialisation
/// produces a different digest. An empty secret is rejected because a
/// zero-length key almost always means the secret was never configured.
///
/// # Arguments
/// * `body` - Raw message bytes (may be empty)
/// * `secret` - Shared secret
/// * `algorithm` - Hash function for the HMAC
/// * `encoding` - Output rendering
///
/// # Returns
/// The encoded digest, or [`CryptoError::InvalidKey`] for an empty secret
pub fn compute_digest(
    body: &[u8],
    secret: &str,
    algorithm: Algorithm,
    encoding: Encoding,
) -> Result<String> {
    if secret.is_empty() {
        return Err(CryptoError::InvalidKey("secret must not be empty".to_string()));
    }

    let key = secret.as_bytes();
    let raw = match algorithm {
        Algorithm::Sha256 => mac_bytes::<HmacSha256>(key, body)?,
        Algorithm::Sha1 => mac_bytes::<HmacSha1>(key, body)?,
        Algorithm::Sha512 => mac_bytes::<HmacSha512>(key, body)?,
    };
    Ok(encoding.encode(&raw))
}

/// Generate HMAC-SHA256 signature.
///
/// # Arguments
/// * `key` - Secret key bytes
/// * `message` - Message to sign
///
/// # Returns
/// Signature as hex string
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<String> {
    mac_bytes::<HmacSha256>(key, message).map(hex::encode)
}

/// Generate HMAC-SHA1 signature.
///
/// # Arguments
/// * `key` - Secret key bytes
/// * `message` - Message to sign
///
/// # Returns
/// Signature as hex string
pub fn hmac_sha1(key: &[u8], message: &[u8]) -> Result<String> {
    mac_bytes::<HmacSha1>(key, message).map(hex::encode)
}

/// Verify a signature against an expected value.
///
/// # Arguments
/// * `signature` - The signature to verify
/// * `expected` - The expected signature, in the same encoding
///
/// # Returns
/// Ok(()) if signatures match, Err otherwise
pub fn verify_signature(signature: &str, expected: &str) -> Result<()> {
    if crate::constant_time_eq(signature, expected) {
        Ok(())
    } else {
        Err(CryptoError::SignatureMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hmac_sha256() {
        let sig = hmac_sha256(b"secret", b"hello world").unwrap();

        assert_eq!(sig.len(), 64);
        assert_eq!(
            sig,
            "734cc62f32841568f45715aeb9f4d7891324e6d948e4c6c60c0621cdac48623a"
        );
    }

    #[test]
    fn test_hmac_sha1() {
        let sig = hmac_sha1(b"secret", b"hello world").unwrap();

        // SHA1 produces 40 hex chars
        assert_eq!(sig.len(), 40);
        assert_eq!(sig, "03376ee7ad7bbfceee98660439a4d8b125122a5a");
    }

    #[test]
    fn test_compute_digest_base64_sha256() {
        let digest =
            compute_digest(b"hello world", "secret", Algorithm::Sha256, Encoding::Base64).unwrap();
        assert_eq!(digest, "c0zGLzKEFWj0VxWuufTXiRMk5tlI5MbGDAYhzaxIYjo=");
    }

    #[test]
    fn test_compute_digest_sha1_base64() {
        let digest =
            compute_digest(b"hello world", "secret", Algorithm::Sha1, Encoding::Base64).unwrap();
        assert_eq!(digest, "Azdu5617v87umGYEOaTYsSUSKlo=");
    }

    #[test]
    fn test_compute_digest_sha512_hex() {
        let digest =
            compute_digest(b"hello world", "secret", Algorithm::Sha512, Encoding::Hex).unwrap();
        assert_eq!(
            digest,
            "6d32239b01dd1750557211629313d95e4f4fcb8ee517e443990ac1afc7562bfd\
             74ffa6118387efd9e168ff86d1da5cef4a55edc63cc4ba289c4c3a8b4f7bdfc2"
        );
    }

    #[test]
    fn test_compute_digest_hex_matches_hmac_sha256() {
        let digest =
            compute_digest(b"payload", "key", Algorithm::Sha256, Encoding::Hex).unwrap();
        assert_eq!(digest, hmac_sha256(b"key", b"payload").unwrap());
    }

    #[test]
    fn test_compute_digest_empty_body() {
        let digest = compute_digest(b"", "shhh", Algorithm::Sha256, Encoding::Base64).unwrap();
        assert_eq!(digest, "MA2FfMDLHShFJO1A/7PcgkzrigM0a77r46x+c5Ja/ng=");
    }

    #[test]
    fn test_compute_digest_rejects_empty_secret() {
        let err = compute_digest(b"body", "", Algorithm::Sha256, Encoding::Base64).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKey(_)));
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("sha256".parse::<Algorithm>().unwrap(), Algorithm::Sha256);
        assert_eq!("SHA512".parse::<Algorithm>().unwrap(), Algorithm::Sha512);
        assert_eq!(Algorithm::default(), Algorithm::Sha256);
        assert_eq!(
            "md5".parse::<Algorithm>().unwrap_err(),
            CryptoError::UnsupportedAlgorithm("md5".to_string())
        );
    }

    #[test]
    fn test_parse_encoding() {
        assert_eq!("hex".parse::<Encoding>().unwrap(), Encoding::Hex);
        assert_eq!(Encoding::default(), Encoding::Base64);
        assert!(matches!(
            "base32".parse::<Encoding>(),
            Err(CryptoError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_verify_signature_match() {
        let sig = "abc123";
        assert!(verify_signature(sig, sig).is_ok());
    }

    #[test]
    fn test_verify_signature_mismatch() {
        assert_eq!(
            verify_signature("abc123", "def456"),
            Err(CryptoError::SignatureMismatch)
        );
    }

    proptest! {
        #[test]
        fn prop_digest_is_deterministic(
            body in proptest::collection::vec(any::<u8>(), 0..256),
            secret in "[a-zA-Z0-9]{1,32}",
        ) {
            let first = compute_digest(&body, &secret, Algorithm::Sha256, Encoding::Base64).unwrap();
            let second = compute_digest(&body, &secret, Algorithm::Sha256, Encoding::Base64).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_single_byte_flip_changes_digest(
            body in proptest::collection::vec(any::<u8>(), 1..256),
            secret in "[a-zA-Z0-9]{1,32}",
            index in any::<proptest::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut tampered = body.clone();
            let i = index.index(tampered.len());
            tampered[i] ^= 1 << bit;

            let original = compute_digest(&body, &secret, Algorithm::Sha256, Encoding::Hex).unwrap();
            let flipped = compute_digest(&tampered, &secret, Algorithm::Sha256, Encoding::Hex).unwrap();
            prop_assert_ne!(original, flipped);
        }
    }
}
