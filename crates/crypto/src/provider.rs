//! Provider-specific webhook verification.
//!
//! Each sender signs its webhooks with a fixed convention: a hash algorithm,
//! an output encoding and the header that carries the result. Those live
//! here and nowhere else.

use tracing::{debug, error};

use crate::{compute_digest, constant_time_eq, Algorithm, Encoding, Result};

/// Header Shopify puts the base64 HMAC-SHA256 signature in.
pub const SHOPIFY_HMAC_HEADER: &str = "x-shopify-hmac-sha256";

/// Known webhook senders and their signing conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provider {
    /// Shopify: HMAC-SHA256 over the raw body, base64, `X-Shopify-Hmac-SHA256`
    #[default]
    Shopify,
}

impl Provider {
    /// Hash algorithm the provider signs with.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Shopify => Algorithm::Sha256,
        }
    }

    /// Encoding of the signature header value.
    pub fn encoding(&self) -> Encoding {
        match self {
            Self::Shopify => Encoding::Base64,
        }
    }

    /// Canonical (lowercase) name of the signature header.
    pub fn header_name(&self) -> &'static str {
        match self {
            Self::Shopify => SHOPIFY_HMAC_HEADER,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Shopify => "shopify",
        }
    }

    /// Compute the signature this provider would send for `raw_body`.
    pub fn sign(&self, raw_body: &[u8], secret: &str) -> Result<String> {
        compute_digest(raw_body, secret, self.algorithm(), self.encoding())
    }

    /// Decide whether `signature` authenticates `raw_body`.
    ///
    /// A missing or empty header is a failure, not an error. The header is
    /// trimmed of surrounding whitespace and otherwise compared verbatim, in
    /// constant time. A digest that cannot be computed (empty secret) also
    /// resolves to `false`.
    pub fn verify(&self, raw_body: &[u8], secret: &str, signature: Option<&str>) -> bool {
        let Some(signature) = signature.filter(|s| !s.is_empty()) else {
            debug!(provider = self.name(), "webhook signature header absent");
            return false;
        };

        let expected = match self.sign(raw_body, secret) {
            Ok(digest) => digest,
            Err(e) => {
                error!(provider = self.name(), error = %e, "cannot compute webhook digest");
                return false;
            }
        };

        constant_time_eq(&expected, signature.trim())
    }
}

/// Verify a Shopify webhook.
///
/// # Arguments
/// * `raw_body` - Exact request body bytes, captured before any parsing
/// * `secret` - The app's webhook signing secret
/// * `hmac_header` - Value of `X-Shopify-Hmac-SHA256`, if present
///
/// # Returns
/// true only when the header carries the correct signature
pub fn verify_shopify_webhook(raw_body: &[u8], secret: &str, hmac_header: Option<&str>) -> bool {
    Provider::Shopify.verify(raw_body, secret, hmac_header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BODY: &[u8] = br#"{"id":1}"#;
    const SECRET: &str = "shhh";
    const SIGNATURE: &str = "Lcc9Yf2U6zbkFFL44wuL0uEJMTo4Q8mC5iIG3KWCtLA=";

    #[test]
    fn test_known_signature_verifies() {
        assert_eq!(Provider::Shopify.sign(BODY, SECRET).unwrap(), SIGNATURE);
        assert!(verify_shopify_webhook(BODY, SECRET, Some(SIGNATURE)));
    }

    #[test]
    fn test_other_strings_rejected() {
        assert!(!verify_shopify_webhook(BODY, SECRET, Some("nope")));
        assert!(!verify_shopify_webhook(BODY, SECRET, Some(&SIGNATURE.to_lowercase())));
        assert!(!verify_shopify_webhook(BODY, "wrong", Some(SIGNATURE)));
        assert!(!verify_shopify_webhook(br#"{"id": 1}"#, SECRET, Some(SIGNATURE)));
    }

    #[test]
    fn test_absent_header_rejected() {
        assert!(!verify_shopify_webhook(BODY, SECRET, None));
    }

    #[test]
    fn test_empty_header_rejected() {
        assert!(!verify_shopify_webhook(BODY, SECRET, Some("")));
        assert!(!verify_shopify_webhook(BODY, SECRET, Some("   ")));
    }

    #[test]
    fn test_padded_header_accepted() {
        let padded = format!("  {SIGNATURE}\n");
        assert!(verify_shopify_webhook(BODY, SECRET, Some(&padded)));
    }

    #[test]
    fn test_empty_secret_never_verifies() {
        assert!(!verify_shopify_webhook(BODY, "", Some(SIGNATURE)));
    }

    #[test]
    fn test_shopify_convention() {
        let provider = Provider::default();
        assert_eq!(provider.algorithm(), Algorithm::Sha256);
        assert_eq!(provider.encoding(), Encoding::Base64);
        assert_eq!(provider.header_name(), "x-shopify-hmac-sha256");
    }

    proptest! {
        #[test]
        fn prop_absent_header_always_false(
            body in proptest::collection::vec(any::<u8>(), 0..128),
            secret in ".{0,32}",
        ) {
            prop_assert!(!verify_shopify_webhook(&body, &secret, None));
        }

        #[test]
        fn prop_round_trip_verifies(
            body in proptest::collection::vec(any::<u8>(), 0..256),
            secret in "[a-zA-Z0-9_]{1,32}",
        ) {
            let sig = compute_digest(&body, &secret, Algorithm::Sha256, Encoding::Base64).unwrap();
            prop_assert!(verify_shopify_webhook(&body, &secret, Some(&sig)));
        }

        #[test]
        fn prop_appended_char_rejected(
            body in proptest::collection::vec(any::<u8>(), 0..256),
            secret in "[a-zA-Z0-9_]{1,32}",
        ) {
            let sig = compute_digest(&body, &secret, Algorithm::Sha256, Encoding::Base64).unwrap();
            let tampered = format!("{sig}x");
            prop_assert!(!verify_shopify_webhook(&body, &secret, Some(&tampered)));
        }

        #[test]
        fn prop_whitespace_padding_accepted(
            body in proptest::collection::vec(any::<u8>(), 0..256),
            secret in "[a-zA-Z0-9_]{1,32}",
            left in "[ \t\r\n]{0,4}",
            right in "[ \t\r\n]{0,4}",
        ) {
            let sig = compute_digest(&body, &secret, Algorithm::Sha256, Encoding::Base64).unwrap();
            let padded = format!("{left}{sig}{right}");
            prop_assert!(verify_shopify_webhook(&body, &secret, Some(&padded)));
        }
    }
}
