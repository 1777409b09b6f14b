//! WASM bindings for crypto utilities.

use wasm_bindgen::prelude::*;

/// Compute a keyed digest with string algorithm and encoding identifiers.
///
/// # Arguments
/// * `secret` - The shared secret
/// * `body` - Raw message bytes
/// * `algorithm` - `sha256`, `sha1` or `sha512`
/// * `encoding` - `hex` or `base64`
///
/// # Returns
/// The encoded digest, or a thrown error for unsupported identifiers or an empty secret
#[wasm_bindgen(js_name = computeDigest)]
pub fn compute_digest_js(
    secret: &str,
    body: &[u8],
    algorithm: &str,
    encoding: &str,
) -> Result<String, JsValue> {
    let algorithm: crate::Algorithm = algorithm.parse().map_err(to_js)?;
    let encoding: crate::Encoding = encoding.parse().map_err(to_js)?;
    crate::compute_digest(body, secret, algorithm, encoding).map_err(to_js)
}

/// Verify a Shopify webhook signature. Pass `undefined` when the header is missing.
#[wasm_bindgen(js_name = verifyShopifyWebhook)]
pub fn verify_shopify_webhook_js(body: &[u8], secret: &str, hmac_header: Option<String>) -> bool {
    crate::verify_shopify_webhook(body, secret, hmac_header.as_deref())
}

/// Constant-time comparison of two strings.
#[wasm_bindgen(js_name = timingSafeEqual)]
pub fn constant_time_eq_js(a: &str, b: &str) -> bool {
    crate::constant_time_eq(a, b)
}

fn to_js(err: crate::CryptoError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
