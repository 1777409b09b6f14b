//! axum integration for Shopify webhook verification.
//!
//! Two layers cooperate:
//!
//! 1. [`capture_raw_body`] buffers the request body, stores the exact bytes
//!    as a typed [`RawBody`] extension and hands an identical body on.
//! 2. [`verify_webhook`] checks the signature header against those bytes and
//!    either calls the next service or answers with a rejection.
//!
//! [`protect`] installs both in the right order.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::{routing::post, Router};
//! use shopguard_middleware::{protect, RawBodyCapture, WebhookGate};
//!
//! async fn orders_create(body: String) -> &'static str {
//!     "ok"
//! }
//!
//! let gate = Arc::new(WebhookGate::new("shpss_secret").expect("empty secret"));
//! let app: Router = protect(
//!     Router::new().route("/webhooks/orders", post(orders_create)),
//!     gate,
//!     RawBodyCapture::default(),
//! );
//! ```

#![warn(missing_docs)]

mod gate;
mod raw_body;
mod rejection;

pub use gate::{verify_webhook, FailureHandler, VerificationFailure, VerifiedWebhook, WebhookGate};
pub use raw_body::{capture_raw_body, RawBody, RawBodyCapture};
pub use rejection::Rejection;

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::Router;

/// Gate every route of `router` on a valid webhook signature.
///
/// The capture layer is installed outermost so the gate always sees the raw
/// body. Only matched routes are gated; unmatched paths still 404.
pub fn protect<S>(router: Router<S>, gate: Arc<WebhookGate>, capture: RawBodyCapture) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route_layer(from_fn_with_state(gate, verify_webhook))
        .route_layer(from_fn_with_state(capture, capture_raw_body))
}
