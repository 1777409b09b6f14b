//! Capture of the unparsed request body.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http_body_util::LengthLimitError;
use shopguard_core::config::WebhookConfig;
use tracing::{error, warn};

use crate::Rejection;

/// The exact bytes of the request body as received.
///
/// Inserted into the request extensions by [`capture_raw_body`]. Handlers
/// may extract it with `Extension<RawBody>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBody(pub Bytes);

impl RawBody {
    /// Borrow the bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Settings for [`capture_raw_body`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBodyCapture {
    /// Bodies larger than this are refused with 413
    pub max_body_bytes: usize,
}

impl Default for RawBodyCapture {
    fn default() -> Self {
        Self {
            max_body_bytes: WebhookConfig::default().max_body_bytes,
        }
    }
}

impl RawBodyCapture {
    /// Capture with a custom size limit.
    pub fn new(max_body_bytes: usize) -> Self {
        Self { max_body_bytes }
    }

    /// Capture settings from the webhook section of the configuration.
    pub fn from_config(config: &WebhookConfig) -> Self {
        Self::new(config.max_body_bytes)
    }
}

/// Buffer the body, record it as [`RawBody`] and pass an identical body on.
///
/// Intended to be given to `axum::middleware::from_fn_with_state`.
pub async fn capture_raw_body(
    State(capture): State<RawBodyCapture>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, capture.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let inner = e.into_inner();
            if inner.is::<LengthLimitError>() {
                warn!(
                    limit = capture.max_body_bytes,
                    "webhook body exceeds capture limit"
                );
                return Rejection::PayloadTooLarge.into_response();
            }
            error!(error = %inner, "failed to read webhook body");
            return Rejection::BodyUnreadable.into_response();
        }
    };

    parts.extensions.insert(RawBody(bytes.clone()));
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
