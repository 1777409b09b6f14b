//! JSON responses for requests the gate refuses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Why a request was turned away before reaching its handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The capture layer did not run; the integration is misconfigured
    RawBodyMissing,
    /// The signature header is absent or wrong
    InvalidSignature,
    /// The body exceeded the capture limit
    PayloadTooLarge,
    /// The body stream failed before it was fully read
    BodyUnreadable,
}

#[derive(Debug, Serialize)]
struct RejectionBody {
    ok: bool,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

impl Rejection {
    /// HTTP status sent for this rejection.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RawBodyMissing | Self::BodyUnreadable => StatusCode::BAD_REQUEST,
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Machine-readable error code in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RawBodyMissing => "RAW_BODY_MISSING",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::BodyUnreadable => "BODY_UNREADABLE",
        }
    }

    fn message(&self) -> Option<&'static str> {
        match self {
            Self::RawBodyMissing => Some(
                "Raw body is missing. Install the capture_raw_body layer before verify_webhook.",
            ),
            _ => None,
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let body = RejectionBody {
            ok: false,
            error: self.code(),
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
