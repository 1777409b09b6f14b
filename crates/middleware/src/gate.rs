//! The verification gate.

use std::fmt;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::HeaderName;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use secrecy::{ExposeSecret, SecretString};
use shopguard_core::config::WebhookConfig;
use shopguard_core::Error;
use shopguard_crypto::{CryptoError, Provider};
use tracing::{debug, error, warn};

use crate::{RawBody, Rejection};

/// Why verification failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationFailure {
    /// No usable signature header was sent
    MissingSignature,
    /// A signature was sent but does not match the body
    InvalidSignature,
}

impl VerificationFailure {
    /// Stable identifier used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingSignature => "missing_signature",
            Self::InvalidSignature => "invalid_signature",
        }
    }
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type CustomHandler = dyn Fn(&Parts, VerificationFailure) -> Response + Send + Sync;

/// What the gate answers when verification fails.
#[derive(Clone, Default)]
pub enum FailureHandler {
    /// 401 with `{"ok":false,"error":"INVALID_SIGNATURE"}`
    #[default]
    DefaultRejection,
    /// Caller-supplied response
    Custom(Arc<CustomHandler>),
}

impl FailureHandler {
    /// Wrap a closure as a custom handler.
    pub fn custom<F>(handler: F) -> Self
    where
        F: Fn(&Parts, VerificationFailure) -> Response + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(handler))
    }

    fn respond(&self, parts: &Parts, failure: VerificationFailure) -> Response {
        match self {
            Self::DefaultRejection => Rejection::InvalidSignature.into_response(),
            Self::Custom(handler) => handler(parts, failure),
        }
    }
}

impl fmt::Debug for FailureHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefaultRejection => f.write_str("DefaultRejection"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Marker inserted into request extensions once a webhook has verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedWebhook {
    /// Sender whose convention the signature matched
    pub provider: Provider,
}

/// Immutable verification settings shared by every request.
#[derive(Debug)]
pub struct WebhookGate {
    secret: SecretString,
    header_name: HeaderName,
    provider: Provider,
    on_failure: FailureHandler,
}

impl WebhookGate {
    /// Gate for Shopify webhooks signed with `secret`.
    ///
    /// An empty secret is refused here, at setup, rather than turning every
    /// request into a silent failure.
    pub fn new(secret: impl Into<String>) -> Result<Self, CryptoError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(CryptoError::InvalidKey("secret must not be empty".to_string()));
        }

        let provider = Provider::Shopify;
        Ok(Self {
            secret: SecretString::new(secret),
            header_name: HeaderName::from_static(provider.header_name()),
            provider,
            on_failure: FailureHandler::DefaultRejection,
        })
    }

    /// Build from configuration, reading the secret from the environment.
    pub fn from_config(config: &WebhookConfig) -> Result<Self, Error> {
        let header_name = HeaderName::from_bytes(config.header_name.trim().as_bytes())
            .map_err(|e| Error::invalid_config_value("webhook.header_name", e.to_string()))?;
        let secret = config.resolve_secret()?;

        Ok(Self::new(secret)?.with_header_name(header_name))
    }

    /// Read the signature from a different header.
    pub fn with_header_name(mut self, header_name: HeaderName) -> Self {
        self.header_name = header_name;
        self
    }

    /// Replace the default 401 response.
    pub fn with_failure_handler(mut self, on_failure: FailureHandler) -> Self {
        self.on_failure = on_failure;
        self
    }

    /// Header the signature is read from.
    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }

    /// Signing convention being enforced.
    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Check one request's raw body and header value.
    pub fn check(&self, raw_body: &[u8], signature: Option<&str>) -> Result<(), VerificationFailure> {
        let Some(signature) = signature.filter(|s| !s.is_empty()) else {
            return Err(VerificationFailure::MissingSignature);
        };
        if self
            .provider
            .verify(raw_body, self.secret.expose_secret(), Some(signature))
        {
            Ok(())
        } else {
            Err(VerificationFailure::InvalidSignature)
        }
    }
}

/// Let the request through only if its signature verifies.
///
/// Requires [`crate::capture_raw_body`] to have run first; without a
/// [`RawBody`] extension the request is refused with 400, since that means
/// the integration is broken rather than that the sender is hostile.
///
/// Intended to be given to `axum::middleware::from_fn_with_state`.
pub async fn verify_webhook(
    State(gate): State<Arc<WebhookGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(raw_body) = request.extensions().get::<RawBody>().cloned() else {
        error!(
            path = %request.uri().path(),
            "raw body missing; capture_raw_body must run before verify_webhook"
        );
        return Rejection::RawBodyMissing.into_response();
    };

    // Non-UTF-8 header values cannot be base64 and count as absent
    let signature = request
        .headers()
        .get(gate.header_name())
        .and_then(|value| value.to_str().ok());

    match gate.check(raw_body.as_bytes(), signature) {
        Ok(()) => {
            debug!(
                provider = gate.provider().name(),
                body_len = raw_body.as_bytes().len(),
                "webhook signature verified"
            );
            request.extensions_mut().insert(VerifiedWebhook {
                provider: gate.provider(),
            });
            next.run(request).await
        }
        Err(failure) => {
            warn!(
                provider = gate.provider().name(),
                header = %gate.header_name(),
                reason = %failure,
                "webhook rejected"
            );
            let (parts, _body) = request.into_parts();
            gate.on_failure.respond(&parts, failure)
        }
    }
}
