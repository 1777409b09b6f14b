//! Serve command: a webhook receiver behind the verification gate

use anyhow::{Context, Result};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use bytes::Bytes;
use serde_json::{json, Value};
use shopguard_core::config::Config;
use shopguard_middleware::{protect, RawBodyCapture, VerifiedWebhook, WebhookGate};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

const TOPIC_HEADER: &str = "x-shopify-topic";
const SHOP_DOMAIN_HEADER: &str = "x-shopify-shop-domain";

/// Load configuration, start logging and serve until Ctrl-C
pub async fn run(
    config_path: Option<&str>,
    bind: Option<String>,
    log_json: bool,
    verbose: bool,
) -> Result<ExitCode> {
    let config = Config::load(config_path)?;
    let schema = config.schema;

    crate::init_logging(
        &schema.telemetry.log_level,
        log_json || schema.telemetry.json,
        verbose,
    );

    let gate = Arc::new(WebhookGate::from_config(&schema.webhook)?);
    let capture = RawBodyCapture::from_config(&schema.webhook);
    let app = router(&schema.server.path, gate, capture);

    let addr = bind.unwrap_or(schema.server.bind);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        addr = %addr,
        path = %schema.server.path,
        header = %schema.webhook.header_name,
        config = config.path.as_deref().unwrap_or("<defaults>"),
        "webhook receiver listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("webhook receiver stopped");
    Ok(ExitCode::SUCCESS)
}

/// Webhook route behind the gate, health check outside it
fn router(path: &str, gate: Arc<WebhookGate>, capture: RawBodyCapture) -> Router {
    let webhooks = protect(Router::new().route(path, post(receive)), gate, capture);

    Router::new()
        .route("/health", get(health))
        .merge(webhooks)
}

async fn receive(
    Extension(verified): Extension<VerifiedWebhook>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string()
    };

    info!(
        provider = verified.provider.name(),
        topic = %header(TOPIC_HEADER),
        shop = %header(SHOP_DOMAIN_HEADER),
        bytes = body.len(),
        "webhook accepted"
    );

    Json(json!({ "ok": true }))
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "version": env!("CARGO_PKG_VERSION") }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    const SECRET: &str = "shhh";
    const SIGNATURE: &str = "Lcc9Yf2U6zbkFFL44wuL0uEJMTo4Q8mC5iIG3KWCtLA=";

    fn app() -> Router {
        let gate = Arc::new(WebhookGate::new(SECRET).unwrap());
        router("/webhooks/shopify", gate, RawBodyCapture::default())
    }

    fn webhook(signature: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhooks/shopify")
            .header("content-type", "application/json")
            .header(TOPIC_HEADER, "orders/create");
        if let Some(sig) = signature {
            builder = builder.header("X-Shopify-Hmac-SHA256", sig);
        }
        builder.body(Body::from(r#"{"id":1}"#)).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_not_gated() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_signed_webhook_accepted() {
        let response = app().oneshot(webhook(Some(SIGNATURE))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unsigned_webhook_rejected() {
        let response = app().oneshot(webhook(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
