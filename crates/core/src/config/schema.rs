//! Configuration schema definitions
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a working configuration apart from the secret itself.

use serde::{Deserialize, Serialize};
use shopguard_crypto::SHOPIFY_HMAC_HEADER;

use crate::error::{Error, Result};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// `[webhook]` section
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// `[server]` section
    #[serde(default)]
    pub server: ServerConfig,

    /// `[telemetry]` section
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

/// Webhook verification settings
///
/// The secret is never stored here; only the name of the environment
/// variable that holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Environment variable holding the signing secret
    #[serde(default = "default_secret_env")]
    pub secret_env: String,

    /// Request header carrying the signature
    #[serde(default = "default_header_name")]
    pub header_name: String,

    /// Largest body buffered for verification
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret_env: default_secret_env(),
            header_name: default_header_name(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl WebhookConfig {
    /// Read the signing secret from the configured environment variable.
    pub fn resolve_secret(&self) -> Result<String> {
        match std::env::var(&self.secret_env) {
            Ok(secret) if !secret.is_empty() => Ok(secret),
            _ => Err(Error::missing_secret(&self.secret_env)),
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.secret_env.trim().is_empty() {
            return Err(Error::invalid_config_value(
                "webhook.secret_env",
                "must name an environment variable",
            ));
        }
        if self.header_name.trim().is_empty() {
            return Err(Error::invalid_config_value(
                "webhook.header_name",
                "must not be empty",
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(Error::invalid_config_value(
                "webhook.max_body_bytes",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn default_secret_env() -> String {
    "SHOPIFY_WEBHOOK_SECRET".to_string()
}

fn default_header_name() -> String {
    SHOPIFY_HMAC_HEADER.to_string()
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

/// Receiver server settings used by `shopguard serve`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Route the webhook endpoint is mounted at
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            path: default_path(),
        }
    }
}

impl ServerConfig {
    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(Error::invalid_config_value(
                "server.path",
                format!("{:?} must start with '/'", self.path),
            ));
        }
        Ok(())
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_path() -> String {
    "/webhooks/shopify".to_string()
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySection {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let schema = ConfigSchema::default();
        assert_eq!(schema.webhook.header_name, "x-shopify-hmac-sha256");
        assert_eq!(schema.webhook.secret_env, "SHOPIFY_WEBHOOK_SECRET");
        assert_eq!(schema.webhook.max_body_bytes, 2 * 1024 * 1024);
        assert_eq!(schema.server.path, "/webhooks/shopify");
        assert!(!schema.telemetry.json);
    }

    #[test]
    fn test_partial_section_keeps_field_defaults() {
        let schema: ConfigSchema = toml::from_str("[webhook]\nheader_name = \"x-custom-sig\"\n").unwrap();
        assert_eq!(schema.webhook.header_name, "x-custom-sig");
        assert_eq!(schema.webhook.secret_env, "SHOPIFY_WEBHOOK_SECRET");
        assert_eq!(schema.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let config = WebhookConfig {
            max_body_bytes: 0,
            ..WebhookConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_server_path() {
        assert!(ServerConfig::default().validate().is_ok());

        let relative = ServerConfig {
            path: "webhooks/shopify".to_string(),
            ..ServerConfig::default()
        };
        let err = relative.validate().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::InvalidConfigValue);
        assert!(err.message.contains("server.path"));

        let empty = ServerConfig {
            path: String::new(),
            ..ServerConfig::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_resolve_secret() {
        let config = WebhookConfig {
            secret_env: "SHOPGUARD_TEST_SECRET_PRESENT".to_string(),
            ..WebhookConfig::default()
        };
        // SAFETY: variable name is unique to this test
        unsafe { std::env::set_var("SHOPGUARD_TEST_SECRET_PRESENT", "shhh") };
        assert_eq!(config.resolve_secret().unwrap(), "shhh");
    }

    #[test]
    fn test_resolve_secret_missing_or_empty() {
        let missing = WebhookConfig {
            secret_env: "SHOPGUARD_TEST_SECRET_UNSET".to_string(),
            ..WebhookConfig::default()
        };
        assert!(missing.resolve_secret().is_err());

        let empty = WebhookConfig {
            secret_env: "SHOPGUARD_TEST_SECRET_EMPTY".to_string(),
            ..WebhookConfig::default()
        };
        // SAFETY: variable name is unique to this test
        unsafe { std::env::set_var("SHOPGUARD_TEST_SECRET_EMPTY", "") };
        let err = empty.resolve_secret().unwrap_err();
        assert_eq!(err.code, crate::ErrorCode::InvalidConfigValue);
    }
}
