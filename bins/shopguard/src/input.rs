//! Payload and secret inputs for the one-shot commands.

use anyhow::{Context, Result};
use shopguard_core::Error;
use std::io::Read;
use std::path::Path;

/// Environment variable consulted when `--secret` is not given
pub const SECRET_ENV: &str = "SHOPIFY_WEBHOOK_SECRET";

/// Read the payload byte-for-byte; `-` means stdin. Nothing is trimmed.
pub fn read_payload(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read payload from stdin")?;
        return Ok(buf);
    }

    std::fs::read(path).map_err(|e| {
        Error::from(e)
            .with_context(format!("While reading payload {}", path.display()))
            .into()
    })
}

/// The secret from `--secret` or the environment, refusing empty values.
pub fn require_secret(secret: Option<String>) -> Result<String> {
    match secret {
        Some(secret) if !secret.is_empty() => Ok(secret),
        _ => Err(Error::missing_secret(SECRET_ENV).into()),
    }
}
