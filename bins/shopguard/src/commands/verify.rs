//! Verify command

use crate::input::{read_payload, require_secret};
use crate::OutputFormat;
use anyhow::Result;
use owo_colors::OwoColorize;
use shopguard_core::exit_codes;
use shopguard_crypto::verify_shopify_webhook;
use std::path::Path;
use std::process::ExitCode;

/// Check `signature` against the payload; exits with `SECURITY_ERROR` on mismatch
pub fn run(
    input: &Path,
    signature: Option<&str>,
    secret: Option<String>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let secret = require_secret(secret)?;
    let payload = read_payload(input)?;

    let valid = verify_shopify_webhook(&payload, &secret, signature);
    let reason = match (valid, signature) {
        (true, _) => None,
        (false, None) | (false, Some("")) => Some("missing_signature"),
        (false, Some(_)) => Some("invalid_signature"),
    };

    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "valid": valid,
            "bytes": payload.len(),
            "reason": reason,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if valid {
        println!("{} Signature valid", "✓".green());
    } else {
        eprintln!(
            "{} Signature rejected ({})",
            "✗".red(),
            reason.unwrap_or("invalid_signature")
        );
    }

    if valid {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(exit_codes::SECURITY_ERROR as u8))
    }
}
