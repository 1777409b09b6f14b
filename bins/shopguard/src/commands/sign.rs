//! Sign command

use crate::input::{read_payload, require_secret};
use crate::OutputFormat;
use anyhow::Result;
use shopguard_crypto::{compute_digest, Algorithm, Encoding};
use std::path::Path;
use std::process::ExitCode;

/// Print the digest of the payload at `input`
pub fn run(
    input: &Path,
    secret: Option<String>,
    algorithm: &str,
    encoding: &str,
    format: OutputFormat,
) -> Result<ExitCode> {
    let algorithm: Algorithm = algorithm.parse().map_err(shopguard_core::Error::from)?;
    let encoding: Encoding = encoding.parse().map_err(shopguard_core::Error::from)?;
    let secret = require_secret(secret)?;
    let payload = read_payload(input)?;

    let digest = compute_digest(&payload, &secret, algorithm, encoding)
        .map_err(shopguard_core::Error::from)?;
    tracing::debug!(
        algorithm = %algorithm,
        encoding = %encoding,
        bytes = payload.len(),
        "payload signed"
    );

    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "algorithm": algorithm.as_str(),
            "encoding": encoding.as_str(),
            "bytes": payload.len(),
            "digest": digest,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", digest);
    }

    Ok(ExitCode::SUCCESS)
}
