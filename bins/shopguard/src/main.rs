//! shopguard - Shopify webhook signing, verification and receiving
//!
//! `sign` and `verify` work on the exact bytes of a file (or stdin), which is
//! handy for reproducing a delivery by hand. `serve` runs a small receiver
//! with the verification gate in front of the webhook route.

use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use shopguard_core::exit_codes;
use shopguard_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod input;

use commands::{serve, sign, verify};

/// Sign, verify and receive Shopify webhooks
#[derive(Parser)]
#[command(name = "shopguard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// How command results and errors are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON on stdout
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the signature of a payload
    Sign {
        /// Payload file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Signing secret
        #[arg(long, env = "SHOPIFY_WEBHOOK_SECRET", hide_env_values = true)]
        secret: Option<String>,

        /// HMAC hash function (sha256, sha1, sha512)
        #[arg(short, long, default_value = "sha256")]
        algorithm: String,

        /// Digest encoding (base64, hex)
        #[arg(short, long, default_value = "base64")]
        encoding: String,
    },

    /// Check a payload against a Shopify signature
    Verify {
        /// Payload file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Value of the X-Shopify-Hmac-SHA256 header
        #[arg(short, long)]
        signature: Option<String>,

        /// Signing secret
        #[arg(long, env = "SHOPIFY_WEBHOOK_SECRET", hide_env_values = true)]
        secret: Option<String>,
    },

    /// Run a webhook receiver
    Serve {
        /// Configuration file (defaults to .shopguard.toml when present)
        #[arg(short, long)]
        config: Option<String>,

        /// Override the listen address
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sign {
            input,
            secret,
            algorithm,
            encoding,
        } => {
            init_logging("warn", cli.log_json, cli.verbose);
            sign::run(&input, secret, &algorithm, &encoding, cli.format)
        }

        Commands::Verify {
            input,
            signature,
            secret,
        } => {
            init_logging("warn", cli.log_json, cli.verbose);
            verify::run(&input, signature.as_deref(), secret, cli.format)
        }

        Commands::Serve { config, bind } => {
            serve::run(config.as_deref(), bind, cli.log_json, cli.verbose).await
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            let structured = e.downcast_ref::<shopguard_core::Error>();
            if let (OutputFormat::Json, Some(err)) = (cli.format, structured) {
                if let Ok(report) = serde_json::to_string_pretty(&err.to_report()) {
                    println!("{}", report);
                }
            }
            let code = structured.map_or(exit_codes::FAILURE, shopguard_core::Error::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

/// Install the log subscriber; a second call (e.g. from tests) is harmless.
pub(crate) fn init_logging(level: &str, json: bool, verbose: bool) {
    let config = TelemetryConfig::new(level, json).verbose(verbose);
    if let Err(e) = shopguard_telemetry::init_with_config(config) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }
}
