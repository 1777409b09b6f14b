//! Structured errors with codes, context and recovery suggestions
//!
//! Setup failures (missing secret, bad header name, unreadable config) are
//! reported through [`Error`]. A webhook that fails verification is never an
//! `Error`; the gate answers it with a rejection response.

use serde::{Deserialize, Serialize};
use shopguard_crypto::CryptoError;
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // IO errors (2xxx)
    /// Other IO failure
    IoError = 2000,
    /// File does not exist
    FileNotFound = 2001,
    /// File exists but cannot be read
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    /// Configuration could not be read
    ConfigError = 3000,
    /// Explicit configuration path does not exist
    ConfigNotFound = 3001,
    /// Configuration is not valid TOML for the schema
    ConfigParseError = 3002,
    /// A value parsed but cannot be used
    InvalidConfigValue = 3004,
    /// Hash algorithm or digest encoding is not supported
    UnsupportedAlgorithm = 3005,

    // Security errors (7xxx)
    /// Signature did not match the payload
    SignatureMismatch = 7001,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            2 => "IO",
            3 => "Configuration",
            7 => "Security",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {}", ctx)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Convert to a serializable report
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    /// Process exit code matching this error's category
    pub fn exit_code(&self) -> i32 {
        match self.code.category() {
            "Configuration" => exit_codes::CONFIG_ERROR,
            "Security" => exit_codes::SECURITY_ERROR,
            _ => exit_codes::FAILURE,
        }
    }

    // Convenience constructors

    /// Generic configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// A configuration file given explicitly does not exist
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .shopguard.toml file or use --config to specify a path")
    }

    /// A configured value is present but unusable
    pub fn invalid_config_value(key: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidConfigValue,
            format!("Invalid value for {}: {}", key, message.into()),
        )
    }

    /// The webhook secret environment variable is unset or empty
    pub fn missing_secret(env_var: &str) -> Self {
        Self::new(
            ErrorCode::InvalidConfigValue,
            format!("Webhook secret is not set ({} is empty or missing)", env_var),
        )
        .with_suggestion(format!(
            "Export {} with the signing secret from your Shopify app settings",
            env_var
        ))
    }
}

/// Serializable error report for logging and API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable code
    pub code: ErrorCode,
    /// Code rendered as `E####`
    pub code_str: String,
    /// Category of the code
    pub category: String,
    /// Human-readable message
    pub message: String,
    /// Additional context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Recovery suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Source error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Command completed
    pub const SUCCESS: i32 = 0;
    /// Any failure without a more specific code
    pub const FAILURE: i32 = 1;
    /// Configuration or setup problem (missing secret, bad algorithm, ...)
    pub const CONFIG_ERROR: i32 = 3;
    /// Signature rejected
    pub const SECURITY_ERROR: i32 = 5;
}

// Implement From for common error types

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {}", err))
            .with_source(err)
    }
}

impl From<CryptoError> for Error {
    fn from(err: CryptoError) -> Self {
        let code = match err {
            CryptoError::InvalidKey(_) => ErrorCode::InvalidConfigValue,
            CryptoError::UnsupportedAlgorithm(_) | CryptoError::UnsupportedEncoding(_) => {
                ErrorCode::UnsupportedAlgorithm
            }
            CryptoError::SignatureMismatch => ErrorCode::SignatureMismatch,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}
