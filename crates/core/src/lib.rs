//! Core utilities for the shopguard webhook verifier
//!
//! This crate provides the pieces shared by the middleware and the CLI:
//!
//! - **Error handling**: errors with codes, context and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation; the
//!   signing secret is resolved from the environment
//!
//! # Example
//!
//! ```rust,no_run
//! use shopguard_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! let secret = config.schema.webhook.resolve_secret().expect("secret not set");
//! # let _ = secret;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{exit_codes, Error, ErrorCode, ErrorReport, Result};
