//! # Core Error Types
//!
//! Typed errors for input loading, key handling and HTTP calls. Chain crates
//! wrap them in `anyhow` with context.

use std::fmt;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("No entries found in {path}")]
    EmptyFile { path: String },

    #[error("I/O error reading {path}: {msg}")]
    IoError { path: String, msg: String },

    #[error("Unsupported proxy scheme in '{proxy}'")]
    UnsupportedProxy { proxy: String },
}

/// Wallet and cryptographic operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Invalid private key format: {reason}")]
    InvalidKeyFormat { reason: String },

    #[error("Signing failed: {reason}")]
    SigningFailed { reason: String },
}

/// Terminal failure of an HTTP call after the executor gave up.
///
/// Carries whatever the last attempt produced so the caller can log the
/// status and response body alongside the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub status: Option<u16>,
    pub body: Option<String>,
    pub message: String,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(status) = self.status {
            write!(f, " | Status: {}", status)?;
        }
        if let Some(body) = &self.body {
            write!(f, " | Body: {}", body)?;
        }
        Ok(())
    }
}

impl RequestError {
    /// Failure without an HTTP response (connect error, timeout, bad proxy).
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
        }
    }

    /// Failure carrying an HTTP status and the raw response body.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: Some(body.into()),
            message: format!("Request failed with status code {}", status),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(429)
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_some_and(|s| s >= 500)
    }
}
