//! Error types for the FreeDNS client
//!
//! This module defines all error types used throughout the crate.
//!
//! Structural mismatches while scraping (a missing table, an anchor without
//! an `href`) have no variant: extraction degrades to empty
//! values instead of failing.

use thiserror::Error;

/// Result type alias for FreeDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the FreeDNS client
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (including missing credentials)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The console did not hand out a session after login
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Response arrived with a non-2xx status
    #[error("HTTP error: {status} {status_text}")]
    HttpStatus {
        /// Numeric status code
        status: u16,
        /// Reason phrase reported by the transport
        status_text: String,
    },

    /// Error text the console rendered inside an otherwise successful page
    #[error("{0}")]
    ProviderReported(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem errors while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, status_text: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            status_text: status_text.into(),
        }
    }

    /// Create an error carrying the console's own message
    pub fn provider_reported(msg: impl Into<String>) -> Self {
        Self::ProviderReported(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the failure happened on the wire (network or status code)
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::HttpStatus { .. })
    }

    /// The console's message, if this error came from an inline banner
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            Self::ProviderReported(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(format!("invalid YAML: {}", err))
    }
}
