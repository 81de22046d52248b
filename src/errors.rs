// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Mutation Tester Error Types
 * Error taxonomy for configuration, transport and output failures
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::time::Duration;
use thiserror::Error;

/// Main error type for a mutation authorization run
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Missing or unusable endpoint, proxy, Host context or config file.
    /// Always raised before the first request is sent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport failures (DNS, connect, TLS, timeout)
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Result sink I/O errors
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// The operator declined to continue
    #[error("Run aborted: {reason}")]
    Aborted { reason: String },
}

/// Network-specific errors with detailed classification
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection timeout after {timeout:?} to {url}")]
    ConnectionTimeout { url: String, timeout: Duration },

    #[error("Connection refused for {url}")]
    ConnectionRefused { url: String },

    #[error("Proxy error: {reason}")]
    ProxyError { reason: String },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Network error: {0}")]
    Other(String),
}

impl ProbeError {
    pub fn config(message: impl Into<String>) -> Self {
        ProbeError::Configuration(message.into())
    }

    /// Whether this error was raised by the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(self, ProbeError::Network(_))
    }
}

/// Convert reqwest errors to our error types.
/// Timeouts are mapped by the client, which knows the configured limit.
impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();

        if err.is_connect() {
            ProbeError::Network(NetworkError::ConnectionRefused { url })
        } else if err.is_builder() {
            ProbeError::Network(NetworkError::InvalidUrl { url })
        } else {
            ProbeError::Network(NetworkError::Other(err.to_string()))
        }
    }
}

/// Result type for mutation tester operations
pub type ProbeResult<T> = Result<T, ProbeError>;
