//! # API Error Types Module
//!
//! This module defines the error type shared by every outbound gateway
//! (weather, content APIs, translator). The chat layer matches on the kind
//! to pick the message shown to the user; none of these are fatal.

use thiserror::Error;

/// Custom error types for outbound API calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request did not complete within the configured timeout
    #[error("Timeout error: {0}")]
    Timeout(String),
    /// Connection, TLS or other transport failure
    #[error("Transport error: {0}")]
    Transport(String),
    /// The upstream answered with a non-success status
    #[error("Upstream error: HTTP {status}")]
    Upstream { status: u16 },
    /// The payload did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// The lookup was well-formed but resolved to nothing
    #[error("Not found: {0}")]
    NotFound(String),
    /// The translation service failed
    #[error("Translation error: {0}")]
    Translation(String),
}

impl ApiError {
    /// Classify a `reqwest` failure
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_decode() {
            ApiError::MalformedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Upstream {
                status: status.as_u16(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    /// Whether the failure happened below the HTTP layer
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Timeout(_) | ApiError::Transport(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::from_reqwest(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::MalformedResponse(err.to_string())
    }
}
