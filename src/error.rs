//! Error types for the CPaaS SDK

use thiserror::Error;

use crate::transport::TransportError;

/// Main error type for the CPaaS SDK
#[derive(Error, Debug)]
pub enum CpaasError {
    /// Phone number could not be normalized into E.164 form
    #[error("Invalid phone number: {0:?}")]
    InvalidPhoneNumber(String),

    /// A claim-dependent value was requested before any token exchange
    #[error("No active session. Authenticate before calling account-scoped operations.")]
    NoActiveSession,

    /// Token endpoint rejected the credentials, was unreachable, or returned an unusable token
    #[error("Token exchange failed: {reason}")]
    TokenExchangeFailed {
        /// What went wrong
        reason: String,
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// Raw response body, when a response was received
        body: Option<String>,
    },

    /// Messaging or channel endpoint returned non-2xx or never answered
    #[error("{operation} failed{}", status_suffix(.status))]
    Upstream {
        /// Operation that issued the request
        operation: &'static str,
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// Raw response body, when a response was received
        body: Option<String>,
    },

    /// Request could not be constructed or sent
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Successful response had an unexpected shape
    #[error("JSON decode error: {0}")]
    JsonDecode(#[from] serde_json::Error),

    /// Value cannot stand alone as one segment of a resource path
    #[error("Invalid path segment: {0:?}")]
    InvalidPathSegment(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(status) => format!(" with status {status}"),
        None => ": no response received".to_string(),
    }
}

/// Result type alias for CPaaS SDK operations
pub type Result<T> = std::result::Result<T, CpaasError>;

impl CpaasError {
    /// Create an invalid phone number error
    pub fn invalid_phone_number(input: impl Into<String>) -> Self {
        Self::InvalidPhoneNumber(input.into())
    }

    /// Create a token exchange error without a response
    pub fn token_exchange(reason: impl Into<String>) -> Self {
        Self::TokenExchangeFailed {
            reason: reason.into(),
            status: None,
            body: None,
        }
    }

    /// Create a token exchange error carrying the received response
    pub fn token_exchange_response(reason: impl Into<String>, status: u16, body: String) -> Self {
        Self::TokenExchangeFailed {
            reason: reason.into(),
            status: Some(status),
            body: Some(body),
        }
    }

    /// Create an upstream error from a received non-2xx response
    #[must_use]
    pub fn upstream(operation: &'static str, status: u16, body: String) -> Self {
        Self::Upstream {
            operation,
            status: Some(status),
            body: Some(body),
        }
    }

    /// Create an upstream error for a request that was sent but never answered
    #[must_use]
    pub fn upstream_unreachable(operation: &'static str) -> Self {
        Self::Upstream {
            operation,
            status: None,
            body: None,
        }
    }

    /// Create an invalid path segment error
    pub fn invalid_path_segment(value: impl Into<String>) -> Self {
        Self::InvalidPathSegment(value.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// HTTP status attached to this error, if a response was received
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TokenExchangeFailed { status, .. } | Self::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// Raw response body attached to this error, if a response was received
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::TokenExchangeFailed { body, .. } | Self::Upstream { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Upstream error payload parsed as JSON
    ///
    /// Returns `None` when no body was received or it is not valid JSON.
    #[must_use]
    pub fn body_json(&self) -> Option<serde_json::Value> {
        self.body().and_then(|b| serde_json::from_str(b).ok())
    }
}
