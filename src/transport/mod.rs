//! Transport layer for talking to the CPaaS REST API
//!
//! This module provides the transport abstraction the client issues every
//! request through, and a default implementation backed by `reqwest`.
//!
//! A transport only moves bytes: any response that arrives is returned as an
//! [`HttpResponse`], whatever its status. Classifying non-2xx responses is the
//! caller's job. [`TransportError`] is reserved for requests that never
//! produced a response.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use http::ReqwestTransport;

/// Errors raised when no HTTP response was obtained
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request was sent but no response was received
    #[error("no response received: {0}")]
    NoResponse(String),

    /// The request could not be constructed or sent
    #[error("request could not be sent: {0}")]
    Send(String),
}

/// HTTP method used by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
}

impl HttpMethod {
    /// Method name as it appears on the wire
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body variants
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document (`application/json`)
    Json(serde_json::Value),
    /// Form fields (`application/x-www-form-urlencoded`), in order
    Form(Vec<(String, String)>),
}

/// Outbound HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Method
    pub method: HttpMethod,
    /// Absolute URL including any query string
    pub url: String,
    /// Header name/value pairs
    pub headers: Vec<(String, String)>,
    /// Optional body
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Create a POST request with a JSON body
    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(RequestBody::Json(body)),
        }
    }

    /// Create a POST request with a form-encoded body
    pub fn post_form(url: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![(
                "Content-Type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )],
            body: Some(RequestBody::Form(fields)),
        }
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value (case-insensitive)
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response as received, regardless of status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response body as text
    pub body: String,
    /// Header name/value pairs
    pub headers: Vec<(String, String)>,
}

impl HttpResponse {
    /// Create a response with no headers
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: Vec::new(),
        }
    }

    /// Whether the status is in the 2xx range
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport trait for issuing HTTP requests
///
/// Implementations must return `Ok` for every response received, including
/// non-2xx ones, and `Err` only when no response was obtained.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and wait for the response
    ///
    /// # Errors
    /// Returns [`TransportError::Send`] if the request could not be built or
    /// sent, and [`TransportError::NoResponse`] if it was sent but no response
    /// arrived.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
