//! `reqwest`-backed transport implementation

use std::time::Duration;

use async_trait::async_trait;

use super::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody, TransportError};

/// Default transport that sends requests with a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with default client settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with an optional request timeout and user agent
    ///
    /// # Errors
    /// Returns [`TransportError::Send`] if the underlying client cannot be built
    /// (for example when the TLS backend fails to initialize).
    pub fn with_settings(
        timeout: Option<Duration>,
        user_agent: Option<&str>,
    ) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Send(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing `reqwest::Client`
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Split reqwest failures into "never sent" and "sent but unanswered"
fn classify(err: &reqwest::Error) -> TransportError {
    if err.is_builder() || err.is_connect() {
        TransportError::Send(err.to_string())
    } else {
        TransportError::NoResponse(err.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::trace!(method = %request.method, url = %request.url, "Sending request");

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Form(fields)) => builder.form(fields),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| classify(&e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let body = response.text().await.map_err(|e| classify(&e))?;

        tracing::trace!(status, "Received response");

        Ok(HttpResponse {
            status,
            body,
            headers,
        })
    }
}
