//! `CpaasClient` for SMS messaging and notification channels
//!
//! This module provides the main client for the CPaaS REST API. Every
//! operation follows the same three steps:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌──────────────────────┐
//! │ ensure_fresh │ ──→ │ one HTTP request │ ──→ │ map status / body to │
//! │ (may refresh)│     │ Bearer + account │     │ result or CpaasError │
//! └──────────────┘     └──────────────────┘     └──────────────────────┘
//! ```
//!
//! Resource paths are scoped by the `preferred_username` claim of the
//! identity token, so the first call on a new client always performs a token
//! exchange.
//!
//! # Example: Send an SMS
//!
//! ```no_run
//! use cpaas_sdk::{CpaasClient, Credentials, SimpleSendRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CpaasClient::new(Credentials::project("client-id", "client-secret"))?;
//!
//! let request = SimpleSendRequest::builder()
//!     .to_address("415.555.2671")
//!     .from_address("212-555-0100")
//!     .message("Your order has shipped")
//!     .callback_url("https://hooks.example.com/sms")
//!     .build();
//!
//! let response = client.simple_send(request).await?;
//! println!("Accepted: {response}");
//! # Ok(())
//! # }
//! ```
//!
//! # Example: Inspect upstream failures
//!
//! ```no_run
//! use cpaas_sdk::{CpaasClient, CpaasError, Credentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CpaasClient::new(Credentials::user("client-id", "alice", "password"))?;
//!
//! match client.list_channels().await {
//!     Ok(list) => println!("{} channels", list.channels().len()),
//!     Err(err @ CpaasError::Upstream { .. }) => {
//!         eprintln!("{err}: {:?}", err.body_json());
//!     }
//!     Err(err) => return Err(err.into()),
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::auth::{AuthSession, ClaimsDecoder, Credentials, TokenSnapshot, UnverifiedJwtDecoder};
use crate::error::{CpaasError, Result};
use crate::phone::normalize_phone;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
use crate::types::{
    ClientOptions, CorrelatorGenerator, CreateChannelRequest, NotificationChannelListResponse,
    NotificationChannelResponse, SendSmsRequest, SimpleSendRequest, UuidCorrelatorGenerator,
};
use crate::utils::{append_path_segments, truncate_for_log};

const SMS_SERVICE: &str = "smsmessaging";
const CHANNEL_SERVICE: &str = "notificationchannel";
const LOG_BODY_LIMIT: usize = 2048;

/// Builder for [`CpaasClient`]
pub struct CpaasClientBuilder {
    credentials: Credentials,
    options: Option<ClientOptions>,
    transport: Option<Arc<dyn HttpTransport>>,
    decoder: Option<Arc<dyn ClaimsDecoder>>,
    correlators: Option<Arc<dyn CorrelatorGenerator>>,
}

impl CpaasClientBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            options: None,
            transport: None,
            decoder: None,
            correlators: None,
        }
    }

    /// Set custom client options
    #[must_use]
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Set a custom HTTP transport (default: [`ReqwestTransport`])
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set a custom identity token decoder (default: [`UnverifiedJwtDecoder`])
    #[must_use]
    pub fn claims_decoder(mut self, decoder: Arc<dyn ClaimsDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Set a custom correlator generator (default: [`UuidCorrelatorGenerator`])
    #[must_use]
    pub fn correlator_generator(mut self, correlators: Arc<dyn CorrelatorGenerator>) -> Self {
        self.correlators = Some(correlators);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::InvalidConfig` if the default transport cannot be built.
    pub fn build(self) -> Result<CpaasClient> {
        let options = self.options.unwrap_or_default();
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::with_settings(options.timeout, options.user_agent.as_deref())
                    .map_err(|e| CpaasError::invalid_config(e.to_string()))?,
            ),
        };
        let decoder = self
            .decoder
            .unwrap_or_else(|| Arc::new(UnverifiedJwtDecoder));
        let session = AuthSession::new(
            self.credentials,
            options.token_url.clone(),
            Arc::clone(&transport),
            decoder,
        );

        Ok(CpaasClient {
            session,
            transport,
            correlators: self
                .correlators
                .unwrap_or_else(|| Arc::new(UuidCorrelatorGenerator)),
            options,
        })
    }
}

/// Client for the CPaaS messaging and notification channel APIs
///
/// One client holds one session. Operations take `&self` and may run
/// concurrently; see [`AuthSession`] for how refreshes interact.
pub struct CpaasClient {
    session: AuthSession,
    transport: Arc<dyn HttpTransport>,
    correlators: Arc<dyn CorrelatorGenerator>,
    options: ClientOptions,
}

impl std::fmt::Debug for CpaasClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpaasClient")
            .field("session", &self.session)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl CpaasClient {
    /// Create a client for the production platform with default settings
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::InvalidConfig` if the HTTP transport cannot be built.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(credentials: Credentials) -> CpaasClientBuilder {
        CpaasClientBuilder::new(credentials)
    }

    /// Get the client options
    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Get the underlying auth session
    #[must_use]
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Exchange credentials for new tokens now, even if the current ones are fresh
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::TokenExchangeFailed` if the exchange fails.
    pub async fn authenticate(&self) -> Result<TokenSnapshot> {
        self.session.force_refresh().await
    }

    /// Current tokens without refreshing
    pub async fn current_token(&self) -> Option<TokenSnapshot> {
        self.session.current().await
    }

    /// Account name the client operates on
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::NoActiveSession` before the first token exchange.
    pub async fn preferred_username(&self) -> Result<String> {
        self.session.preferred_username().await
    }

    /// List inbound SMS subscriptions
    ///
    /// Returns the response body as received.
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::Upstream` on a non-2xx response, or a token or
    /// transport error if the request could not be made.
    pub async fn list_inbound_subscriptions(&self) -> Result<serde_json::Value> {
        let token = self.session.ensure_fresh().await?;
        let url = self.account_url(SMS_SERVICE, &token, &["inbound", "subscriptions"])?;
        let response = self
            .dispatch(
                "list_inbound_subscriptions",
                HttpRequest::get(url.as_str()),
                &token,
            )
            .await?;
        decode_value(&response.body)
    }

    /// Fetch the remote addresses the account has exchanged messages with
    ///
    /// Requests at most `history_page_size` entries (50 by default).
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::Upstream` on a non-2xx response, or a token or
    /// transport error if the request could not be made.
    pub async fn get_history(&self) -> Result<serde_json::Value> {
        let token = self.session.ensure_fresh().await?;
        let mut url = self.account_url(SMS_SERVICE, &token, &["remoteAddresses"])?;
        url.query_pairs_mut()
            .append_pair("max", &self.options.history_page_size.to_string());
        let response = self
            .dispatch("get_history", HttpRequest::get(url.as_str()), &token)
            .await?;
        decode_value(&response.body)
    }

    /// Register a webhook notification channel
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::Upstream` carrying the platform's error payload on
    /// a non-2xx response, or a token or transport error if the request could
    /// not be made.
    pub async fn create_channel(
        &self,
        request: &CreateChannelRequest,
    ) -> Result<NotificationChannelResponse> {
        let token = self.session.ensure_fresh().await?;
        let url = self.account_url(CHANNEL_SERVICE, &token, &["channels"])?;
        let response = self
            .dispatch(
                "create_channel",
                HttpRequest::post_json(url.as_str(), request.to_payload()),
                &token,
            )
            .await
            .inspect_err(log_failure)?;
        decode(&response.body)
    }

    /// List the account's notification channels
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::Upstream` on a non-2xx response, or a token or
    /// transport error if the request could not be made.
    pub async fn list_channels(&self) -> Result<NotificationChannelListResponse> {
        let token = self.session.ensure_fresh().await?;
        let url = self.account_url(CHANNEL_SERVICE, &token, &["channels"])?;
        let response = self
            .dispatch("list_channels", HttpRequest::get(url.as_str()), &token)
            .await?;
        decode(&response.body)
    }

    /// Send one SMS from `from_address` to `to_address`
    ///
    /// Addresses are used as given. Returns the provider response body.
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::InvalidPathSegment` if `from_address` is empty,
    /// `.` or `..`.
    /// Returns `CpaasError::Upstream` carrying the platform's error payload on
    /// a non-2xx response, or a token or transport error if the request could
    /// not be made.
    pub async fn send_sms(&self, request: &SendSmsRequest) -> Result<serde_json::Value> {
        let token = self.session.ensure_fresh().await?;
        let url = self.account_url(
            SMS_SERVICE,
            &token,
            &["outbound", request.from_address.as_str(), "requests"],
        )?;
        let body = serde_json::to_value(request.to_envelope())?;
        let response = self
            .dispatch("send_sms", HttpRequest::post_json(url.as_str(), body), &token)
            .await
            .inspect_err(log_failure)?;
        decode_value(&response.body)
    }

    /// Send an SMS, setting up a notification channel if the account has none
    ///
    /// 1. Normalizes both addresses (fails before any request if either is invalid)
    /// 2. Lists channels and reuses the first channel's correlator, whatever
    ///    its callback URL
    /// 3. With no channels, creates one bound to `callback_url` under a fresh
    ///    correlator
    /// 4. Sends the message and returns the provider response
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::InvalidPhoneNumber` for an unusable address, or the
    /// first error raised by the underlying operations.
    pub async fn simple_send(&self, request: SimpleSendRequest) -> Result<serde_json::Value> {
        let to_address = normalize_phone(&request.to_address)?;
        let from_address = normalize_phone(&request.from_address)?;

        let channels = self.list_channels().await?;
        let client_correlator = if let Some(channel) = channels.channels().first() {
            tracing::debug!(
                correlator = %channel.client_correlator,
                "Reusing existing notification channel"
            );
            channel.client_correlator.clone()
        } else {
            let correlator = self.correlators.generate();
            tracing::debug!(correlator = %correlator, "No notification channel, creating one");
            let create = CreateChannelRequest::builder()
                .client_correlator(correlator.clone())
                .webhook_url(request.callback_url)
                .build();
            self.create_channel(&create).await?;
            correlator
        };

        let send = SendSmsRequest::builder()
            .to_address(to_address)
            .from_address(from_address)
            .message(request.message)
            .client_correlator(client_correlator)
            .build();
        self.send_sms(&send).await
    }

    /// `{base}/{service}/v1/{account}/{path...}`
    fn account_url(&self, service: &str, token: &TokenSnapshot, path: &[&str]) -> Result<Url> {
        let mut segments = vec![service, "v1", token.preferred_username()];
        segments.extend_from_slice(path);
        append_path_segments(self.options.api_root(), &segments)
    }

    /// Send an authorized request and classify the outcome
    async fn dispatch(
        &self,
        operation: &'static str,
        request: HttpRequest,
        token: &TokenSnapshot,
    ) -> Result<HttpResponse> {
        let request = request.header("Authorization", token.authorization_header());
        tracing::trace!(operation, method = %request.method, url = %request.url, "Dispatching");

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(TransportError::NoResponse(detail)) => {
                tracing::debug!(operation, detail = %detail, "No response received");
                return Err(CpaasError::upstream_unreachable(operation));
            }
            Err(e @ TransportError::Send(_)) => return Err(e.into()),
        };

        if response.is_success() {
            Ok(response)
        } else {
            Err(CpaasError::upstream(operation, response.status, response.body))
        }
    }
}

fn log_failure(err: &CpaasError) {
    match err {
        CpaasError::Upstream {
            operation,
            status: Some(status),
            body,
        } => {
            tracing::warn!(
                operation = *operation,
                status = *status,
                body = %truncate_for_log(body.as_deref().unwrap_or_default(), LOG_BODY_LIMIT),
                "Upstream request rejected"
            );
        }
        other => tracing::warn!(error = %other, "Upstream request failed"),
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

/// Like [`decode`], but an empty body is `Null` rather than an error
fn decode_value(body: &str) -> Result<serde_json::Value> {
    if body.trim().is_empty() {
        Ok(serde_json::Value::Null)
    } else {
        decode(body)
    }
}
