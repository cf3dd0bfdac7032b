//! # CPaaS SDK for Rust
//!
//! Client library for the SMS messaging and notification channel APIs of a
//! CPaaS (Communications Platform as a Service) provider.
//! Async/await, strong typing, tokio-based.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cpaas_sdk::{CpaasClient, Credentials, SimpleSendRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CpaasClient::new(Credentials::from_env()?)?;
//!
//!     let request = SimpleSendRequest::builder()
//!         .to_address("415 555 2671")
//!         .from_address("+1 212 555 0100")
//!         .message("Hello from Rust!")
//!         .build();
//!
//!     let response = client.simple_send(request).await?;
//!     println!("{response}");
//!     Ok(())
//! }
//! ```
//!
//! ## Core Features
//!
//! ### 1. Managed Tokens
//!
//! The client exchanges its [`Credentials`] at the OAuth2 token endpoint on
//! first use and again whenever the identity token is within five seconds of
//! expiry. Callers never handle tokens directly, though
//! [`CpaasClient::authenticate`] and [`CpaasClient::current_token`] expose them.
//!
//! ### 2. Messaging and Channels
//!
//! - [`CpaasClient::send_sms`] - send one message
//! - [`CpaasClient::simple_send`] - normalize numbers, find or create a
//!   notification channel, then send
//! - [`CpaasClient::create_channel`] / [`CpaasClient::list_channels`]
//! - [`CpaasClient::list_inbound_subscriptions`] / [`CpaasClient::get_history`]
//!
//! ### 3. Pluggable Collaborators
//!
//! HTTP, identity token decoding and correlator generation sit behind traits
//! ([`HttpTransport`], [`ClaimsDecoder`], [`CorrelatorGenerator`]) so they can
//! be replaced, e.g. with a scripted transport in tests:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use cpaas_sdk::{ClientOptions, CpaasClient, Credentials, ReqwestTransport};
//! # fn example() -> cpaas_sdk::Result<()> {
//! let options = ClientOptions::builder()
//!     .base_url("http://localhost:8080/cpaas")
//!     .token_url("http://localhost:8080/cpaas/auth/v1/token")
//!     .build();
//!
//! let client = CpaasClient::builder(Credentials::project("id", "secret"))
//!     .options(options)
//!     .transport(Arc::new(ReqwestTransport::new()))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`client`]: The messaging client and its builder
//! - [`auth`]: Credentials, token store, session refresh, claim decoding
//! - [`transport`]: HTTP abstraction and the `reqwest` implementation
//! - [`phone`]: Phone number normalization
//! - [`types`]: Identifiers, payloads and options
//! - [`error`]: Error types and handling
//!
//! ## Logging
//!
//! This crate uses [`tracing`](https://crates.io/crates/tracing) for structured logging.
//! Tracing events are always emitted but are zero-cost when no subscriber is attached.
//! Tokens and secrets are never logged. To see logs, attach a tracing subscriber:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, CpaasError>`](Result). Nothing
//! is retried automatically:
//!
//! ```no_run
//! # use cpaas_sdk::{CpaasClient, CpaasError};
//! # async fn example(client: CpaasClient) {
//! match client.list_channels().await {
//!     Ok(list) => println!("{} channels", list.channels().len()),
//!     Err(CpaasError::TokenExchangeFailed { reason, .. }) => {
//!         eprintln!("Could not authenticate: {reason}");
//!     }
//!     Err(e) => {
//!         eprintln!("Error: {e} (body: {:?})", e.body());
//!     }
//! }
//! # }
//! ```
//!
//! ## Security
//!
//! - **No signature verification** - identity token claims are read, not verified
//! - **In-memory tokens** - nothing is written to disk
//! - **Redacted debug output** - passwords, secrets and tokens never appear in `Debug`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod client;
pub mod error;
pub mod phone;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use auth::{
    AuthSession, ClaimsDecoder, Credentials, DecodedClaims, ProjectCredentials, TokenPair,
    TokenSnapshot, TokenStore, UnverifiedJwtDecoder, UserCredentials,
};
pub use client::{CpaasClient, CpaasClientBuilder};
pub use error::{CpaasError, Result};
pub use phone::normalize_phone;
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RequestBody,
    TransportError,
};
pub use types::{
    ChannelType, ClientCorrelator, ClientOptions, ConnCheckRole, CorrelatorGenerator,
    CreateChannelRequest, NotificationChannel, NotificationChannelListResponse,
    NotificationChannelResponse, SendSmsRequest, SimpleSendRequest, UuidCorrelatorGenerator,
};

/// Version of the SDK
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
