//! OAuth2 token management for the CPaaS platform
//!
//! # Overview
//!
//! The platform issues an identity token and an access token from a single
//! token endpoint. This module:
//!
//! 1. Encodes [`Credentials`] (user or project grant) as a form body
//! 2. Exchanges them at the token endpoint
//! 3. Decodes the identity token's claims (no signature verification)
//! 4. Keeps the tokens in a [`TokenStore`] and refreshes them when they are
//!    within five seconds of expiry
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cpaas_sdk::auth::{AuthSession, Credentials, UnverifiedJwtDecoder};
//! use cpaas_sdk::transport::ReqwestTransport;
//!
//! # async fn example() -> cpaas_sdk::Result<()> {
//! let session = AuthSession::new(
//!     Credentials::project("my-client-id", "my-client-secret"),
//!     "https://oauth-cpaas.att.com/cpaas/auth/v1/token",
//!     Arc::new(ReqwestTransport::new()),
//!     Arc::new(UnverifiedJwtDecoder),
//! );
//!
//! let snapshot = session.ensure_fresh().await?;
//! println!("Authenticated as {}", snapshot.preferred_username());
//! # Ok(())
//! # }
//! ```
//!
//! # Security
//!
//! - Claims are trusted as received; do not use them for authorization decisions
//! - Tokens live in memory only and are never persisted
//! - `Debug` output redacts passwords, client secrets and tokens

mod credentials;
pub mod jwt;
mod session;
mod token;

pub use credentials::{Credentials, ProjectCredentials, UserCredentials};
pub use jwt::{ClaimsDecoder, ClaimsError, UnverifiedJwtDecoder};
pub use session::AuthSession;
pub use token::{DecodedClaims, FRESHNESS_MARGIN, TokenPair, TokenResponse, TokenSnapshot, TokenStore};
