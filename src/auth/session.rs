//! Token endpoint exchange and freshness management

use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::RwLock;

use super::credentials::Credentials;
use super::jwt::ClaimsDecoder;
use super::token::{TokenResponse, TokenSnapshot, TokenStore};
use crate::error::{CpaasError, Result};
use crate::transport::{HttpRequest, HttpTransport};

/// Authenticated session against the token endpoint
///
/// Holds the credentials and the single [`TokenStore`] for one client. The
/// store lock is never held across the exchange request, so concurrent callers
/// racing an expired token may each refresh; the last response stored wins.
pub struct AuthSession {
    credentials: Credentials,
    token_url: String,
    transport: Arc<dyn HttpTransport>,
    decoder: Arc<dyn ClaimsDecoder>,
    store: RwLock<TokenStore>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("credentials", &self.credentials)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    /// Create a session with no tokens yet
    pub fn new(
        credentials: Credentials,
        token_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        decoder: Arc<dyn ClaimsDecoder>,
    ) -> Self {
        Self {
            credentials,
            token_url: token_url.into(),
            transport,
            decoder,
            store: RwLock::new(TokenStore::new()),
        }
    }

    /// Credentials this session exchanges
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Return fresh tokens, refreshing first if needed
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::TokenExchangeFailed` if a refresh was needed and failed.
    pub async fn ensure_fresh(&self) -> Result<TokenSnapshot> {
        self.ensure_fresh_at(SystemTime::now()).await
    }

    /// Like [`ensure_fresh`](Self::ensure_fresh), judging freshness at `now`
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::TokenExchangeFailed` if a refresh was needed and failed.
    pub async fn ensure_fresh_at(&self, now: SystemTime) -> Result<TokenSnapshot> {
        {
            let store = self.store.read().await;
            if store.is_fresh(now) {
                if let Some(snapshot) = store.snapshot() {
                    return Ok(snapshot.clone());
                }
            }
        }

        tracing::debug!("Token missing or about to expire, refreshing");
        self.force_refresh().await
    }

    /// Exchange credentials for new tokens unconditionally
    ///
    /// Makes exactly one request; there is no retry.
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::TokenExchangeFailed` if the endpoint is unreachable,
    /// answers non-2xx, or returns a body whose identity token cannot be decoded.
    pub async fn force_refresh(&self) -> Result<TokenSnapshot> {
        let request = HttpRequest::post_form(&self.token_url, self.credentials.form_fields());

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| CpaasError::token_exchange(e.to_string()))?;

        if !response.is_success() {
            tracing::debug!(status = response.status, "Token endpoint rejected exchange");
            return Err(CpaasError::token_exchange_response(
                "token endpoint returned an error status",
                response.status,
                response.body,
            ));
        }

        let token_response: TokenResponse = match serde_json::from_str(&response.body) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Err(CpaasError::token_exchange_response(
                    format!("failed to parse token response: {e}"),
                    response.status,
                    response.body,
                ));
            }
        };

        let decoded = self
            .store
            .write()
            .await
            .replace(token_response, self.decoder.as_ref());

        match decoded {
            Ok(snapshot) => {
                tracing::debug!(
                    account = %snapshot.preferred_username(),
                    exp = snapshot.claims.exp,
                    "Token exchange succeeded"
                );
                Ok(snapshot)
            }
            Err(e) => Err(CpaasError::token_exchange_response(
                format!("failed to decode identity token: {e}"),
                response.status,
                response.body,
            )),
        }
    }

    /// Current tokens without refreshing
    pub async fn current(&self) -> Option<TokenSnapshot> {
        self.store.read().await.snapshot().cloned()
    }

    /// Account name from the held identity token
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::NoActiveSession` before the first exchange.
    pub async fn preferred_username(&self) -> Result<String> {
        self.store
            .read()
            .await
            .preferred_username()
            .map(ToString::to_string)
    }
}
