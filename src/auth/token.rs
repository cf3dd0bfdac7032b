//! Token state held for a client session

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize};

use super::jwt::{ClaimsDecoder, ClaimsError};
use crate::error::{CpaasError, Result};

/// Tokens are treated as stale this long before `exp`
pub const FRESHNESS_MARGIN: Duration = Duration::from_secs(5);

/// Identity and access token issued together by the token endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Identity token (compact JWT)
    pub id_token: String,
    /// Access token sent as the bearer credential
    pub access_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("id_token", &"<redacted>")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Claims carried by the identity token
///
/// Only `exp` and `preferred_username` are interpreted; every other claim is
/// kept as-is in `other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedClaims {
    /// Expiry, in seconds since the Unix epoch
    #[serde(deserialize_with = "numeric_date")]
    pub exp: i64,
    /// Account name used to scope resource paths
    pub preferred_username: String,
    /// Remaining claims
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl DecodedClaims {
    /// Look up any claim by name
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&serde_json::Value> {
        self.other.get(name)
    }
}

// NumericDate may be fractional; whole seconds are enough for freshness
fn numeric_date<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let seconds = f64::deserialize(deserializer)?;
    Ok(seconds.floor() as i64)
}

/// Body returned by the token endpoint
///
/// Any other fields (`token_type`, `expires_in`, `refresh_token`, ...) are
/// ignored; expiry comes from the identity token's `exp` claim.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Identity token
    pub id_token: String,
    /// Access token
    pub access_token: String,
}

/// Current tokens plus the claims decoded from the identity token
#[derive(Debug, Clone, PartialEq)]
pub struct TokenSnapshot {
    /// Token pair
    pub tokens: TokenPair,
    /// Claims decoded from `tokens.id_token`
    pub claims: DecodedClaims,
}

impl TokenSnapshot {
    /// Get the Authorization header value
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.tokens.access_token)
    }

    /// Account name from the identity token
    #[must_use]
    pub fn preferred_username(&self) -> &str {
        &self.claims.preferred_username
    }
}

/// Holds the session's tokens
///
/// Tokens and claims are stored together, so claims exist exactly when tokens
/// do. Every [`replace`](Self::replace) discards the previous pair.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    current: Option<TokenSnapshot>,
}

fn unix_millis(time: SystemTime) -> i128 {
    time.duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as i128
}

impl TokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether held tokens remain valid for at least [`FRESHNESS_MARGIN`] after `now`
    ///
    /// Always `false` when nothing is held.
    #[must_use]
    pub fn is_fresh(&self, now: SystemTime) -> bool {
        let Some(snapshot) = &self.current else {
            return false;
        };
        let expires_at_ms = i128::from(snapshot.claims.exp) * 1000;
        expires_at_ms - unix_millis(now) >= FRESHNESS_MARGIN.as_millis() as i128
    }

    /// Store the tokens from a token endpoint response
    ///
    /// The identity token is decoded without signature verification. On
    /// failure the previous tokens are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError`] if the identity token cannot be decoded.
    pub fn replace(
        &mut self,
        response: TokenResponse,
        decoder: &dyn ClaimsDecoder,
    ) -> std::result::Result<TokenSnapshot, ClaimsError> {
        let claims = decoder.decode(&response.id_token)?;
        let snapshot = TokenSnapshot {
            tokens: TokenPair {
                id_token: response.id_token,
                access_token: response.access_token,
            },
            claims,
        };
        self.current = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Current snapshot, if a token exchange has happened
    #[must_use]
    pub fn snapshot(&self) -> Option<&TokenSnapshot> {
        self.current.as_ref()
    }

    /// Decoded claims, if held
    #[must_use]
    pub fn claims(&self) -> Option<&DecodedClaims> {
        self.current.as_ref().map(|s| &s.claims)
    }

    /// Account name from the identity token
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::NoActiveSession` before the first exchange.
    pub fn preferred_username(&self) -> Result<&str> {
        self.current
            .as_ref()
            .map(TokenSnapshot::preferred_username)
            .ok_or(CpaasError::NoActiveSession)
    }
}
