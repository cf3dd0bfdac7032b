//! Identity token claim decoding
//!
//! Claims are read straight out of the token payload. Signatures are NOT
//! verified: the token came from the token endpoint over TLS and is only used
//! to learn the account name and expiry.

use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use thiserror::Error;

use super::token::DecodedClaims;

// JWT segments are unpadded base64url, but some issuers pad anyway
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors that can occur while decoding token claims
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// Token does not have the `header.payload.signature` shape
    #[error("malformed token: expected 3 segments, found {0}")]
    Malformed(usize),

    /// Payload segment is not valid base64url
    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Payload is not a JSON object with the required claims
    #[error("invalid claims: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes a compact token string into its claims
pub trait ClaimsDecoder: Send + Sync {
    /// Decode the claims segment of `token`
    ///
    /// # Errors
    /// Returns [`ClaimsError`] if the token cannot be parsed or lacks `exp`
    /// or `preferred_username`.
    fn decode(&self, token: &str) -> Result<DecodedClaims, ClaimsError>;
}

/// Default decoder: base64url-decodes the payload segment and parses it as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct UnverifiedJwtDecoder;

impl ClaimsDecoder for UnverifiedJwtDecoder {
    fn decode(&self, token: &str) -> Result<DecodedClaims, ClaimsError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(ClaimsError::Malformed(segments.len()));
        }
        let payload = SEGMENT_ENGINE.decode(segments[1])?;
        Ok(serde_json::from_slice(&payload)?)
    }
}

/// Build an unsigned token around `claims`
///
/// Useful for tests and local mocks of the token endpoint.
#[must_use]
pub fn encode_unsigned(claims: &serde_json::Value) -> String {
    let header = SEGMENT_ENGINE.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = SEGMENT_ENGINE.encode(claims.to_string());
    format!("{header}.{payload}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_reads_required_claims() {
        let token = encode_unsigned(&json!({
            "exp": 1_700_000_000,
            "preferred_username": "acct1",
            "email": "acct1@example.com"
        }));
        let claims = UnverifiedJwtDecoder.decode(&token).unwrap();
        assert_eq!(claims.exp, 1_700_000_000);
        assert_eq!(claims.preferred_username, "acct1");
        assert_eq!(claims.claim("email"), Some(&json!("acct1@example.com")));
    }

    #[test]
    fn test_decode_accepts_padded_payload() {
        let payload = base64::engine::general_purpose::URL_SAFE
            .encode(json!({"exp": 10, "preferred_username": "a"}).to_string());
        let token = format!("e30.{payload}.sig");
        let claims = UnverifiedJwtDecoder.decode(&token).unwrap();
        assert_eq!(claims.preferred_username, "a");
    }

    #[test]
    fn test_decode_rejects_wrong_segment_count() {
        let err = UnverifiedJwtDecoder.decode("only.two").unwrap_err();
        assert!(matches!(err, ClaimsError::Malformed(2)));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let err = UnverifiedJwtDecoder.decode("a.!!!.c").unwrap_err();
        assert!(matches!(err, ClaimsError::Base64(_)));
    }

    #[test]
    fn test_decode_requires_username() {
        let token = encode_unsigned(&json!({"exp": 10}));
        let err = UnverifiedJwtDecoder.decode(&token).unwrap_err();
        assert!(matches!(err, ClaimsError::Json(_)));
    }
}
