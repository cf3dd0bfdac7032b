//! Newtype wrappers for type safety

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

// ============================================================================
// Newtype Wrappers for Type Safety
// ============================================================================

/// Client correlator newtype
///
/// Caller-chosen identifier tying a notification channel or outbound request
/// to its asynchronous callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientCorrelator(String);

impl ClientCorrelator {
    /// Create a new client correlator
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the correlator as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientCorrelator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ClientCorrelator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for ClientCorrelator {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for ClientCorrelator {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for ClientCorrelator {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ClientCorrelator {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Correlator Generation
// ============================================================================

/// Produces fresh correlators for channels created on the caller's behalf
pub trait CorrelatorGenerator: Send + Sync {
    /// Generate a new, unique correlator
    fn generate(&self) -> ClientCorrelator;
}

/// Generates random UUIDv4 correlators in simple (unhyphenated) form
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidCorrelatorGenerator;

impl CorrelatorGenerator for UuidCorrelatorGenerator {
    fn generate(&self) -> ClientCorrelator {
        ClientCorrelator(uuid::Uuid::new_v4().simple().to_string())
    }
}
