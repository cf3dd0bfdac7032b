//! Credentials for the token endpoint

use crate::error::{CpaasError, Result};

const DEFAULT_SCOPE: &str = "openid";
const USER_GRANT_TYPE: &str = "password";
const PROJECT_GRANT_TYPE: &str = "client_credentials";

/// Resource-owner credentials for a user account
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredentials {
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
    /// OAuth grant type (usually `password`)
    pub grant_type: String,
    /// OAuth client ID
    pub client_id: String,
    /// Space-separated scopes
    pub scope: String,
}

/// Client credentials for a project
#[derive(Clone, PartialEq, Eq)]
pub struct ProjectCredentials {
    /// OAuth grant type (usually `client_credentials`)
    pub grant_type: String,
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Space-separated scopes
    pub scope: String,
}

/// Credentials presented to the token endpoint
///
/// The variant decides which fields go into the form-encoded exchange body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Authenticate as a user
    User(UserCredentials),
    /// Authenticate as a project
    Project(ProjectCredentials),
}

// Secrets stay out of logs
impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("grant_type", &self.grant_type)
            .field("client_id", &self.client_id)
            .field("scope", &self.scope)
            .finish()
    }
}

impl std::fmt::Debug for ProjectCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectCredentials")
            .field("grant_type", &self.grant_type)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}

impl Credentials {
    /// User credentials with the `password` grant and `openid` scope
    pub fn user(
        client_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::User(UserCredentials {
            username: username.into(),
            password: password.into(),
            grant_type: USER_GRANT_TYPE.to_string(),
            client_id: client_id.into(),
            scope: DEFAULT_SCOPE.to_string(),
        })
    }

    /// Project credentials with the `client_credentials` grant and `openid` scope
    pub fn project(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::Project(ProjectCredentials {
            grant_type: PROJECT_GRANT_TYPE.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: DEFAULT_SCOPE.to_string(),
        })
    }

    /// Replace the requested scope
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        match &mut self {
            Self::User(c) => c.scope = scope.into(),
            Self::Project(c) => c.scope = scope.into(),
        }
        self
    }

    /// Replace the grant type
    #[must_use]
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        match &mut self {
            Self::User(c) => c.grant_type = grant_type.into(),
            Self::Project(c) => c.grant_type = grant_type.into(),
        }
        self
    }

    /// OAuth client ID for either variant
    #[must_use]
    pub fn client_id(&self) -> &str {
        match self {
            Self::User(c) => &c.client_id,
            Self::Project(c) => &c.client_id,
        }
    }

    /// Form fields sent to the token endpoint, in wire order
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let pairs: Vec<(&str, &str)> = match self {
            Self::User(c) => vec![
                ("username", c.username.as_str()),
                ("password", c.password.as_str()),
                ("grant_type", c.grant_type.as_str()),
                ("client_id", c.client_id.as_str()),
                ("scope", c.scope.as_str()),
            ],
            Self::Project(c) => vec![
                ("grant_type", c.grant_type.as_str()),
                ("client_id", c.client_id.as_str()),
                ("client_secret", c.client_secret.as_str()),
                ("scope", c.scope.as_str()),
            ],
        };
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Load credentials from `CPAAS_*` environment variables
    ///
    /// `CPAAS_CLIENT_ID` is required. If `CPAAS_CLIENT_SECRET` is set, project
    /// credentials are built; otherwise `CPAAS_USERNAME` and `CPAAS_PASSWORD`
    /// are required for user credentials. `CPAAS_SCOPE` and `CPAAS_GRANT_TYPE`
    /// override the defaults.
    ///
    /// # Errors
    ///
    /// Returns `CpaasError::InvalidConfig` if a required variable is missing.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| CpaasError::invalid_config(format!("{key} is not set")))
        };

        let client_id = require("CPAAS_CLIENT_ID")?;
        let mut credentials = match lookup("CPAAS_CLIENT_SECRET").filter(|v| !v.is_empty()) {
            Some(secret) => Self::project(client_id, secret),
            None => Self::user(
                client_id,
                require("CPAAS_USERNAME")?,
                require("CPAAS_PASSWORD")?,
            ),
        };

        if let Some(scope) = lookup("CPAAS_SCOPE").filter(|v| !v.is_empty()) {
            credentials = credentials.with_scope(scope);
        }
        if let Some(grant_type) = lookup("CPAAS_GRANT_TYPE").filter(|v| !v.is_empty()) {
            credentials = credentials.with_grant_type(grant_type);
        }
        Ok(credentials)
    }
}
