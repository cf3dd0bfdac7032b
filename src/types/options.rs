//! Client configuration options

use std::time::Duration;
use typed_builder::TypedBuilder;

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://oauth-cpaas.att.com/cpaas";
/// Production token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://oauth-cpaas.att.com/cpaas/auth/v1/token";
/// Page size requested from the remote-addresses history endpoint
pub const DEFAULT_HISTORY_PAGE_SIZE: u32 = 50;

/// Options for [`CpaasClient`](crate::CpaasClient)
#[derive(Debug, Clone, TypedBuilder)]
#[builder(
    builder_method(doc = "Create a new builder for ClientOptions"),
    builder_type(doc = "Builder for ClientOptions", vis = "pub"),
    build_method(doc = "Build the ClientOptions")
)]
pub struct ClientOptions {
    /// API root that resource paths are appended to
    #[builder(default = DEFAULT_BASE_URL.to_string(), setter(into))]
    pub base_url: String,

    /// OAuth2 token endpoint
    #[builder(default = DEFAULT_TOKEN_URL.to_string(), setter(into))]
    pub token_url: String,

    /// `max` query parameter for message history
    #[builder(default = DEFAULT_HISTORY_PAGE_SIZE)]
    pub history_page_size: u32,

    /// Per-request timeout for the default transport
    #[builder(default, setter(strip_option))]
    pub timeout: Option<Duration>,

    /// User-Agent header for the default transport
    #[builder(default, setter(strip_option, into))]
    pub user_agent: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientOptions {
    /// API root without a trailing slash
    #[must_use]
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
