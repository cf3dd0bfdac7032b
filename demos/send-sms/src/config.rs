//! Endpoint settings and command-line arguments
//!
//! Credentials come from `Credentials::from_env`; this module only reads the
//! demo's own variables.

use clap::{Parser, Subcommand};
use cpaas_sdk::ClientOptions;

/// Build client options, overriding endpoints from the environment
///
/// - `CPAAS_BASE_URL`: API root (default: production)
/// - `CPAAS_TOKEN_URL`: OAuth2 token endpoint (default: production)
pub fn client_options() -> ClientOptions {
    let mut options = ClientOptions::default();
    if let Ok(base_url) = std::env::var("CPAAS_BASE_URL") {
        options.base_url = base_url;
    }
    if let Ok(token_url) = std::env::var("CPAAS_TOKEN_URL") {
        options.token_url = token_url;
    }
    options
}

/// Webhook bound to a newly created channel (`CPAAS_CALLBACK_URL`)
pub fn callback_url() -> String {
    std::env::var("CPAAS_CALLBACK_URL").unwrap_or_default()
}

/// Send SMS and inspect a CPaaS account from the command line
#[derive(Parser, Debug)]
#[command(name = "cpaas-send-sms")]
#[command(about = "Send SMS and inspect notification channels on a CPaaS account")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

/// What the demo was asked to do
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Send a message, creating a notification channel if none exists
    Send {
        /// Recipient number (E.164 or 10-digit US)
        to: String,
        /// Sender number (E.164 or 10-digit US)
        from: String,
        /// Message text; remaining arguments are joined with spaces
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// List notification channels
    Channels,
    /// Show remote addresses the account has messaged with
    History,
    /// List inbound SMS subscriptions
    Subscriptions,
}
