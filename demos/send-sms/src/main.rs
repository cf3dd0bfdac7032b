//! CPaaS SMS Demo
//!
//! Sends a message with `simple_send`, or prints the account's channels,
//! history or inbound subscriptions.
//!
//! Credentials are read from the environment:
//! - `CPAAS_CLIENT_ID` (required)
//! - `CPAAS_CLIENT_SECRET`, or `CPAAS_USERNAME` and `CPAAS_PASSWORD`
//! - `CPAAS_SCOPE`, `CPAAS_GRANT_TYPE` (optional)
//!
//! Run with: cargo run -p cpaas-send-sms -- send 4155552671 2125550100 Hello

mod config;

use clap::Parser;
use config::{Args, Command};
use cpaas_sdk::{CpaasClient, CpaasError, Credentials, SimpleSendRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Override with RUST_LOG env var for more detail
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cpaas_sdk=debug,cpaas_send_sms=info,warn".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let client = CpaasClient::builder(Credentials::from_env()?)
        .options(config::client_options())
        .build()?;

    let result = match args.command {
        Command::Send { to, from, message } => {
            let request = SimpleSendRequest::builder()
                .to_address(to)
                .from_address(from)
                .message(message.join(" "))
                .callback_url(config::callback_url())
                .build();
            client.simple_send(request).await
        }
        Command::Channels => client
            .list_channels()
            .await
            .and_then(|list| Ok(serde_json::to_value(list)?)),
        Command::History => client.get_history().await,
        Command::Subscriptions => client.list_inbound_subscriptions().await,
    };

    match result {
        Ok(body) => {
            if let Ok(account) = client.preferred_username().await {
                tracing::info!(account = %account, "Request completed");
            }
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(err) => {
            if let Some(payload) = err.body_json() {
                eprintln!("{}", serde_json::to_string_pretty(&payload)?);
            }
            if let CpaasError::InvalidPhoneNumber(number) = &err {
                eprintln!("Numbers must be E.164 (+14155552671) or 10-digit US: {number}");
            }
            Err(err.into())
        }
    }
}
