//! Outbound SMS payloads

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::identifiers::ClientCorrelator;

/// Message text wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundSmsTextMessage {
    /// Message body
    pub message: String,
}

/// Outbound message addressed to the recipients in `address`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundSmsMessageRequest {
    /// Recipient addresses (the client always sends exactly one)
    pub address: Vec<String>,
    /// Correlator of the notification channel receiving delivery callbacks
    pub client_correlator: ClientCorrelator,
    /// Message text
    #[serde(rename = "outboundSMSTextMessage")]
    pub outbound_sms_text_message: OutboundSmsTextMessage,
}

/// Wire envelope for an outbound message request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundSmsEnvelope {
    /// The request
    #[serde(rename = "outboundSMSMessageRequest")]
    pub outbound_sms_message_request: OutboundSmsMessageRequest,
}

/// Parameters for sending a single SMS
///
/// Addresses are sent as given; use [`SimpleSendRequest`] to have them
/// normalized.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(
    builder_method(doc = "Create a new builder for SendSmsRequest"),
    builder_type(doc = "Builder for SendSmsRequest", vis = "pub"),
    build_method(doc = "Build the SendSmsRequest")
)]
pub struct SendSmsRequest {
    /// Recipient
    #[builder(setter(into))]
    pub to_address: String,
    /// Sender number owned by the account
    #[builder(setter(into))]
    pub from_address: String,
    /// Message text
    #[builder(setter(into))]
    pub message: String,
    /// Correlator of the channel receiving delivery callbacks
    #[builder(setter(into))]
    pub client_correlator: ClientCorrelator,
}

impl SendSmsRequest {
    /// Wire payload addressed to the single recipient
    #[must_use]
    pub fn to_envelope(&self) -> OutboundSmsEnvelope {
        OutboundSmsEnvelope {
            outbound_sms_message_request: OutboundSmsMessageRequest {
                address: vec![self.to_address.clone()],
                client_correlator: self.client_correlator.clone(),
                outbound_sms_text_message: OutboundSmsTextMessage {
                    message: self.message.clone(),
                },
            },
        }
    }
}

/// Parameters for [`simple_send`](crate::CpaasClient::simple_send)
#[derive(Debug, Clone, TypedBuilder)]
#[builder(
    builder_method(doc = "Create a new builder for SimpleSendRequest"),
    builder_type(doc = "Builder for SimpleSendRequest", vis = "pub"),
    build_method(doc = "Build the SimpleSendRequest")
)]
pub struct SimpleSendRequest {
    /// Recipient, in any format [`normalize_phone`](crate::phone::normalize_phone) accepts
    #[builder(setter(into))]
    pub to_address: String,
    /// Sender, in any format [`normalize_phone`](crate::phone::normalize_phone) accepts
    #[builder(setter(into))]
    pub from_address: String,
    /// Message text
    #[builder(setter(into))]
    pub message: String,
    /// Webhook for a channel created when the account has none
    #[builder(default, setter(into))]
    pub callback_url: String,
}
