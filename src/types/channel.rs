//! Notification channel payloads

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::identifiers::ClientCorrelator;

/// Delivery mechanism of a notification channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelType {
    /// Callbacks POSTed to a caller-supplied webhook URL
    Webhooks,
    /// Callbacks pushed over a websocket
    #[serde(rename = "websockets", alias = "Websockets")]
    Websockets,
    /// Any other channel type the platform reports
    #[serde(other)]
    Other,
}

/// Which side initiates connectivity checks on the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnCheckRole {
    /// The platform checks the caller
    Server,
    /// The caller checks the platform
    Client,
}

/// Channel-specific data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelData {
    /// Endpoint assigned by the platform
    #[serde(rename = "channelURL", default, skip_serializing_if = "Option::is_none")]
    pub channel_url: Option<String>,
    /// Webhook receiving callbacks
    #[serde(rename = "x-webhookURL", default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Authorization header value the platform sends to the webhook
    #[serde(rename = "x-authorization", default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
}

/// Server-side webhook registration
///
/// Identified by the caller's `client_correlator` and the platform-assigned
/// `resource_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationChannel {
    /// Callback URL recorded by the platform
    #[serde(rename = "callbackURL", default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    /// Channel data
    #[serde(default)]
    pub channel_data: ChannelData,
    /// Lifetime in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_lifetime: Option<u64>,
    /// Channel type
    pub channel_type: ChannelType,
    /// Caller-supplied correlator
    pub client_correlator: ClientCorrelator,
    /// Platform-assigned resource URL
    #[serde(rename = "resourceURL", default, skip_serializing_if = "Option::is_none")]
    pub resource_url: Option<String>,
    /// Connectivity check role
    #[serde(rename = "x-connCheckRole", default, skip_serializing_if = "Option::is_none")]
    pub conn_check_role: Option<ConnCheckRole>,
}

/// Single-channel wrapper returned on creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationChannelResponse {
    /// The channel
    pub notification_channel: NotificationChannel,
}

/// Inner list of channels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationChannelList {
    /// Registered channels, possibly empty
    #[serde(default)]
    pub notification_channel: Vec<NotificationChannel>,
}

/// Channel list wrapper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationChannelListResponse {
    /// The list
    #[serde(default)]
    pub notification_channel_list: NotificationChannelList,
}

impl NotificationChannelListResponse {
    /// Registered channels
    #[must_use]
    pub fn channels(&self) -> &[NotificationChannel] {
        &self.notification_channel_list.notification_channel
    }
}

/// Parameters for creating a webhook channel
#[derive(Debug, Clone, TypedBuilder)]
#[builder(
    builder_method(doc = "Create a new builder for CreateChannelRequest"),
    builder_type(doc = "Builder for CreateChannelRequest", vis = "pub"),
    build_method(doc = "Build the CreateChannelRequest")
)]
pub struct CreateChannelRequest {
    /// Correlator identifying the channel
    #[builder(setter(into))]
    pub client_correlator: ClientCorrelator,
    /// Webhook that will receive callbacks
    #[builder(default, setter(into))]
    pub webhook_url: String,
    /// Authorization header value the platform should send to the webhook
    #[builder(default, setter(into))]
    pub authorization: String,
}

impl CreateChannelRequest {
    /// Wire payload with the channel type fixed to webhooks
    #[must_use]
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "notificationChannel": {
                "channelData": {
                    "x-webhookURL": self.webhook_url,
                    "x-authorization": self.authorization,
                },
                "channelType": ChannelType::Webhooks,
                "clientCorrelator": self.client_correlator,
            }
        })
    }
}
