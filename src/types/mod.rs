//! Type definitions for the CPaaS SDK
//!
//! This module contains the identifiers, request/response payloads and
//! configuration types used throughout the SDK.

// Module declarations
pub mod channel;
pub mod identifiers;
pub mod options;
pub mod sms;

// Re-export all public types
pub use channel::{
    ChannelData, ChannelType, ConnCheckRole, CreateChannelRequest, NotificationChannel,
    NotificationChannelList, NotificationChannelListResponse, NotificationChannelResponse,
};
pub use identifiers::{ClientCorrelator, CorrelatorGenerator, UuidCorrelatorGenerator};
pub use options::{ClientOptions, DEFAULT_BASE_URL, DEFAULT_HISTORY_PAGE_SIZE, DEFAULT_TOKEN_URL};
pub use sms::{
    OutboundSmsEnvelope, OutboundSmsMessageRequest, OutboundSmsTextMessage, SendSmsRequest,
    SimpleSendRequest,
};
