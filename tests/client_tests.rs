//! Integration tests for the messaging client: token lifecycle, request
//! shapes, error mapping and `simple_send` orchestration.

mod common;

use common::{
    ACCESS_TOKEN, BASE_URL, CHANNELS_URL, RecordingTransport, TOKEN_URL, channel_list, client,
    token_body,
};
use cpaas_sdk::{
    CpaasError, CreateChannelRequest, HttpMethod, RequestBody, SendSmsRequest, SimpleSendRequest,
    TransportError,
};
use serde_json::json;

const SEND_URL: &str =
    "https://cpaas.example.test/cpaas/smsmessaging/v1/acct1/outbound/+12125550100/requests";

fn json_body(request: &cpaas_sdk::HttpRequest) -> serde_json::Value {
    match &request.body {
        Some(RequestBody::Json(value)) => value.clone(),
        other => panic!("expected JSON body, got {other:?}"),
    }
}

// ============================================================================
// Token lifecycle
// ============================================================================

#[tokio::test]
async fn test_list_channels_end_to_end() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    transport.json(HttpMethod::Get, CHANNELS_URL, 200, channel_list(&[]));
    let client = client(transport.clone());

    let list = client.list_channels().await.unwrap();

    assert!(list.channels().is_empty());
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, TOKEN_URL);

    let gets = transport.requests_to(HttpMethod::Get, CHANNELS_URL);
    assert_eq!(gets.len(), 1);
    assert_eq!(
        gets[0].header_value("Authorization"),
        Some(format!("Bearer {ACCESS_TOKEN}").as_str())
    );
}

#[tokio::test]
async fn test_fresh_token_is_reused() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    transport.json(HttpMethod::Get, CHANNELS_URL, 200, channel_list(&[]));
    let client = client(transport.clone());

    client.list_channels().await.unwrap();
    client.list_channels().await.unwrap();
    client.list_channels().await.unwrap();

    assert_eq!(transport.token_requests(), 1);
}

#[tokio::test]
async fn test_token_inside_margin_refreshes_every_call() {
    let transport = RecordingTransport::new();
    // Expires in 2s, which is inside the 5s margin
    transport.token_endpoint(2);
    transport.json(HttpMethod::Get, CHANNELS_URL, 200, channel_list(&[]));
    let client = client(transport.clone());

    client.list_channels().await.unwrap();
    client.list_channels().await.unwrap();

    assert_eq!(transport.token_requests(), 2);
}

#[tokio::test]
async fn test_project_credentials_form_body() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    let client = client(transport.clone());

    let snapshot = client.authenticate().await.unwrap();

    assert_eq!(snapshot.preferred_username(), "acct1");
    assert_eq!(snapshot.claims.claim("sub"), Some(&json!("user-123")));
    let request = &transport.requests()[0];
    assert_eq!(
        request.header_value("Content-Type"),
        Some("application/x-www-form-urlencoded")
    );
    let Some(RequestBody::Form(fields)) = &request.body else {
        panic!("expected form body");
    };
    let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["grant_type", "client_id", "client_secret", "scope"]);
}

#[tokio::test]
async fn test_token_response_with_string_expiry_accepted() {
    let mut body = token_body(3600);
    body["expires_in"] = json!("3599");
    body["token_type"] = json!(null);
    let transport = RecordingTransport::new();
    transport.json(HttpMethod::Post, TOKEN_URL, 200, body);
    let client = client(transport);

    let snapshot = client.authenticate().await.unwrap();

    assert_eq!(snapshot.tokens.access_token, ACCESS_TOKEN);
    assert_eq!(snapshot.preferred_username(), "acct1");
}

#[tokio::test]
async fn test_preferred_username_requires_session() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    let client = client(transport.clone());

    assert!(matches!(
        client.preferred_username().await,
        Err(CpaasError::NoActiveSession)
    ));
    assert!(client.current_token().await.is_none());

    client.authenticate().await.unwrap();

    assert_eq!(client.preferred_username().await.unwrap(), "acct1");
    assert!(client.current_token().await.is_some());
}

#[tokio::test]
async fn test_token_failure_stops_operation() {
    let transport = RecordingTransport::new();
    transport.json(
        HttpMethod::Post,
        TOKEN_URL,
        401,
        json!({"error": "invalid_client"}),
    );
    let client = client(transport.clone());

    let err = client.list_channels().await.unwrap_err();

    assert!(matches!(
        err,
        CpaasError::TokenExchangeFailed {
            status: Some(401),
            ..
        }
    ));
    assert_eq!(err.body_json().unwrap()["error"], "invalid_client");
    assert_eq!(transport.requests().len(), 1);
}

// ============================================================================
// Operations
// ============================================================================

#[tokio::test]
async fn test_get_history_caps_page_size() {
    let url = format!("{BASE_URL}/smsmessaging/v1/acct1/remoteAddresses?max=50");
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    transport.json(
        HttpMethod::Get,
        &url,
        200,
        json!({"remoteAddressList": {"remoteAddress": []}}),
    );
    let client = client(transport.clone());

    let history = client.get_history().await.unwrap();

    assert_eq!(history["remoteAddressList"]["remoteAddress"], json!([]));
    assert_eq!(transport.requests_to(HttpMethod::Get, &url).len(), 1);
}

#[tokio::test]
async fn test_list_inbound_subscriptions_returns_body_verbatim() {
    let url = format!("{BASE_URL}/smsmessaging/v1/acct1/inbound/subscriptions");
    let body = json!({"subscriptionList": {"subscription": [{"destinationAddress": "+12125550100"}]}});
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    transport.json(HttpMethod::Get, &url, 200, body.clone());
    let client = client(transport);

    assert_eq!(client.list_inbound_subscriptions().await.unwrap(), body);
}

#[tokio::test]
async fn test_create_channel_request_shape() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    transport.json(
        HttpMethod::Post,
        CHANNELS_URL,
        201,
        json!({"notificationChannel": {
            "channelType": "Webhooks",
            "clientCorrelator": "corr-7",
            "resourceURL": "/cpaas/notificationchannel/v1/acct1/channels/77"
        }}),
    );
    let client = client(transport.clone());

    let request = CreateChannelRequest::builder()
        .client_correlator("corr-7")
        .webhook_url("https://hooks.example.test/sms")
        .authorization("Basic abc")
        .build();
    let created = client.create_channel(&request).await.unwrap();

    assert_eq!(created.notification_channel.client_correlator.as_str(), "corr-7");
    let posts = transport.requests_to(HttpMethod::Post, CHANNELS_URL);
    assert_eq!(posts[0].header_value("Content-Type"), Some("application/json"));
    assert_eq!(
        json_body(&posts[0]),
        json!({"notificationChannel": {
            "channelData": {
                "x-webhookURL": "https://hooks.example.test/sms",
                "x-authorization": "Basic abc"
            },
            "channelType": "Webhooks",
            "clientCorrelator": "corr-7"
        }})
    );
}

#[tokio::test]
async fn test_send_sms_rejection_carries_payload() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    transport.json(
        HttpMethod::Post,
        SEND_URL,
        400,
        json!({"requestError": {"serviceException": {"messageId": "SVC0004"}}}),
    );
    let client = client(transport);

    let request = SendSmsRequest::builder()
        .to_address("+14155552671")
        .from_address("+12125550100")
        .message("hi")
        .client_correlator("corr-1")
        .build();
    let err = client.send_sms(&request).await.unwrap_err();

    assert!(matches!(
        err,
        CpaasError::Upstream {
            operation: "send_sms",
            status: Some(400),
            ..
        }
    ));
    assert_eq!(
        err.body_json().unwrap()["requestError"]["serviceException"]["messageId"],
        "SVC0004"
    );
}

#[tokio::test]
async fn test_unanswered_request_is_upstream_error() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    transport.route(
        HttpMethod::Get,
        CHANNELS_URL,
        Err(TransportError::NoResponse("timed out".to_string())),
    );
    let client = client(transport);

    let err = client.list_channels().await.unwrap_err();

    assert!(matches!(
        err,
        CpaasError::Upstream {
            operation: "list_channels",
            status: None,
            body: None
        }
    ));
}

#[tokio::test]
async fn test_unsendable_request_is_transport_error() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    transport.route(
        HttpMethod::Get,
        CHANNELS_URL,
        Err(TransportError::Send("connection refused".to_string())),
    );
    let client = client(transport);

    let err = client.list_channels().await.unwrap_err();

    assert!(matches!(err, CpaasError::Transport(TransportError::Send(_))));
}

// ============================================================================
// simple_send orchestration
// ============================================================================

fn simple_request() -> SimpleSendRequest {
    SimpleSendRequest::builder()
        .to_address("415.555.2671")
        .from_address("212-555-0100")
        .message("Your order has shipped")
        .callback_url("https://hooks.example.test/sms")
        .build()
}

#[tokio::test]
async fn test_simple_send_creates_channel_when_none_exist() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    transport.json(HttpMethod::Get, CHANNELS_URL, 200, channel_list(&[]));
    transport.json(
        HttpMethod::Post,
        CHANNELS_URL,
        201,
        json!({"notificationChannel": {"channelType": "Webhooks", "clientCorrelator": "corr-generated"}}),
    );
    transport.json(
        HttpMethod::Post,
        SEND_URL,
        201,
        json!({"outboundSMSMessageRequest": {"resourceURL": "/requests/1"}}),
    );
    let client = client(transport.clone());

    let result = client.simple_send(simple_request()).await.unwrap();

    assert_eq!(
        result["outboundSMSMessageRequest"]["resourceURL"],
        "/requests/1"
    );

    let creates = transport.requests_to(HttpMethod::Post, CHANNELS_URL);
    assert_eq!(creates.len(), 1);
    let create_body = json_body(&creates[0]);
    assert_eq!(
        create_body["notificationChannel"]["channelData"]["x-webhookURL"],
        "https://hooks.example.test/sms"
    );
    assert_eq!(
        create_body["notificationChannel"]["clientCorrelator"],
        "corr-generated"
    );

    // Channel is created before the message goes out
    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    let create_at = urls.iter().rposition(|u| u == CHANNELS_URL).unwrap();
    let send_at = urls.iter().position(|u| u == SEND_URL).unwrap();
    assert!(create_at < send_at);

    let sends = transport.requests_to(HttpMethod::Post, SEND_URL);
    assert_eq!(
        json_body(&sends[0]),
        json!({"outboundSMSMessageRequest": {
            "address": ["+14155552671"],
            "clientCorrelator": "corr-generated",
            "outboundSMSTextMessage": {"message": "Your order has shipped"}
        }})
    );
}

#[tokio::test]
async fn test_simple_send_reuses_first_channel() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    transport.json(
        HttpMethod::Get,
        CHANNELS_URL,
        200,
        channel_list(&[
            ("corr-first", "https://other.example.test/hook"),
            ("corr-second", "https://hooks.example.test/sms"),
        ]),
    );
    transport.json(HttpMethod::Post, SEND_URL, 201, json!({"ok": true}));
    let client = client(transport.clone());

    let result = client.simple_send(simple_request()).await.unwrap();

    assert_eq!(result, json!({"ok": true}));
    assert!(transport.requests_to(HttpMethod::Post, CHANNELS_URL).is_empty());
    let sends = transport.requests_to(HttpMethod::Post, SEND_URL);
    assert_eq!(sends.len(), 1);
    assert_eq!(
        json_body(&sends[0])["outboundSMSMessageRequest"]["clientCorrelator"],
        "corr-first"
    );
}

#[tokio::test]
async fn test_simple_send_rejects_bad_number_before_any_request() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    let client = client(transport.clone());

    let request = SimpleSendRequest::builder()
        .to_address("1234")
        .from_address("212-555-0100")
        .message("hi")
        .build();
    let err = client.simple_send(request).await.unwrap_err();

    assert!(matches!(err, CpaasError::InvalidPhoneNumber(input) if input == "1234"));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_simple_send_propagates_send_failure() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    transport.json(
        HttpMethod::Get,
        CHANNELS_URL,
        200,
        channel_list(&[("corr-first", "")]),
    );
    transport.json(HttpMethod::Post, SEND_URL, 403, json!({"error": "forbidden"}));
    let client = client(transport);

    let err = client.simple_send(simple_request()).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_simple_send_stops_when_channel_creation_fails() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    transport.json(HttpMethod::Get, CHANNELS_URL, 200, channel_list(&[]));
    transport.json(HttpMethod::Post, CHANNELS_URL, 500, json!({"error": "boom"}));
    let client = client(transport.clone());

    let err = client.simple_send(simple_request()).await.unwrap_err();

    assert!(matches!(
        err,
        CpaasError::Upstream {
            operation: "create_channel",
            ..
        }
    ));
    assert!(transport.requests_to(HttpMethod::Post, SEND_URL).is_empty());
}

// ============================================================================
// Resource paths
// ============================================================================

fn send_from(from_address: &str) -> SendSmsRequest {
    SendSmsRequest::builder()
        .to_address("+14155552671")
        .from_address(from_address)
        .message("hi")
        .client_correlator("corr-1")
        .build()
}

#[tokio::test]
async fn test_send_sms_rejects_dot_segment_address() {
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    let client = client(transport.clone());

    let err = client.send_sms(&send_from("..")).await.unwrap_err();

    assert!(matches!(err, CpaasError::InvalidPathSegment(segment) if segment == ".."));
    // Only the token exchange went out
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(transport.token_requests(), 1);
}

#[tokio::test]
async fn test_send_sms_encodes_address_as_one_segment() {
    let url = format!("{BASE_URL}/smsmessaging/v1/acct1/outbound/..%2Fchannels/requests");
    let transport = RecordingTransport::new();
    transport.token_endpoint(3600);
    transport.json(HttpMethod::Post, &url, 201, json!({"ok": true}));
    let client = client(transport.clone());

    client.send_sms(&send_from("../channels")).await.unwrap();

    assert_eq!(transport.requests_to(HttpMethod::Post, &url).len(), 1);
}
