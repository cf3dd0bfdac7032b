//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use cpaas_sdk::auth::jwt::encode_unsigned;
use cpaas_sdk::{
    ClientCorrelator, ClientOptions, CorrelatorGenerator, CpaasClient, Credentials, HttpMethod,
    HttpRequest, HttpResponse, HttpTransport, TransportError,
};
use serde_json::{Value, json};

pub const BASE_URL: &str = "https://cpaas.example.test/cpaas";
pub const TOKEN_URL: &str = "https://cpaas.example.test/cpaas/auth/v1/token";
pub const CHANNELS_URL: &str = "https://cpaas.example.test/cpaas/notificationchannel/v1/acct1/channels";
pub const ACCESS_TOKEN: &str = "access-1";

type Reply = Result<HttpResponse, TransportError>;

/// Fake transport answering by exact method + URL and recording every request
#[derive(Default)]
pub struct RecordingTransport {
    routes: Mutex<Vec<(HttpMethod, String, Reply)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, method: HttpMethod, url: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .push((method, url.to_string(), reply));
    }

    pub fn json(&self, method: HttpMethod, url: &str, status: u16, body: Value) {
        self.route(method, url, Ok(HttpResponse::new(status, body.to_string())));
    }

    /// Token endpoint issuing tokens for `acct1` that expire `ttl_secs` from now
    pub fn token_endpoint(&self, ttl_secs: i64) {
        self.json(HttpMethod::Post, TOKEN_URL, 200, token_body(ttl_secs));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: HttpMethod, url: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.url == url)
            .collect()
    }

    pub fn token_requests(&self) -> usize {
        self.requests_to(HttpMethod::Post, TOKEN_URL).len()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|(method, url, _)| *method == request.method && *url == request.url)
            .map(|(_, _, reply)| reply.clone())
            .unwrap_or_else(|| Ok(HttpResponse::new(404, "no route")));
        self.requests.lock().unwrap().push(request);
        reply
    }
}

/// Always returns the same correlator
pub struct FixedCorrelator(pub &'static str);

impl CorrelatorGenerator for FixedCorrelator {
    fn generate(&self) -> ClientCorrelator {
        ClientCorrelator::new(self.0)
    }
}

pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

pub fn token_body(ttl_secs: i64) -> Value {
    json!({
        "id_token": encode_unsigned(&json!({
            "exp": now_secs() + ttl_secs,
            "preferred_username": "acct1",
            "sub": "user-123"
        })),
        "access_token": ACCESS_TOKEN,
        "token_type": "Bearer",
        "expires_in": ttl_secs,
    })
}

pub fn client(transport: Arc<RecordingTransport>) -> CpaasClient {
    let options = ClientOptions::builder()
        .base_url(BASE_URL)
        .token_url(TOKEN_URL)
        .build();
    CpaasClient::builder(Credentials::project("client-1", "secret-1"))
        .options(options)
        .transport(transport)
        .correlator_generator(Arc::new(FixedCorrelator("corr-generated")))
        .build()
        .unwrap()
}

pub fn channel_list(correlators: &[(&str, &str)]) -> Value {
    let channels: Vec<Value> = correlators
        .iter()
        .map(|(correlator, callback)| {
            json!({
                "callbackURL": callback,
                "channelData": {"channelURL": format!("https://cpaas.example.test/ch/{correlator}")},
                "channelLifetime": 7200,
                "channelType": "Webhooks",
                "clientCorrelator": correlator,
                "resourceURL": format!("/cpaas/notificationchannel/v1/acct1/channels/{correlator}"),
                "x-connCheckRole": "server"
            })
        })
        .collect();
    json!({"notificationChannelList": {"notificationChannel": channels}})
}
