//! Test doubles for the remote call layer
//!
//! [`MockTransport`] replays scripted responses in order and records every
//! request it receives, so tests can assert on URLs and bodies without a
//! network.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::ClientConfig;
use crate::credentials::CredentialStore;
use crate::error::ApiError;
use crate::services::api::ApiClient;
use crate::services::transport::{RawResponse, Transport};
use crate::storage::{keys, MemoryStore};

/// A request as seen by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub body: Value,
}

impl RecordedRequest {
    /// The `data` field decoded from its JSON string form
    pub fn data(&self) -> Option<Value> {
        self.body
            .get("data")
            .and_then(Value::as_str)
            .and_then(|s| serde_json::from_str(s).ok())
    }
}

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<RawResponse, ApiError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 2xx-or-not response with a JSON body
    pub async fn push_json(&self, status: u16, body: Value) {
        self.push(Ok(RawResponse::new(status, body.to_string())))
            .await;
    }

    /// Queue a response with a raw (possibly non-JSON) body
    pub async fn push_body(&self, status: u16, body: &str) {
        self.push(Ok(RawResponse::new(status, body))).await;
    }

    /// Queue a transport-level failure
    pub async fn push_error(&self, error: ApiError) {
        self.push(Err(error)).await;
    }

    async fn push(&self, response: Result<RawResponse, ApiError>) {
        self.responses.lock().await.push_back(response);
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    pub async fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().await.last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<RawResponse, ApiError> {
        self.requests.lock().await.push(RecordedRequest {
            url: url.to_string(),
            body: body.clone(),
        });

        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("No scripted response".to_string())))
    }
}

/// Everything a remote-call test needs, wired together
pub struct TestClient {
    pub api: Arc<ApiClient>,
    pub transport: Arc<MockTransport>,
    pub store: Arc<MemoryStore>,
    pub credentials: Arc<CredentialStore>,
}

/// Client against `base_url` with company `C1`/`CP1`, backed by memory storage
pub fn client_with_base_url(base_url: &str) -> TestClient {
    let store = Arc::new(MemoryStore::with_items([
        (keys::API_BASE_URL, base_url),
        (keys::COMPANY_CODE, "C1"),
        (keys::COMPANY_PASSWORD, "CP1"),
    ]));
    let credentials = Arc::new(CredentialStore::init(store.clone()));
    let transport = Arc::new(MockTransport::new());
    let api = Arc::new(ApiClient::new(
        transport.clone(),
        credentials.clone(),
        ClientConfig::default(),
    ));

    TestClient {
        api,
        transport,
        store,
        credentials,
    }
}
