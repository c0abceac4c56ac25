//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use entity_cache::error::{RestError, RestResult};
use entity_cache::rest::{RestRequest, RestResponse, RestTransport};
use entity_cache::{CacheAdapter, Client, MemoryCacheAdapter};

/// Transport that records every request and answers from a queue.
/// An empty queue answers 404.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<RestResult<RestResponse>>>,
    requests: Mutex<Vec<RestRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: Option<Value>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(RestResponse { status, body }));
    }

    pub fn respond_json(&self, body: Value) {
        self.respond(200, Some(body));
    }

    pub fn fail(&self, status: u16, body: Value) {
        self.responses.lock().unwrap().push_back(Err(RestError::Status {
            status,
            body: Some(body),
        }));
    }

    pub fn requests(&self) -> Vec<RestRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RestTransport for MockTransport {
    async fn request(&self, request: RestRequest) -> RestResult<RestResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RestError::Status {
                status: 404,
                body: None,
            }))
    }
}

/// Client over a fresh in-memory cache and a mock transport.
pub fn client() -> (Client, Arc<MockTransport>) {
    let rest = MockTransport::new();
    let cache: Arc<dyn CacheAdapter> = Arc::new(MemoryCacheAdapter::in_memory());
    (Client::new(cache, rest.clone()), rest)
}

pub fn user_json(id: &str, username: &str) -> Value {
    json!({"id": id, "username": username})
}

pub fn message_json(id: &str, channel_id: &str, content: &str) -> Value {
    json!({
        "id": id,
        "channel_id": channel_id,
        "author": user_json("bot", "robot"),
        "content": content,
        "timestamp": "2021-02-03T04:05:06+00:00"
    })
}
