//! In-memory transport double for launch flow tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use tern_core::{HttpRequest, HttpResponse, Transport, TransportError};

/// Records every request and replays scripted responses.
pub struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    scripted: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    fallback: Option<Value>,
}

impl MockTransport {
    /// A transport that answers every request with the same JSON body.
    pub fn returning(body: Value) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            scripted: Mutex::new(VecDeque::new()),
            fallback: Some(body),
        })
    }

    /// A transport that replays the given responses in order and fails
    /// once they run out.
    pub fn scripted(responses: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            scripted: Mutex::new(responses.into()),
            fallback: None,
        })
    }

    /// All requests seen so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let scripted = self.scripted.lock().unwrap().pop_front();
        match scripted {
            Some(response) => response,
            None => match &self.fallback {
                Some(body) => Ok(HttpResponse::ok(body.clone())),
                None => Err(TransportError::connect("no scripted response left")),
            },
        }
    }
}
