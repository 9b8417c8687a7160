//! Common test utilities: a local stand-in for the Gemini REST endpoint

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A request received by the fake server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub uri: String,
    pub body: Value,
}

#[derive(Clone, Default)]
struct FakeState {
    replies: Arc<Mutex<VecDeque<(StatusCode, Value)>>>,
    fallback: Arc<Mutex<Option<(StatusCode, Value)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Fake `generateContent` server bound to an ephemeral local port
pub struct FakeGemini {
    state: FakeState,
    base_url: String,
}

impl FakeGemini {
    pub async fn start() -> Self {
        let state = FakeState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake server");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake server");
        });

        Self {
            state,
            base_url: format!("http://{addr}/v1beta"),
        }
    }

    /// Endpoint to configure the client with
    pub fn endpoint(&self) -> &str {
        &self.base_url
    }

    /// Queue a successful completion
    pub fn reply_text(&self, text: &str) -> &Self {
        self.reply(StatusCode::OK, completion_envelope(text))
    }

    /// Queue an arbitrary status and body
    pub fn reply(&self, status: StatusCode, body: Value) -> &Self {
        self.state
            .replies
            .lock()
            .unwrap()
            .push_back((status, body));
        self
    }

    /// Reply used once the queue is empty
    pub fn always_text(&self, text: &str) -> &Self {
        *self.state.fallback.lock().unwrap() = Some((StatusCode::OK, completion_envelope(text)));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Prompt text of every request, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| {
                r.body["contents"][0]["parts"][0]["text"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }
}

pub fn completion_envelope(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

async fn handle(
    State(state): State<FakeState>,
    uri: Uri,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(RecordedRequest {
        uri: uri.to_string(),
        body,
    });

    let queued = state.replies.lock().unwrap().pop_front();
    let (status, reply) = queued
        .or_else(|| state.fallback.lock().unwrap().clone())
        .unwrap_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": {"code": 500, "message": "no reply queued"}}),
            )
        });
    (status, Json(reply))
}
