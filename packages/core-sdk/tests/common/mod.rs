#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use synapse_core_sdk::upstream::{Endpoints, UpstreamClient};

/// What the fake upstream answers for a given model.
#[derive(Debug, Clone)]
pub enum Reply {
    Content(String),
    Status(u16),
    Garbage,
    NoChoices,
    NullContent,
}

pub fn content(s: &str) -> Reply {
    Reply::Content(s.to_string())
}

#[derive(Debug, Clone)]
pub struct Call {
    pub provider: String,
    pub model: String,
    pub authorization: Option<String>,
    pub referer: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
pub struct FakeUpstream {
    pub base: String,
    replies: Arc<HashMap<String, Reply>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeUpstream {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// (provider, model) pairs in the order they were requested.
    pub fn attempted(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .map(|c| (c.provider, c.model))
            .collect()
    }

    /// Every provider routed to this server under `/{provider}`.
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            openrouter: format!("{}/openrouter", self.base),
            together: format!("{}/together", self.base),
            groq: format!("{}/groq", self.base),
            ..Endpoints::default()
        }
    }

    pub fn client(&self) -> UpstreamClient {
        UpstreamClient::new(self.endpoints(), Duration::from_secs(5)).unwrap()
    }
}

/// Any model without an explicit reply gets a 503.
pub async fn spawn_upstream(replies: &[(&str, Reply)]) -> FakeUpstream {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let fake = FakeUpstream {
        base: format!("http://{}", addr),
        replies: Arc::new(
            replies
                .iter()
                .map(|(model, reply)| (model.to_string(), reply.clone()))
                .collect(),
        ),
        calls: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/{provider}/chat/completions", post(chat))
        .with_state(fake.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    fake
}

async fn chat(
    State(fake): State<FakeUpstream>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let model = body["model"].as_str().unwrap_or_default().to_string();
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    };
    fake.calls.lock().unwrap().push(Call {
        provider,
        model: model.clone(),
        authorization: header("authorization"),
        referer: header("http-referer"),
        body,
    });

    match fake.replies.get(&model).cloned().unwrap_or(Reply::Status(503)) {
        Reply::Content(text) => {
            Json(json!({ "choices": [{ "message": { "role": "assistant", "content": text } }] }))
                .into_response()
        }
        Reply::Status(code) => (
            StatusCode::from_u16(code).unwrap(),
            Json(json!({ "error": { "message": "unavailable" } })),
        )
            .into_response(),
        Reply::Garbage => (StatusCode::OK, "<html>oops</html>").into_response(),
        Reply::NoChoices => Json(json!({ "choices": [] })).into_response(),
        Reply::NullContent => {
            Json(json!({ "choices": [{ "message": { "role": "assistant", "content": null } }] }))
                .into_response()
        }
    }
}

pub const OPENROUTER_MODELS: [&str; 4] = [
    "allenai/olmo-3.1-32b-think:free",
    "xiaomi/mimo-v2-flash:free",
    "nvidia/nemotron-3-nano-30b-a3b:free",
    "meta-llama/llama-3.2-3b-instruct:free",
];

pub const GROQ_MODELS: [&str; 3] = ["llama3-8b-8192", "llama3-70b-8192", "mixtral-8x7b-32768"];

pub const TOGETHER_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo";

pub fn pairs(provider: &str, models: &[&str]) -> Vec<(String, String)> {
    models
        .iter()
        .map(|m| (provider.to_string(), m.to_string()))
        .collect()
}
