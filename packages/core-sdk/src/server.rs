use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, get_service, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::services::ServeDir;

use crate::{
    analysis,
    catalog::{Provider, DEFAULT_PROVIDER},
    config::ServerConfig,
    credential::Credential,
    error::ServiceError,
    models::ScenarioRequest,
    prompt, question, telemetry,
    upstream::UpstreamClient,
};

/**
 * \brief Shared handler state. Holds no per-request data.
 */
pub struct AppState {
    pub client: UpstreamClient,
    /** \brief Operator key for the legacy prompt endpoint. */
    pub server_key: Option<Credential>,
}

/**
 * \brief Start the local HTTP service: JSON API under /api, static client elsewhere.
 */
pub async fn run(config: &ServerConfig) -> Result<()> {
    telemetry::set_enabled(config.telemetry_enabled);

    let state = Arc::new(AppState {
        client: config.build_client()?,
        server_key: config.server_credential(),
    });
    let app = router(state, config.static_root());

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("bind {} failed", config.addr))?;
    tracing::info!("Server listening on http://{}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/**
 * \brief Build the router; split from `run` so tests can serve it on any listener.
 */
pub fn router(state: Arc<AppState>, static_root: PathBuf) -> Router {
    let static_service =
        get_service(ServeDir::new(static_root).append_index_html_on_directories(true));

    Router::new()
        .route("/api/question", post(post_question))
        .route("/api/analyze", post(post_analyze))
        .route("/api/prompt", get(get_prompt))
        .route("/api/providers", get(get_providers))
        .route("/api/health", get(health_check))
        .with_state(state)
        .fallback_service(static_service)
}

/*
 * Request bodies are parsed from raw bytes: the browser client posts JSON
 * with a `text/plain` content type, which the `Json` extractor refuses.
 */
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct QuestionInput {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    provider: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AnalyzeInput {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    provider: Option<String>,
    #[serde(flatten)]
    request: ScenarioRequest,
}

/**
 * \brief POST /api/question: one dilemma, with provider/model fallback.
 */
async fn post_question(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Response {
    let input = match serde_json::from_slice::<QuestionInput>(&body) {
        Ok(input) => input,
        Err(e) => {
            tracing::warn!("question body rejected: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Question generation failed");
        }
    };
    let provider = input.provider.as_deref().unwrap_or(DEFAULT_PROVIDER.id());
    telemetry::log_call("question", provider, &[]);

    match question::generate(&state.client, input.api_key.as_deref(), provider).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => service_error(&e),
    }
}

/**
 * \brief POST /api/analyze: score an answer. Exhaustion still answers 200 with zero scores.
 */
async fn post_analyze(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Response {
    let input = match serde_json::from_slice::<AnalyzeInput>(&body) {
        Ok(input) => input,
        Err(e) => {
            tracing::warn!("analyze body rejected: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Analysis Failed");
        }
    };
    let provider = input.provider.as_deref().unwrap_or(DEFAULT_PROVIDER.id());
    telemetry::log_call(
        "analyze",
        provider,
        &[
            ("scenario_len", input.request.scenario.len()),
            ("response_len", input.request.user_response.len()),
        ],
    );

    match analysis::analyze(&state.client, input.api_key.as_deref(), provider, &input.request).await
    {
        Ok(assessment) => Json(assessment).into_response(),
        Err(e) => service_error(&e),
    }
}

/**
 * \brief GET /api/prompt: short prompt using the operator key.
 */
async fn get_prompt(State(state): State<Arc<AppState>>) -> Response {
    let Some(key) = state.server_key.as_ref() else {
        tracing::error!("prompt requested but no server OpenRouter key is configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate prompt");
    };
    match prompt::generate(&state.client, key).await {
        Ok(text) => Json(json!({ "prompt": text })).into_response(),
        Err(e) => {
            tracing::error!("prompt generation error: {}", e);
            telemetry::log_error("api.prompt", &e.to_string());
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate prompt")
        }
    }
}

async fn get_providers() -> Json<serde_json::Value> {
    let providers: Vec<_> = Provider::ALL
        .iter()
        .map(|p| json!({ "id": p.id(), "models": p.models() }))
        .collect();
    Json(json!({
        "default": DEFAULT_PROVIDER.id(),
        "providers": providers,
    }))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "ok": true, "version": env!("CARGO_PKG_VERSION") }))
}

fn service_error(e: &ServiceError) -> Response {
    let status = match e {
        ServiceError::CredentialMissing | ServiceError::ResponseMissing => StatusCode::BAD_REQUEST,
        ServiceError::Exhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, &e.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
