//! HTTP endpoints.
//!
//! | Method | Path                     | Handler                 |
//! |--------|--------------------------|-------------------------|
//! | POST   | `/translate/`            | [`translate_text`]      |
//! | any    | `/keys/`                 | [`fetch_keys`]          |
//! | POST   | `/update_translation/`   | [`update_translation`]  |
//! | POST   | `/evaluate_translation/` | [`evaluate_translation`] |
//! | GET    | `/health`                | health check            |

use crate::config::Config;
use crate::error::ApiError;
use crate::evaluation::{self, EvaluationResponse, REFERENCE_TRANSLATIONS};
use crate::llm::LlmClient;
use crate::lokalise::{Key, LokaliseClient, LokaliseError, ResourceId};
use crate::translation::{translate_key, PendingTranslation};
use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{any, get, post};
use axum::Router;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

pub const MISSING_FIELDS: &str = "translation_id, language ISO, and translation are required.";

/// Clients shared by every request; read-only after startup
#[derive(Debug, Clone)]
pub struct AppState {
    pub lokalise: LokaliseClient,
    pub llm: LlmClient,
}

impl AppState {
    /// Build both API clients on top of one connection pool
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            lokalise: LokaliseClient::new(http.clone(), config),
            llm: LlmClient::new(http, config),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/translate/", post(translate_text).fallback(invalid_request))
        .route("/keys/", any(fetch_keys))
        .route(
            "/update_translation/",
            post(update_translation).fallback(update_method_not_allowed),
        )
        .route(
            "/evaluate_translation/",
            post(evaluate_translation).fallback(invalid_request_method),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================== Request/Response Bodies ====================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TranslateRequest {
    key_id: ResourceId,
}

#[derive(Debug, Serialize)]
pub struct KeysResponse {
    pub keys: Vec<Key>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UpdateTranslationRequest {
    key_id: ResourceId,
    language_iso: String,
    translated_texts: String,
    translation_id: ResourceId,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EvaluateRequest {
    translations: Vec<String>,
}

/// Decode a JSON body; any syntax or shape problem is reported as "Invalid JSON"
fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        error!("Invalid JSON in request body: {}", e);
        ApiError::invalid_json()
    })
}

// ==================== Handlers ====================

async fn health_check() -> &'static str {
    "OK"
}

/// POST /translate/ - machine-translate a key into all of its non-English languages
pub async fn translate_text(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Vec<PendingTranslation>>, ApiError> {
    let request: TranslateRequest = parse_json(&body)?;
    debug!("Received request to translate text for key_id: {}", request.key_id);

    let results = translate_key(&state.lokalise, &state.llm, &request.key_id).await?;
    Ok(Json(results))
}

async fn invalid_request() -> ApiError {
    error!("Invalid request method");
    ApiError::MalformedRequest("Invalid request".to_string())
}

/// /keys/ - every project key with its translations
pub async fn fetch_keys(State(state): State<Arc<AppState>>) -> Result<Json<KeysResponse>, ApiError> {
    match state.lokalise.list_keys().await {
        Ok(keys) => {
            debug!("Fetched keys successfully");
            Ok(Json(KeysResponse { keys }))
        }
        Err(LokaliseError::Status { status, .. }) => {
            error!("Failed to fetch keys: {}", status);
            Err(ApiError::Upstream {
                status: status.as_u16(),
                message: "Failed to fetch keys".to_string(),
            })
        }
        Err(LokaliseError::Request(e)) => {
            error!("Request failed: {}", e);
            Err(ApiError::Unexpected("Request failed".to_string()))
        }
        Err(e) => {
            error!("An unexpected error occurred while fetching keys: {}", e);
            Err(ApiError::Unexpected("An unexpected error occurred".to_string()))
        }
    }
}

/// POST /update_translation/ - write an edited translation back to Lokalise
pub async fn update_translation(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let request: UpdateTranslationRequest = parse_json(&body)?;

    if request.translation_id.is_empty()
        || request.language_iso.is_empty()
        || request.translated_texts.is_empty()
    {
        error!("Missing required fields for translation update");
        return Err(ApiError::Validation(MISSING_FIELDS.to_string()));
    }

    debug!(
        "Updating translation {} ({}) of key {}",
        request.translation_id, request.language_iso, request.key_id
    );

    let updated = state
        .lokalise
        .update_translation(&request.translation_id, &request.translated_texts)
        .await?;

    debug!("Translation updated successfully");
    Ok(Json(updated))
}

async fn update_method_not_allowed() -> ApiError {
    error!("Invalid request method for updating translation");
    ApiError::MethodNotAllowed("Invalid request method.".to_string())
}

/// POST /evaluate_translation/ - BLEU/TER of the given translations against the reference corpus
pub async fn evaluate_translation(body: Bytes) -> Result<Json<EvaluationResponse>, ApiError> {
    let request: EvaluateRequest = parse_json(&body)?;
    debug!("Received translations: {:?}", request.translations);

    let report = tokio::task::spawn_blocking(move || {
        evaluation::evaluate(&request.translations, &REFERENCE_TRANSLATIONS)
    })
    .await
    .map_err(|e| {
        error!("Evaluation task failed: {}", e);
        ApiError::Unexpected(e.to_string())
    })??;

    let response = EvaluationResponse::from(&report);
    info!("Evaluation results: {:?}", response);
    Ok(Json(response))
}

async fn invalid_request_method() -> ApiError {
    error!("Invalid request method");
    ApiError::MalformedRequest("Invalid request method".to_string())
}
