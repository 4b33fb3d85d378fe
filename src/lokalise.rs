//! Lokalise API v2 client.
//!
//! Covers the handful of endpoints the service needs: reading keys (with their
//! translations), reading the project glossary and updating a single
//! translation. Every request carries the project's `X-Api-Token` header.

use crate::config::Config;
use crate::glossary::Glossary;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Identifier of a Lokalise resource (key or translation).
///
/// Lokalise returns numeric ids, but callers of this service may send them as
/// strings. The original shape is kept so it serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Numeric(u64),
    Text(String),
}

impl ResourceId {
    /// True for `""` and `0`; neither names a real Lokalise resource
    pub fn is_empty(&self) -> bool {
        match self {
            ResourceId::Numeric(n) => *n == 0,
            ResourceId::Text(s) => s.is_empty(),
        }
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        ResourceId::Text(String::new())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Numeric(n) => write!(f, "{}", n),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        ResourceId::Numeric(id)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        ResourceId::Text(id.to_string())
    }
}

/// A single language entry of a key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    pub translation_id: ResourceId,
    pub language_iso: String,
    #[serde(default)]
    pub translation: String,
    /// Remaining upstream fields (modified_at, is_reviewed, ...), passed through verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A localization key with its per-language translations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Key {
    pub key_id: ResourceId,
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Key {
    /// Text of the canonical English translation, if present and non-empty
    pub fn source_text(&self) -> Option<&str> {
        self.translations
            .iter()
            .find(|t| t.language_iso == crate::translation::SOURCE_LANGUAGE)
            .map(|t| t.translation.as_str())
            .filter(|text| !text.is_empty())
    }

    /// Every translation entry except the canonical English one, in key order
    pub fn target_translations(&self) -> impl Iterator<Item = &Translation> {
        self.translations
            .iter()
            .filter(|t| t.language_iso != crate::translation::SOURCE_LANGUAGE)
    }
}

#[derive(Debug, Deserialize)]
struct KeyResponse {
    key: Option<Key>,
}

#[derive(Debug, Deserialize)]
struct KeysResponse {
    #[serde(default)]
    keys: Vec<Key>,
}

#[derive(Debug, Deserialize)]
struct GlossaryResponse {
    #[serde(default)]
    glossaries: Glossary,
}

#[derive(Debug, Serialize)]
struct UpdateTranslationRequest<'a> {
    translation: &'a str,
}

#[derive(Debug, Error)]
pub enum LokaliseError {
    #[error("Lokalise request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Lokalise API error ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse Lokalise response: {0}")]
    Parse(String),
}

impl LokaliseError {
    /// Upstream HTTP status, when the platform answered with one
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            LokaliseError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for a single Lokalise project
#[derive(Debug, Clone)]
pub struct LokaliseClient {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    api_token: String,
}

impl LokaliseClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.lokalise_api_url.trim_end_matches('/').to_string(),
            project_id: config.lokalise_project_id.clone(),
            api_token: config.lokalise_api_token.clone(),
        }
    }

    fn project_url(&self, path: &str) -> String {
        format!("{}/projects/{}/{}", self.base_url, self.project_id, path)
    }

    /// Send a request and fail on any non-2xx status, keeping the upstream body
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, LokaliseError> {
        let response = request.header("X-Api-Token", &self.api_token).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(LokaliseError::Status { status, body });
        }

        Ok(response)
    }

    /// Fetch one key, including its translations
    pub async fn get_key(&self, key_id: &ResourceId) -> Result<Key, LokaliseError> {
        let url = self.project_url(&format!("keys/{}", key_id));
        debug!("Fetching Lokalise key {}", key_id);

        let response = self.send(self.http.get(&url)).await?;
        let body: KeyResponse = response
            .json()
            .await
            .map_err(|e| LokaliseError::Parse(e.to_string()))?;

        body.key
            .ok_or_else(|| LokaliseError::Parse("response has no `key` object".to_string()))
    }

    /// Fetch every key of the project with translations included
    pub async fn list_keys(&self) -> Result<Vec<Key>, LokaliseError> {
        let url = self.project_url("keys?include_translations=1");
        let response = self.send(self.http.get(&url)).await?;

        let body: KeysResponse = response
            .json()
            .await
            .map_err(|e| LokaliseError::Parse(e.to_string()))?;

        debug!("Fetched {} keys", body.keys.len());
        Ok(body.keys)
    }

    /// Fetch the project glossary.
    ///
    /// Never fails: any upstream problem is logged and an empty glossary is returned,
    /// so translation proceeds without substitutions.
    pub async fn fetch_glossary_terms(&self) -> Glossary {
        let url = self.project_url("glossary-terms");

        let response = match self.send(self.http.get(&url)).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch glossary terms: {}", e);
                return Glossary::default();
            }
        };

        match response.json::<GlossaryResponse>().await {
            Ok(body) => {
                debug!("Fetched {} glossary terms", body.glossaries.len());
                body.glossaries
            }
            Err(e) => {
                warn!("Failed to parse glossary terms: {}", e);
                Glossary::default()
            }
        }
    }

    /// Replace the text of one translation; returns the platform's JSON answer
    pub async fn update_translation(
        &self,
        translation_id: &ResourceId,
        text: &str,
    ) -> Result<serde_json::Value, LokaliseError> {
        let url = self.project_url(&format!("translations/{}", translation_id));

        let response = self
            .send(
                self.http
                    .put(&url)
                    .json(&UpdateTranslationRequest { translation: text }),
            )
            .await?;

        response
            .json()
            .await
            .map_err(|e| LokaliseError::Parse(e.to_string()))
    }
}
