//! Machine translation of a key into every non-English language it carries.

use crate::glossary::apply_glossary;
use crate::llm::LlmClient;
use crate::lokalise::{LokaliseClient, ResourceId};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

/// Language code of the canonical source text; never translated or overwritten
pub const SOURCE_LANGUAGE: &str = "en";

/// A machine translation waiting for review before it is written back
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingTranslation {
    pub translation_id: ResourceId,
    pub translated_texts: String,
    pub key_id: ResourceId,
    pub language_iso: String,
}

/// The language that stopped a dispatch, as reported to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedTranslation {
    pub translation_id: ResourceId,
    pub translated_texts: String,
    pub key_id: ResourceId,
    pub language_iso: String,
    pub error: String,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Key not found")]
    KeyNotFound,

    #[error("No English translation found")]
    NoSourceText,

    #[error("Translation to {} failed: {}", .0.language_iso, .0.error)]
    LanguageFailed(FailedTranslation),
}

/// Human-readable language name used in the prompt.
///
/// Only a couple of codes get a friendly name; everything else is passed to the
/// model as the raw Lokalise code.
pub fn prompt_language_name(language_iso: &str) -> &str {
    match language_iso {
        "fr_ca" => "French Canada",
        "ko" => "Korean",
        other => other,
    }
}

/// Build the instruction sent to the model for one target language
pub fn build_translation_prompt(language_iso: &str, text: &str) -> String {
    format!(
        "Translate this to language {}: {}. Just the translation only",
        prompt_language_name(language_iso),
        text
    )
}

/// Translate the English text of `key_id` into each of the key's other languages.
///
/// Languages are processed one at a time in key order. The first failing language
/// aborts the whole dispatch; nothing translated so far is returned.
pub async fn translate_key(
    lokalise: &LokaliseClient,
    llm: &LlmClient,
    key_id: &ResourceId,
) -> Result<Vec<PendingTranslation>, DispatchError> {
    if key_id.is_empty() {
        error!("Key not found: empty key_id");
        return Err(DispatchError::KeyNotFound);
    }

    let key = lokalise.get_key(key_id).await.map_err(|e| {
        error!("Key not found: {} ({})", key_id, e);
        DispatchError::KeyNotFound
    })?;

    let source = key.source_text().ok_or_else(|| {
        error!("No English translation found for key_id: {}", key_id);
        DispatchError::NoSourceText
    })?;

    let glossary = lokalise.fetch_glossary_terms().await;
    let text = apply_glossary(source, &glossary);

    let mut results = Vec::new();
    for target in key.target_translations() {
        let language = target.language_iso.as_str();
        debug!("Translating key {} to language: {}", key_id, language);

        let prompt = build_translation_prompt(language, &text);
        match llm.complete(&prompt).await {
            Ok(translated) => results.push(PendingTranslation {
                translation_id: target.translation_id.clone(),
                translated_texts: translated,
                key_id: key_id.clone(),
                language_iso: language.to_string(),
            }),
            Err(e) => {
                error!("Request failed for language {} with error: {}", language, e);
                return Err(DispatchError::LanguageFailed(FailedTranslation {
                    translation_id: target.translation_id.clone(),
                    translated_texts: String::new(),
                    key_id: key_id.clone(),
                    language_iso: language.to_string(),
                    error: e.to_string(),
                }));
            }
        }
    }

    info!("Translated key {} into {} languages", key_id, results.len());
    Ok(results)
}
