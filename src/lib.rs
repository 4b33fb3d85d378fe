//! Lokalise translation assistant.
//!
//! Fetches localization keys from Lokalise, machine-translates their English
//! source text with an LLM, writes reviewed translations back and scores
//! candidate translations with BLEU/TER.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod glossary;
pub mod llm;
pub mod lokalise;
pub mod server;
pub mod translation;
