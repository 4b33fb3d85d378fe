//! Translation quality scoring.
//!
//! BLEU and TER are computed corpus-wide, pairing each candidate with the
//! reference at the same position. `analyze_results` turns the two scores into
//! short improvement hints.
//!
//! # Example
//!
//! ```rust
//! use lokalise_translation_assistant::evaluation::{evaluate, REFERENCE_TRANSLATIONS};
//!
//! let report = evaluate(&REFERENCE_TRANSLATIONS, &REFERENCE_TRANSLATIONS).unwrap();
//! assert_eq!(report.bleu_display(), "1.0000");
//! assert!(report.suggestions.is_empty());
//! ```

mod bleu;
mod ter;
mod tokenizer;

pub use bleu::BleuScore;
pub use ter::TerScore;
pub use tokenizer::{tokenize_13a, tokenize_ter};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// BLEU below this is reported as low quality
pub const BLEU_THRESHOLD: f64 = 0.4;
/// TER (edits per 100 reference words) above this is reported as edit-heavy
pub const TER_THRESHOLD: f64 = 0.4;

pub const LOW_BLEU_SUGGESTION: &str = "The BLEU score suggests significant room for improvement...";
pub const HIGH_TER_SUGGESTION: &str = "The high TER score indicates many edits are needed...";

/// Reference corpus used by the evaluation endpoint: one promotional sentence in
/// English, French (2), Spanish (3), Traditional Chinese, Simplified Chinese and Korean.
pub const REFERENCE_TRANSLATIONS: [&str; 9] = [
    "Get a Welcome Bonus worth up to 1 BTC by trading at least [$1].",
    "Obtenez un bonus d'accueil d'une valeur allant jusqu'à 1 BTC en effectuant des transactions d'au moins [$1].",
    "Obtenez une prime d'accueil d'une valeur pouvant atteindre 1 BTC en négociant au moins [1 $].",
    "Obtenga un Bonus de Bienvenida válido hasta 1 BTC realizando al menos [$1] en operaciones.",
    "Obtén un Bonus de Bienvenida válido hasta 1 BTC al comerciar por al menos [$1].",
    "Obtenga una pronta bienvenida de hasta 1 BTC mediante el intercambio de al menos [$1].",
    "獲得至多1 BTC的歡迎獎金，只需交易至少[$1]。",
    "获得最高1 个比特币的欢迎奖励，只需交易至少[$1]。",
    "1호 환영 보너스는 [$1] 이상의 거래로 최대 1 BTC 값을 가집니다.",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Mismatch in the number of predictions ({predictions}) and references ({references})")]
    LengthMismatch { predictions: usize, references: usize },

    #[error("At least one translation is required")]
    Empty,
}

fn check_lengths<S, R>(candidates: &[S], references: &[R]) -> Result<(), EvaluationError> {
    if candidates.len() != references.len() {
        return Err(EvaluationError::LengthMismatch {
            predictions: candidates.len(),
            references: references.len(),
        });
    }
    if candidates.is_empty() {
        return Err(EvaluationError::Empty);
    }
    Ok(())
}

/// Corpus BLEU of `candidates` against the parallel `references`
pub fn predict_bleu<S: AsRef<str>, R: AsRef<str>>(
    candidates: &[S],
    references: &[R],
) -> Result<BleuScore, EvaluationError> {
    check_lengths(candidates, references)?;
    let score = bleu::corpus_bleu(candidates, references);
    debug!("BLEU results: {:?}", score);
    Ok(score)
}

/// Corpus TER of `candidates` against the parallel `references`
pub fn predict_ter<S: AsRef<str>, R: AsRef<str>>(
    candidates: &[S],
    references: &[R],
) -> Result<TerScore, EvaluationError> {
    check_lengths(candidates, references)?;
    let score = ter::corpus_ter(candidates, references);
    debug!("TER results: {:?}", score);
    Ok(score)
}

/// Rule-based hints for the given scores; empty when both look fine
pub fn analyze_results(bleu: f64, ter: f64) -> String {
    let mut suggestions = Vec::new();
    if bleu < BLEU_THRESHOLD {
        suggestions.push(LOW_BLEU_SUGGESTION);
    }
    if ter > TER_THRESHOLD {
        suggestions.push(HIGH_TER_SUGGESTION);
    }
    suggestions.join("\n")
}

/// BLEU, TER and suggestions for one batch of candidates
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub bleu: BleuScore,
    pub ter: TerScore,
    pub suggestions: String,
}

impl EvaluationReport {
    pub fn bleu_display(&self) -> String {
        format!("{:.4}", self.bleu.bleu)
    }

    pub fn ter_display(&self) -> String {
        format!("{:.4}", self.ter.score)
    }
}

/// Wire shape returned by the evaluation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResponse {
    #[serde(rename = "BLEU")]
    pub bleu: String,
    #[serde(rename = "TER")]
    pub ter: String,
    #[serde(rename = "Suggestions")]
    pub suggestions: String,
}

impl From<&EvaluationReport> for EvaluationResponse {
    fn from(report: &EvaluationReport) -> Self {
        Self {
            bleu: report.bleu_display(),
            ter: report.ter_display(),
            suggestions: report.suggestions.clone(),
        }
    }
}

/// Score a batch of candidates and derive suggestions
pub fn evaluate<S: AsRef<str>, R: AsRef<str>>(
    candidates: &[S],
    references: &[R],
) -> Result<EvaluationReport, EvaluationError> {
    let ter = predict_ter(candidates, references)?;
    let bleu = predict_bleu(candidates, references)?;
    let suggestions = analyze_results(bleu.bleu, ter.score);

    Ok(EvaluationReport {
        bleu,
        ter,
        suggestions,
    })
}
