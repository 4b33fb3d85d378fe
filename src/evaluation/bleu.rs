//! Corpus-level BLEU (max order 4, no smoothing) over 13a tokens.

use super::tokenizer::tokenize_13a;
use serde::Serialize;
use std::collections::HashMap;

pub const MAX_ORDER: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BleuScore {
    pub bleu: f64,
    pub precisions: [f64; MAX_ORDER],
    pub brevity_penalty: f64,
    pub length_ratio: f64,
    pub translation_length: usize,
    pub reference_length: usize,
}

fn ngram_counts(tokens: &[String], order: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= order {
        for window in tokens.windows(order) {
            *counts.entry(window).or_insert(0) += 1;
        }
    }
    counts
}

/// Score `candidates[i]` against `references[i]` and aggregate over the corpus.
///
/// Callers guarantee both slices have the same length.
pub(crate) fn corpus_bleu<S: AsRef<str>, R: AsRef<str>>(candidates: &[S], references: &[R]) -> BleuScore {
    let mut matches_by_order = [0usize; MAX_ORDER];
    let mut possible_by_order = [0usize; MAX_ORDER];
    let mut translation_length = 0;
    let mut reference_length = 0;

    for (candidate, reference) in candidates.iter().zip(references) {
        let hyp = tokenize_13a(candidate.as_ref());
        let reference = tokenize_13a(reference.as_ref());
        translation_length += hyp.len();
        reference_length += reference.len();

        for order in 1..=MAX_ORDER {
            let hyp_counts = ngram_counts(&hyp, order);
            let ref_counts = ngram_counts(&reference, order);

            matches_by_order[order - 1] += hyp_counts
                .iter()
                .map(|(ngram, count)| (*count).min(ref_counts.get(ngram).copied().unwrap_or(0)))
                .sum::<usize>();

            if hyp.len() >= order {
                possible_by_order[order - 1] += hyp.len() - order + 1;
            }
        }
    }

    let mut precisions = [0.0; MAX_ORDER];
    for i in 0..MAX_ORDER {
        if possible_by_order[i] > 0 {
            precisions[i] = matches_by_order[i] as f64 / possible_by_order[i] as f64;
        }
    }

    let geo_mean = if precisions.iter().all(|p| *p > 0.0) {
        (precisions.iter().map(|p| p.ln()).sum::<f64>() / MAX_ORDER as f64).exp()
    } else {
        0.0
    };

    let length_ratio = if reference_length > 0 {
        translation_length as f64 / reference_length as f64
    } else {
        0.0
    };

    let brevity_penalty = if reference_length == 0 || length_ratio > 1.0 {
        1.0
    } else if translation_length == 0 {
        0.0
    } else {
        (1.0 - 1.0 / length_ratio).exp()
    };

    BleuScore {
        bleu: geo_mean * brevity_penalty,
        precisions,
        brevity_penalty,
        length_ratio,
        translation_length,
        reference_length,
    }
}
