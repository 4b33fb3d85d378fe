//! Tokenizers used by the metrics.
//!
//! `tokenize_13a` is the mteval-v13a tokenization used for BLEU; `tokenize_ter`
//! is the Tercom default (case-insensitive, whitespace split).

use regex::Regex;
use std::sync::OnceLock;

/// Substitutions applied in order by the 13a tokenizer
static RULES_13A: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

fn rules_13a() -> &'static [(Regex, &'static str)] {
    RULES_13A.get_or_init(|| {
        [
            // punctuation: {|}~ [\]^_` space-& ()*+ :;<=>?@ /
            (r"([\x7B-\x7E\x5B-\x60\x20-\x26\x28-\x2B\x3A-\x40/])", " ${1} "),
            // period and comma unless preceded by a digit
            (r"([^0-9])([\.,])", "${1} ${2} "),
            // period and comma unless followed by a digit
            (r"([\.,])([^0-9])", " ${1} ${2}"),
            // dash when preceded by a digit
            (r"([0-9])(-)", "${1} ${2} "),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("13a patterns are valid"),
                replacement,
            )
        })
        .collect()
    })
}

/// Tokenize a segment the way mteval-v13a does
pub fn tokenize_13a(line: &str) -> Vec<String> {
    let mut line = line
        .replace("<skipped>", "")
        .replace("-\n", "")
        .replace('\n', " ");

    if line.contains('&') {
        line = line
            .replace("&quot;", "\"")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">");
    }

    let mut line = format!(" {} ", line);
    for (pattern, replacement) in rules_13a() {
        line = pattern.replace_all(&line, *replacement).into_owned();
    }

    line.split_whitespace().map(str::to_string).collect()
}

/// Lowercase and split on whitespace
pub fn tokenize_ter(line: &str) -> Vec<String> {
    line.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
