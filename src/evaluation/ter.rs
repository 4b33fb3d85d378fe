//! Translation Edit Rate with block shifts (Tercom constraints).
//!
//! Each segment is repeatedly improved by the single block shift that lowers the
//! word-level edit distance the most; the segment's edits are the shifts taken plus
//! the remaining Levenshtein distance. The corpus score is total edits per 100
//! reference words, the scale sacreBLEU reports.

use super::tokenizer::tokenize_ter;
use serde::Serialize;

const MAX_SHIFT_SIZE: usize = 10;
const MAX_SHIFT_DIST: usize = 50;
const MAX_SHIFT_CANDIDATES: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerScore {
    /// Edits per 100 reference words (0.0 for a perfect match; may exceed 100.0)
    pub score: f64,
    pub num_edits: usize,
    pub ref_length: usize,
}

/// One step of rewriting the hypothesis into the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditOp {
    Match,
    Substitute,
    /// Hypothesis word with no reference counterpart
    Insert,
    /// Reference word missing from the hypothesis
    Delete,
}

/// Word-level Levenshtein distance plus the operations that achieve it
fn edit_distance(hyp: &[String], reference: &[String]) -> (usize, Vec<EditOp>) {
    let (rows, cols) = (hyp.len(), reference.len());
    let width = cols + 1;
    let mut table = vec![0usize; (rows + 1) * width];

    for i in 0..=rows {
        table[i * width] = i;
    }
    for j in 0..=cols {
        table[j] = j;
    }
    for i in 1..=rows {
        for j in 1..=cols {
            let substitute =
                table[(i - 1) * width + j - 1] + usize::from(hyp[i - 1] != reference[j - 1]);
            let insert = table[(i - 1) * width + j] + 1;
            let delete = table[i * width + j - 1] + 1;
            table[i * width + j] = substitute.min(insert).min(delete);
        }
    }

    // diagonal moves win ties, then insertions
    let mut ops = Vec::with_capacity(rows.max(cols));
    let (mut i, mut j) = (rows, cols);
    while i > 0 || j > 0 {
        let here = table[i * width + j];
        if i > 0 && j > 0 {
            let same = hyp[i - 1] == reference[j - 1];
            if here == table[(i - 1) * width + j - 1] + usize::from(!same) {
                ops.push(if same { EditOp::Match } else { EditOp::Substitute });
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && here == table[(i - 1) * width + j] + 1 {
            ops.push(EditOp::Insert);
            i -= 1;
        } else {
            ops.push(EditOp::Delete);
            j -= 1;
        }
    }
    ops.reverse();

    (table[rows * width + cols], ops)
}

/// Per-position view of an edit trace
struct Alignment {
    /// For each reference position, the hypothesis position it lines up with (-1 before the start)
    ref_to_hyp: Vec<isize>,
    ref_err: Vec<bool>,
    hyp_err: Vec<bool>,
}

impl Alignment {
    fn from_ops(ops: &[EditOp]) -> Self {
        let mut pos_hyp: isize = -1;
        let mut alignment = Alignment {
            ref_to_hyp: Vec::new(),
            ref_err: Vec::new(),
            hyp_err: Vec::new(),
        };

        for op in ops {
            match op {
                EditOp::Match | EditOp::Substitute => {
                    pos_hyp += 1;
                    let err = *op == EditOp::Substitute;
                    alignment.ref_to_hyp.push(pos_hyp);
                    alignment.hyp_err.push(err);
                    alignment.ref_err.push(err);
                }
                EditOp::Insert => {
                    pos_hyp += 1;
                    alignment.hyp_err.push(true);
                }
                EditOp::Delete => {
                    alignment.ref_to_hyp.push(pos_hyp);
                    alignment.ref_err.push(true);
                }
            }
        }

        alignment
    }
}

/// All `(start_hyp, start_ref, length)` blocks where hypothesis and reference agree
fn find_shifted_pairs(hyp: &[String], reference: &[String]) -> Vec<(usize, usize, usize)> {
    let mut pairs = Vec::new();

    for start_h in 0..hyp.len() {
        for start_r in 0..reference.len() {
            if start_h.abs_diff(start_r) > MAX_SHIFT_DIST {
                continue;
            }

            let mut length = 0;
            while length < MAX_SHIFT_SIZE && hyp[start_h + length] == reference[start_r + length] {
                length += 1;
                pairs.push((start_h, start_r, length));
                if hyp.len() == start_h + length || reference.len() == start_r + length {
                    break;
                }
            }
        }
    }

    pairs
}

/// Move `words[start..start + length]` so that it begins at `target`
fn perform_shift(words: &[String], start: usize, length: usize, target: usize) -> Vec<String> {
    let end = start + length;
    let mut shifted = Vec::with_capacity(words.len());

    if target < start {
        shifted.extend_from_slice(&words[..target]);
        shifted.extend_from_slice(&words[start..end]);
        shifted.extend_from_slice(&words[target..start]);
        shifted.extend_from_slice(&words[end..]);
    } else if target > end {
        shifted.extend_from_slice(&words[..start]);
        shifted.extend_from_slice(&words[end..target]);
        shifted.extend_from_slice(&words[start..end]);
        shifted.extend_from_slice(&words[target..]);
    } else {
        let split = (length + target).min(words.len());
        shifted.extend_from_slice(&words[..start]);
        shifted.extend_from_slice(&words[end..split]);
        shifted.extend_from_slice(&words[start..end]);
        shifted.extend_from_slice(&words[split..]);
    }

    shifted
}

/// Ranking of a candidate shift: gain first, then longer blocks, then earlier positions
type ShiftKey = (isize, usize, isize, isize);

/// Find the shift that reduces edit distance the most.
///
/// Returns the gain (possibly <= 0) and the shifted words, or `None` when no
/// block is eligible. `checked` accumulates the number of candidates tried.
fn best_shift(
    hyp: &[String],
    reference: &[String],
    checked: &mut usize,
) -> Option<(isize, Vec<String>)> {
    let (pre_score, ops) = edit_distance(hyp, reference);
    let alignment = Alignment::from_ops(&ops);
    let mut best: Option<(ShiftKey, Vec<String>)> = None;

    for (start_h, start_r, length) in find_shifted_pairs(hyp, reference) {
        // only move blocks that are wrong where they are and needed elsewhere
        if !alignment.hyp_err[start_h..start_h + length].iter().any(|e| *e) {
            continue;
        }
        if !alignment.ref_err[start_r..start_r + length].iter().any(|e| *e) {
            continue;
        }
        let aligned = alignment.ref_to_hyp[start_r];
        if start_h as isize <= aligned && aligned < (start_h + length) as isize {
            continue;
        }

        let mut prev_idx = None;
        for offset in -1..length as isize {
            let ref_pos = start_r as isize + offset;
            let idx = if ref_pos == -1 {
                0
            } else {
                match alignment.ref_to_hyp.get(ref_pos as usize) {
                    Some(hyp_pos) => (hyp_pos + 1) as usize,
                    None => break,
                }
            };
            if prev_idx == Some(idx) {
                continue;
            }
            prev_idx = Some(idx);

            let shifted = perform_shift(hyp, start_h, length, idx);
            let (score, _) = edit_distance(&shifted, reference);
            let key = (
                pre_score as isize - score as isize,
                length,
                -(start_h as isize),
                -(idx as isize),
            );
            *checked += 1;

            if best.as_ref().map_or(true, |(best_key, _)| key > *best_key) {
                best = Some((key, shifted));
            }
        }

        if *checked >= MAX_SHIFT_CANDIDATES {
            break;
        }
    }

    best.map(|(key, words)| (key.0, words))
}

/// Edits and reference length for one segment
fn segment_edits(hyp: Vec<String>, reference: &[String]) -> (usize, usize) {
    if reference.is_empty() {
        return (hyp.len(), 0);
    }
    if hyp.is_empty() {
        return (reference.len(), reference.len());
    }

    let mut words = hyp;
    let mut shifts = 0;
    let mut checked = 0;

    while let Some((gain, shifted)) = best_shift(&words, reference, &mut checked) {
        if checked >= MAX_SHIFT_CANDIDATES || gain <= 0 {
            break;
        }
        shifts += 1;
        words = shifted;
    }

    let (distance, _) = edit_distance(&words, reference);
    (shifts + distance, reference.len())
}

/// Score `candidates[i]` against `references[i]` and aggregate over the corpus.
///
/// Callers guarantee both slices have the same length.
pub(crate) fn corpus_ter<S: AsRef<str>, R: AsRef<str>>(candidates: &[S], references: &[R]) -> TerScore {
    let (num_edits, ref_length) = candidates
        .iter()
        .zip(references)
        .map(|(candidate, reference)| {
            segment_edits(
                tokenize_ter(candidate.as_ref()),
                &tokenize_ter(reference.as_ref()),
            )
        })
        .fold((0, 0), |(edits, len), (e, l)| (edits + e, len + l));

    let rate = if ref_length > 0 {
        num_edits as f64 / ref_length as f64
    } else if num_edits > 0 {
        1.0
    } else {
        0.0
    };

    TerScore {
        score: 100.0 * rate,
        num_edits,
        ref_length,
    }
}
