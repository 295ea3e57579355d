//! Subword ↔ word alignment math for the two labeling stages.
//!
//! These functions operate on flat `[T, labels]` score slices so they can be
//! exercised without an inference runtime.

use crate::defaults::AUX_IGNORE_ID;
use crate::labels::vocab::LabelVocabulary;

/// Index of the maximum score in a row. Empty rows yield 0.
pub fn argmax(row: &[f32]) -> usize {
    let mut best = 0;
    let mut max = f32::NEG_INFINITY;
    for (i, &v) in row.iter().enumerate() {
        if v > max {
            max = v;
            best = i;
        }
    }
    best
}

/// Stage-1 word labels: the argmax of each word's *first* subword row.
///
/// Positions with `word_ids < 0` (boundary, pad) and repeated positions of
/// the same word are skipped. Returns one label index per word encountered,
/// in word order.
pub fn first_subword_labels(scores: &[f32], label_count: usize, word_ids: &[i32]) -> Vec<usize> {
    let mut labels = Vec::new();
    let mut last_word = -1i32;

    for (i, &wid) in word_ids.iter().enumerate() {
        if wid < 0 {
            continue;
        }
        if wid == last_word {
            continue;
        }
        let row_start = i * label_count;
        let row = &scores[row_start..row_start + label_count];
        labels.push(argmax(row));
        last_word = wid;
    }

    labels
}

/// Stage-2 auxiliary channel: each position's stage-1 *word* label mapped
/// through the stage-1 vocabulary.
///
/// Boundary/pad positions and positions whose word index falls outside the
/// label list carry the ignore sentinel, as the model was trained with.
pub fn aux_label_ids(
    input_ids: &[i64],
    word_ids: &[i32],
    entity_labels: &[String],
    vocab: &LabelVocabulary,
    cls_id: i64,
    sep_id: i64,
    pad_id: i64,
) -> Vec<i64> {
    input_ids
        .iter()
        .zip(word_ids.iter())
        .map(|(&token_id, &wid)| {
            if token_id == pad_id || token_id == cls_id || token_id == sep_id {
                AUX_IGNORE_ID
            } else if wid >= 0 && (wid as usize) < entity_labels.len() {
                vocab
                    .id_of(&entity_labels[wid as usize])
                    .unwrap_or(AUX_IGNORE_ID)
            } else {
                AUX_IGNORE_ID
            }
        })
        .collect()
}

/// Stage-2 word scores: elementwise maximum over each word's subword rows.
///
/// Words with no subword keep `NEG_INFINITY` in every slot, marking the row
/// invalid.
pub fn max_pool_word_scores(
    scores: &[f32],
    label_count: usize,
    word_ids: &[i32],
    word_count: usize,
) -> Vec<Vec<f32>> {
    let mut pooled = vec![vec![f32::NEG_INFINITY; label_count]; word_count];

    let rows = scores.len() / label_count.max(1);
    for i in 0..rows.min(word_ids.len()) {
        let wid = word_ids[i];
        if wid < 0 || wid as usize >= word_count {
            continue;
        }
        let row = &scores[i * label_count..(i + 1) * label_count];
        let target = &mut pooled[wid as usize];
        for (slot, &v) in target.iter_mut().zip(row.iter()) {
            if v > *slot {
                *slot = v;
            }
        }
    }

    pooled
}

/// Word label from a pooled score row; rows with no valid subword default to
/// label index 0 (the "no label" tag).
pub fn pooled_word_label(row: &[f32]) -> usize {
    if row.iter().any(|&v| v > f32::NEG_INFINITY) {
        argmax(row)
    } else {
        0
    }
}
