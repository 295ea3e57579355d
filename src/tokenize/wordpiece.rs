//! Greedy longest-prefix subword matching.

use crate::defaults::CONTINUATION_PREFIX;
use crate::tokenize::vocab::Vocabulary;
use std::sync::Arc;

/// Subword tokenizer over a fixed vocabulary.
///
/// A word is first tried whole; otherwise it is consumed by repeated
/// longest-prefix matches, where every match after the first carries the
/// `##` continuation prefix. A position with no matching prefix collapses
/// the entire word to the unknown-token id.
#[derive(Debug, Clone)]
pub struct WordPieceTokenizer {
    vocab: Arc<Vocabulary>,
    unk_id: i64,
}

impl WordPieceTokenizer {
    pub fn new(vocab: Arc<Vocabulary>, unk_id: i64) -> Self {
        Self { vocab, unk_id }
    }

    pub fn tokenize_word(&self, word: &str) -> Vec<i64> {
        if let Some(id) = self.vocab.id(word) {
            return vec![id];
        }

        let chars: Vec<char> = word.chars().collect();
        let mut tokens = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let mut end = chars.len();
            let mut found: Option<(String, usize)> = None;

            while end > start {
                let piece: String = chars[start..end].iter().collect();
                let candidate = if start == 0 {
                    piece
                } else {
                    format!("{}{}", CONTINUATION_PREFIX, piece)
                };
                if self.vocab.contains(&candidate) {
                    found = Some((candidate, end));
                    break;
                }
                end -= 1;
            }

            match found {
                Some((piece, matched_end)) => {
                    // Unwrap-free: membership was just checked.
                    if let Some(id) = self.vocab.id(&piece) {
                        tokens.push(id);
                    }
                    start = matched_end;
                }
                None => {
                    // No partial piece list for unmatched words.
                    return vec![self.unk_id];
                }
            }
        }

        tokens
    }
}
