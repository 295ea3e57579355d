//! Fixed-length sequence packing with word-id alignment.

use crate::defaults::{CLS_TOKEN, MAX_SEQ_LEN, PAD_TOKEN, SEP_TOKEN, UNK_TOKEN};
use crate::error::Result;
use crate::tokenize::basic::BasicTokenizer;
use crate::tokenize::vocab::{TokenizerOptions, Vocabulary};
use crate::tokenize::wordpiece::WordPieceTokenizer;
use std::sync::Arc;

/// A packed model input sequence.
///
/// All three vectors have exactly the configured maximum length. `word_ids`
/// maps each position back to its source word index, with −1 at boundary and
/// pad positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedSequence {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub word_ids: Vec<i32>,
}

/// End-to-end encoder: basic word split → subword pieces → packed sequence.
#[derive(Debug, Clone)]
pub struct SubwordEncoder {
    basic: BasicTokenizer,
    wordpiece: WordPieceTokenizer,
    cls_id: i64,
    sep_id: i64,
    pad_id: i64,
    max_seq_len: usize,
}

impl SubwordEncoder {
    /// Build an encoder; the vocabulary must contain the four special tokens.
    pub fn new(vocab: Vocabulary, options: TokenizerOptions, max_seq_len: usize) -> Result<Self> {
        let cls_id = vocab.required_id(CLS_TOKEN)?;
        let sep_id = vocab.required_id(SEP_TOKEN)?;
        let pad_id = vocab.required_id(PAD_TOKEN)?;
        let unk_id = vocab.required_id(UNK_TOKEN)?;

        let vocab = Arc::new(vocab);
        Ok(Self {
            basic: BasicTokenizer::new(options),
            wordpiece: WordPieceTokenizer::new(vocab, unk_id),
            cls_id,
            sep_id,
            pad_id,
            max_seq_len,
        })
    }

    pub fn with_default_length(vocab: Vocabulary, options: TokenizerOptions) -> Result<Self> {
        Self::new(vocab, options, MAX_SEQ_LEN)
    }

    pub fn pad_id(&self) -> i64 {
        self.pad_id
    }

    pub fn cls_id(&self) -> i64 {
        self.cls_id
    }

    pub fn sep_id(&self) -> i64 {
        self.sep_id
    }

    /// Word-level split of raw text (the unit the label models predict over).
    pub fn split_words(&self, text: &str) -> Vec<String> {
        self.basic.tokenize(text)
    }

    pub fn encode_text(&self, text: &str) -> TokenizedSequence {
        let words = self.split_words(text);
        self.encode_words(&words)
    }

    /// Pack a word list into a fixed-length sequence.
    ///
    /// `[CLS]`, subword ids (each recording its source word index), `[SEP]`;
    /// then truncated to the maximum length with the final slot forced to
    /// `[SEP]`, or right-padded with `[PAD]`. The attention mask is 1
    /// everywhere except pad positions.
    pub fn encode_words(&self, words: &[String]) -> TokenizedSequence {
        let mut input_ids = Vec::with_capacity(self.max_seq_len);
        let mut word_ids = Vec::with_capacity(self.max_seq_len);

        input_ids.push(self.cls_id);
        word_ids.push(-1);

        for (index, word) in words.iter().enumerate() {
            for piece in self.wordpiece.tokenize_word(word) {
                input_ids.push(piece);
                word_ids.push(index as i32);
            }
        }

        input_ids.push(self.sep_id);
        word_ids.push(-1);

        if input_ids.len() > self.max_seq_len {
            input_ids.truncate(self.max_seq_len);
            word_ids.truncate(self.max_seq_len);
            // The sequence must still end with the boundary token.
            if let Some(last) = input_ids.last_mut() {
                *last = self.sep_id;
            }
            if let Some(last) = word_ids.last_mut() {
                *last = -1;
            }
        }

        while input_ids.len() < self.max_seq_len {
            input_ids.push(self.pad_id);
            word_ids.push(-1);
        }

        let attention_mask = input_ids
            .iter()
            .map(|&id| if id == self.pad_id { 0 } else { 1 })
            .collect();

        TokenizedSequence {
            input_ids,
            attention_mask,
            word_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::from_tokens([
            "[PAD]", "[UNK]", "[CLS]", "[SEP]", // 0..=3
            "chop", "the", "on", "##ion", "##s", "stir",
        ])
    }

    fn encoder(max_len: usize) -> SubwordEncoder {
        SubwordEncoder::new(vocab(), TokenizerOptions::default(), max_len).unwrap()
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_encoder_requires_special_tokens() {
        let bare = Vocabulary::from_tokens(["hello"]);
        assert!(SubwordEncoder::new(bare, TokenizerOptions::default(), 16).is_err());
    }

    #[test]
    fn test_packing_shape_and_alignment() {
        let enc = encoder(12);
        let seq = enc.encode_words(&words(&["chop", "onions"]));

        // [CLS] chop on ##ion ##s [SEP] pad...
        assert_eq!(seq.input_ids.len(), 12);
        assert_eq!(seq.attention_mask.len(), 12);
        assert_eq!(seq.word_ids.len(), 12);

        assert_eq!(seq.input_ids[0], 2);
        assert_eq!(seq.input_ids[1], 4);
        assert_eq!(&seq.input_ids[2..5], &[6, 7, 8]);
        assert_eq!(seq.input_ids[5], 3);
        assert!(seq.input_ids[6..].iter().all(|&id| id == 0));

        assert_eq!(seq.word_ids[0], -1);
        assert_eq!(seq.word_ids[1], 0);
        assert_eq!(&seq.word_ids[2..5], &[1, 1, 1]);
        assert!(seq.word_ids[5..].iter().all(|&w| w == -1));

        assert_eq!(&seq.attention_mask[..6], &[1, 1, 1, 1, 1, 1]);
        assert!(seq.attention_mask[6..].iter().all(|&m| m == 0));
    }

    #[test]
    fn test_word_ids_negative_iff_boundary_or_pad() {
        let enc = encoder(16);
        let seq = enc.encode_words(&words(&["chop", "the", "onion"]));
        for (i, &id) in seq.input_ids.iter().enumerate() {
            let is_boundary_or_pad = id == 0 || id == 2 || id == 3;
            assert_eq!(
                seq.word_ids[i] == -1,
                is_boundary_or_pad,
                "position {} id {} word_id {}",
                i,
                id,
                seq.word_ids[i]
            );
        }
    }

    #[test]
    fn test_truncation_forces_sep_last() {
        let enc = encoder(4);
        // [CLS] chop the stir [SEP] would be 5 long → truncate to 4.
        let seq = enc.encode_words(&words(&["chop", "the", "stir"]));
        assert_eq!(seq.input_ids.len(), 4);
        assert_eq!(seq.input_ids[0], 2);
        assert_eq!(*seq.input_ids.last().unwrap(), 3);
        assert_eq!(*seq.word_ids.last().unwrap(), -1);
        assert!(seq.attention_mask.iter().all(|&m| m == 1));
    }

    #[test]
    fn test_empty_word_list() {
        let enc = encoder(8);
        let seq = enc.encode_words(&[]);
        assert_eq!(seq.input_ids[0], 2);
        assert_eq!(seq.input_ids[1], 3);
        assert!(seq.input_ids[2..].iter().all(|&id| id == 0));
        assert_eq!(seq.attention_mask.iter().sum::<i64>(), 2);
    }

    #[test]
    fn test_unknown_word_packs_single_unk() {
        let enc = encoder(8);
        let seq = enc.encode_words(&words(&["zucchini"]));
        assert_eq!(seq.input_ids[1], 1);
        assert_eq!(seq.word_ids[1], 0);
        assert_eq!(seq.input_ids[2], 3);
    }

    #[test]
    fn test_never_split_token_survives_flags() {
        let mut options = TokenizerOptions {
            do_lower_case: true,
            strip_accents: true,
            ..Default::default()
        };
        options.never_split.insert("Sauté".to_string());
        let vocab = Vocabulary::from_tokens(["[PAD]", "[UNK]", "[CLS]", "[SEP]", "Sauté"]);
        let enc = SubwordEncoder::new(vocab, options, 8).unwrap();

        // The exact never-split text comes back unchanged despite lowercase
        // and accent-stripping flags.
        assert_eq!(enc.split_words("Sauté"), vec!["Sauté"]);
        let seq = enc.encode_text("Sauté");
        assert_eq!(seq.input_ids[1], 4);
    }

    #[test]
    fn test_encode_text_splits_then_packs() {
        let enc = encoder(8);
        let seq = enc.encode_text("Chop the onions.");
        // Punctuation stripped, lowercased: chop the onions → on ##ion ##s
        assert_eq!(seq.input_ids[1], 4);
        assert_eq!(seq.input_ids[2], 5);
        assert_eq!(&seq.input_ids[3..6], &[6, 7, 8]);
    }
}
