//! Subword vocabulary and tokenizer options loading.

use crate::defaults::{CLS_TOKEN, PAD_TOKEN, SEP_TOKEN, UNK_TOKEN};
use crate::error::{Result, SousChefError};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Token → id mapping, id = line number in the vocabulary file.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    map: HashMap<String, i64>,
}

impl Vocabulary {
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let map = tokens
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t.into(), i as i64))
            .collect();
        Self { map }
    }

    /// Load a one-token-per-line vocabulary file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let vocab = Self::from_tokens(contents.lines().map(|l| l.trim().to_string()));
        debug!(tokens = vocab.len(), path = %path.display(), "loaded vocabulary");
        Ok(vocab)
    }

    pub fn id(&self, token: &str) -> Option<i64> {
        self.map.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.map.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Id of a required special token, or a configuration error.
    pub fn required_id(&self, token: &str) -> Result<i64> {
        self.id(token).ok_or_else(|| SousChefError::TokenizerVocab {
            message: format!("vocabulary is missing required token {}", token),
        })
    }

    /// Validate that all four special tokens are present.
    pub fn validate_specials(&self) -> Result<()> {
        for token in [CLS_TOKEN, SEP_TOKEN, PAD_TOKEN, UNK_TOKEN] {
            self.required_id(token)?;
        }
        Ok(())
    }
}

/// Tokenizer behavior flags, loaded from a JSON sidecar shipped with the
/// model artifacts.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TokenizerOptions {
    pub do_lower_case: bool,
    pub strip_accents: bool,
    pub never_split: HashSet<String>,
    /// Remove punctuation entirely instead of isolating it as tokens.
    pub strip_punctuation: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            do_lower_case: true,
            strip_accents: false,
            never_split: HashSet::new(),
            strip_punctuation: true,
        }
    }
}

impl TokenizerOptions {
    /// Load options from a JSON file, falling back to defaults when the file
    /// is absent or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }
}
