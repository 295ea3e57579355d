use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub models: ModelConfig,
    pub whisper: WhisperConfig,
    pub parser: ParserConfig,
}

/// Audio normalization and chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub chunk_seconds: u32,
}

/// Label model artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Token-level entity labeling model (stage 1).
    pub stage_one: PathBuf,
    /// Word-level clause grouping model (stage 2).
    pub stage_two: PathBuf,
    /// Subword vocabulary, one token per line.
    pub vocab: PathBuf,
    /// Optional tokenizer options sidecar (JSON).
    pub tokenizer_config: PathBuf,
    /// Maximum subword sequence length; must match training.
    pub max_seq_len: usize,
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WhisperConfig {
    pub model: PathBuf,
    pub language: String,
    /// Inference thread count (None = auto-detect).
    pub threads: Option<usize>,
}

/// Clause compiler tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParserConfig {
    /// BIO recovery lookahead window.
    pub lookahead: usize,
    /// Token ceiling for the cross-sentence step-merge heuristic.
    pub merge_max_tokens: usize,
    /// Entity tag substring that blocks the small-fragment merge.
    pub ingredient_tag: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            chunk_seconds: defaults::CHUNK_SECONDS,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            stage_one: PathBuf::from("models/clause_ner.onnx"),
            stage_two: PathBuf::from("models/clause_grouping.onnx"),
            vocab: PathBuf::from("models/vocab.txt"),
            tokenizer_config: PathBuf::from("models/tokenizer_config.json"),
            max_seq_len: defaults::MAX_SEQ_LEN,
        }
    }
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("models/ggml-base.en.bin"),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            threads: None,
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            lookahead: defaults::BIO_LOOKAHEAD,
            merge_max_tokens: defaults::MERGE_MAX_TOKENS,
            ingredient_tag: defaults::INGREDIENT_TAG.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file is missing.
    ///
    /// Invalid TOML is still an error; only a missing file falls back.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - SOUSCHEF_WHISPER_MODEL → whisper.model
    /// - SOUSCHEF_LANGUAGE → whisper.language
    /// - SOUSCHEF_MODEL_DIR → models.stage_one/stage_two/vocab/tokenizer_config
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("SOUSCHEF_WHISPER_MODEL")
            && !model.is_empty()
        {
            self.whisper.model = PathBuf::from(model);
        }

        if let Ok(language) = std::env::var("SOUSCHEF_LANGUAGE")
            && !language.is_empty()
        {
            self.whisper.language = language;
        }

        if let Ok(dir) = std::env::var("SOUSCHEF_MODEL_DIR")
            && !dir.is_empty()
        {
            let dir = PathBuf::from(dir);
            self.models.stage_one = dir.join("clause_ner.onnx");
            self.models.stage_two = dir.join("clause_grouping.onnx");
            self.models.vocab = dir.join("vocab.txt");
            self.models.tokenizer_config = dir.join("tokenizer_config.json");
        }

        self
    }
}
