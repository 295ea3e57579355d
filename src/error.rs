//! Error types for souschef.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SousChefError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio decoding errors
    #[error("No audio track found in {path}")]
    NoAudioTrack { path: String },

    #[error("Audio decode failed: {message}")]
    AudioDecode { message: String },

    // Transcription errors
    #[error("Transcription model not found at {path}")]
    ModelNotFound { path: String },

    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    // Tokenizer errors
    #[error("Tokenizer vocabulary error: {message}")]
    TokenizerVocab { message: String },

    // Sequence-labeling errors
    #[error("Label model session error: {message}")]
    LabelSession { message: String },

    #[error("Label vocabulary mismatch: model emits {model} scores but vocabulary has {vocabulary} labels")]
    LabelVocabMismatch { model: usize, vocabulary: usize },

    // Pipeline control
    #[error("Pipeline run was cancelled")]
    Cancelled,

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, SousChefError>;
