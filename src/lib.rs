//! souschef - spoken cooking instructions to structured recipe steps.
//!
//! Decodes an audio recording to canonical PCM, streams it through a
//! speech-to-text engine, assembles the raw output into sentences, labels
//! each sentence with two chained sequence-labeling models, and compiles the
//! labels into ordered, structured instructions.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod asr;
pub mod audio;
pub mod config;
pub mod defaults;
pub mod error;
pub mod labels;
pub mod parser;
pub mod pipeline;
pub mod text;
pub mod tokenize;

// Core seams (engine → assembler → labeler → compiler)
pub use asr::engine::{ScriptedEngine, TranscriptionEngine};
pub use labels::runner::{MockLabeler, SentenceLabeler};
pub use text::assembler::{SentenceAssembler, SentenceChunk};

// Pipeline
pub use pipeline::orchestrator::{CancelHandle, PipelineConfig, RecipePipeline};
pub use pipeline::types::{LabeledSentence, PipelineStage};

// Output
pub use parser::clause::{Instruction, Relation};
pub use parser::compiler::CompilerOptions;

// Error handling
pub use error::{Result, SousChefError};

// Config
pub use config::Config;

#[cfg(feature = "onnx")]
pub use labels::onnx::OnnxLabelModels;
#[cfg(feature = "whisper")]
pub use asr::whisper::{WhisperEngine, WhisperEngineConfig};
