//! Speech-to-text engine seam and implementations.

pub mod engine;
#[cfg(feature = "whisper")]
pub mod whisper;

pub use engine::{ScriptedEngine, TranscriptionEngine, chunk_windows};
#[cfg(feature = "whisper")]
pub use whisper::{WhisperEngine, WhisperEngineConfig};
