//! Whisper-based transcription engine.
//!
//! Implements [`TranscriptionEngine`] using whisper-rs. The model context is
//! loaded once at construction; each chunk session creates a fresh inference
//! state.
//!
//! # Feature Gate
//!
//! Requires the `whisper` feature (and cmake to build whisper.cpp):
//!
//! ```bash
//! cargo build --features whisper
//! ```

use crate::asr::engine::TranscriptionEngine;
use crate::defaults;
use crate::error::{Result, SousChefError};
use std::path::PathBuf;
use std::sync::Once;
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, install_logging_hooks,
};

static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// Configuration for the Whisper engine.
#[derive(Debug, Clone)]
pub struct WhisperEngineConfig {
    /// Path to the ggml model file
    pub model_path: PathBuf,
    /// Language code (e.g., "en", "es", "fr")
    pub language: String,
    /// Number of threads for inference (None = auto-detect)
    pub threads: Option<usize>,
}

impl Default for WhisperEngineConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            threads: None,
        }
    }
}

/// Whisper implementation of the chunk-session transcription engine.
pub struct WhisperEngine {
    context: WhisperContext,
    config: WhisperEngineConfig,
    model_name: String,
    session_rate: Option<u32>,
}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("config", &self.config)
            .field("model_name", &self.model_name)
            .field("context", &"<WhisperContext>")
            .finish()
    }
}

impl WhisperEngine {
    /// Load the Whisper model.
    ///
    /// # Errors
    /// Returns `SousChefError::ModelNotFound` if the model file doesn't exist,
    /// `SousChefError::Transcription` if loading fails.
    pub fn new(config: WhisperEngineConfig) -> Result<Self> {
        // Install logging hooks to suppress whisper.cpp output (only once)
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            install_logging_hooks();
        });

        if !config.model_path.exists() {
            return Err(SousChefError::ModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }

        let model_name = config
            .model_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let context = WhisperContext::new_with_params(
            config
                .model_path
                .to_str()
                .ok_or_else(|| SousChefError::Transcription {
                    message: "Invalid UTF-8 in model path".to_string(),
                })?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| SousChefError::Transcription {
            message: format!("Failed to load Whisper model: {}", e),
        })?;

        Ok(Self {
            context,
            config,
            model_name,
            session_rate: None,
        })
    }

    /// Convert i16 audio samples to f32 normalized to [-1.0, 1.0].
    fn convert_audio(samples: &[i16]) -> Vec<f32> {
        samples
            .iter()
            .map(|&sample| sample as f32 / 32768.0)
            .collect()
    }

    /// Format centisecond offsets as a bracketed `[start --> end]` range.
    fn timestamp_range(start_cs: i64, end_cs: i64) -> String {
        format!("[{} --> {}]", Self::hms(start_cs), Self::hms(end_cs))
    }

    fn hms(centis: i64) -> String {
        let ms = centis.max(0) * 10;
        let h = ms / 3_600_000;
        let m = (ms % 3_600_000) / 60_000;
        let s = (ms % 60_000) / 1000;
        format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms % 1000)
    }
}

impl TranscriptionEngine for WhisperEngine {
    fn init(&mut self, sample_rate: u32, _channels: u16) -> Result<()> {
        if sample_rate != defaults::SAMPLE_RATE {
            return Err(SousChefError::Transcription {
                message: format!(
                    "engine expects {}Hz input, got {}Hz",
                    defaults::SAMPLE_RATE,
                    sample_rate
                ),
            });
        }
        self.session_rate = Some(sample_rate);
        Ok(())
    }

    fn transcribe(&mut self, samples: &[i16]) -> Result<Vec<String>> {
        if self.session_rate.is_none() {
            return Err(SousChefError::Transcription {
                message: "transcribe called outside a chunk session".to_string(),
            });
        }

        let audio = Self::convert_audio(samples);

        let mut state =
            self.context
                .create_state()
                .map_err(|e| SousChefError::Transcription {
                    message: format!("Failed to create Whisper state: {}", e),
                })?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(&self.config.language));
        if let Some(threads) = self.config.threads {
            params.set_n_threads(threads as i32);
        }
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, &audio)
            .map_err(|e| SousChefError::Transcription {
                message: format!("Whisper inference failed: {}", e),
            })?;

        // One fragment per segment, prefixed with a bracketed timestamp range
        // the sentence assembler knows how to strip.
        let mut fragments = Vec::new();
        for segment in state.as_iter() {
            let text = segment.to_string();
            if text.trim().is_empty() {
                continue;
            }
            fragments.push(format!(
                "{} {}",
                Self::timestamp_range(segment.start_timestamp(), segment.end_timestamp()),
                text.trim()
            ));
        }

        Ok(fragments)
    }

    fn deinit(&mut self) {
        self.session_rate = None;
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
