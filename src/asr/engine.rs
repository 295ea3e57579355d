//! Transcription engine trait and test double.

use crate::error::{Result, SousChefError};
use std::sync::{Arc, Mutex};

/// Speech-to-text engine driven one chunk at a time.
///
/// The engine models global streaming state: at most one chunk session is
/// active at a time, and every chunk goes through an
/// `init` → `transcribe` → `deinit` cycle. Callers must run `deinit` even
/// when `transcribe` fails.
pub trait TranscriptionEngine: Send {
    /// Open a chunk session for audio in the given format.
    fn init(&mut self, sample_rate: u32, channels: u16) -> Result<()>;

    /// Transcribe one zero-padded window of PCM samples.
    ///
    /// Returns raw text fragments which may carry embedded timestamp markers;
    /// the sentence assembler strips them downstream.
    fn transcribe(&mut self, samples: &[i16]) -> Result<Vec<String>>;

    /// Close the current chunk session.
    fn deinit(&mut self);

    /// Name of the loaded model, for diagnostics.
    fn name(&self) -> &str;
}

/// Split PCM into fixed-size transcription windows.
///
/// Every window except possibly the last has exactly `window` samples; the
/// last carries the remainder. Callers zero-pad before handing a window to
/// the engine. Empty input yields no windows.
pub fn chunk_windows(samples: &[i16], window: usize) -> Vec<&[i16]> {
    if window == 0 {
        return Vec::new();
    }
    samples.chunks(window).collect()
}

/// Recorded lifecycle calls of a [`ScriptedEngine`], for assertions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineCalls {
    pub inits: usize,
    pub transcribes: usize,
    pub deinits: usize,
}

/// Scripted engine for tests: returns canned fragments per chunk, records
/// its lifecycle, and can fail on selected chunks.
pub struct ScriptedEngine {
    name: String,
    script: Vec<Vec<String>>,
    fail_on: Option<usize>,
    chunk: usize,
    session_open: bool,
    calls: Arc<Mutex<EngineCalls>>,
}

impl ScriptedEngine {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: Vec::new(),
            fail_on: None,
            chunk: 0,
            session_open: false,
            calls: Arc::new(Mutex::new(EngineCalls::default())),
        }
    }

    /// Fragments to emit for each successive chunk. Chunks beyond the script
    /// emit nothing.
    pub fn with_script(mut self, script: Vec<Vec<String>>) -> Self {
        self.script = script;
        self
    }

    /// Make `transcribe` fail for the given chunk index.
    pub fn with_failure_on_chunk(mut self, chunk: usize) -> Self {
        self.fail_on = Some(chunk);
        self
    }

    pub fn calls(&self) -> EngineCalls {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Shared view of the call counters, usable after the engine is moved
    /// into a pipeline.
    pub fn calls_handle(&self) -> Arc<Mutex<EngineCalls>> {
        self.calls.clone()
    }
}

impl TranscriptionEngine for ScriptedEngine {
    fn init(&mut self, _sample_rate: u32, _channels: u16) -> Result<()> {
        assert!(!self.session_open, "chunk session already open");
        self.session_open = true;
        if let Ok(mut calls) = self.calls.lock() {
            calls.inits += 1;
        }
        Ok(())
    }

    fn transcribe(&mut self, _samples: &[i16]) -> Result<Vec<String>> {
        assert!(self.session_open, "transcribe outside a chunk session");
        if let Ok(mut calls) = self.calls.lock() {
            calls.transcribes += 1;
        }
        let index = self.chunk;
        self.chunk += 1;
        if self.fail_on == Some(index) {
            return Err(SousChefError::Transcription {
                message: format!("scripted failure on chunk {}", index),
            });
        }
        Ok(self.script.get(index).cloned().unwrap_or_default())
    }

    fn deinit(&mut self) {
        self.session_open = false;
        if let Ok(mut calls) = self.calls.lock() {
            calls.deinits += 1;
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
