//! Full pipeline run: audio file in, ordered instructions out.

use crate::asr::engine::{TranscriptionEngine, chunk_windows};
use crate::audio::decoder::decode_to_pcm;
use crate::audio::normalize::PcmBuffer;
use crate::defaults;
use crate::error::{Result, SousChefError};
use crate::labels::runner::{self, SentenceLabeler};
use crate::parser::compiler::{CompilerOptions, compile};
use crate::parser::clause::Instruction;
use crate::pipeline::assembler_station::AssemblerStation;
use crate::pipeline::error::{ErrorReporter, LogReporter};
use crate::pipeline::station::StationRunner;
use crate::pipeline::types::{FragmentEvent, PipelineStage};
use crate::text::SentenceChunk;
use crossbeam_channel::{Sender, bounded};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::{debug, info, warn};

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Canonical sample rate fed to the engine.
    pub sample_rate: u32,
    /// Transcription window length in seconds.
    pub chunk_seconds: u32,
    /// Clause compiler tuning.
    pub compiler: CompilerOptions,
    /// Channel buffer sizes
    pub fragment_buffer: usize,
    pub sentence_buffer: usize,
    /// Optional stage-event sender for external observers.
    pub stage_tx: Option<Sender<PipelineStage>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            chunk_seconds: defaults::CHUNK_SECONDS,
            compiler: CompilerOptions::default(),
            fragment_buffer: defaults::FRAGMENT_BUFFER,
            sentence_buffer: defaults::SENTENCE_BUFFER,
            stage_tx: None,
        }
    }
}

/// Cooperative cancellation flag for a running pipeline.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// One-shot pipeline over a recorded audio file.
///
/// Each run owns its channels, buffers, counters and the injected model
/// handle exclusively; nothing persists across runs.
pub struct RecipePipeline {
    config: PipelineConfig,
    error_reporter: Arc<dyn ErrorReporter>,
    cancel: CancelHandle,
}

impl RecipePipeline {
    /// Creates a new pipeline with default error reporter.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            error_reporter: Arc::new(LogReporter),
            cancel: CancelHandle::new(),
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Handle for cancelling the run from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    fn set_stage(&self, stage: PipelineStage) {
        debug!(stage = %stage, "pipeline stage");
        if let Some(tx) = &self.config.stage_tx {
            let _ = tx.send(stage);
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            Err(SousChefError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Run the full pipeline on an audio file.
    ///
    /// The labeler handle is consumed: its sessions are released when the
    /// run returns, whether it succeeded, failed or was cancelled.
    pub fn run(
        self,
        audio: &Path,
        engine: Box<dyn TranscriptionEngine>,
        labeler: Box<dyn SentenceLabeler>,
    ) -> Result<Vec<Instruction>> {
        let result = self.run_inner(audio, engine, labeler);
        match &result {
            Ok(instructions) => {
                info!(instructions = instructions.len(), "pipeline finished");
                self.set_stage(PipelineStage::Done);
            }
            Err(e) => {
                self.set_stage(PipelineStage::Error(e.to_string()));
            }
        }
        result
    }

    fn run_inner(
        &self,
        audio: &Path,
        mut engine: Box<dyn TranscriptionEngine>,
        mut labeler: Box<dyn SentenceLabeler>,
    ) -> Result<Vec<Instruction>> {
        self.set_stage(PipelineStage::Transcribing);

        // A missing audio track degrades to an empty run: the caller gets
        // zero instructions, not a failure.
        let pcm = match decode_to_pcm(audio) {
            Ok(pcm) => pcm,
            Err(SousChefError::NoAudioTrack { path }) => {
                warn!(path = %path, "no audio track; nothing to transcribe");
                PcmBuffer::empty()
            }
            Err(e) => return Err(e),
        };

        let sentences = if pcm.is_empty() {
            warn!("decoded audio is empty; nothing to transcribe");
            Vec::new()
        } else {
            self.transcribe_and_assemble(&pcm, engine.as_mut())?
        };
        info!(sentences = sentences.len(), "transcription assembled");

        self.check_cancelled()?;
        self.set_stage(PipelineStage::EntityLabeling);
        let partial = runner::entity_pass(labeler.as_mut(), &sentences);

        self.check_cancelled()?;
        self.set_stage(PipelineStage::GroupLabeling);
        let labeled = runner::grouping_pass(labeler.as_mut(), partial);

        // Release the model sessions before parsing; the handle is no
        // longer needed.
        drop(labeler);

        self.check_cancelled()?;
        self.set_stage(PipelineStage::Parsing);
        Ok(compile(&labeled, &self.config.compiler))
    }

    /// Drive the engine chunk by chunk and collect assembled sentences.
    fn transcribe_and_assemble(
        &self,
        pcm: &PcmBuffer,
        engine: &mut dyn TranscriptionEngine,
    ) -> Result<Vec<SentenceChunk>> {
        let (fragment_tx, fragment_rx) = bounded(self.config.fragment_buffer);
        let (sentence_tx, sentence_rx) = bounded(self.config.sentence_buffer);
        let (done_tx, done_rx) = bounded(1);

        let station = AssemblerStation::new().with_completion(done_tx);
        let assembler =
            StationRunner::spawn(station, fragment_rx, sentence_tx, self.error_reporter.clone());

        // Single consumer of the sentence channel; drains while the main
        // thread keeps feeding fragments.
        let collector = thread::spawn(move || {
            let mut sentences = Vec::new();
            while let Ok(sentence) = sentence_rx.recv() {
                sentences.push(sentence);
            }
            sentences
        });

        let window = (self.config.sample_rate * self.config.chunk_seconds) as usize;
        let mut cancelled = false;

        for (index, chunk) in chunk_windows(&pcm.samples, window).into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                // Stop feeding the engine and drop unflushed assembler text.
                let _ = fragment_tx.send(FragmentEvent::Abort);
                cancelled = true;
                break;
            }

            debug!(chunk = index, samples = chunk.len(), "transcribing window");

            if let Err(e) = engine.init(self.config.sample_rate, defaults::CHANNELS) {
                warn!(chunk = index, error = %e, "chunk session init failed; skipping");
                continue;
            }

            let mut padded = chunk.to_vec();
            padded.resize(window, 0);
            let outcome = engine.transcribe(&padded);
            // Teardown runs no matter how transcription went.
            engine.deinit();

            match outcome {
                Ok(fragments) => {
                    for fragment in fragments {
                        if fragment_tx.send(FragmentEvent::Text(fragment)).is_err() {
                            break;
                        }
                    }
                    let _ = fragment_tx.send(FragmentEvent::ChunkBoundary);
                }
                Err(e) => {
                    // Never retried: re-running a chunk could duplicate
                    // emitted text.
                    warn!(chunk = index, error = %e, "chunk transcription failed; skipping");
                }
            }
        }

        if !cancelled {
            let _ = fragment_tx.send(FragmentEvent::EndOfAudio);
        }
        drop(fragment_tx);

        if let Err(msg) = assembler.join() {
            self.error_reporter.report(
                "Assembler",
                &crate::pipeline::error::StationError::Fatal(msg),
            );
        }
        let sentences = collector.join().unwrap_or_default();

        if cancelled {
            return Err(SousChefError::Cancelled);
        }

        if done_rx.try_recv().is_err() {
            debug!("assembler finished without an explicit completion signal");
        }

        Ok(sentences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asr::engine::ScriptedEngine;
    use crate::labels::runner::MockLabeler;
    use crossbeam_channel::Receiver;
    use std::io::Write;

    fn write_wav(path: &Path, seconds: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..(16000 * seconds) {
            writer.write_sample(((i % 100) as i16) * 50).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn step_labeler() -> MockLabeler {
        MockLabeler::new()
            .with_entity("onions", "B-INGREDIENT")
            .with_group("chop", "B-STEP")
            .with_group("the", "I-STEP")
            .with_group("onions", "I-STEP")
    }

    fn stages(rx: &Receiver<PipelineStage>) -> Vec<PipelineStage> {
        let mut out = Vec::new();
        while let Ok(stage) = rx.try_recv() {
            out.push(stage);
        }
        out
    }

    #[test]
    fn test_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.sample_rate, 16000);
        assert_eq!(config.chunk_seconds, 30);
        assert_eq!(config.fragment_buffer, 128);
        assert_eq!(config.sentence_buffer, 64);
        assert!(config.stage_tx.is_none());
    }

    #[test]
    fn test_cancel_handle() {
        let pipeline = RecipePipeline::new(PipelineConfig::default());
        let handle = pipeline.cancel_handle();
        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(pipeline.cancel.is_cancelled());
    }

    #[test]
    fn test_full_run_produces_instructions() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("speech.wav");
        write_wav(&audio, 1);

        let (stage_tx, stage_rx) = bounded(16);
        let config = PipelineConfig {
            stage_tx: Some(stage_tx),
            ..Default::default()
        };

        let engine = Box::new(
            ScriptedEngine::new("scripted")
                .with_script(vec![vec!["chop the onions.".to_string()]]),
        );
        let labeler = Box::new(step_labeler());

        let pipeline = RecipePipeline::new(config);
        let instructions = pipeline.run(&audio, engine, labeler).unwrap();

        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].step_text, "chop the onions");

        let seen = stages(&stage_rx);
        assert_eq!(
            seen,
            vec![
                PipelineStage::Transcribing,
                PipelineStage::EntityLabeling,
                PipelineStage::GroupLabeling,
                PipelineStage::Parsing,
                PipelineStage::Done,
            ]
        );
    }

    #[test]
    fn test_engine_lifecycle_per_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("speech.wav");
        // 3s of audio with a 1s window: three chunk sessions.
        write_wav(&audio, 3);

        let config = PipelineConfig {
            chunk_seconds: 1,
            ..Default::default()
        };
        let engine = ScriptedEngine::new("scripted")
            .with_script(vec![vec!["stir.".to_string()]]);
        let calls = engine.calls_handle();

        let pipeline = RecipePipeline::new(config);
        let instructions = pipeline
            .run(&audio, Box::new(engine), Box::new(MockLabeler::new()))
            .unwrap();
        // "stir." labels to O everywhere → no steps, no instructions.
        assert!(instructions.is_empty());

        // One init/transcribe/deinit cycle per window, teardown always ran.
        let calls = calls.lock().unwrap().clone();
        assert_eq!(calls.inits, 3);
        assert_eq!(calls.transcribes, 3);
        assert_eq!(calls.deinits, 3);
    }

    #[test]
    fn test_chunk_failure_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("speech.wav");
        // 3s of audio with 1s windows: three chunks, middle one fails.
        write_wav(&audio, 3);

        let config = PipelineConfig {
            chunk_seconds: 1,
            ..Default::default()
        };
        let engine = ScriptedEngine::new("scripted")
            .with_script(vec![
                vec!["chop the onions.".to_string()],
                vec!["never seen.".to_string()],
                vec![],
            ])
            .with_failure_on_chunk(1);

        let pipeline = RecipePipeline::new(config);
        let instructions = pipeline
            .run(&audio, Box::new(engine), Box::new(step_labeler()))
            .unwrap();

        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].step_text, "chop the onions");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let pipeline = RecipePipeline::new(PipelineConfig::default());
        let result = pipeline.run(
            Path::new("/nonexistent/audio.wav"),
            Box::new(ScriptedEngine::new("scripted")),
            Box::new(MockLabeler::new()),
        );
        assert!(matches!(result, Err(SousChefError::Io(_))));
    }

    #[test]
    fn test_empty_audio_completes_with_zero_instructions() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("empty.wav");
        write_wav(&audio, 0);

        let (stage_tx, stage_rx) = bounded(16);
        let config = PipelineConfig {
            stage_tx: Some(stage_tx),
            ..Default::default()
        };

        let pipeline = RecipePipeline::new(config);
        let instructions = pipeline
            .run(
                &audio,
                Box::new(ScriptedEngine::new("scripted")),
                Box::new(MockLabeler::new()),
            )
            .unwrap();

        assert!(instructions.is_empty());
        let seen = stages(&stage_rx);
        assert_eq!(seen.last(), Some(&PipelineStage::Done));
    }

    #[test]
    fn test_pre_cancelled_run_resolves_to_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("speech.wav");
        write_wav(&audio, 1);

        let (stage_tx, stage_rx) = bounded(16);
        let pipeline = RecipePipeline::new(PipelineConfig {
            stage_tx: Some(stage_tx),
            ..Default::default()
        });
        pipeline.cancel_handle().cancel();

        let result = pipeline.run(
            &audio,
            Box::new(
                ScriptedEngine::new("scripted")
                    .with_script(vec![vec!["never emitted".to_string()]]),
            ),
            Box::new(MockLabeler::new()),
        );

        assert!(matches!(result, Err(SousChefError::Cancelled)));
        let seen = stages(&stage_rx);
        assert!(matches!(seen.last(), Some(PipelineStage::Error(_))));
    }

    #[test]
    fn test_garbage_audio_is_error_stage() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("garbage.bin");
        let mut f = std::fs::File::create(&audio).unwrap();
        f.write_all(b"not an audio container").unwrap();

        let (stage_tx, stage_rx) = bounded(16);
        let pipeline = RecipePipeline::new(PipelineConfig {
            stage_tx: Some(stage_tx),
            ..Default::default()
        });

        let result = pipeline.run(
            &audio,
            Box::new(ScriptedEngine::new("scripted")),
            Box::new(MockLabeler::new()),
        );
        assert!(result.is_err());
        assert!(matches!(
            stages(&stage_rx).last(),
            Some(PipelineStage::Error(_))
        ));
    }
}
