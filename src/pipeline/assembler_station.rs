//! Sentence assembler wrapped as the single consumer of the fragment channel.
//!
//! The assembler's buffer-splitting logic is stateful and order-dependent, so
//! exactly one station thread owns it and fragments are processed strictly in
//! arrival order.

use crate::pipeline::error::StationError;
use crate::pipeline::station::Station;
use crate::pipeline::types::FragmentEvent;
use crate::text::{SentenceAssembler, SentenceChunk};
use crossbeam_channel::Sender;

/// Station turning [`FragmentEvent`]s into ordered [`SentenceChunk`]s.
pub struct AssemblerStation {
    assembler: SentenceAssembler,
    /// One-shot completion signal, fired on end-of-audio.
    completion_tx: Option<Sender<()>>,
    aborted: bool,
}

impl AssemblerStation {
    pub fn new() -> Self {
        Self {
            assembler: SentenceAssembler::new(),
            completion_tx: None,
            aborted: false,
        }
    }

    /// Channel signalled once when the full flush has run.
    pub fn with_completion(mut self, tx: Sender<()>) -> Self {
        self.completion_tx = Some(tx);
        self
    }

    fn signal_completion(&mut self) {
        if let Some(tx) = self.completion_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Default for AssemblerStation {
    fn default() -> Self {
        Self::new()
    }
}

impl Station for AssemblerStation {
    type Input = FragmentEvent;
    type Output = SentenceChunk;

    fn process(&mut self, input: FragmentEvent) -> Result<Vec<SentenceChunk>, StationError> {
        if self.aborted {
            return Ok(Vec::new());
        }
        match input {
            FragmentEvent::Text(raw) => {
                let emitted = self.assembler.push_fragment(&raw);
                if self.assembler.is_completed() {
                    self.signal_completion();
                }
                Ok(emitted)
            }
            FragmentEvent::ChunkBoundary => Ok(self.assembler.flush_partial().into_iter().collect()),
            FragmentEvent::EndOfAudio => {
                let emitted = self.assembler.flush_final().into_iter().collect();
                self.signal_completion();
                Ok(emitted)
            }
            FragmentEvent::Abort => {
                self.assembler.discard();
                self.aborted = true;
                Ok(Vec::new())
            }
        }
    }

    fn name(&self) -> &'static str {
        "Assembler"
    }
}
