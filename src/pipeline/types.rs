//! Data types flowing between pipeline stages.

use serde::Serialize;
use std::fmt;

/// Events delivered to the sentence assembler, in strict arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentEvent {
    /// A raw transcription fragment, possibly with embedded markers.
    Text(String),
    /// A transcription-chunk boundary: flush the buffer without completing.
    ChunkBoundary,
    /// End of audio: flush and raise the completion signal.
    EndOfAudio,
    /// Cancellation: discard buffered text without emitting it.
    Abort,
}

/// One sentence with its per-word labels from both model stages.
///
/// Produced once per assembled sentence and immutable thereafter; the sole
/// input to clause construction. Empty label vectors mark a sentence whose
/// inference failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledSentence {
    pub words: Vec<String>,
    /// Stage-1 entity labels, one per word.
    pub entity_labels: Vec<String>,
    /// Stage-2 clause group labels, one per word.
    pub group_labels: Vec<String>,
    pub sentence_index: usize,
}

/// Pipeline lifecycle, surfaced to external observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Transcribing,
    EntityLabeling,
    GroupLabeling,
    Parsing,
    Done,
    Error(String),
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Idle => write!(f, "idle"),
            PipelineStage::Transcribing => write!(f, "transcribing"),
            PipelineStage::EntityLabeling => write!(f, "entity labeling"),
            PipelineStage::GroupLabeling => write!(f, "group labeling"),
            PipelineStage::Parsing => write!(f, "parsing"),
            PipelineStage::Done => write!(f, "done"),
            PipelineStage::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}
