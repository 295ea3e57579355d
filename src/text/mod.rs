//! Raw transcription text to ordered sentences.

pub mod assembler;

pub use assembler::{SentenceAssembler, SentenceChunk};
