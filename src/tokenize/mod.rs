//! Subword tokenization for the label models.

pub mod basic;
pub mod encoder;
pub mod vocab;
pub mod wordpiece;

pub use basic::BasicTokenizer;
pub use encoder::{SubwordEncoder, TokenizedSequence};
pub use vocab::{TokenizerOptions, Vocabulary};
pub use wordpiece::WordPieceTokenizer;
