//! Default configuration constants for souschef.
//!
//! This module provides shared constants used across different configuration
//! types to ensure consistency and eliminate duplication.

/// Canonical audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and provides a good balance
/// between quality and computational efficiency for voice applications.
/// All decoded audio is normalized to this rate before transcription.
pub const SAMPLE_RATE: u32 = 16000;

/// Canonical channel count after normalization.
pub const CHANNELS: u16 = 1;

/// Transcription window length in seconds.
///
/// Audio is fed to the transcription engine in fixed windows of this length.
/// The final window is zero-padded up to the full size.
pub const CHUNK_SECONDS: u32 = 30;

/// Samples per transcription window at the canonical rate.
pub const CHUNK_SAMPLES: usize = (SAMPLE_RATE * CHUNK_SECONDS) as usize;

/// Maximum subword sequence length fed to the label models.
///
/// Must match the max_length the models were trained with.
pub const MAX_SEQ_LEN: usize = 128;

/// Ignore sentinel for the stage-2 auxiliary label channel.
///
/// Part of the model contract shared with the training pipeline: boundary and
/// pad positions, and positions with no corresponding word, carry this value.
pub const AUX_IGNORE_ID: i64 = -100;

/// Begin-of-sequence token.
pub const CLS_TOKEN: &str = "[CLS]";

/// End-of-sequence token.
pub const SEP_TOKEN: &str = "[SEP]";

/// Padding token.
pub const PAD_TOKEN: &str = "[PAD]";

/// Unknown-word token.
pub const UNK_TOKEN: &str = "[UNK]";

/// Prefix marking non-initial subword pieces.
pub const CONTINUATION_PREFIX: &str = "##";

/// Lookahead window for BIO tag-sequence recovery.
///
/// An `I-X` tag is dropped when a `B-X` of the same type appears within this
/// many following positions.
pub const BIO_LOOKAHEAD: usize = 2;

/// Maximum token count for the cross-sentence step-merge heuristic.
///
/// A Step clause at most this long, carrying no ingredient-tagged token, is
/// considered a transcription fragment of the preceding Step.
pub const MERGE_MAX_TOKENS: usize = 4;

/// Entity tag substring that blocks the small-fragment step merge.
pub const INGREDIENT_TAG: &str = "INGREDIENT";

/// Default buffer size for the raw-fragment channel.
pub const FRAGMENT_BUFFER: usize = 128;

/// Default buffer size for the assembled-sentence channel.
pub const SENTENCE_BUFFER: usize = 64;

/// Default language code for transcription.
pub const DEFAULT_LANGUAGE: &str = "en";
