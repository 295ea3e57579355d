//! Audio decoding and normalization to canonical PCM.

pub mod decoder;
pub mod normalize;

pub use decoder::decode_to_pcm;
pub use normalize::{PcmBuffer, downmix_to_mono, float_to_pcm16, resample};
