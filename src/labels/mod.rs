//! Two-stage sequence labeling: token-level recipe entities, then
//! word-level clause grouping conditioned on the first stage.

pub mod align;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod runner;
pub mod vocab;

pub use runner::{MockLabeler, SentenceLabeler};
pub use vocab::LabelVocabulary;

#[cfg(feature = "onnx")]
pub use onnx::OnnxLabelModels;
