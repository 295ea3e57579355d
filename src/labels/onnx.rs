//! Sequence-labeling inference via the `ort` ONNX runtime.
//!
//! Two sessions: stage 1 consumes `input_ids` + `attention_mask`
//! (`int64[1,T]`) and stage 2 additionally `aux_ids` (the stage-1 word
//! labels mapped to ids, with an ignore sentinel at special/pad positions).
//! Both emit a `[1,T,labels]` score tensor.

use crate::config::ModelConfig;
use crate::error::{Result, SousChefError};
use crate::labels::align;
use crate::labels::runner::SentenceLabeler;
use crate::labels::vocab::LabelVocabulary;
use crate::tokenize::{SubwordEncoder, TokenizerOptions, Vocabulary};
use ort::session::Session;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::value::TensorRef;
use std::path::Path;
use tracing::{debug, info};

fn session_error(e: impl std::fmt::Display) -> SousChefError {
    SousChefError::LabelSession {
        message: e.to_string(),
    }
}

fn create_session(model_path: &Path) -> Result<Session> {
    if !model_path.exists() {
        return Err(SousChefError::ModelNotFound {
            path: model_path.to_string_lossy().to_string(),
        });
    }

    let intra_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .clamp(1, 8);

    SessionBuilder::new()
        .map_err(session_error)?
        .with_intra_threads(intra_threads)
        .map_err(session_error)?
        .with_optimization_level(GraphOptimizationLevel::All)
        .map_err(session_error)?
        .commit_from_file(model_path)
        .map_err(session_error)
}

fn first_output_name(session: &Session) -> Result<String> {
    session
        .outputs()
        .first()
        .map(|o| o.name().to_string())
        .ok_or_else(|| SousChefError::LabelSession {
            message: "model has no outputs".to_string(),
        })
}

/// The two chained labeling sessions plus their shared encoder.
///
/// This handle models expensive global state: construct it once per pipeline
/// run and drop it when the run finishes — dropping releases both sessions.
pub struct OnnxLabelModels {
    stage_one: Session,
    stage_two: Session,
    stage_one_output: String,
    stage_two_output: String,
    encoder: SubwordEncoder,
    entity_vocab: LabelVocabulary,
    group_vocab: LabelVocabulary,
}

impl OnnxLabelModels {
    /// Load both sessions, the subword vocabulary and the tokenizer options.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let vocab = Vocabulary::from_file(&config.vocab)?;
        vocab.validate_specials()?;
        let options = TokenizerOptions::load_or_default(&config.tokenizer_config);
        let encoder = SubwordEncoder::new(vocab, options, config.max_seq_len)?;

        info!(model = %config.stage_one.display(), "loading stage-1 labeling session");
        let stage_one = create_session(&config.stage_one)?;
        info!(model = %config.stage_two.display(), "loading stage-2 labeling session");
        let stage_two = create_session(&config.stage_two)?;

        let stage_one_output = first_output_name(&stage_one)?;
        let stage_two_output = first_output_name(&stage_two)?;

        Ok(Self {
            stage_one,
            stage_two,
            stage_one_output,
            stage_two_output,
            encoder,
            entity_vocab: LabelVocabulary::recipe_entities(),
            group_vocab: LabelVocabulary::clause_groups(),
        })
    }

    /// Token-level entity labels, one per word (first-subword selection).
    fn predict_entities(&mut self, words: &[String]) -> Result<Vec<String>> {
        if words.is_empty() {
            return Ok(Vec::new());
        }
        let seq = self.encoder.encode_words(words);
        let t = seq.input_ids.len() as i64;

        let outputs = self
            .stage_one
            .run(ort::inputs![
                "input_ids" => TensorRef::from_array_view(([1_i64, t], seq.input_ids.as_slice()))
                    .map_err(session_error)?,
                "attention_mask" => TensorRef::from_array_view(([1_i64, t], seq.attention_mask.as_slice()))
                    .map_err(session_error)?,
            ])
            .map_err(session_error)?;

        let (shape, scores) = outputs[self.stage_one_output.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(session_error)?;
        let label_count = score_dimension(&shape, scores.len(), t as usize)?;
        self.entity_vocab.check_dimension(label_count)?;

        let labels = align::first_subword_labels(scores, label_count, &seq.word_ids);
        Ok(labels
            .into_iter()
            .map(|id| self.entity_vocab.label_of(id).to_string())
            .collect())
    }

    /// Word-level clause group labels via elementwise-max pooling.
    fn predict_groups(&mut self, words: &[String], entity_labels: &[String]) -> Result<Vec<String>> {
        if words.is_empty() {
            return Ok(Vec::new());
        }
        let seq = self.encoder.encode_words(words);
        let t = seq.input_ids.len() as i64;

        let aux = align::aux_label_ids(
            &seq.input_ids,
            &seq.word_ids,
            entity_labels,
            &self.entity_vocab,
            self.encoder.cls_id(),
            self.encoder.sep_id(),
            self.encoder.pad_id(),
        );

        let outputs = self
            .stage_two
            .run(ort::inputs![
                "input_ids" => TensorRef::from_array_view(([1_i64, t], seq.input_ids.as_slice()))
                    .map_err(session_error)?,
                "attention_mask" => TensorRef::from_array_view(([1_i64, t], seq.attention_mask.as_slice()))
                    .map_err(session_error)?,
                "aux_ids" => TensorRef::from_array_view(([1_i64, t], aux.as_slice()))
                    .map_err(session_error)?,
            ])
            .map_err(session_error)?;

        let (shape, scores) = outputs[self.stage_two_output.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(session_error)?;
        let label_count = score_dimension(&shape, scores.len(), t as usize)?;
        self.group_vocab.check_dimension(label_count)?;

        let pooled = align::max_pool_word_scores(scores, label_count, &seq.word_ids, words.len());
        Ok(pooled
            .iter()
            .map(|row| self.group_vocab.label_of(align::pooled_word_label(row)).to_string())
            .collect())
    }
}

/// Label dimension of a `[1,T,labels]` tensor, with a data-length fallback.
fn score_dimension(shape: &[i64], data_len: usize, seq_len: usize) -> Result<usize> {
    if shape.len() >= 3 && shape[2] > 0 {
        return Ok(shape[2] as usize);
    }
    if seq_len > 0 && data_len % seq_len == 0 {
        return Ok(data_len / seq_len);
    }
    Err(SousChefError::LabelSession {
        message: format!("unexpected score tensor shape {:?}", shape),
    })
}

impl SentenceLabeler for OnnxLabelModels {
    fn split_words(&self, sentence: &str) -> Vec<String> {
        self.encoder.split_words(sentence)
    }

    fn entity_pass(&mut self, words: &[String]) -> Result<Vec<String>> {
        self.predict_entities(words)
    }

    fn grouping_pass(&mut self, words: &[String], entity_labels: &[String]) -> Result<Vec<String>> {
        self.predict_groups(words, entity_labels)
    }
}

impl Drop for OnnxLabelModels {
    fn drop(&mut self) {
        debug!("releasing label model sessions");
    }
}
