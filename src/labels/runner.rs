//! Per-sentence labeling passes over the assembled transcript.
//!
//! Inference failures are contained: a sentence whose model call errors gets
//! an empty label list and the batch continues.

use crate::error::Result;
use crate::pipeline::types::LabeledSentence;
use crate::text::SentenceChunk;
use std::collections::HashMap;
use tracing::warn;

/// Seam between the orchestrator and the label models.
///
/// Implementations hold the (expensive, reusable) model sessions; calls
/// against one implementation must not overlap.
pub trait SentenceLabeler: Send {
    /// Word-level split used for both passes and for the final clause tokens.
    fn split_words(&self, sentence: &str) -> Vec<String>;

    /// Stage 1: token-level entity labels, one per word.
    fn entity_pass(&mut self, words: &[String]) -> Result<Vec<String>>;

    /// Stage 2: word-level clause group labels, conditioned on stage 1.
    fn grouping_pass(&mut self, words: &[String], entity_labels: &[String])
    -> Result<Vec<String>>;
}

/// A sentence after the entity pass, before grouping.
#[derive(Debug, Clone)]
pub struct EntityLabeledSentence {
    pub sentence_index: usize,
    pub words: Vec<String>,
    pub entity_labels: Vec<String>,
}

/// Run stage 1 over every sentence.
///
/// A failed sentence keeps its words but gets an empty entity label list.
pub fn entity_pass(
    labeler: &mut dyn SentenceLabeler,
    sentences: &[SentenceChunk],
) -> Vec<EntityLabeledSentence> {
    sentences
        .iter()
        .map(|sentence| {
            let words = labeler.split_words(&sentence.text);
            let entity_labels = match labeler.entity_pass(&words) {
                Ok(labels) => labels,
                Err(e) => {
                    warn!(sentence = sentence.index, error = %e, "entity pass failed");
                    Vec::new()
                }
            };
            EntityLabeledSentence {
                sentence_index: sentence.index,
                words,
                entity_labels,
            }
        })
        .collect()
}

/// Run stage 2 over every sentence. Stage 2 of a sentence only ever runs
/// after its stage 1 completed (enforced by the input type).
pub fn grouping_pass(
    labeler: &mut dyn SentenceLabeler,
    sentences: Vec<EntityLabeledSentence>,
) -> Vec<LabeledSentence> {
    sentences
        .into_iter()
        .map(|sentence| {
            let group_labels =
                match labeler.grouping_pass(&sentence.words, &sentence.entity_labels) {
                    Ok(labels) => labels,
                    Err(e) => {
                        warn!(sentence = sentence.sentence_index, error = %e, "grouping pass failed");
                        Vec::new()
                    }
                };
            LabeledSentence {
                words: sentence.words,
                entity_labels: sentence.entity_labels,
                group_labels,
                sentence_index: sentence.sentence_index,
            }
        })
        .collect()
}

/// Canned labeler for tests: whitespace word split plus per-word label maps.
pub struct MockLabeler {
    entity_map: HashMap<String, String>,
    group_map: HashMap<String, String>,
    fail_entity_on: Option<String>,
    fail_group_on: Option<String>,
}

impl MockLabeler {
    pub fn new() -> Self {
        Self {
            entity_map: HashMap::new(),
            group_map: HashMap::new(),
            fail_entity_on: None,
            fail_group_on: None,
        }
    }

    /// Entity label for a specific (lowercased) word; others get "O".
    pub fn with_entity(mut self, word: &str, label: &str) -> Self {
        self.entity_map
            .insert(word.to_lowercase(), label.to_string());
        self
    }

    /// Group label for a specific (lowercased) word; others get "O".
    pub fn with_group(mut self, word: &str, label: &str) -> Self {
        self.group_map.insert(word.to_lowercase(), label.to_string());
        self
    }

    /// Fail the entity pass for any sentence containing this word.
    pub fn with_entity_failure_on(mut self, word: &str) -> Self {
        self.fail_entity_on = Some(word.to_lowercase());
        self
    }

    /// Fail the grouping pass for any sentence containing this word.
    pub fn with_group_failure_on(mut self, word: &str) -> Self {
        self.fail_group_on = Some(word.to_lowercase());
        self
    }

    fn lookup(map: &HashMap<String, String>, word: &str) -> String {
        map.get(word).cloned().unwrap_or_else(|| "O".to_string())
    }
}

impl Default for MockLabeler {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceLabeler for MockLabeler {
    fn split_words(&self, sentence: &str) -> Vec<String> {
        sentence
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?'))
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect()
    }

    fn entity_pass(&mut self, words: &[String]) -> Result<Vec<String>> {
        if let Some(trigger) = &self.fail_entity_on
            && words.iter().any(|w| w == trigger)
        {
            return Err(crate::error::SousChefError::LabelSession {
                message: format!("mock entity failure on '{}'", trigger),
            });
        }
        Ok(words
            .iter()
            .map(|w| Self::lookup(&self.entity_map, w))
            .collect())
    }

    fn grouping_pass(
        &mut self,
        words: &[String],
        _entity_labels: &[String],
    ) -> Result<Vec<String>> {
        if let Some(trigger) = &self.fail_group_on
            && words.iter().any(|w| w == trigger)
        {
            return Err(crate::error::SousChefError::LabelSession {
                message: format!("mock grouping failure on '{}'", trigger),
            });
        }
        Ok(words
            .iter()
            .map(|w| Self::lookup(&self.group_map, w))
            .collect())
    }
}
