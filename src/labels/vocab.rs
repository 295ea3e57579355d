//! Ordered BIO label sets shared with the training artifacts.

use crate::error::{Result, SousChefError};
use std::collections::HashMap;

/// Bidirectional id ↔ BIO tag mapping for one model stage.
///
/// The ordering is part of the model contract: ids must match the label
/// order the model was trained with. A disagreement between the model's
/// output dimension and this vocabulary is a configuration error.
#[derive(Debug, Clone)]
pub struct LabelVocabulary {
    labels: Vec<String>,
    index: HashMap<String, i64>,
}

impl LabelVocabulary {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i as i64))
            .collect();
        Self { labels, index }
    }

    /// Token-level recipe entity labels (stage 1).
    pub fn recipe_entities() -> Self {
        Self::new([
            "O",
            "B-INGREDIENT", "I-INGREDIENT",
            "B-DESCRIPTOR", "I-DESCRIPTOR",
            "B-ACTION", "I-ACTION",
            "B-UNIT", "I-UNIT",
            "B-TIMEUNIT", "I-TIMEUNIT",
            "B-QUANTITY", "I-QUANTITY",
            "B-TOOL", "I-TOOL",
            "B-CONNECTOR", "I-CONNECTOR",
            "B-MODIFIER", "I-MODIFIER",
            "B-FILLER", "I-FILLER",
        ])
    }

    /// Word-level clause grouping labels (stage 2).
    pub fn clause_groups() -> Self {
        Self::new([
            "O",
            "B-STEP", "I-STEP",
            "B-CONDITION", "I-CONDITION",
            "B-PURPOSE", "I-PURPOSE",
            "B-CORRECTION", "I-CORRECTION",
            "B-PREP", "I-PREP",
        ])
    }

    pub fn id_of(&self, label: &str) -> Option<i64> {
        self.index.get(label).copied()
    }

    /// Tag string for a label index; out-of-range ids fall back to `O`.
    pub fn label_of(&self, id: usize) -> &str {
        self.labels.get(id).map(String::as_str).unwrap_or("O")
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Check a model's score dimension against this vocabulary.
    pub fn check_dimension(&self, model_labels: usize) -> Result<()> {
        if model_labels != self.labels.len() {
            return Err(SousChefError::LabelVocabMismatch {
                model: model_labels,
                vocabulary: self.labels.len(),
            });
        }
        Ok(())
    }
}
