//! Clause arena and instruction records.

use serde::Serialize;

/// Semantic role of a clause span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClauseKind {
    Prep,
    Step,
    Condition,
    Purpose,
    Correction,
    Tip,
    Serving,
    Meta,
    /// Tokens outside any labeled span.
    Other,
}

impl ClauseKind {
    /// Kind for a BIO tag type name (the part after `B-`/`I-`).
    ///
    /// Unknown type names decode as [`ClauseKind::Other`] rather than
    /// failing; malformed model output is recovered, not surfaced.
    pub fn from_tag_type(name: &str) -> ClauseKind {
        match name {
            "PREP" => ClauseKind::Prep,
            "STEP" => ClauseKind::Step,
            "CONDITION" => ClauseKind::Condition,
            "PURPOSE" => ClauseKind::Purpose,
            "CORRECTION" => ClauseKind::Correction,
            "TIP" => ClauseKind::Tip,
            "SERVING" => ClauseKind::Serving,
            "META" => ClauseKind::Meta,
            _ => ClauseKind::Other,
        }
    }

    /// Kinds that attach to a Step instead of standing alone.
    pub fn is_attachable(self) -> bool {
        matches!(
            self,
            ClauseKind::Condition | ClauseKind::Purpose | ClauseKind::Correction
        )
    }
}

/// Temporal relation of an attached clause to its Step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Relation {
    Before,
    After,
}

/// A contiguous labeled span of words from one (or, after merging, several)
/// sentences.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub kind: ClauseKind,
    pub tokens: Vec<String>,
    /// Stage-1 entity labels, parallel to `tokens`.
    pub entity_labels: Vec<String>,
    /// Sentence the clause starts in; drives merge and attachment decisions.
    pub sentence_index: usize,
    /// Every sentence that contributed tokens (grows when steps merge).
    pub source_sentences: Vec<usize>,
    /// Set during attachment for attachable kinds.
    pub relation: Option<Relation>,
}

impl Clause {
    pub fn new(
        kind: ClauseKind,
        tokens: Vec<String>,
        entity_labels: Vec<String>,
        sentence_index: usize,
    ) -> Self {
        Self {
            kind,
            tokens,
            entity_labels,
            sentence_index,
            source_sentences: vec![sentence_index],
            relation: None,
        }
    }

    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Attachment indexes owned by a Step clause.
///
/// Indexes point into the clause arena; attached clauses never own
/// attachments of their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attachments {
    pub conditions: Vec<usize>,
    pub purposes: Vec<usize>,
    pub corrections: Vec<usize>,
}

/// Flattened, human-readable view of a Step and its attachments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instruction {
    pub step_text: String,
    pub pre_conditions: Vec<String>,
    pub post_conditions: Vec<String>,
    pub purposes: Vec<String>,
    pub corrections: Vec<String>,
    /// Reserved for future step chaining; always empty today.
    pub followup_step: Option<String>,
    pub followup_pre_conditions: Vec<String>,
    pub followup_post_conditions: Vec<String>,
    /// Sentences this instruction was derived from.
    pub sentence_indexes: Vec<usize>,
}
