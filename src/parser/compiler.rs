//! Clause compilation: BIO decode with recovery, punctuation absorption,
//! step merging, attachment, and linearization into instructions.
//!
//! Each sentence's token stream is scanned once left to right with a bounded
//! lookahead; there is no backtracking across sentences.

use crate::config::ParserConfig;
use crate::defaults;
use crate::parser::clause::{Attachments, Clause, ClauseKind, Instruction, Relation};
use crate::pipeline::types::LabeledSentence;
use tracing::{debug, warn};

/// Tunable thresholds for the compiler.
///
/// The merge heuristics were inherited as-is from the trained system; they
/// are surfaced here instead of hard-coded.
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// How far ahead an `I-X` looks for a `B-X` before being dropped.
    pub lookahead: usize,
    /// Token ceiling for the cross-sentence step-merge heuristic.
    pub merge_max_tokens: usize,
    /// Entity tag substring that blocks the small-fragment merge.
    pub ingredient_tag: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            lookahead: defaults::BIO_LOOKAHEAD,
            merge_max_tokens: defaults::MERGE_MAX_TOKENS,
            ingredient_tag: defaults::INGREDIENT_TAG.to_string(),
        }
    }
}

impl From<&ParserConfig> for CompilerOptions {
    fn from(config: &ParserConfig) -> Self {
        Self {
            lookahead: config.lookahead,
            merge_max_tokens: config.merge_max_tokens,
            ingredient_tag: config.ingredient_tag.clone(),
        }
    }
}

/// Compile labeled sentences into ordered instructions.
pub fn compile(results: &[LabeledSentence], options: &CompilerOptions) -> Vec<Instruction> {
    let clauses = clauses_from_sentences(results, options);
    let merged = merge_adjacent_steps(clauses, options);
    let (attached, attachments) = attach_clauses(merged);
    build_instructions(&attached, &attachments)
}

/// Decode and absorb every sentence, in ascending sentence order.
pub fn clauses_from_sentences(
    results: &[LabeledSentence],
    options: &CompilerOptions,
) -> Vec<Clause> {
    let mut ordered: Vec<&LabeledSentence> = results.iter().collect();
    ordered.sort_by_key(|r| r.sentence_index);

    let mut clauses = Vec::new();
    for result in ordered {
        if result.words.len() != result.group_labels.len()
            || result.words.len() != result.entity_labels.len()
        {
            // Inference failed for this sentence; its words cannot be
            // aligned to labels.
            warn!(
                sentence = result.sentence_index,
                words = result.words.len(),
                entity_labels = result.entity_labels.len(),
                group_labels = result.group_labels.len(),
                "skipping sentence with mismatched label lengths"
            );
            continue;
        }
        let decoded = decode_bio(
            &result.words,
            &result.group_labels,
            &result.entity_labels,
            result.sentence_index,
            options.lookahead,
        );
        clauses.extend(absorb_punctuation(decoded));
    }
    clauses
}

/// BIO tag decoding with lookahead recovery.
///
/// - `O` flushes the open clause and emits a singleton Other clause.
/// - `I-X` with a `B-X` of the same type within the lookahead window is
///   dropped (it belongs to the upcoming clause).
/// - `I-X` with no open clause is promoted to start one.
/// - `B-X` always flushes and opens.
/// - `I-X` against an open clause of a different type flushes and opens.
pub fn decode_bio(
    tokens: &[String],
    group_labels: &[String],
    entity_labels: &[String],
    sentence_index: usize,
    lookahead: usize,
) -> Vec<Clause> {
    let mut clauses: Vec<Clause> = Vec::new();
    let mut open_kind: Option<ClauseKind> = None;
    let mut open_tokens: Vec<String> = Vec::new();
    let mut open_entities: Vec<String> = Vec::new();

    macro_rules! flush {
        () => {
            if let Some(kind) = open_kind.take() {
                if !open_tokens.is_empty() {
                    clauses.push(Clause::new(
                        kind,
                        std::mem::take(&mut open_tokens),
                        std::mem::take(&mut open_entities),
                        sentence_index,
                    ));
                } else {
                    open_tokens.clear();
                    open_entities.clear();
                }
            }
        };
    }

    for i in 0..tokens.len() {
        let tag = group_labels[i].as_str();

        if tag == "O" {
            flush!();
            clauses.push(Clause::new(
                ClauseKind::Other,
                vec![tokens[i].clone()],
                vec![entity_labels[i].clone()],
                sentence_index,
            ));
            continue;
        }

        let is_begin = tag.starts_with("B-");
        let is_inside = tag.starts_with("I-");
        if !is_begin && !is_inside {
            debug!(tag, position = i, "dropping malformed tag");
            continue;
        }
        let type_name = &tag[2..];
        let kind = ClauseKind::from_tag_type(type_name);

        if is_inside {
            // Tie-break for ambiguous boundaries: a B of the same type just
            // ahead claims this token.
            let begin_tag = format!("B-{}", type_name);
            let upcoming_begin = (1..=lookahead)
                .any(|k| group_labels.get(i + k).map(String::as_str) == Some(begin_tag.as_str()));
            if upcoming_begin {
                debug!(tag, position = i, "dropping inside tag before upcoming begin");
                continue;
            }

            if open_kind.is_none() {
                debug!(tag, position = i, "promoting inside tag to clause start");
                open_kind = Some(kind);
                open_tokens.push(tokens[i].clone());
                open_entities.push(entity_labels[i].clone());
                continue;
            }
        }

        if is_begin {
            flush!();
            open_kind = Some(kind);
            open_tokens.push(tokens[i].clone());
            open_entities.push(entity_labels[i].clone());
        } else if open_kind == Some(kind) {
            open_tokens.push(tokens[i].clone());
            open_entities.push(entity_labels[i].clone());
        } else {
            // Invalid tag transition; recover by starting a fresh clause.
            flush!();
            open_kind = Some(kind);
            open_tokens.push(tokens[i].clone());
            open_entities.push(entity_labels[i].clone());
        }
    }

    flush!();
    clauses
}

/// Absorb single-token punctuation Other clauses into the preceding clause.
pub fn absorb_punctuation(input: Vec<Clause>) -> Vec<Clause> {
    let mut out: Vec<Clause> = Vec::new();
    for clause in input {
        if clause.kind == ClauseKind::Other
            && clause.tokens.len() == 1
            && matches!(clause.tokens[0].as_str(), "," | "." | "!" | "?")
            && let Some(prev) = out.last_mut()
        {
            prev.tokens.extend(clause.tokens);
            prev.entity_labels.extend(clause.entity_labels);
            continue;
        }
        out.push(clause);
    }
    out
}

fn should_merge_steps(a: &Clause, b: &Clause, options: &CompilerOptions) -> bool {
    if a.kind != ClauseKind::Step || b.kind != ClauseKind::Step {
        return false;
    }
    // Same sentence: always one step.
    if a.sentence_index == b.sentence_index {
        return true;
    }
    // Small fragment with no ingredient mention: presumed continuation of
    // the previous step split across transcription chunks.
    let small = b.tokens.len() <= options.merge_max_tokens;
    let has_ingredient = b
        .entity_labels
        .iter()
        .any(|l| l.contains(&options.ingredient_tag));
    small && !has_ingredient
}

/// Merge runs of adjacent Step clauses.
///
/// Only list-adjacent steps merge; any intervening clause breaks the run.
pub fn merge_adjacent_steps(clauses: Vec<Clause>, options: &CompilerOptions) -> Vec<Clause> {
    let mut out: Vec<Clause> = Vec::new();
    let mut buffer: Option<Clause> = None;

    for clause in clauses {
        match buffer.take() {
            None => buffer = Some(clause),
            Some(mut held) => {
                if should_merge_steps(&held, &clause, options) {
                    held.tokens.extend(clause.tokens);
                    held.entity_labels.extend(clause.entity_labels);
                    for s in clause.source_sentences {
                        if !held.source_sentences.contains(&s) {
                            held.source_sentences.push(s);
                        }
                    }
                    buffer = Some(held);
                } else {
                    out.push(held);
                    buffer = Some(clause);
                }
            }
        }
    }

    if let Some(held) = buffer {
        out.push(held);
    }
    out
}

/// Attach Condition/Purpose/Correction clauses to their Step.
///
/// Target selection: the next Step in the same sentence, else the nearest
/// preceding Step, else the first Step overall. Relation is `Before` iff the
/// clause shares the target's sentence and precedes it in clause order.
pub fn attach_clauses(mut clauses: Vec<Clause>) -> (Vec<Clause>, Vec<Attachments>) {
    let mut attachments = vec![Attachments::default(); clauses.len()];

    let steps: Vec<usize> = clauses
        .iter()
        .enumerate()
        .filter(|(_, c)| c.kind == ClauseKind::Step)
        .map(|(i, _)| i)
        .collect();
    if steps.is_empty() {
        return (clauses, attachments);
    }

    for i in 0..clauses.len() {
        if !clauses[i].kind.is_attachable() {
            continue;
        }
        let sentence = clauses[i].sentence_index;

        let target = steps
            .iter()
            .copied()
            .find(|&s| s > i && clauses[s].sentence_index == sentence)
            .or_else(|| steps.iter().copied().filter(|&s| s < i).next_back())
            .unwrap_or(steps[0]);

        let relation = if sentence == clauses[target].sentence_index && i < target {
            Relation::Before
        } else {
            Relation::After
        };
        clauses[i].relation = Some(relation);

        match clauses[i].kind {
            ClauseKind::Condition => attachments[target].conditions.push(i),
            ClauseKind::Purpose => attachments[target].purposes.push(i),
            ClauseKind::Correction => attachments[target].corrections.push(i),
            _ => {}
        }
    }

    (clauses, attachments)
}

/// Linearize every Step clause into an [`Instruction`].
pub fn build_instructions(clauses: &[Clause], attachments: &[Attachments]) -> Vec<Instruction> {
    let mut out = Vec::new();

    for (i, clause) in clauses.iter().enumerate() {
        if clause.kind != ClauseKind::Step {
            continue;
        }
        let att = &attachments[i];

        let condition_texts = |relation: Relation| -> Vec<String> {
            att.conditions
                .iter()
                .filter(|&&c| clauses[c].relation == Some(relation))
                .map(|&c| clauses[c].text())
                .collect()
        };

        out.push(Instruction {
            step_text: clause.text(),
            pre_conditions: condition_texts(Relation::Before),
            post_conditions: condition_texts(Relation::After),
            purposes: att.purposes.iter().map(|&c| clauses[c].text()).collect(),
            corrections: att.corrections.iter().map(|&c| clauses[c].text()).collect(),
            followup_step: None,
            followup_pre_conditions: Vec::new(),
            followup_post_conditions: Vec::new(),
            sentence_indexes: clause.source_sentences.clone(),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sentence(
        index: usize,
        words: &[&str],
        entities: &[&str],
        groups: &[&str],
    ) -> LabeledSentence {
        LabeledSentence {
            words: strings(words),
            entity_labels: strings(entities),
            group_labels: strings(groups),
            sentence_index: index,
        }
    }

    fn decode(words: &[&str], groups: &[&str]) -> Vec<Clause> {
        let entities: Vec<&str> = words.iter().map(|_| "O").collect();
        decode_bio(
            &strings(words),
            &strings(groups),
            &strings(&entities),
            0,
            defaults::BIO_LOOKAHEAD,
        )
    }

    #[test]
    fn test_decode_simple_step() {
        let clauses = decode(&["chop", "the", "onions"], &["B-STEP", "I-STEP", "I-STEP"]);
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].kind, ClauseKind::Step);
        assert_eq!(clauses[0].text(), "chop the onions");
    }

    #[test]
    fn test_decode_outside_emits_singleton() {
        let clauses = decode(&["chop", "now", "please"], &["B-STEP", "O", "B-STEP"]);
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[1].kind, ClauseKind::Other);
        assert_eq!(clauses[1].tokens, vec!["now"]);
    }

    #[test]
    fn test_decode_inside_before_begin_is_dropped() {
        // I-STEP with B-STEP within the lookahead window is absorbed into
        // the upcoming clause, not promoted.
        let clauses = decode(&["tail", "start", "more"], &["I-STEP", "B-STEP", "I-STEP"]);
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].text(), "start more");
    }

    #[test]
    fn test_decode_lookahead_window_is_bounded() {
        // The B-STEP is three positions away — beyond the window of 2 — so
        // the leading I-STEP is promoted instead of dropped.
        let clauses = decode(
            &["a", "b", "c", "d"],
            &["I-STEP", "O", "O", "B-STEP"],
        );
        assert_eq!(clauses[0].kind, ClauseKind::Step);
        assert_eq!(clauses[0].tokens, vec!["a"]);
    }

    #[test]
    fn test_decode_orphan_inside_is_promoted() {
        let clauses = decode(&["if", "salty"], &["I-CONDITION", "I-CONDITION"]);
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].kind, ClauseKind::Condition);
        assert_eq!(clauses[0].text(), "if salty");
    }

    #[test]
    fn test_decode_mismatched_inside_recovers() {
        let clauses = decode(
            &["stir", "until", "thick"],
            &["B-STEP", "I-STEP", "I-CONDITION"],
        );
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].kind, ClauseKind::Step);
        assert_eq!(clauses[0].text(), "stir until");
        assert_eq!(clauses[1].kind, ClauseKind::Condition);
        assert_eq!(clauses[1].text(), "thick");
    }

    #[test]
    fn test_decode_begin_flushes_open_clause() {
        let clauses = decode(
            &["boil", "water", "add", "salt"],
            &["B-STEP", "I-STEP", "B-STEP", "I-STEP"],
        );
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].text(), "boil water");
        assert_eq!(clauses[1].text(), "add salt");
    }

    #[test]
    fn test_decode_malformed_tag_is_dropped() {
        let clauses = decode(&["x", "y"], &["STEP", "B-STEP"]);
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].tokens, vec!["y"]);
    }

    #[test]
    fn test_decode_unknown_type_becomes_other_clause() {
        let clauses = decode(&["um"], &["B-GIBBERISH"]);
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].kind, ClauseKind::Other);
    }

    #[test]
    fn test_absorb_punctuation() {
        let input = vec![
            Clause::new(
                ClauseKind::Step,
                strings(&["chop", "onions"]),
                strings(&["O", "B-INGREDIENT"]),
                0,
            ),
            Clause::new(ClauseKind::Other, strings(&["."]), strings(&["O"]), 0),
        ];
        let out = absorb_punctuation(input);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tokens, vec!["chop", "onions", "."]);
        assert_eq!(out[0].entity_labels, vec!["O", "B-INGREDIENT", "O"]);
    }

    #[test]
    fn test_absorb_skips_word_other_clauses() {
        let input = vec![
            Clause::new(ClauseKind::Step, strings(&["stir"]), strings(&["O"]), 0),
            Clause::new(ClauseKind::Other, strings(&["maybe"]), strings(&["O"]), 0),
        ];
        let out = absorb_punctuation(input);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_absorb_leading_punctuation_stays() {
        let input = vec![Clause::new(
            ClauseKind::Other,
            strings(&["."]),
            strings(&["O"]),
            0,
        )];
        let out = absorb_punctuation(input);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_merge_same_sentence_steps() {
        let clauses = vec![
            Clause::new(ClauseKind::Step, strings(&["boil", "water"]), strings(&["O", "B-INGREDIENT"]), 0),
            Clause::new(ClauseKind::Step, strings(&["add", "salt"]), strings(&["O", "B-INGREDIENT"]), 0),
        ];
        let merged = merge_adjacent_steps(clauses, &CompilerOptions::default());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text(), "boil water add salt");
    }

    #[test]
    fn test_merge_cross_sentence_small_fragment() {
        let clauses = vec![
            Clause::new(ClauseKind::Step, strings(&["keep", "stirring", "the", "pot"]), strings(&["O"; 4]), 0),
            Clause::new(ClauseKind::Step, strings(&["for", "two", "minutes"]), strings(&["O", "B-QUANTITY", "B-TIMEUNIT"]), 1),
        ];
        let merged = merge_adjacent_steps(clauses, &CompilerOptions::default());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].sentence_index, 0);
        assert_eq!(merged[0].source_sentences, vec![0, 1]);
    }

    #[test]
    fn test_no_merge_when_fragment_has_ingredient() {
        let clauses = vec![
            Clause::new(ClauseKind::Step, strings(&["boil", "water"]), strings(&["O", "O"]), 0),
            Clause::new(ClauseKind::Step, strings(&["add", "salt"]), strings(&["O", "B-INGREDIENT"]), 1),
        ];
        let merged = merge_adjacent_steps(clauses, &CompilerOptions::default());
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_no_merge_when_fragment_too_long() {
        let clauses = vec![
            Clause::new(ClauseKind::Step, strings(&["boil", "water"]), strings(&["O", "O"]), 0),
            Clause::new(
                ClauseKind::Step,
                strings(&["then", "keep", "it", "warm", "briefly"]),
                strings(&["O"; 5]),
                1,
            ),
        ];
        let merged = merge_adjacent_steps(clauses, &CompilerOptions::default());
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_intervening_clause_blocks_merge() {
        let clauses = vec![
            Clause::new(ClauseKind::Step, strings(&["boil", "water"]), strings(&["O", "O"]), 0),
            Clause::new(ClauseKind::Condition, strings(&["if", "cold"]), strings(&["O", "O"]), 0),
            Clause::new(ClauseKind::Step, strings(&["add", "rice"]), strings(&["O", "O"]), 0),
        ];
        let merged = merge_adjacent_steps(clauses, &CompilerOptions::default());
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_attach_prefers_following_step_in_same_sentence() {
        let clauses = vec![
            Clause::new(ClauseKind::Condition, strings(&["if", "salty"]), strings(&["O", "O"]), 0),
            Clause::new(ClauseKind::Step, strings(&["add", "water"]), strings(&["O", "O"]), 0),
        ];
        let (attached, attachments) = attach_clauses(clauses);
        assert_eq!(attachments[1].conditions, vec![0]);
        assert_eq!(attached[0].relation, Some(Relation::Before));
    }

    #[test]
    fn test_attach_falls_back_to_preceding_step() {
        let clauses = vec![
            Clause::new(ClauseKind::Step, strings(&["bake", "it"]), strings(&["O", "O"]), 0),
            Clause::new(ClauseKind::Condition, strings(&["until", "golden"]), strings(&["O", "O"]), 1),
        ];
        let (attached, attachments) = attach_clauses(clauses);
        assert_eq!(attachments[0].conditions, vec![1]);
        assert_eq!(attached[1].relation, Some(Relation::After));
    }

    #[test]
    fn test_attach_falls_back_to_first_step_overall() {
        // Clause precedes every Step and shares no sentence with one.
        let clauses = vec![
            Clause::new(ClauseKind::Purpose, strings(&["for", "flavor"]), strings(&["O", "O"]), 0),
            Clause::new(ClauseKind::Step, strings(&["season", "it"]), strings(&["O", "O"]), 1),
        ];
        let (attached, attachments) = attach_clauses(clauses);
        assert_eq!(attachments[1].purposes, vec![0]);
        // Different sentence → After even though it precedes the step.
        assert_eq!(attached[0].relation, Some(Relation::After));
    }

    #[test]
    fn test_attach_without_steps_is_noop() {
        let clauses = vec![Clause::new(
            ClauseKind::Condition,
            strings(&["if", "needed"]),
            strings(&["O", "O"]),
            0,
        )];
        let (attached, attachments) = attach_clauses(clauses);
        assert_eq!(attached[0].relation, None);
        assert!(attachments[0].conditions.is_empty());
    }

    #[test]
    fn test_build_instructions_partitions_conditions() {
        let mut clauses = vec![
            Clause::new(ClauseKind::Condition, strings(&["if", "salty"]), strings(&["O", "O"]), 0),
            Clause::new(ClauseKind::Step, strings(&["add", "water"]), strings(&["O", "O"]), 0),
            Clause::new(ClauseKind::Condition, strings(&["until", "thin"]), strings(&["O", "O"]), 1),
            Clause::new(ClauseKind::Purpose, strings(&["to", "balance"]), strings(&["O", "O"]), 1),
        ];
        clauses[0].relation = Some(Relation::Before);
        clauses[2].relation = Some(Relation::After);
        let mut attachments = vec![Attachments::default(); clauses.len()];
        attachments[1].conditions = vec![0, 2];
        attachments[1].purposes = vec![3];

        let instructions = build_instructions(&clauses, &attachments);
        assert_eq!(instructions.len(), 1);
        let instruction = &instructions[0];
        assert_eq!(instruction.step_text, "add water");
        assert_eq!(instruction.pre_conditions, vec!["if salty"]);
        assert_eq!(instruction.post_conditions, vec!["until thin"]);
        assert_eq!(instruction.purposes, vec!["to balance"]);
        assert!(instruction.corrections.is_empty());
        assert!(instruction.followup_step.is_none());
    }

    #[test]
    fn test_compile_sorts_out_of_order_sentences() {
        let results = vec![
            sentence(1, &["add", "salt"], &["O", "B-INGREDIENT"], &["B-STEP", "I-STEP"]),
            sentence(0, &["boil", "water"], &["O", "B-INGREDIENT"], &["B-STEP", "I-STEP"]),
        ];
        let instructions = compile(&results, &CompilerOptions::default());
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].step_text, "boil water");
        assert_eq!(instructions[1].step_text, "add salt");
    }

    #[test]
    fn test_compile_skips_sentences_with_missing_labels() {
        let results = vec![
            sentence(0, &["boil", "water"], &["O", "O"], &["B-STEP", "I-STEP"]),
            LabeledSentence {
                words: strings(&["lost", "sentence"]),
                entity_labels: Vec::new(),
                group_labels: Vec::new(),
                sentence_index: 1,
            },
        ];
        let instructions = compile(&results, &CompilerOptions::default());
        assert_eq!(instructions.len(), 1);
    }

    #[test]
    fn test_compile_end_to_end_scenario() {
        // "First chop the onions." / "If it's too salty add water."
        let results = vec![
            sentence(
                0,
                &["first", "chop", "the", "onions", "."],
                &["O", "B-ACTION", "O", "B-INGREDIENT", "O"],
                &["B-STEP", "I-STEP", "I-STEP", "I-STEP", "O"],
            ),
            sentence(
                1,
                &["if", "it's", "too", "salty", "add", "water", "."],
                &["O", "O", "O", "B-DESCRIPTOR", "B-ACTION", "B-INGREDIENT", "O"],
                &[
                    "B-CONDITION",
                    "I-CONDITION",
                    "I-CONDITION",
                    "I-CONDITION",
                    "B-STEP",
                    "I-STEP",
                    "O",
                ],
            ),
        ];

        let instructions = compile(&results, &CompilerOptions::default());

        // The Condition clause sits between the two Step clauses, so they
        // are not adjacent and do not merge: one instruction per step.
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].step_text, "first chop the onions .");
        assert!(instructions[0].pre_conditions.is_empty());

        // The condition precedes the following step of its own sentence.
        assert_eq!(instructions[1].step_text, "add water .");
        assert_eq!(instructions[1].pre_conditions, vec!["if it's too salty"]);
        assert!(instructions[1].post_conditions.is_empty());
        assert_eq!(instructions[1].sentence_indexes, vec![1]);
    }

    #[test]
    fn test_compile_cross_sentence_fragment_merges_into_step() {
        let results = vec![
            sentence(
                0,
                &["knead", "the", "dough"],
                &["B-ACTION", "O", "B-INGREDIENT"],
                &["B-STEP", "I-STEP", "I-STEP"],
            ),
            sentence(
                1,
                &["ten", "minutes"],
                &["B-QUANTITY", "B-TIMEUNIT"],
                &["B-STEP", "I-STEP"],
            ),
        ];
        let instructions = compile(&results, &CompilerOptions::default());
        assert_eq!(instructions.len(), 1);
        assert_eq!(instructions[0].step_text, "knead the dough ten minutes");
        assert_eq!(instructions[0].sentence_indexes, vec![0, 1]);
    }
}
