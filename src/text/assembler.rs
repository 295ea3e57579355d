//! Incremental assembly of raw transcription fragments into sentences.
//!
//! Fragments arrive with embedded timestamp and stream markers. The assembler
//! strips them, accumulates text in a buffer, and emits a sentence whenever
//! terminal punctuation followed by whitespace appears. Sentences carry a
//! monotonically increasing index and are never revised after emission.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Bracketed start/end range, e.g. `[00:00:00.000 --> 00:00:03.200]`.
/// Treated as a hard sentence boundary.
#[allow(clippy::expect_used)]
static RANGE_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\d{2}:\d{2}:\d{2}\.\d{3}\s*-->\s*\d{2}:\d{2}:\d{2}\.\d{3}\]")
        .expect("valid timestamp pattern")
});

/// Single offset marker, e.g. `<|0.00|>` or `<|23.56|>`. Soft boundary.
#[allow(clippy::expect_used)]
static OFFSET_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\|\d+\.\d+\|>").expect("valid offset pattern"));

#[allow(clippy::expect_used)]
static INIT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[INIT\]\s*").expect("valid init pattern"));

const START_MARKER: &str = "<|startoftranscript|>";
const END_MARKER: &str = "<|endoftext|>";

/// One complete, cleaned sentence with its emission index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceChunk {
    pub index: usize,
    pub text: String,
}

/// State machine turning raw fragments into complete sentences.
#[derive(Debug, Default)]
pub struct SentenceAssembler {
    buffer: String,
    counter: usize,
    completed: bool,
}

impl SentenceAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one raw fragment, returning any sentences completed by it.
    ///
    /// An end-of-text marker in the fragment forces a full flush after the
    /// normal boundary scan.
    pub fn push_fragment(&mut self, raw: &str) -> Vec<SentenceChunk> {
        let has_end_marker = raw.contains(END_MARKER);

        // Strip all markers before anything else touches the buffer.
        let cleaned = RANGE_TIMESTAMP.replace_all(raw, ". ");
        let cleaned = OFFSET_TIMESTAMP.replace_all(&cleaned, " ");
        let cleaned = INIT_MARKER.replace_all(&cleaned, " ");
        let cleaned = cleaned
            .replace(START_MARKER, " ")
            .replace(END_MARKER, ". ");
        let cleaned = cleaned.trim();

        if cleaned.is_empty() {
            return Vec::new();
        }
        debug!(fragment = cleaned, "assembler input");

        if !self.buffer.is_empty() {
            self.buffer.push(' ');
        }
        self.buffer.push_str(cleaned);

        let mut emitted = self.emit_complete_sentences();

        if has_end_marker && let Some(last) = self.flush_final() {
            emitted.push(last);
        }
        emitted
    }

    /// Split the buffer at whitespace following terminal punctuation; emit
    /// everything but the trailing (incomplete) segment.
    fn emit_complete_sentences(&mut self) -> Vec<SentenceChunk> {
        let text = self.buffer.trim().to_string();
        if text.is_empty() {
            return Vec::new();
        }

        let parts = split_on_terminals(&text);
        let mut emitted = Vec::new();
        for part in &parts[..parts.len() - 1] {
            if let Some(sentence) = clean_sentence(part) {
                emitted.push(self.emit(sentence));
            }
        }

        self.buffer.clear();
        if let Some(last) = parts.last() {
            self.buffer.push_str(last);
        }
        emitted
    }

    /// Emit whatever is buffered at a transcription-chunk boundary.
    ///
    /// Does not signal completion; assembly continues with the next chunk.
    pub fn flush_partial(&mut self) -> Option<SentenceChunk> {
        let sentence = clean_sentence(&self.buffer);
        self.buffer.clear();
        sentence.map(|s| self.emit(s))
    }

    /// Emit the buffered remainder at end-of-audio and latch completion.
    pub fn flush_final(&mut self) -> Option<SentenceChunk> {
        let sentence = clean_sentence(&self.buffer);
        self.buffer.clear();
        self.completed = true;
        sentence.map(|s| self.emit(s))
    }

    /// Drop buffered text without emitting it (cancellation path).
    pub fn discard(&mut self) {
        self.buffer.clear();
    }

    /// One-shot completion signal, set by [`flush_final`].
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    fn emit(&mut self, text: String) -> SentenceChunk {
        let chunk = SentenceChunk {
            index: self.counter,
            text,
        };
        self.counter += 1;
        chunk
    }
}

/// Split on whitespace that immediately follows `.`, `!` or `?`.
///
/// Always returns at least one segment; the final segment is the incomplete
/// remainder (possibly empty).
fn split_on_terminals(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') && chars.peek().is_some_and(|c| c.is_whitespace()) {
            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }
            parts.push(std::mem::take(&mut current));
        }
    }
    parts.push(current);
    parts
}

/// Final cleanup of a single sentence: re-strip residual markers, collapse
/// whitespace, drop spaces left in front of punctuation, ensure terminal
/// punctuation, capitalize the first letter.
///
/// Segments with no alphanumeric content (marker residue) clean to nothing.
fn clean_sentence(raw: &str) -> Option<String> {
    let text = RANGE_TIMESTAMP.replace_all(raw, " ");
    let text = OFFSET_TIMESTAMP.replace_all(&text, " ");
    let text = INIT_MARKER.replace_all(&text, " ");

    let mut t = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !t.is_empty() && !word.chars().all(|c| matches!(c, '.' | ',' | '!' | '?' | ';' | ':')) {
            t.push(' ');
        }
        t.push_str(word);
    }

    if !t.chars().any(|c| c.is_alphanumeric()) {
        return None;
    }

    if !t.ends_with('.') && !t.ends_with('!') && !t.ends_with('?') {
        t.push('.');
    }

    Some(capitalize_first(&t))
}

fn capitalize_first(t: &str) -> String {
    let mut chars = t.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => {
            first.to_uppercase().collect::<String>() + chars.as_str()
        }
        _ => t.to_string(),
    }
}
