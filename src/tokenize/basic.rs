//! Whitespace/punctuation-level text normalization ahead of subword matching.

use crate::tokenize::vocab::TokenizerOptions;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Punctuation that is removed or isolated depending on configuration.
const SPLIT_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '(', ')'];
/// Additional characters isolated (never removed) in isolation mode.
const ISOLATE_ONLY: &[char] = &['"', '\''];

/// Rule-based word tokenizer.
///
/// Normalizes curly quotes and newlines, removes or isolates punctuation,
/// splits on whitespace, and applies lowercasing/diacritic stripping to every
/// token except those in the never-split set, which pass through untouched.
#[derive(Debug, Clone)]
pub struct BasicTokenizer {
    options: TokenizerOptions,
}

impl BasicTokenizer {
    pub fn new(options: TokenizerOptions) -> Self {
        Self { options }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned = clean(text);

        let spaced = if self.options.strip_punctuation {
            remove_punctuation(&cleaned)
        } else {
            isolate_punctuation(&cleaned)
        };

        spaced
            .split_whitespace()
            .map(|token| {
                if self.options.never_split.contains(token) {
                    return token.to_string();
                }
                let mut current = token.to_string();
                if self.options.do_lower_case {
                    current = current.to_lowercase();
                }
                if self.options.strip_accents {
                    current = strip_accents(&current);
                }
                current
            })
            .collect()
    }
}

/// Collapse newlines to spaces and normalize curly quotes to straight quotes.
fn clean(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' => ' ',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

fn remove_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| if SPLIT_PUNCTUATION.contains(&c) { ' ' } else { c })
        .collect()
}

fn isolate_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if SPLIT_PUNCTUATION.contains(&c) || ISOLATE_ONLY.contains(&c) {
            out.push(' ');
            out.push(c);
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out
}

/// Unicode canonical decomposition followed by combining-mark removal.
fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}
