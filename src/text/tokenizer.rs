// Tokenizers — the swap-ready boundary between raw turn text and tokens.
//
// The scoring pipeline treats tokens as opaque strings: it filters them
// against the stop list and looks them up in the embedding vocabulary,
// nothing more. Which strings come out of a turn is this module's business,
// selected by the `tokenizer` setting.

use regex::Regex;

use crate::config::TokenizerBackend;

/// Converts raw text into an ordered sequence of tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Build the configured tokenizer backend.
pub fn create_tokenizer(backend: TokenizerBackend) -> Box<dyn Tokenizer> {
    match backend {
        TokenizerBackend::Word => Box::new(WordTokenizer::default()),
        TokenizerBackend::Whitespace => Box::new(WhitespaceTokenizer),
    }
}

/// Unicode-aware word tokenizer (default backend).
///
/// Lowercases the text, then emits three kinds of tokens: letter runs with
/// internal apostrophes kept ("don't" stays whole), digit runs with internal
/// `.`/`,` kept ("3.5" and "1,000" stay whole), and runs of anything else
/// that isn't whitespace — so "..." reaches the stop list as "..." rather
/// than three dots. Embedding vocabularies are lowercase, which is why the
/// lowercasing is unconditional.
pub struct WordTokenizer {
    pattern: Regex,
}

impl Default for WordTokenizer {
    fn default() -> Self {
        let pattern = Regex::new(
            r"\p{L}+(?:['\u{2019}]\p{L}+)*|\p{N}+(?:[.,]\p{N}+)*|[^\p{L}\p{N}\s]+",
        )
        .expect("Invalid tokenizer regex");
        WordTokenizer { pattern }
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Whitespace tokenizer for transcripts that arrive pre-tokenized (one
/// token per whitespace-separated field). Still lowercases, so lookups stay
/// consistent with the default backend.
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(|t| t.to_lowercase()).collect()
    }
}
