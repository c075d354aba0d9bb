// Stop tokens — the fixed literal set excluded from vector averaging.
//
// Punctuation, quotation marks, bracket characters, and low-semantic-value
// numbers (0–20 and a handful of round figures up to 1,000,000). The set is
// a verbatim literal, not a generated stop-word list: similarity scores are
// only comparable across runs and datasets if this filter never changes.
// Its quirks are part of the contract — single `«` is stopped while single
// `»` is not, and curly quotes appear both singly and doubled.

use std::collections::HashSet;

/// Every token dropped before vector averaging.
pub const STOP_TOKENS: [&str; 84] = [
    "`", "~", "!", "@", "#", "$", "%", "^", "&", "*", "(", ")", "_", "+", "-", "–", "=", "[", "]",
    "\\", ";", "'", ",", ".", "/", "{", "}", "|", ":", "\"", "<", ">", "?", "..", "...", "«", "««",
    "»»", "\u{201C}", "\u{201D}", "\u{2018}", "\u{2018}\u{2018}", "\u{2019}", "\u{2019}\u{2019}",
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "10", "11", "12", "13", "14", "15", "16",
    "17", "18", "19", "20", "25", "30", "33", "40", "50", "60", "66", "70", "75", "80", "90", "99",
    "100", "123", "1000", "10000", "12345", "100000", "1000000",
];

/// Set-backed view of `STOP_TOKENS` for O(1) membership checks.
pub struct StopList {
    tokens: HashSet<&'static str>,
}

impl Default for StopList {
    fn default() -> Self {
        StopList {
            tokens: STOP_TOKENS.iter().copied().collect(),
        }
    }
}

impl StopList {
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
