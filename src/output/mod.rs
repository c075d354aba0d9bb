// Output formatting — terminal tables and the CSV pair-score table.

pub mod csv;
pub mod terminal;

use crate::scoring::pairwise::PairScoreRow;

/// Column headers of the pair-score table, in output order.
pub const OUTPUT_HEADER: [&str; 5] = ["P1", "P2", "P1_WordsCaptured", "P2_WordsCaptured", "LSS"];

/// Render one row's fields in header order. The similarity is the shortest
/// round-trip decimal; an unscoreable pair renders as an empty field, never
/// as 0 or NaN.
pub fn row_fields(row: &PairScoreRow) -> [String; 5] {
    [
        row.speaker_one.clone(),
        row.speaker_two.clone(),
        row.captured_one.to_string(),
        row.captured_two.to_string(),
        row.score.map(|s| s.to_string()).unwrap_or_default(),
    ]
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..20]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like accented letters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
