// Colored terminal output for pair-score tables.

use colored::Colorize;

use crate::pipeline::GroupResult;

use super::truncate_chars;

/// Display one group's pair rows as an aligned table.
pub fn display_group(result: &GroupResult) {
    println!("\n{}", format!("=== Group {} ===", result.group_id).bold());

    if result.rows.is_empty() {
        println!(
            "  {}",
            "Fewer than two speakers; nothing to score.".dimmed()
        );
        return;
    }

    println!(
        "  {:<22} {:<22} {:>10} {:>10} {:>10}",
        "P1".dimmed(),
        "P2".dimmed(),
        "P1 words".dimmed(),
        "P2 words".dimmed(),
        "LSS".dimmed(),
    );
    println!("  {}", "-".repeat(78).dimmed());

    for row in &result.rows {
        let score = match row.score {
            Some(s) => format!("{s:.4}").normal(),
            None => "-".dimmed(),
        };
        println!(
            "  {:<22} {:<22} {:>10} {:>10} {:>10}",
            truncate_chars(&row.speaker_one, 19),
            truncate_chars(&row.speaker_two, 19),
            row.captured_one,
            row.captured_two,
            score,
        );
    }
}

/// Display the session summary after all groups are scored.
pub fn display_summary(results: &[GroupResult]) {
    let pair_count: usize = results.iter().map(|r| r.rows.len()).sum();
    let unscoreable = results
        .iter()
        .flat_map(|r| r.rows.iter())
        .filter(|row| row.score.is_none())
        .count();

    println!("\n{}", "Scoring complete.".bold());
    println!("  Groups scored: {}", results.len());
    println!("  Speaker pairs: {pair_count}");
    if unscoreable > 0 {
        println!(
            "  {} {} pairs had a speaker with no captured words",
            "~".yellow(),
            unscoreable
        );
    }
}
