// CSV export of the pair-score table, one file per session.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::pipeline::GroupResult;

use super::{row_fields, OUTPUT_HEADER};

/// Escape one CSV field. Fields containing a comma, a double quote, or a line
/// break are quoted, with embedded quotes doubled; everything else passes
/// through unchanged.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write every group's pair rows to `path`.
///
/// The first column carries the group id so rows from different groups stay
/// distinguishable in a single file; the remaining columns follow
/// [`OUTPUT_HEADER`].
pub fn write_results(path: &Path, results: &[GroupResult]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "Group,{}", OUTPUT_HEADER.join(","))?;

    let mut rows_written = 0usize;
    for result in results {
        for row in &result.rows {
            let fields = row_fields(row);
            let rendered: Vec<String> = fields.iter().map(|f| escape(f)).collect();
            writeln!(writer, "{},{}", escape(&result.group_id), rendered.join(","))?;
            rows_written += 1;
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    info!(
        path = %path.display(),
        rows = rows_written,
        "Wrote pair-score table"
    );
    Ok(())
}
