// Model file loading — streaming text parser with two allocation
// strategies.
//
// Known vocabulary size (header present): skip the header, reserve storage
// for exactly the declared row count up front, stream the data lines once.
//
// Unknown vocabulary size (headerless): stream the whole file once just to
// count rows and claim word → row assignments, then reserve storage for the
// discovered count and stream again writing vectors into place. The second
// read is the price of never holding a growing copy and a settled copy of a
// multi-gigabyte model at the same time — peak memory, not I/O, is what
// kills these loads.
//
// All storage reservations are fallible (`try_reserve_exact`), so running
// out of memory surfaces as a ModelTooLarge error with guidance instead of
// an abort.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::{ModelSpec, TextEncoding, VocabSize};
use crate::error::LssError;

use super::{EmbeddingModel, ModelShape};

/// Byte-wise line reader that decodes each line with the configured
/// encoding and tracks 1-based line numbers for error reporting.
struct LineReader<R: BufRead> {
    reader: R,
    encoding: TextEncoding,
    buf: Vec<u8>,
    line: u64,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R, encoding: TextEncoding) -> Self {
        LineReader {
            reader,
            encoding,
            buf: Vec::new(),
            line: 0,
        }
    }

    /// Next decoded line, without its trailing newline (`\n` or `\r\n`).
    /// A UTF-8 BOM opening the file is dropped rather than left glued to
    /// the first line's first field.
    fn next_line(&mut self) -> Result<Option<(u64, String)>, LssError> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Ok(None);
        }
        self.line += 1;
        if self.line == 1 && self.buf.starts_with(b"\xEF\xBB\xBF") {
            self.buf.drain(..3);
        }
        while matches!(self.buf.last(), Some(b'\n') | Some(b'\r')) {
            self.buf.pop();
        }
        let text = self.encoding.decode(&self.buf).ok_or_else(|| LssError::ModelFormat {
            line: self.line,
            reason: format!("line is not valid {}", self.encoding.name()),
        })?;
        Ok(Some((self.line, text)))
    }
}

fn open(path: &Path, encoding: TextEncoding) -> Result<LineReader<BufReader<File>>, LssError> {
    let file = File::open(path)?;
    Ok(LineReader::new(BufReader::new(file), encoding))
}

/// Inspect the first line of a model file to determine its shape.
///
/// A line of exactly two integer fields is a `vocabSize vectorDimension`
/// header; anything else is treated as a headerless data line whose
/// dimension is its field count minus the leading word.
pub fn probe(path: &Path, encoding: TextEncoding) -> Result<ModelShape, LssError> {
    let mut lines = open(path, encoding)?;
    let Some((_, first)) = lines.next_line()? else {
        return Err(LssError::ModelFormat {
            line: 1,
            reason: "file is empty".to_string(),
        });
    };

    let fields: Vec<&str> = first.split_whitespace().collect();

    if fields.len() == 2 {
        if let (Ok(vocab), Ok(dimension)) = (fields[0].parse::<usize>(), fields[1].parse::<usize>())
        {
            if dimension == 0 {
                return Err(LssError::ModelFormat {
                    line: 1,
                    reason: "header declares a zero vector dimension".to_string(),
                });
            }
            return Ok(ModelShape {
                vocab: VocabSize::Known(vocab),
                dimension,
                has_header: true,
            });
        }
    }

    if fields.len() < 2 {
        return Err(LssError::ModelFormat {
            line: 1,
            reason: "first line has no vector components".to_string(),
        });
    }

    Ok(ModelShape {
        vocab: VocabSize::Unknown,
        dimension: fields.len() - 1,
        has_header: false,
    })
}

/// Load an embedding model per its resolved spec. Fatal on any malformed
/// line; no partial model survives an error.
pub fn load(spec: &ModelSpec) -> Result<EmbeddingModel, LssError> {
    let start = Instant::now();
    info!(
        path = %spec.path.display(),
        encoding = spec.encoding.name(),
        vocab = %spec.vocab,
        dimension = spec.dimension,
        "Loading embedding model"
    );

    let model = match spec.vocab {
        VocabSize::Known(rows) => load_known(spec, rows)?,
        VocabSize::Unknown => load_two_pass(spec)?,
    };

    info!(
        words = model.vocab_len(),
        rows = model.row_count(),
        dimension = model.dimension(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Embedding model loaded"
    );
    Ok(model)
}

/// Known-size mode: the first line is header metadata (trusted, not parsed
/// here — the probe already read it) and storage is reserved for exactly
/// `declared_rows` rows before streaming.
fn load_known(spec: &ModelSpec, declared_rows: usize) -> Result<EmbeddingModel, LssError> {
    let mut lines = open(&spec.path, spec.encoding)?;

    if lines.next_line()?.is_none() {
        return Err(LssError::ModelFormat {
            line: 1,
            reason: "file is empty".to_string(),
        });
    }

    let too_large = || LssError::ModelTooLarge {
        rows: declared_rows,
        dimension: spec.dimension,
    };
    let mut vectors: Vec<Vec<f64>> = Vec::new();
    vectors.try_reserve_exact(declared_rows).map_err(|_| too_large())?;
    let mut word_index: HashMap<String, usize> = HashMap::new();
    word_index.try_reserve(declared_rows).map_err(|_| too_large())?;

    let mut duplicates: usize = 0;
    while let Some((line, text)) = lines.next_line()? {
        let row = vectors.len();
        if row == declared_rows {
            return Err(LssError::ModelFormat {
                line,
                reason: format!(
                    "file has more data rows than the declared vocabulary size {declared_rows}"
                ),
            });
        }
        let (word, vector) = parse_row(line, &text, spec.dimension, declared_rows)?;
        if word_index.contains_key(word) {
            // Duplicate word: the row index is consumed to keep file
            // alignment, but the first occurrence stays authoritative.
            duplicates += 1;
            vectors.push(Vec::new());
        } else {
            word_index.insert(word.to_string(), row);
            vectors.push(vector);
        }
    }

    if vectors.len() < declared_rows {
        warn!(
            declared = declared_rows,
            found = vectors.len(),
            "Model file has fewer data rows than its header declares"
        );
    }
    if duplicates > 0 {
        debug!(duplicates, "Duplicate words ignored (first occurrence wins)");
    }

    Ok(EmbeddingModel {
        dimension: spec.dimension,
        vectors,
        word_index,
    })
}

/// Unknown-size mode: pass one counts rows, validates every line, and
/// claims word → row assignments; pass two reserves the discovered size and
/// writes each authoritative row's vector into place.
fn load_two_pass(spec: &ModelSpec) -> Result<EmbeddingModel, LssError> {
    let mut lines = open(&spec.path, spec.encoding)?;
    let mut word_index: HashMap<String, usize> = HashMap::new();
    let mut total_rows: usize = 0;

    while let Some((line, text)) = lines.next_line()? {
        let word = validate_row(line, &text, spec.dimension)?;
        if !word_index.contains_key(word) {
            word_index.try_reserve(1).map_err(|_| LssError::ModelTooLarge {
                rows: total_rows,
                dimension: spec.dimension,
            })?;
            word_index.insert(word.to_string(), total_rows);
        }
        total_rows += 1;
    }

    debug!(
        rows = total_rows,
        words = word_index.len(),
        "First pass complete, allocating vector storage"
    );

    let mut vectors: Vec<Vec<f64>> = Vec::new();
    vectors
        .try_reserve_exact(total_rows)
        .map_err(|_| LssError::ModelTooLarge {
            rows: total_rows,
            dimension: spec.dimension,
        })?;

    let mut lines = open(&spec.path, spec.encoding)?;
    while let Some((line, text)) = lines.next_line()? {
        let row = vectors.len();
        if row == total_rows {
            return Err(LssError::ModelFormat {
                line,
                reason: format!("file grew while loading (expected {total_rows} rows)"),
            });
        }
        let word = text.split_whitespace().next().ok_or_else(|| LssError::ModelFormat {
            line,
            reason: "empty line".to_string(),
        })?;
        if word_index.get(word) == Some(&row) {
            let (_, vector) = parse_row(line, &text, spec.dimension, total_rows)?;
            vectors.push(vector);
        } else {
            // A duplicate's authoritative entry lives at an earlier row.
            vectors.push(Vec::new());
        }
    }

    if vectors.len() != total_rows {
        return Err(LssError::ModelFormat {
            line: vectors.len() as u64 + 1,
            reason: format!(
                "file shrank while loading (expected {total_rows} rows, found {})",
                vectors.len()
            ),
        });
    }

    Ok(EmbeddingModel {
        dimension: spec.dimension,
        vectors,
        word_index,
    })
}

/// Check one data line without allocating: a word plus exactly `dimension`
/// parseable float fields. Returns the word.
fn validate_row<'a>(line: u64, text: &'a str, dimension: usize) -> Result<&'a str, LssError> {
    let mut fields = text.split_whitespace();
    let word = fields.next().ok_or_else(|| LssError::ModelFormat {
        line,
        reason: "empty line".to_string(),
    })?;

    let mut count = 0;
    for field in fields {
        count += 1;
        if count <= dimension && field.parse::<f64>().is_err() {
            return Err(LssError::ModelFormat {
                line,
                reason: format!("invalid float {field:?} in vector component {count}"),
            });
        }
    }
    if count != dimension {
        return Err(LssError::ModelFormat {
            line,
            reason: format!("expected {dimension} vector components, found {count}"),
        });
    }
    Ok(word)
}

/// Parse one data line into its word and vector. `total_rows` is only for
/// sizing the out-of-memory report.
fn parse_row<'a>(
    line: u64,
    text: &'a str,
    dimension: usize,
    total_rows: usize,
) -> Result<(&'a str, Vec<f64>), LssError> {
    let mut fields = text.split_whitespace();
    let word = fields.next().ok_or_else(|| LssError::ModelFormat {
        line,
        reason: "empty line".to_string(),
    })?;

    let mut vector: Vec<f64> = Vec::new();
    vector
        .try_reserve_exact(dimension)
        .map_err(|_| LssError::ModelTooLarge {
            rows: total_rows,
            dimension,
        })?;

    let mut extra = 0usize;
    for field in fields {
        if vector.len() == dimension {
            extra += 1;
            continue;
        }
        let value = field.parse::<f64>().map_err(|_| LssError::ModelFormat {
            line,
            reason: format!("invalid float {field:?} in vector component {}", vector.len() + 1),
        })?;
        vector.push(value);
    }
    if extra > 0 || vector.len() != dimension {
        return Err(LssError::ModelFormat {
            line,
            reason: format!(
                "expected {dimension} vector components, found {}",
                vector.len() + extra
            ),
        });
    }

    Ok((word, vector))
}
