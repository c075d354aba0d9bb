// Unit tests for model file probing and loading.
//
// Exercises the public loader API against real temp files: header
// detection, both allocation modes (known size and two-pass), duplicate
// word handling, encoding behavior, and the format errors that abort a
// load. No model fixture here is larger than a few lines — size-dependent
// behavior (reservation, two-pass) is identical at any scale.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use lss::config::{ModelSpec, Settings, TextEncoding, VocabSize};
use lss::error::LssError;
use lss::model;

fn write_model(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

fn utf8_spec(path: &Path, vocab: VocabSize, dimension: usize) -> ModelSpec {
    ModelSpec {
        path: path.to_path_buf(),
        encoding: TextEncoding::Utf8,
        vocab,
        dimension,
    }
}

// ============================================================
// probe — header detection from the first line
// ============================================================

#[test]
fn probe_reads_two_integer_header() {
    let file = write_model(b"400000 50\nthe 0.1 0.2\n");
    let shape = model::probe(file.path(), TextEncoding::Utf8).unwrap();
    assert!(shape.has_header);
    assert_eq!(shape.vocab, VocabSize::Known(400000));
    assert_eq!(shape.dimension, 50);
}

#[test]
fn probe_headerless_infers_dimension_from_field_count() {
    let file = write_model(b"the 0.1 0.2 0.3\ncat 0.4 0.5 0.6\n");
    let shape = model::probe(file.path(), TextEncoding::Utf8).unwrap();
    assert!(!shape.has_header);
    assert_eq!(shape.vocab, VocabSize::Unknown);
    assert_eq!(shape.dimension, 3);
}

#[test]
fn probe_two_fields_not_both_integers_is_headerless() {
    // "hello 0.5" and "3.5 7" both have two fields, but neither is a
    // vocab/dimension header — they read as one-dimensional data lines.
    for content in [&b"hello 0.5\n"[..], &b"3.5 7\n"[..]] {
        let file = write_model(content);
        let shape = model::probe(file.path(), TextEncoding::Utf8).unwrap();
        assert!(!shape.has_header);
        assert_eq!(shape.dimension, 1);
    }
}

#[test]
fn probe_empty_file_errors() {
    let file = write_model(b"");
    let err = model::probe(file.path(), TextEncoding::Utf8).unwrap_err();
    assert!(matches!(err, LssError::ModelFormat { line: 1, .. }));
}

#[test]
fn probe_single_field_first_line_errors() {
    let file = write_model(b"word\n");
    assert!(model::probe(file.path(), TextEncoding::Utf8).is_err());
}

#[test]
fn probe_zero_dimension_header_errors() {
    let file = write_model(b"10 0\n");
    let err = model::probe(file.path(), TextEncoding::Utf8).unwrap_err();
    match err {
        LssError::ModelFormat { line, reason } => {
            assert_eq!(line, 1);
            assert!(reason.contains("zero vector dimension"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============================================================
// load — known vocabulary size (header file)
// ============================================================

#[test]
fn known_mode_loads_header_file() {
    let file = write_model(b"2 3\ncat 1.0 0.0 0.0\ndog 0.0 1.0 0.0\n");
    let spec = utf8_spec(file.path(), VocabSize::Known(2), 3);
    let model = model::load(&spec).unwrap();

    assert_eq!(model.dimension(), 3);
    assert_eq!(model.vocab_len(), 2);
    assert_eq!(model.vector("cat"), Some(&[1.0, 0.0, 0.0][..]));
    assert_eq!(model.vector("dog"), Some(&[0.0, 1.0, 0.0][..]));
    assert_eq!(model.vector("fox"), None);
}

#[test]
fn known_mode_duplicate_keeps_first_and_consumes_row() {
    let file = write_model(b"3 2\ncat 1.0 2.0\ncat 9.0 9.0\ndog 5.0 6.0\n");
    let spec = utf8_spec(file.path(), VocabSize::Known(3), 2);
    let model = model::load(&spec).unwrap();

    // Three rows consumed, two distinct words; dog keeps its file row.
    assert_eq!(model.row_count(), 3);
    assert_eq!(model.vocab_len(), 2);
    assert_eq!(model.vector("cat"), Some(&[1.0, 2.0][..]));
    assert_eq!(model.vector("dog"), Some(&[5.0, 6.0][..]));
}

#[test]
fn known_mode_more_rows_than_declared_errors() {
    let file = write_model(b"1 2\ncat 1.0 2.0\ndog 3.0 4.0\n");
    let spec = utf8_spec(file.path(), VocabSize::Known(1), 2);
    let err = model::load(&spec).unwrap_err();
    match err {
        LssError::ModelFormat { line, reason } => {
            assert_eq!(line, 3);
            assert!(reason.contains("more data rows"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn known_mode_fewer_rows_than_declared_still_loads() {
    let file = write_model(b"5 2\ncat 1.0 2.0\n");
    let spec = utf8_spec(file.path(), VocabSize::Known(5), 2);
    let model = model::load(&spec).unwrap();
    assert_eq!(model.vocab_len(), 1);
    assert_eq!(model.row_count(), 1);
}

#[test]
fn known_mode_always_treats_first_line_as_header() {
    // Declaring a size for a headerless file costs the first data row.
    // That is the declared-size contract: line one is metadata, trusted
    // blind.
    let file = write_model(b"cat 1.0 2.0\ndog 3.0 4.0\n");
    let spec = utf8_spec(file.path(), VocabSize::Known(1), 2);
    let model = model::load(&spec).unwrap();
    assert_eq!(model.vector("cat"), None);
    assert_eq!(model.vector("dog"), Some(&[3.0, 4.0][..]));
}

#[test]
fn malformed_float_aborts_load() {
    let file = write_model(b"1 2\ncat 1.0 banana\n");
    let spec = utf8_spec(file.path(), VocabSize::Known(1), 2);
    let err = model::load(&spec).unwrap_err();
    match err {
        LssError::ModelFormat { line, reason } => {
            assert_eq!(line, 2);
            assert!(reason.contains("banana"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn wrong_component_count_aborts_load() {
    let file = write_model(b"1 3\ncat 1.0 2.0\n");
    let spec = utf8_spec(file.path(), VocabSize::Known(1), 3);
    let err = model::load(&spec).unwrap_err();
    match err {
        LssError::ModelFormat { line: 2, reason } => {
            assert!(reason.contains("expected 3"));
            assert!(reason.contains("found 2"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn known_mode_reservation_failure_is_model_too_large() {
    // A usize::MAX reservation fails outright, so the out-of-memory path
    // runs without actually exhausting memory.
    let file = write_model(b"9 2\ncat 1.0 2.0\n");
    let spec = utf8_spec(file.path(), VocabSize::Known(usize::MAX), 2);
    let err = model::load(&spec).unwrap_err();
    match &err {
        LssError::ModelTooLarge { rows, dimension } => {
            assert_eq!(*rows, usize::MAX);
            assert_eq!(*dimension, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("smaller vocabulary"));
}

// ============================================================
// load — unknown vocabulary size (two-pass)
// ============================================================

#[test]
fn two_pass_loads_headerless_file() {
    let file = write_model(b"cat 1.0 2.0\ndog 3.0 4.0\n");
    let spec = utf8_spec(file.path(), VocabSize::Unknown, 2);
    let model = model::load(&spec).unwrap();

    assert_eq!(model.vocab_len(), 2);
    assert_eq!(model.row_count(), 2);
    assert_eq!(model.vector("cat"), Some(&[1.0, 2.0][..]));
    assert_eq!(model.vector("dog"), Some(&[3.0, 4.0][..]));
}

#[test]
fn two_pass_duplicate_first_occurrence_wins() {
    let file = write_model(b"cat 1.0 2.0\ncat 9.0 9.0\ndog 5.0 6.0\n");
    let spec = utf8_spec(file.path(), VocabSize::Unknown, 2);
    let model = model::load(&spec).unwrap();

    assert_eq!(model.row_count(), 3);
    assert_eq!(model.vocab_len(), 2);
    assert_eq!(model.vector("cat"), Some(&[1.0, 2.0][..]));
    assert_eq!(model.vector("dog"), Some(&[5.0, 6.0][..]));
}

#[test]
fn two_pass_rejects_malformed_line_in_first_pass() {
    let file = write_model(b"cat 1.0 2.0\nbad 1.0\n");
    let spec = utf8_spec(file.path(), VocabSize::Unknown, 2);
    let err = model::load(&spec).unwrap_err();
    assert!(matches!(err, LssError::ModelFormat { line: 2, .. }));
}

// ============================================================
// Encodings and line endings
// ============================================================

#[test]
fn latin1_model_decodes_where_utf8_fails() {
    // 0xE9 is é in Latin-1 but not a valid UTF-8 sequence.
    let file = write_model(b"caf\xE9 1.0 2.0\n");

    let latin1 = ModelSpec {
        encoding: TextEncoding::Latin1,
        ..utf8_spec(file.path(), VocabSize::Unknown, 2)
    };
    let model = model::load(&latin1).unwrap();
    assert_eq!(model.vector("café"), Some(&[1.0, 2.0][..]));

    let utf8 = utf8_spec(file.path(), VocabSize::Unknown, 2);
    assert!(matches!(
        model::load(&utf8),
        Err(LssError::ModelFormat { line: 1, .. })
    ));
}

#[test]
fn crlf_line_endings_load() {
    let file = write_model(b"2 2\r\ncat 1.0 2.0\r\ndog 3.0 4.0\r\n");
    let spec = utf8_spec(file.path(), VocabSize::Known(2), 2);
    let model = model::load(&spec).unwrap();
    assert_eq!(model.vocab_len(), 2);
    assert_eq!(model.vector("dog"), Some(&[3.0, 4.0][..]));
}

#[test]
fn utf8_bom_does_not_obscure_the_header() {
    // Editors that write a BOM would otherwise glue U+FEFF onto the
    // vocabulary count, turning a header file into a headerless one.
    let file = write_model(b"\xEF\xBB\xBF2 2\ncat 1.0 2.0\ndog 3.0 4.0\n");

    let shape = model::probe(file.path(), TextEncoding::Utf8).unwrap();
    assert!(shape.has_header);
    assert_eq!(shape.vocab, VocabSize::Known(2));
    assert_eq!(shape.dimension, 2);

    let model = model::load(&utf8_spec(file.path(), VocabSize::Known(2), 2)).unwrap();
    assert_eq!(model.vocab_len(), 2);
    assert_eq!(model.vector("cat"), Some(&[1.0, 2.0][..]));
}

#[test]
fn utf8_bom_does_not_prefix_the_first_word() {
    let file = write_model(b"\xEF\xBB\xBFcat 1.0 2.0\ndog 3.0 4.0\n");
    let model = model::load(&utf8_spec(file.path(), VocabSize::Unknown, 2)).unwrap();
    assert_eq!(model.vocab_len(), 2);
    assert_eq!(model.vector("cat"), Some(&[1.0, 2.0][..]));
}

// ============================================================
// Settings::resolve_model — probe integration
// ============================================================

#[test]
fn resolve_fills_shape_from_header_probe() {
    let file = write_model(b"2 2\ncat 1.0 2.0\ndog 3.0 4.0\n");
    let settings = Settings {
        model_path: Some(file.path().to_path_buf()),
        ..Settings::default()
    };

    let spec = settings.resolve_model().unwrap();
    assert_eq!(spec.vocab, VocabSize::Known(2));
    assert_eq!(spec.dimension, 2);

    let model = model::load(&spec).unwrap();
    assert_eq!(model.vocab_len(), 2);
}

#[test]
fn resolve_prefers_declared_shape_over_probe() {
    // The header claims 3 dimensions but the declared vector_dim of 2
    // wins; the undeclared vocabulary size still comes from the probe.
    let file = write_model(b"1 3\ncat 1.0 2.0\n");
    let settings = Settings {
        model_path: Some(file.path().to_path_buf()),
        vector_dim: Some(2),
        ..Settings::default()
    };

    let spec = settings.resolve_model().unwrap();
    assert_eq!(spec.vocab, VocabSize::Known(1));
    assert_eq!(spec.dimension, 2);

    let model = model::load(&spec).unwrap();
    assert_eq!(model.vector("cat"), Some(&[1.0, 2.0][..]));
}
