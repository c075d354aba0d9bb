// Configuration — environment variables, settings files, and the resolved
// model spec handed to the loader.
//
// Three layers feed the same `Settings` record: environment variables (via
// dotenvy at startup), an optional JSON settings file, and CLI flags applied
// on top by main. Whatever is still undeclared after that (vocabulary size,
// vector dimension) is filled in by probing the model file's first line.
// The loader itself never sees this mutable layering — it receives a
// `ModelSpec`, resolved once and immutable.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::LssError;

/// Which tokenizer backend turns raw turn text into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerBackend {
    /// Unicode-aware word/number/punctuation splitting (default).
    Word,
    /// Plain whitespace splitting — for transcripts that arrive pre-tokenized.
    Whitespace,
}

impl FromStr for TokenizerBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word" => Ok(TokenizerBackend::Word),
            "whitespace" => Ok(TokenizerBackend::Whitespace),
            other => Err(format!(
                "unknown tokenizer backend {other:?} (supported: word, whitespace)"
            )),
        }
    }
}

/// Text encoding of the model file. Embedding models predate UTF-8 being a
/// safe assumption, so Latin-1 is still seen in the wild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

impl TextEncoding {
    /// Canonical name, used for display and settings serialization.
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// Decode one raw line. Returns None when the bytes are not valid for
    /// this encoding (only possible for UTF-8; every byte is a Latin-1 char).
    pub fn decode(&self, raw: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(raw.to_vec()).ok(),
            TextEncoding::Latin1 => Some(raw.iter().map(|&b| b as char).collect()),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = LssError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" | "ascii" => Ok(TextEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            other => Err(LssError::UnsupportedEncoding(other.to_string())),
        }
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = LssError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TextEncoding> for String {
    fn from(e: TextEncoding) -> Self {
        e.name().to_string()
    }
}

/// Declared vocabulary size of the model file: a known row count (header
/// present) or unknown (headerless file, discovered by a counting pass).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabSize {
    Unknown,
    #[serde(untagged)]
    Known(usize),
}

impl FromStr for VocabSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("unknown") {
            return Ok(VocabSize::Unknown);
        }
        s.parse::<usize>()
            .map(VocabSize::Known)
            .map_err(|_| {
                format!("vocabulary size must be a non-negative integer or \"unknown\", got {s:?}")
            })
    }
}

impl std::fmt::Display for VocabSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VocabSize::Known(n) => write!(f, "{n}"),
            VocabSize::Unknown => write!(f, "unknown"),
        }
    }
}

/// Persistent configuration record. Round-trips through a JSON settings file
/// and is what `configure()` hands to the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Path to the embedding model file (word + N floats per line).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
    pub encoding: TextEncoding,
    /// Declared vocabulary size; None means "probe the file header".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocab_size: Option<VocabSize>,
    /// Declared vector dimension; None means "probe the file header".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_dim: Option<usize>,
    pub tokenizer: TokenizerBackend,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            model_path: None,
            encoding: TextEncoding::Utf8,
            vocab_size: None,
            vector_dim: None,
            tokenizer: TokenizerBackend::Word,
        }
    }
}

impl Settings {
    /// Load settings from environment variables (`LSS_MODEL_PATH`,
    /// `LSS_ENCODING`, `LSS_VOCAB_SIZE`, `LSS_VECTOR_DIM`, `LSS_TOKENIZER`).
    /// Unset variables fall back to defaults; set-but-invalid values error.
    pub fn from_env() -> Result<Self> {
        let mut settings = Settings::default();

        if let Ok(path) = env::var("LSS_MODEL_PATH") {
            if !path.is_empty() {
                settings.model_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(name) = env::var("LSS_ENCODING") {
            settings.encoding = name.parse().context("LSS_ENCODING")?;
        }
        if let Ok(raw) = env::var("LSS_VOCAB_SIZE") {
            settings.vocab_size = Some(
                raw.parse()
                    .map_err(anyhow::Error::msg)
                    .context("LSS_VOCAB_SIZE")?,
            );
        }
        if let Ok(raw) = env::var("LSS_VECTOR_DIM") {
            let dim: usize = raw.parse().with_context(|| {
                format!("LSS_VECTOR_DIM must be a positive integer, got {raw:?}")
            })?;
            if dim == 0 {
                anyhow::bail!("LSS_VECTOR_DIM must be at least 1");
            }
            settings.vector_dim = Some(dim);
        }
        if let Ok(raw) = env::var("LSS_TOKENIZER") {
            settings.tokenizer = raw
                .parse()
                .map_err(anyhow::Error::msg)
                .context("LSS_TOKENIZER")?;
        }

        Ok(settings)
    }

    /// Read settings from a JSON file (the counterpart of `save`).
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    /// Persist settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write settings file {}", path.display()))
    }

    /// Check that a model path is configured.
    /// Call this before any operation that needs the embedding model.
    pub fn require_model(&self) -> Result<&Path, LssError> {
        self.model_path.as_deref().ok_or_else(|| {
            LssError::ConfigurationIncomplete(
                "set LSS_MODEL_PATH in your .env file, pass --model <path>, \
                 or load a settings file with --settings"
                    .to_string(),
            )
        })
    }

    /// Resolve the immutable spec the loader consumes. Vocabulary size and
    /// vector dimension not declared here are read from the file header via
    /// `model::probe`; declared values always win over probed ones.
    pub fn resolve_model(&self) -> Result<ModelSpec, LssError> {
        let path = self.require_model()?.to_path_buf();

        let (vocab, dimension) = match (self.vocab_size, self.vector_dim) {
            (Some(vocab), Some(dimension)) => (vocab, dimension),
            _ => {
                let shape = crate::model::probe(&path, self.encoding)?;
                (
                    self.vocab_size.unwrap_or(shape.vocab),
                    self.vector_dim.unwrap_or(shape.dimension),
                )
            }
        };

        Ok(ModelSpec {
            path,
            encoding: self.encoding,
            vocab,
            dimension,
        })
    }
}

/// Fully resolved loader input: no options left, nothing to probe.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub path: PathBuf,
    pub encoding: TextEncoding,
    pub vocab: VocabSize,
    pub dimension: usize,
}
