// Typed errors for model loading and the analyzer lifecycle.
//
// Scoring itself never produces errors — a speaker with no recognized
// vocabulary degrades to an empty similarity field instead of failing the
// group. Everything that can genuinely go wrong happens before the first
// group is processed: bad configuration, a malformed model file, or a model
// too large for the machine.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LssError {
    /// A model file line that cannot be parsed. Fatal: initialization aborts
    /// and no partial model is left behind.
    #[error("model file line {line}: {reason}")]
    ModelFormat { line: u64, reason: String },

    /// Allocation failure while sizing the vector storage. Reported with
    /// guidance instead of aborting the process: embedding models are often
    /// chosen larger than the machine they end up on.
    #[error(
        "not enough memory for the embedding model ({rows} rows x {dimension} dimensions); \
         try a model with a smaller vocabulary or fewer vector dimensions"
    )]
    ModelTooLarge { rows: usize, dimension: usize },

    /// No model file configured. Checked before any processing begins.
    #[error("no embedding model configured: {0}")]
    ConfigurationIncomplete(String),

    /// An encoding name that is not in the supported set.
    #[error("unsupported encoding {0:?} (supported: utf-8, latin-1)")]
    UnsupportedEncoding(String),

    /// `process` called before `initialize` succeeded.
    #[error("analyzer not initialized; call initialize() before process()")]
    NotInitialized,

    #[error(transparent)]
    Io(#[from] io::Error),
}
