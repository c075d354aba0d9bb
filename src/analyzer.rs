// Analyzer lifecycle — configure, initialize, process, shutdown.
//
// The four hooks decouple the scoring core from whatever drives it (the
// CLI here, any batch host elsewhere): settings arrive first, initialize
// resolves them and loads the model (refusing incomplete configuration),
// process scores one group at a time against the immutable model, and
// shutdown releases the model's memory promptly — these models can be
// gigabytes, so "whenever the analyzer happens to drop" is not good enough.

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::LssError;
use crate::group::GroupData;
use crate::model::{self, EmbeddingModel};
use crate::scoring::pairwise::{score_group, PairScoreRow};
use crate::scoring::speaker::build_mean_vector;
use crate::text::stoplist::StopList;
use crate::text::tokenizer::{create_tokenizer, Tokenizer};

/// Host-facing lifecycle of a group analyzer.
pub trait GroupAnalyzer: Send + Sync {
    /// Replace the analyzer's settings. Takes effect on the next
    /// `initialize`; any loaded model is discarded.
    fn configure(&mut self, settings: Settings);

    /// Resolve the settings and load the embedding model. Fails with
    /// `ConfigurationIncomplete` before touching any file when no model
    /// path is configured.
    fn initialize(&mut self) -> Result<(), LssError>;

    /// Score one group into pair rows. Never fails on vocabulary coverage —
    /// only on being called before a successful `initialize`.
    fn process(&self, group: &GroupData) -> Result<Vec<PairScoreRow>, LssError>;

    /// Release the model.
    fn shutdown(&mut self);
}

/// The latent semantic similarity analyzer.
pub struct LssAnalyzer {
    settings: Settings,
    tokenizer: Box<dyn Tokenizer>,
    stoplist: StopList,
    model: Option<EmbeddingModel>,
}

impl LssAnalyzer {
    pub fn new(settings: Settings) -> Self {
        let tokenizer = create_tokenizer(settings.tokenizer);
        LssAnalyzer {
            settings,
            tokenizer,
            stoplist: StopList::default(),
            model: None,
        }
    }

    /// The loaded model, if `initialize` has run.
    pub fn model(&self) -> Option<&EmbeddingModel> {
        self.model.as_ref()
    }
}

impl Default for LssAnalyzer {
    fn default() -> Self {
        LssAnalyzer::new(Settings::default())
    }
}

impl GroupAnalyzer for LssAnalyzer {
    fn configure(&mut self, settings: Settings) {
        self.tokenizer = create_tokenizer(settings.tokenizer);
        self.settings = settings;
        self.model = None;
    }

    fn initialize(&mut self) -> Result<(), LssError> {
        let spec = self.settings.resolve_model()?;
        self.model = Some(model::load(&spec)?);
        Ok(())
    }

    fn process(&self, group: &GroupData) -> Result<Vec<PairScoreRow>, LssError> {
        let model = self.model.as_ref().ok_or(LssError::NotInitialized)?;

        let speaker_vectors: Vec<_> = group
            .speakers
            .iter()
            .map(|s| build_mean_vector(s, self.tokenizer.as_ref(), &self.stoplist, model))
            .collect();
        let rows = score_group(&speaker_vectors);

        debug!(
            group = %group.id,
            speakers = group.speakers.len(),
            pairs = rows.len(),
            "Scored group"
        );
        Ok(rows)
    }

    fn shutdown(&mut self) {
        if self.model.take().is_some() {
            info!("Embedding model released");
        }
    }
}
