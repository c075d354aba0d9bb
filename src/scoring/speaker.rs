// Per-speaker mean vectors — tokenize, stop-filter, accumulate, average.
//
// A speaker's turns are concatenated with line breaks (order preserved)
// before tokenization, so the tokenizer sees one text block per speaker.
// Tokens the model doesn't know are simply not counted; the captured-word
// count reports how much of the speaker's text actually backed the vector.

use tracing::debug;

use crate::group::Speaker;
use crate::model::EmbeddingModel;
use crate::text::stoplist::StopList;
use crate::text::tokenizer::Tokenizer;

/// A speaker's aggregate position in embedding space, plus how many tokens
/// the model recognized. Zero captured words leaves the zero vector.
#[derive(Debug, Clone)]
pub struct SpeakerMeanVector {
    pub speaker_id: String,
    pub mean: Vec<f64>,
    pub captured_words: usize,
}

/// Build one speaker's mean vector. Summation runs in token order; the
/// division happens once at the end.
pub fn build_mean_vector(
    speaker: &Speaker,
    tokenizer: &dyn Tokenizer,
    stoplist: &StopList,
    model: &EmbeddingModel,
) -> SpeakerMeanVector {
    let text = speaker.turns.join("\n");
    let tokens = tokenizer.tokenize(&text);

    let mut sum = vec![0.0_f64; model.dimension()];
    let mut captured = 0usize;

    for token in &tokens {
        if stoplist.contains(token) {
            continue;
        }
        if let Some(vector) = model.vector(token) {
            for (acc, &component) in sum.iter_mut().zip(vector) {
                *acc += component;
            }
            captured += 1;
        }
    }

    if captured > 0 {
        let n = captured as f64;
        for component in &mut sum {
            *component /= n;
        }
    }

    debug!(
        speaker = %speaker.id,
        tokens = tokens.len(),
        captured,
        "Built speaker mean vector"
    );

    SpeakerMeanVector {
        speaker_id: speaker.id.clone(),
        mean: sum,
        captured_words: captured,
    }
}
