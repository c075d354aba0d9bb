// Pairwise similarity — one row per unordered speaker pair.
//
// Pair order is part of the output contract: outer index ascending, inner
// index ascending over the group's speaker list, so a 3-speaker group
// [P1, P2, P3] always emits (P1,P2), (P1,P3), (P2,P3).

use super::speaker::SpeakerMeanVector;

/// One output row: a speaker pair, both captured-word counts, and the
/// similarity — None when the pair is unscoreable.
#[derive(Debug, Clone, PartialEq)]
pub struct PairScoreRow {
    pub speaker_one: String,
    pub speaker_two: String,
    pub captured_one: usize,
    pub captured_two: usize,
    pub score: Option<f64>,
}

/// Cosine similarity with f64 accumulation, clamped to [-1, 1] against
/// floating-point drift. None when either vector has zero norm — no usable
/// signal, which is not the same thing as orthogonality.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Option<f64> {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = norm_a * norm_b;
    if denom == 0.0 {
        return None;
    }
    Some((dot / denom).clamp(-1.0, 1.0))
}

/// Score every unordered pair of a group's speakers. A pair where either
/// side captured zero words gets an empty score rather than 0.0 or an
/// error; the counts still report what each side contributed.
pub fn score_group(speakers: &[SpeakerMeanVector]) -> Vec<PairScoreRow> {
    let n = speakers.len();
    let mut rows = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for i in 0..n {
        for j in (i + 1)..n {
            let one = &speakers[i];
            let two = &speakers[j];
            let score = if one.captured_words > 0 && two.captured_words > 0 {
                cosine_similarity(&one.mean, &two.mean)
            } else {
                None
            };
            rows.push(PairScoreRow {
                speaker_one: one.speaker_id.clone(),
                speaker_two: two.speaker_id.clone(),
                captured_one: one.captured_words,
                captured_two: two.captured_words,
                score,
            });
        }
    }

    rows
}
