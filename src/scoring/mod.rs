// Scoring — per-speaker mean vectors and pairwise similarity rows.

pub mod pairwise;
pub mod speaker;
