// LSS: Latent semantic similarity scoring for small-group dialogue
//
// This is the library root. Each module corresponds to a stage of the
// scoring pipeline: configuration, model loading, text preparation,
// per-speaker vectors, pairwise scoring, and output.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod group;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod text;
