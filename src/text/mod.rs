// Text handling — tokenization backends and the fixed stop filter.

pub mod stoplist;
pub mod tokenizer;
