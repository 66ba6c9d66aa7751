// Sentiment scoring — trait-based abstraction for swappable backends.
//
// SentimentScorer is the only thing the pipelines depend on. LexiconScorer
// implements it with a word lexicon that ships inside the binary.

pub mod lexicon;
pub mod scorer;
pub mod traits;
