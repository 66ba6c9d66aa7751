// Sentiment scorer trait — the swap-ready abstraction.
//
// Both pipelines only ever see this trait. The default implementation is the
// lexicon scorer; any other backend (a hosted API, a local model) plugs in
// here without touching the single-text or batch flows.

use anyhow::Result;
use tracing::warn;

use crate::models::SentimentScore;

/// Trait for scoring text sentiment.
///
/// Scoring is CPU-bound and synchronous; the web server moves batch work onto
/// the blocking pool instead of making the trait async.
pub trait SentimentScorer: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Score a single text. Implementations may fail; callers that must not
    /// abort go through [`score_or_neutral`].
    fn score(&self, text: &str) -> Result<SentimentScore>;
}

/// Outcome of a tolerant scoring call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub score: SentimentScore,
    /// True when the backend failed and the neutral default was substituted.
    pub degraded: bool,
}

/// Score `text`, falling back to a neutral score if the backend errors.
///
/// The failure is logged and reported through `degraded`, never propagated —
/// one bad row must not take down a whole batch.
pub fn score_or_neutral(scorer: &dyn SentimentScorer, text: &str) -> Scored {
    match scorer.score(text) {
        Ok(score) => Scored {
            // Re-clamp: backends outside this crate may not honor the ranges
            score: SentimentScore::new(score.polarity, score.subjectivity),
            degraded: false,
        },
        Err(e) => {
            warn!(
                scorer = scorer.name(),
                error = %e,
                "Sentiment scoring failed, using neutral score"
            );
            Scored {
                score: SentimentScore::neutral(),
                degraded: true,
            }
        }
    }
}
