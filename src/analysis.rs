// Single-text flow: one string in, one TextAnalysis out.

use tracing::debug;

use crate::models::TextAnalysis;
use crate::sentiment::traits::{score_or_neutral, SentimentScorer};

/// Analyze one piece of text.
///
/// Returns `None` for the empty string — there is nothing to show, which is
/// not an error. Scorer failures degrade to a neutral analysis.
pub fn analyze_text(scorer: &dyn SentimentScorer, text: &str) -> Option<TextAnalysis> {
    if text.is_empty() {
        return None;
    }

    let scored = score_or_neutral(scorer, text);
    let analysis = TextAnalysis::from_score(scored.score);
    debug!(
        polarity = analysis.polarity,
        subjectivity = analysis.subjectivity,
        label = %analysis.label,
        "Analyzed text"
    );
    Some(analysis)
}
