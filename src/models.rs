// Data models — the values that flow through both pipelines.
//
// A SentimentScore is derived from one piece of text; a SentimentLabel is
// derived from the score's polarity alone. Neither outlives the request
// that produced it.

use serde::{Deserialize, Serialize};

/// Polarity strictly above this is positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Polarity strictly below this is negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Sentiment of a single text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// -1.0 (unfavorable) to +1.0 (favorable)
    pub polarity: f64,
    /// 0.0 (fact-based) to 1.0 (opinion-based)
    pub subjectivity: f64,
}

impl SentimentScore {
    /// Build a score, clamping both components into range.
    /// Non-finite inputs collapse to 0.0 so a misbehaving backend can never
    /// leak NaN into a table or chart.
    pub fn new(polarity: f64, subjectivity: f64) -> Self {
        Self {
            polarity: sanitize(polarity, -1.0, 1.0),
            subjectivity: sanitize(subjectivity, 0.0, 1.0),
        }
    }

    /// The score given to text with no sentiment-bearing words, and to rows
    /// whose scoring failed.
    pub fn neutral() -> Self {
        Self {
            polarity: 0.0,
            subjectivity: 0.0,
        }
    }

    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::from_polarity(self.polarity)
    }
}

fn sanitize(value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        0.0
    }
}

/// Categorical reading of a polarity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Classify a polarity with the fixed ±0.1 thresholds.
    pub fn from_polarity(polarity: f64) -> Self {
        match polarity {
            p if p > POSITIVE_THRESHOLD => SentimentLabel::Positive,
            p if p < NEGATIVE_THRESHOLD => SentimentLabel::Negative,
            // NaN fails both comparisons and lands here
            _ => SentimentLabel::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    /// Qualitative banner shown under the single-text metrics.
    pub fn banner(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Overall Positive Sentiment",
            SentimentLabel::Negative => "Overall Negative Sentiment",
            SentimentLabel::Neutral => "Overall Neutral Sentiment",
        }
    }

    /// All labels in display order.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of the single-text flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub polarity: f64,
    pub subjectivity: f64,
    pub label: SentimentLabel,
    pub banner: String,
}

impl TextAnalysis {
    pub fn from_score(score: SentimentScore) -> Self {
        let label = score.label();
        Self {
            polarity: score.polarity,
            subjectivity: score.subjectivity,
            label,
            banner: label.banner().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_boundaries() {
        assert_eq!(SentimentLabel::from_polarity(0.1), SentimentLabel::Neutral);
        assert_eq!(
            SentimentLabel::from_polarity(0.1000001),
            SentimentLabel::Positive
        );
        assert_eq!(SentimentLabel::from_polarity(-0.1), SentimentLabel::Neutral);
        assert_eq!(
            SentimentLabel::from_polarity(-0.1000001),
            SentimentLabel::Negative
        );
    }

    #[test]
    fn test_score_clamps_and_sanitizes() {
        let s = SentimentScore::new(3.0, -2.0);
        assert_eq!(s.polarity, 1.0);
        assert_eq!(s.subjectivity, 0.0);

        let s = SentimentScore::new(f64::NAN, f64::INFINITY);
        assert_eq!(s, SentimentScore::neutral());
    }

    #[test]
    fn test_label_serializes_lowercase() {
        let json = serde_json::to_string(&SentimentLabel::Negative).unwrap();
        assert_eq!(json, "\"negative\"");
    }
}
