// Lexicon-averaging sentiment scorer.
//
// Each word found in the lexicon contributes one assessment. Intensifiers
// scale the word that follows them, negations flip and dampen polarity, and
// exclamation marks strengthen the most recent assessment. The final score
// is the mean of all assessments. Text with no lexicon words is neutral.

use anyhow::{Context, Result};
use regex_lite::Regex;
use tracing::debug;

use super::lexicon::Lexicon;
use super::traits::SentimentScorer;
use crate::models::SentimentScore;

/// Polarity multiplier applied when a negation precedes a scored word.
pub const NEGATION_FACTOR: f64 = -0.5;

/// Polarity multiplier applied per '!' to the latest assessment.
pub const EXCLAMATION_BOOST: f64 = 1.25;

/// How many preceding words are checked for a negation.
const NEGATION_WINDOW: usize = 2;

const TOKEN_PATTERN: &str = r"[a-z0-9]+(?:'[a-z]+)*|!";

/// Lexicon scorer — the default backend. Local, deterministic, no I/O
/// after construction.
pub struct LexiconScorer {
    lexicon: Lexicon,
    tokens: Regex,
}

impl LexiconScorer {
    pub fn new(lexicon: Lexicon) -> Result<Self> {
        let tokens = Regex::new(TOKEN_PATTERN).context("Failed to compile token pattern")?;
        debug!(words = lexicon.len(), "Loaded sentiment lexicon");
        Ok(Self { lexicon, tokens })
    }

    /// Scorer over the embedded English lexicon.
    pub fn builtin() -> Result<Self> {
        Self::new(Lexicon::builtin()?)
    }

    fn tokenize<'a>(&self, lowered: &'a str) -> Vec<&'a str> {
        self.tokens
            .find_iter(lowered)
            .map(|m| m.as_str())
            .collect()
    }

    /// Polarity/subjectivity pairs for every scored word, in text order.
    fn assess(&self, tokens: &[&str]) -> Vec<(f64, f64)> {
        let mut assessments: Vec<(f64, f64)> = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            if *token == "!" {
                if let Some(last) = assessments.last_mut() {
                    last.0 = (last.0 * EXCLAMATION_BOOST).clamp(-1.0, 1.0);
                }
                continue;
            }

            let Some(entry) = self.lexicon.word(token) else {
                continue;
            };

            // A word that is both an intensifier and a lexicon word ("pretty")
            // acts as an intensifier when it modifies the next word.
            let modifies_next = self.lexicon.intensifier(token).is_some()
                && tokens
                    .get(i + 1)
                    .is_some_and(|next| self.lexicon.word(next).is_some());
            if modifies_next {
                continue;
            }

            let preceding: Vec<&str> = tokens[..i]
                .iter()
                .rev()
                .filter(|t| **t != "!")
                .take(NEGATION_WINDOW)
                .copied()
                .collect();

            let mut polarity = entry.polarity;
            let mut subjectivity = entry.subjectivity;

            if let Some(factor) = preceding
                .first()
                .and_then(|prev| self.lexicon.intensifier(prev))
            {
                polarity *= factor;
                subjectivity *= factor;
            }

            if preceding.iter().any(|w| is_negation(w)) {
                polarity *= NEGATION_FACTOR;
            }

            assessments.push((polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0)));
        }

        assessments
    }
}

impl SentimentScorer for LexiconScorer {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn score(&self, text: &str) -> Result<SentimentScore> {
        let lowered = text.to_lowercase().replace('\u{2019}', "'");
        let tokens = self.tokenize(&lowered);
        let assessments = self.assess(&tokens);

        if assessments.is_empty() {
            return Ok(SentimentScore::neutral());
        }

        let n = assessments.len() as f64;
        let polarity = assessments.iter().map(|(p, _)| p).sum::<f64>() / n;
        let subjectivity = assessments.iter().map(|(_, s)| s).sum::<f64>() / n;

        Ok(SentimentScore::new(polarity, subjectivity))
    }
}

fn is_negation(word: &str) -> bool {
    matches!(word, "not" | "never" | "no" | "cannot" | "without") || word.ends_with("n't")
}
