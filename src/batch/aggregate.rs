// Aggregate views over an annotated batch.

use serde::Serialize;

use crate::models::SentimentLabel;

/// Row counts per sentiment label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl LabelDistribution {
    pub fn from_labels(labels: impl IntoIterator<Item = SentimentLabel>) -> Self {
        let mut dist = Self::default();
        for label in labels {
            match label {
                SentimentLabel::Positive => dist.positive += 1,
                SentimentLabel::Negative => dist.negative += 1,
                SentimentLabel::Neutral => dist.neutral += 1,
            }
        }
        dist
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Fraction of rows carrying `label`; 0.0 for an empty batch.
    pub fn share(&self, label: SentimentLabel) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(label) as f64 / total as f64,
        }
    }

    /// Labels with at least one row, in display order. Pie slices.
    pub fn slices(&self) -> Vec<(SentimentLabel, usize)> {
        SentimentLabel::ALL
            .iter()
            .map(|&label| (label, self.count(label)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// One histogram bar: `[lower, upper)`, except the last bin which also
/// includes `upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Fixed-width histogram of polarity values over [-1.0, 1.0].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolarityHistogram {
    pub bins: Vec<HistogramBin>,
}

impl PolarityHistogram {
    /// Bin `values` into `bin_count` equal-width bins. A bin count of zero
    /// is treated as one.
    pub fn from_polarities(values: impl IntoIterator<Item = f64>, bin_count: usize) -> Self {
        let bin_count = bin_count.max(1);
        let edge = |i: usize| bin_edge(i, bin_count);

        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                lower: edge(i),
                upper: edge(i + 1),
                count: 0,
            })
            .collect();

        for value in values {
            if !value.is_finite() {
                continue;
            }
            let clamped = value.clamp(-1.0, 1.0);
            // Estimate, then settle against the reported edges
            let mut idx = (((clamped + 1.0) * bin_count as f64 / 2.0).floor() as usize)
                .min(bin_count - 1);
            while idx > 0 && clamped < edge(idx) {
                idx -= 1;
            }
            while idx + 1 < bin_count && clamped >= edge(idx + 1) {
                idx += 1;
            }
            bins[idx].count += 1;
        }

        Self { bins }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Lower edge of bin `i` of `n` over [-1, 1], computed with a single
/// division so each edge is the nearest float to its decimal value.
fn bin_edge(i: usize, n: usize) -> f64 {
    (2 * i as i64 - n as i64) as f64 / n as f64
}
