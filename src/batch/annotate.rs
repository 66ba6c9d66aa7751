// Row-by-row scoring of a BatchTable.
//
// Rows are independent, so scoring is a plain sequential map. A backend
// failure on one row degrades that row to a neutral score and the loop
// carries on.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use super::aggregate::{LabelDistribution, PolarityHistogram};
use super::table::{unique_name, BatchTable};
use super::{BatchError, DERIVED_COLUMNS};
use crate::models::SentimentLabel;
use crate::sentiment::traits::{score_or_neutral, SentimentScorer};

/// Derived values for one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredRow {
    pub polarity: f64,
    pub subjectivity: f64,
    pub sentiment: SentimentLabel,
    /// Set when scoring failed and the neutral default was used
    #[serde(skip)]
    pub degraded: bool,
}

/// A table with one ScoredRow per original row.
#[derive(Debug, Clone)]
pub struct AnnotatedBatch {
    table: BatchTable,
    text_column: usize,
    scored: Vec<ScoredRow>,
}

/// Score every row of `table` using the text in `column`.
pub fn annotate(
    table: BatchTable,
    column: &str,
    scorer: &dyn SentimentScorer,
) -> Result<AnnotatedBatch, BatchError> {
    annotate_with_progress(table, column, scorer, || {})
}

/// Like [`annotate`], calling `on_row` after each row is scored.
pub fn annotate_with_progress(
    table: BatchTable,
    column: &str,
    scorer: &dyn SentimentScorer,
    mut on_row: impl FnMut(),
) -> Result<AnnotatedBatch, BatchError> {
    let text_column = table.column_index(column)?;

    let mut scored = Vec::with_capacity(table.row_count());
    for text in table.column_values(text_column) {
        let result = score_or_neutral(scorer, text);
        scored.push(ScoredRow {
            polarity: result.score.polarity,
            subjectivity: result.score.subjectivity,
            sentiment: result.score.label(),
            degraded: result.degraded,
        });
        on_row();
    }

    let batch = AnnotatedBatch {
        table,
        text_column,
        scored,
    };

    let degraded = batch.degraded_count();
    if degraded > 0 {
        warn!(
            degraded,
            rows = batch.row_count(),
            "Some rows fell back to a neutral score"
        );
    }
    info!(
        rows = batch.row_count(),
        column,
        scorer = scorer.name(),
        "Batch annotated"
    );

    Ok(batch)
}

impl AnnotatedBatch {
    pub fn scored_rows(&self) -> &[ScoredRow] {
        &self.scored
    }

    pub fn row_count(&self) -> usize {
        self.scored.len()
    }

    pub fn text_column(&self) -> &str {
        &self.table.columns()[self.text_column]
    }

    pub fn degraded_count(&self) -> usize {
        self.scored.iter().filter(|r| r.degraded).count()
    }

    pub fn distribution(&self) -> LabelDistribution {
        LabelDistribution::from_labels(self.scored.iter().map(|r| r.sentiment))
    }

    pub fn histogram(&self, bin_count: usize) -> PolarityHistogram {
        PolarityHistogram::from_polarities(self.scored.iter().map(|r| r.polarity), bin_count)
    }

    /// Output header: original columns followed by the three derived ones.
    ///
    /// A derived name that collides with an original column is suffixed
    /// (`polarity.1`) so the original column survives untouched.
    pub fn output_columns(&self) -> Vec<String> {
        let mut taken: HashSet<String> = self.table.columns().iter().cloned().collect();
        let mut header: Vec<String> = self.table.columns().to_vec();
        for name in DERIVED_COLUMNS {
            let unique = unique_name(name, &taken);
            taken.insert(unique.clone());
            header.push(unique);
        }
        header
    }

    /// Serialise the annotated table as UTF-8 CSV with a header row and no
    /// index column.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, BatchError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.output_columns())?;

        for (row, scored) in self.table.rows().iter().zip(&self.scored) {
            let derived = [
                scored.polarity.to_string(),
                scored.subjectivity.to_string(),
                scored.sentiment.as_str().to_string(),
            ];
            writer.write_record(row.iter().chain(derived.iter()))?;
        }

        writer.into_inner().map_err(|e| BatchError::Io(e.into_error()))
    }
}
