// Batch analysis — CSV in, annotated CSV and aggregates out.
//
// The flow is strictly linear: parse the upload into a BatchTable, pick the
// text column, annotate every row, then derive the label distribution and
// polarity histogram. Nothing is kept between requests.

pub mod aggregate;
pub mod annotate;
pub mod table;

use thiserror::Error;

/// File name offered for the annotated download.
pub const RESULTS_FILE_NAME: &str = "sentiment_analysis_results.csv";

/// MIME type of the annotated download.
pub const CSV_MIME: &str = "text/csv";

/// Names of the three derived columns, in output order.
pub const DERIVED_COLUMNS: [&str; 3] = ["polarity", "subjectivity", "sentiment"];

/// Errors that abort a batch request. All are user-facing.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("No columns to parse from file")]
    Empty,

    #[error("File is not valid UTF-8 text (invalid byte at offset {offset})")]
    InvalidUtf8 { offset: usize },

    #[error("Error tokenizing data: expected {expected} fields in line {line}, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Error tokenizing data: EOF inside string starting at line {line}")]
    UnterminatedQuote { line: u64 },

    #[error("Could not parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column '{0}' not found in the uploaded file")]
    UnknownColumn(String),

    #[error("Could not write CSV: {0}")]
    Io(#[from] std::io::Error),
}

impl BatchError {
    /// True for errors caused by the uploaded data rather than the selection.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            BatchError::Empty
                | BatchError::InvalidUtf8 { .. }
                | BatchError::RaggedRow { .. }
                | BatchError::UnterminatedQuote { .. }
                | BatchError::Csv(_)
        )
    }
}
