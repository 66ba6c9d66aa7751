// BatchTable — the parsed CSV upload.
//
// Every row is normalised to exactly one cell per column: short rows are
// padded with empty cells, long rows are rejected, and a quoted field left
// open at end of input is rejected. Header names are made unique so a column
// can always be selected unambiguously by name.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::BatchError;

/// An uploaded table: column names plus rows of string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// The first few rows of a table, for display before analysis.
#[derive(Debug, Clone, Serialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
}

impl BatchTable {
    /// Parse an uploaded CSV file. The first record is the header row.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, BatchError> {
        let text = std::str::from_utf8(bytes).map_err(|e| BatchError::InvalidUtf8 {
            offset: e.valid_up_to(),
        })?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        // The csv reader would fold the rest of the file into the open field
        if let Some(line) = unclosed_quote_line(text) {
            return Err(BatchError::UnterminatedQuote { line });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let raw_headers = reader.headers()?.clone();
        if raw_headers.iter().all(|h| h.trim().is_empty()) {
            return Err(BatchError::Empty);
        }

        let columns = normalize_headers(raw_headers.iter());
        let width = columns.len();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            if record.len() > width {
                return Err(BatchError::RaggedRow {
                    line: record.position().map(|p| p.line()).unwrap_or(0),
                    expected: width,
                    found: record.len(),
                });
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        debug!(columns = width, rows = rows.len(), "Parsed CSV upload");

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the column called `name`.
    pub fn column_index(&self, name: &str) -> Result<usize, BatchError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| BatchError::UnknownColumn(name.to_string()))
    }

    /// Cells of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }

    /// The first `limit` rows plus the full row count.
    pub fn preview(&self, limit: usize) -> TablePreview {
        TablePreview {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(limit).cloned().collect(),
            row_count: self.rows.len(),
        }
    }
}

/// Name blank headers `Unnamed: <index>` and suffix duplicates `.1`, `.2`, …
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for (idx, name) in raw.enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name.to_string()
        };
        let unique = unique_name(&base, &taken);
        taken.insert(unique.clone());
        out.push(unique);
    }

    out
}

/// Line on which a quoted field opens without ever closing, if any.
///
/// Follows the csv reader's quoting rules: a quote only opens a field when it
/// is the field's first character, and `""` inside a quoted field is literal.
fn unclosed_quote_line(text: &str) -> Option<u64> {
    let mut line = 1;
    let mut at_field_start = true;
    let mut open_at: Option<u64> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if open_at.is_some() {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    open_at = None;
                }
            }
        } else {
            match c {
                '"' if at_field_start => {
                    open_at = Some(line);
                    at_field_start = false;
                }
                ',' | '\n' | '\r' => at_field_start = true,
                _ => at_field_start = false,
            }
        }
        if c == '\n' {
            line += 1;
        }
    }

    open_at
}

/// `base` if unused, otherwise the first free `base.N`.
pub(crate) fn unique_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}.{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let table = BatchTable::from_csv_bytes(b"id,review\n1,great\n2,bad\n").unwrap();
        assert_eq!(table.columns(), &["id", "review"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[1], vec!["2", "bad"]);
    }

    #[test]
    fn test_quoted_fields_with_commas_and_newlines() {
        let csv = b"review,stars\n\"Good, but \"\"loud\"\"\",4\n\"line one\nline two\",3\n";
        let table = BatchTable::from_csv_bytes(csv).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0][0], "Good, but \"loud\"");
        assert_eq!(table.rows()[1][0], "line one\nline two");
    }

    #[test]
    fn test_short_rows_padded() {
        let table = BatchTable::from_csv_bytes(b"a,b,c\n1,2\n").unwrap();
        assert_eq!(table.rows()[0], vec!["1", "2", ""]);
    }

    #[test]
    fn test_long_row_rejected_with_line() {
        let err = BatchTable::from_csv_bytes(b"a,b\n1,2\n3,4,5\n").unwrap_err();
        match err {
            BatchError::RaggedRow {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            BatchTable::from_csv_bytes(b""),
            Err(BatchError::Empty)
        ));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = BatchTable::from_csv_bytes(b"review\n\xff\xfe bad\n").unwrap_err();
        assert!(matches!(err, BatchError::InvalidUtf8 { offset: 7 }));
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_bom_stripped() {
        let table = BatchTable::from_csv_bytes("\u{feff}review\nok\n".as_bytes()).unwrap();
        assert_eq!(table.columns(), &["review"]);
    }

    #[test]
    fn test_header_only_is_valid() {
        let table = BatchTable::from_csv_bytes(b"review,stars\n").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn test_duplicate_and_blank_headers() {
        let table = BatchTable::from_csv_bytes(b"text,,text,text\n1,2,3,4\n").unwrap();
        assert_eq!(table.columns(), &["text", "Unnamed: 1", "text.1", "text.2"]);
    }

    #[test]
    fn test_column_index() {
        let table = BatchTable::from_csv_bytes(b"id,review\n1,x\n").unwrap();
        assert_eq!(table.column_index("review").unwrap(), 1);
        let err = table.column_index("comment").unwrap_err();
        assert!(matches!(err, BatchError::UnknownColumn(ref c) if c == "comment"));
        assert!(!err.is_parse_error());
    }

    #[test]
    fn test_preview_limits_rows() {
        let mut csv = String::from("n\n");
        for i in 0..12 {
            csv.push_str(&format!("{i}\n"));
        }
        let table = BatchTable::from_csv_bytes(csv.as_bytes()).unwrap();
        let preview = table.preview(5);
        assert_eq!(preview.rows.len(), 5);
        assert_eq!(preview.row_count, 12);
        assert_eq!(preview.rows[4], vec!["4"]);
    }

    #[test]
    fn test_unclosed_quote_rejected() {
        let err = BatchTable::from_csv_bytes(b"id,review\n1,\"great product\n2,awful\n3,fine\n")
            .unwrap_err();
        assert!(matches!(err, BatchError::UnterminatedQuote { line: 2 }));
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn test_closed_quotes_spanning_lines_accepted() {
        let csv = b"id,review\n1,\"two\nlines, \"\"quoted\"\"\"\n2,ok\n";
        let table = BatchTable::from_csv_bytes(csv).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0][1], "two\nlines, \"quoted\"");
    }

    #[test]
    fn test_mid_field_quote_is_literal() {
        let table = BatchTable::from_csv_bytes(b"review\n5\" screen\nok\n").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0][0], "5\" screen");
    }
}
