// Sentiment lexicon — word-level polarity/subjectivity table.
//
// The built-in English table is compiled into the binary from
// data/en-lexicon.tsv. A user file in the same format can be merged on top
// to add domain words or override built-in values.
//
// Format (tab-separated, one entry per line):
//   word          polarity      subjectivity
//   @intensifier  word          factor
// Blank lines and lines starting with '#' are ignored.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

const BUILTIN_LEXICON: &str = include_str!("../../data/en-lexicon.tsv");

const INTENSIFIER_DIRECTIVE: &str = "@intensifier";

/// Polarity and subjectivity of a single lexicon word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexiconEntry {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Word table plus intensifier factors.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: HashMap<String, LexiconEntry>,
    intensifiers: HashMap<String, f64>,
}

impl Lexicon {
    /// The embedded English lexicon.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_LEXICON, "built-in lexicon")
    }

    /// Read and parse a lexicon file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file {}", path.display()))?;
        Self::parse(&source, &path.display().to_string())
    }

    /// Parse lexicon source text. `origin` names the source in error messages.
    pub fn parse(source: &str, origin: &str) -> Result<Self> {
        let mut lexicon = Lexicon::default();

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            if fields.len() != 3 {
                anyhow::bail!(
                    "{origin}, line {line_no}: expected 3 tab-separated fields, found {}",
                    fields.len()
                );
            }

            if fields[0] == INTENSIFIER_DIRECTIVE {
                let factor = parse_number(fields[2], origin, line_no)?;
                if factor <= 0.0 {
                    anyhow::bail!(
                        "{origin}, line {line_no}: intensifier factor must be positive, got {factor}"
                    );
                }
                lexicon
                    .intensifiers
                    .insert(fields[1].to_lowercase(), factor);
                continue;
            }

            let polarity = parse_number(fields[1], origin, line_no)?;
            let subjectivity = parse_number(fields[2], origin, line_no)?;
            if !(-1.0..=1.0).contains(&polarity) {
                anyhow::bail!("{origin}, line {line_no}: polarity {polarity} outside [-1, 1]");
            }
            if !(0.0..=1.0).contains(&subjectivity) {
                anyhow::bail!(
                    "{origin}, line {line_no}: subjectivity {subjectivity} outside [0, 1]"
                );
            }

            lexicon.words.insert(
                fields[0].to_lowercase(),
                LexiconEntry {
                    polarity,
                    subjectivity,
                },
            );
        }

        Ok(lexicon)
    }

    /// Merge `other` on top of this lexicon; its entries win on conflict.
    pub fn extend(&mut self, other: Lexicon) {
        self.words.extend(other.words);
        self.intensifiers.extend(other.intensifiers);
    }

    pub fn word(&self, token: &str) -> Option<LexiconEntry> {
        self.words.get(token).copied()
    }

    pub fn intensifier(&self, token: &str) -> Option<f64> {
        self.intensifiers.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn parse_number(field: &str, origin: &str, line_no: usize) -> Result<f64> {
    let value: f64 = field
        .parse()
        .with_context(|| format!("{origin}, line {line_no}: '{field}' is not a number"))?;
    if !value.is_finite() {
        anyhow::bail!("{origin}, line {line_no}: '{field}' is not a finite number");
    }
    Ok(value)
}
