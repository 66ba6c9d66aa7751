use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::sentiment::lexicon::Lexicon;
use crate::sentiment::scorer::LexiconScorer;
use crate::sentiment::traits::SentimentScorer;

/// Rows shown in the table preview before analysis.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
/// Bars in the polarity histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;
/// Upload size limit for the web dashboard, in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 200;

/// Central configuration loaded from environment variables.
///
/// Everything has a default; the .env file is loaded automatically at
/// startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Extra lexicon merged over the built-in one (SENTIMETER_LEXICON)
    pub lexicon_path: Option<PathBuf>,
    /// Rows in the batch preview (SENTIMETER_PREVIEW_ROWS)
    pub preview_rows: usize,
    /// Polarity histogram bins (SENTIMETER_HISTOGRAM_BINS)
    pub histogram_bins: usize,
    /// Web upload limit in megabytes (SENTIMETER_MAX_UPLOAD_MB)
    pub max_upload_mb: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lexicon_path: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. `load` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lexicon_path = lookup("SENTIMETER_LEXICON")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let preview_rows = parse_usize(&lookup, "SENTIMETER_PREVIEW_ROWS", DEFAULT_PREVIEW_ROWS)?;
        let histogram_bins =
            parse_usize(&lookup, "SENTIMETER_HISTOGRAM_BINS", DEFAULT_HISTOGRAM_BINS)?;
        let max_upload_mb = parse_usize(&lookup, "SENTIMETER_MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB)?;

        if histogram_bins == 0 {
            anyhow::bail!("SENTIMETER_HISTOGRAM_BINS must be at least 1");
        }
        if max_upload_mb == 0 {
            anyhow::bail!("SENTIMETER_MAX_UPLOAD_MB must be at least 1");
        }

        Ok(Self {
            lexicon_path,
            preview_rows,
            histogram_bins,
            max_upload_mb,
        })
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    /// Build the sentiment scorer: the built-in lexicon, extended by the
    /// user lexicon when one is configured.
    pub fn create_scorer(&self) -> Result<Box<dyn SentimentScorer>> {
        let mut lexicon = Lexicon::builtin()?;
        if let Some(path) = &self.lexicon_path {
            let custom = Lexicon::from_file(path)?;
            info!(
                path = %path.display(),
                words = custom.len(),
                "Merging custom lexicon"
            );
            lexicon.extend(custom);
        }
        Ok(Box::new(LexiconScorer::new(lexicon)?))
    }
}

fn parse_usize(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: usize,
) -> Result<usize> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a whole number, got '{raw}'")),
        _ => Ok(default),
    }
}
