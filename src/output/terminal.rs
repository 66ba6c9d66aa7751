// Colored terminal output for analyses, previews and batch summaries.
//
// The CLI commands in main.rs delegate all formatting here.

use colored::Colorize;

use crate::batch::aggregate::{LabelDistribution, PolarityHistogram};
use crate::batch::table::TablePreview;
use crate::models::{SentimentLabel, TextAnalysis};

/// Widest a preview cell may get before it is truncated.
const PREVIEW_CELL_CHARS: usize = 24;

/// Preview cells are padded to at least this many characters.
const PREVIEW_CELL_PAD: usize = 12;

/// Longest bar in the terminal charts.
const BAR_WIDTH: usize = 40;

/// Display the single-text metrics and banner.
pub fn display_analysis(analysis: &TextAnalysis) {
    println!("\n{}", "=== Analysis Results ===".bold());
    println!(
        "  Sentiment Polarity: {:>6.2}  {}",
        analysis.polarity,
        "(-1 negative .. +1 positive)".dimmed()
    );
    println!(
        "  Subjectivity:       {:>6.2}  {}",
        analysis.subjectivity,
        "(0 objective .. 1 subjective)".dimmed()
    );
    println!();
    println!("  {}", colorize_banner(analysis.label, &analysis.banner));
}

/// Display the first rows of an uploaded table.
pub fn display_preview(preview: &TablePreview) {
    println!(
        "\n{}",
        format!(
            "=== Preview ({} of {} rows) ===",
            preview.rows.len(),
            preview.row_count
        )
        .bold()
    );

    let header: Vec<String> = preview.columns.iter().map(|c| cell(c)).collect();
    let header = header.join(" | ");
    println!("  {}", header.dimmed());
    println!("  {}", "-".repeat(header.chars().count()).dimmed());

    for row in &preview.rows {
        let cells: Vec<String> = row.iter().map(|c| cell(c)).collect();
        println!("  {}", cells.join(" | "));
    }

    println!("\nColumns: {}", preview.columns.join(", "));
}

/// Display the label distribution and polarity histogram as bars.
pub fn display_batch_summary(
    dist: &LabelDistribution,
    hist: &PolarityHistogram,
    degraded_rows: usize,
) {
    println!(
        "\n{}",
        format!("=== Sentiment Distribution ({} rows) ===", dist.total()).bold()
    );
    let max = SentimentLabel::ALL
        .iter()
        .map(|&l| dist.count(l))
        .max()
        .unwrap_or(0);
    for label in SentimentLabel::ALL {
        let count = dist.count(label);
        println!(
            "  {:<9} {:>6}  {:>5.1}%  {}",
            label.as_str(),
            count,
            dist.share(label) * 100.0,
            colorize_bar(label, &bar(count, max))
        );
    }

    println!("\n{}", "=== Polarity Score Distribution ===".bold());
    let max = hist.max_count();
    for bin in &hist.bins {
        println!(
            "  [{:>5.2}, {:>5.2}{} {:>6}  {}",
            bin.lower,
            bin.upper,
            if bin.upper >= 1.0 { "]" } else { ")" },
            bin.count,
            bar(bin.count, max).cyan()
        );
    }

    if degraded_rows > 0 {
        println!(
            "\n  {} {} rows could not be scored and were marked neutral",
            "!".yellow(),
            degraded_rows
        );
    }
}

fn cell(text: &str) -> String {
    let text = super::single_line(text);
    format!(
        "{:<width$}",
        super::truncate_chars(&text, PREVIEW_CELL_CHARS),
        width = PREVIEW_CELL_PAD
    )
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 || count == 0 {
        return String::new();
    }
    // Non-zero counts always get at least one block
    let len = ((count as f64 / max as f64) * BAR_WIDTH as f64).round().max(1.0) as usize;
    "█".repeat(len)
}

fn colorize_bar(label: SentimentLabel, bar: &str) -> colored::ColoredString {
    match label {
        SentimentLabel::Positive => bar.green(),
        SentimentLabel::Negative => bar.red(),
        SentimentLabel::Neutral => bar.normal(),
    }
}

/// Colorize a banner by label.
fn colorize_banner(label: SentimentLabel, banner: &str) -> colored::ColoredString {
    match label {
        SentimentLabel::Positive => banner.green().bold(),
        SentimentLabel::Negative => banner.red().bold(),
        SentimentLabel::Neutral => banner.blue().bold(),
    }
}
