use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use sentimeter::batch::annotate::annotate_with_progress;
use sentimeter::batch::table::BatchTable;
use sentimeter::batch::RESULTS_FILE_NAME;
use sentimeter::config::Config;
use sentimeter::output::{chart, terminal};

/// Sentimeter: sentiment analysis for reviews and comments.
///
/// Scores text for polarity (-1 negative to +1 positive) and subjectivity
/// (0 fact-based to 1 opinionated), one text at a time or a whole CSV column.
#[derive(Parser)]
#[command(name = "sentimeter", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single text (use "-" to read it from stdin)
    Analyze {
        /// The text to analyze
        text: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Preview a CSV file and list its columns
    Columns {
        /// CSV file with a header row
        file: PathBuf,
    },

    /// Score every row of one CSV column and write the annotated table
    Batch {
        /// CSV file with a header row
        file: PathBuf,

        /// Column containing the text to analyze
        #[arg(long)]
        column: String,

        /// Where to write the annotated CSV
        #[arg(long, default_value = RESULTS_FILE_NAME)]
        output: PathBuf,

        /// Also write SVG charts into this directory
        #[arg(long)]
        charts: Option<PathBuf>,
    },

    /// Run the web dashboard
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 8080)
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sentimeter=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { text, json } => {
            let scorer = config.create_scorer()?;
            let text = if text == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read text from stdin")?;
                buf.trim_end_matches(['\r', '\n']).to_string()
            } else {
                text
            };

            let analysis = sentimeter::analysis::analyze_text(scorer.as_ref(), &text);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({ "analysis": analysis }))?
                );
            } else {
                match analysis {
                    Some(analysis) => terminal::display_analysis(&analysis),
                    None => println!("Nothing to analyze: the text is empty."),
                }
            }
        }

        Commands::Columns { file } => {
            let table = load_table(&file)?;
            terminal::display_preview(&table.preview(config.preview_rows));
        }

        Commands::Batch {
            file,
            column,
            output,
            charts,
        } => {
            let scorer = config.create_scorer()?;
            let table = load_table(&file)?;
            // Fail on a bad column before drawing a progress bar
            table.column_index(&column)?;

            println!(
                "Analyzing {} rows from column '{}'...",
                table.row_count(),
                column
            );

            let pb = ProgressBar::new(table.row_count() as u64);
            pb.set_style(
                ProgressStyle::default_bar().template("  Scoring [{bar:30}] {pos}/{len} ({eta})")?,
            );
            let batch = annotate_with_progress(table, &column, scorer.as_ref(), || pb.inc(1))?;
            pb.finish_and_clear();

            let distribution = batch.distribution();
            let histogram = batch.histogram(config.histogram_bins);
            terminal::display_batch_summary(&distribution, &histogram, batch.degraded_count());

            let bytes = batch.to_csv_bytes()?;
            std::fs::write(&output, bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(path = %output.display(), rows = batch.row_count(), "Wrote annotated CSV");
            println!("\n{} {}", "Results written to".bold(), output.display());

            if let Some(dir) = charts {
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
                let pie_path = dir.join("sentiment_distribution.svg");
                let hist_path = dir.join("polarity_distribution.svg");
                std::fs::write(&pie_path, chart::pie_chart_svg(&distribution))
                    .with_context(|| format!("Failed to write {}", pie_path.display()))?;
                std::fs::write(&hist_path, chart::histogram_svg(&histogram))
                    .with_context(|| format!("Failed to write {}", hist_path.display()))?;
                println!("Charts written to {}", dir.display());
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let scorer = config.create_scorer()?;
            info!(scorer = scorer.name(), "Sentiment scorer ready");
            sentimeter::web::run_server(config, scorer.into(), port, &bind).await?;
        }
    }

    Ok(())
}

/// Read and parse a CSV file, naming the file in any error.
fn load_table(path: &Path) -> Result<BatchTable> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let table = BatchTable::from_csv_bytes(&bytes)
        .with_context(|| format!("Could not parse {}", path.display()))?;
    Ok(table)
}
