use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use csv_eda::analyser::logic::{DEFAULT_EXAMPLE_VALUES, flatten_summary, load_csv, summarize_dataset};
use csv_eda::config::{CsvOptions, ReportConfig};
use csv_eda::report::generate_report;
use csv_eda::utils::render_text_table;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "csv-eda",
    version,
    about = "Quick exploratory analysis and data-quality checks for CSV files"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print row/column counts and a per-column summary table
    Overview {
        /// Path to the CSV file
        path: PathBuf,

        /// Field separator (a single character, or \t)
        #[arg(long, default_value = ",")]
        sep: String,

        /// File encoding label (utf-8, cp1251, latin1, ...); append -lossy to replace bad bytes
        #[arg(long, default_value = "utf-8")]
        encoding: String,
    },
    /// Write a full report (tables, markdown, plots) into a directory
    Report {
        /// Path to the CSV file
        path: PathBuf,

        /// Output directory, created if absent
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,

        /// Field separator (a single character, or \t)
        #[arg(long, default_value = ",")]
        sep: String,

        /// File encoding label (utf-8, cp1251, latin1, ...); append -lossy to replace bad bytes
        #[arg(long, default_value = "utf-8")]
        encoding: String,

        /// Maximum number of numeric columns to draw histograms for
        #[arg(long, default_value_t = 6)]
        max_hist_columns: usize,

        /// Number of most frequent values kept per categorical column
        #[arg(long, default_value_t = 5)]
        top_k_categories: usize,

        /// Title of report.md
        #[arg(long, default_value = "EDA report")]
        title: String,

        /// Missing share (0.0-1.0) at which a column is listed as problematic
        #[arg(long, default_value_t = 0.1)]
        min_missing_share: f64,

        /// Column for the categorical bar chart; pass an empty string to skip it
        #[arg(long, default_value = "country")]
        categorical_bar_column: String,

        /// Number of values shown in the categorical bar chart
        #[arg(long, default_value_t = 10)]
        categorical_bar_top_n: usize,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Overview {
            path,
            sep,
            encoding,
        } => handle_overview(&path, &sep, &encoding),
        Commands::Report {
            path,
            out_dir,
            sep,
            encoding,
            max_hist_columns,
            top_k_categories,
            title,
            min_missing_share,
            categorical_bar_column,
            categorical_bar_top_n,
        } => {
            let config = ReportConfig {
                out_dir,
                max_hist_columns,
                top_k_categories,
                title,
                min_missing_share,
                categorical_bar_column: Some(categorical_bar_column).filter(|c| !c.is_empty()),
                categorical_bar_top_n,
                ..ReportConfig::default()
            };
            handle_report(&path, &sep, &encoding, &config)
        }
    }
}

fn handle_overview(path: &Path, sep: &str, encoding: &str) -> Result<()> {
    let options = CsvOptions::from_args(sep, encoding)?;
    let df = load_csv(path, &options)?;
    let summary = summarize_dataset(&df, DEFAULT_EXAMPLE_VALUES)?;
    let table = flatten_summary(&summary).context("Failed to build summary table")?;

    println!("Rows: {}", summary.n_rows);
    println!("Columns: {}", summary.n_cols);
    println!("\nColumn summary:");
    print!("{}", render_text_table(&table));
    Ok(())
}

fn handle_report(path: &Path, sep: &str, encoding: &str, config: &ReportConfig) -> Result<()> {
    let options = CsvOptions::from_args(sep, encoding)?;
    let artifacts = generate_report(path, &options, config)?;

    println!("Report written to: {}", artifacts.out_dir.display());
    println!("- Markdown: {}", artifacts.report_md.display());
    println!("- Quality score: {:.2}", artifacts.quality_score);
    println!("- Files:");
    for file in &artifacts.files {
        let shown = file.strip_prefix(&artifacts.out_dir).unwrap_or(file);
        println!("  {}", shown.display());
    }
    Ok(())
}
