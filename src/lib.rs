//! # csv-eda
//!
//! Descriptive statistics and data-quality heuristics for CSV files, plus a
//! report writer that turns them into CSV tables, markdown and SVG plots.
//!
//! ## Quick Start
//!
//! ```no_run
//! use csv_eda::analyser::logic::{
//!     compute_quality_flags, load_csv, missing_table, summarize_dataset,
//! };
//! use csv_eda::config::CsvOptions;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let df = load_csv(Path::new("data.csv"), &CsvOptions::default())?;
//! let summary = summarize_dataset(&df, 3)?;
//! let flags = compute_quality_flags(&summary, &missing_table(&df));
//! println!("{} rows, quality score {:.2}", summary.n_rows, flags.quality_score);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`analyser`]: Data analysis and quality assessment
//!   - [`analyser::logic`]: Summaries, missing values, correlation, top
//!     categories and quality flags
//!   - [`analyser::plots`]: SVG histograms, missing matrix, heatmap and bar chart
//! - [`report`]: The full report pipeline writing into an output directory
//! - [`config`]: CSV parsing options and report settings
//! - [`error`]: Error types and handling utilities
//! - [`logging`]: tracing subscriber setup
//! - [`utils`]: Formatting helpers
//!
//! ## Missing Values
//!
//! A value is missing when it is a Polars null. [`analyser::logic::load_csv`]
//! produces nulls for empty fields, for the usual NA spellings (`NA`, `N/A`,
//! `null`, `NaN`, `None`, ...) and for float NaN. Every statistic ignores
//! missing values, and no
//! degenerate table (no rows, no columns, all-missing columns) produces an
//! error: results are empty, zero or NaN instead.

pub mod analyser;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod utils;
