//! The `report` pipeline: analyse a CSV file and write every artifact into an
//! output directory.
//!
//! Layout of a finished report directory:
//!
//! ```text
//! reports/
//! ├── report.md
//! ├── summary.csv
//! ├── missing.csv              (only if the table has rows and columns)
//! ├── correlation.csv          (only if there are numeric columns)
//! ├── quality_flags.json
//! ├── top_categories/<column>.csv
//! ├── hist_<column>.svg
//! ├── missing_matrix.svg
//! ├── correlation_heatmap.svg
//! └── categorical_bar.svg      (only if the configured column exists)
//! ```

use crate::analyser::logic::io::{category_table_to_df, correlation_to_df, missing_table_to_df};
use crate::analyser::logic::{
    CorrelationMatrix, DatasetSummary, MissingTable, QualityFlags, TopCategories,
    compute_quality_flags, correlation_matrix, flatten_summary, load_csv, missing_table, save_df,
    summarize_dataset, top_categories,
};
use crate::analyser::plots;
use crate::config::{CsvOptions, ReportConfig};
use crate::error::{Result, ResultExt as _};
use crate::utils::sanitize_file_stem;
use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

pub const REPORT_FILE: &str = "report.md";
pub const SUMMARY_FILE: &str = "summary.csv";
pub const MISSING_FILE: &str = "missing.csv";
pub const CORRELATION_FILE: &str = "correlation.csv";
pub const QUALITY_FLAGS_FILE: &str = "quality_flags.json";
pub const TOP_CATEGORIES_DIR: &str = "top_categories";
pub const MISSING_MATRIX_FILE: &str = "missing_matrix.svg";
pub const CORRELATION_HEATMAP_FILE: &str = "correlation_heatmap.svg";
pub const CATEGORICAL_BAR_FILE: &str = "categorical_bar.svg";

/// Everything computed from one table during a report run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub summary: DatasetSummary,
    pub missing: MissingTable,
    pub correlation: CorrelationMatrix,
    pub top_categories: TopCategories,
    pub flags: QualityFlags,
}

impl Analysis {
    /// # Errors
    ///
    /// Propagates Polars failures from the column computations.
    pub fn compute(df: &DataFrame, config: &ReportConfig) -> Result<Self> {
        let summary = summarize_dataset(df, config.example_values_per_column)?;
        let missing = missing_table(df);
        let correlation = correlation_matrix(df)?;
        let top_categories = top_categories(
            df,
            config.max_category_columns,
            config.top_k_categories,
        )?;
        let flags = compute_quality_flags(&summary, &missing);

        Ok(Self {
            summary,
            missing,
            correlation,
            top_categories,
            flags,
        })
    }

    /// Columns whose missing share reaches `threshold`, in missing-table order.
    pub fn problematic_columns(&self, threshold: f64) -> Vec<&str> {
        self.missing.columns_at_or_above(threshold)
    }
}

/// What a report run wrote, in write order.
#[derive(Debug, Clone)]
pub struct ReportArtifacts {
    pub out_dir: PathBuf,
    pub report_md: PathBuf,
    pub files: Vec<PathBuf>,
    pub quality_score: f64,
}

/// Details of the run that only the markdown needs.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub source_name: &'a str,
    pub histogram_columns: &'a [String],
    pub categorical_bar_written: bool,
    pub generated_at: DateTime<Utc>,
}

/// Runs the full pipeline for the CSV at `path`.
///
/// The output directory is created if needed. A failure part way through
/// leaves whatever was already written in place.
///
/// # Errors
///
/// `InvalidPath` / `CsvParse` from loading, `Config` for invalid settings,
/// `Io` or `Plot` if an artifact cannot be written.
pub fn generate_report(
    path: &Path,
    csv: &CsvOptions,
    config: &ReportConfig,
) -> Result<ReportArtifacts> {
    config.validate()?;

    let out_dir = config.out_dir.clone();
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let df = load_csv(path, csv)?;
    let analysis = Analysis::compute(&df, config)?;
    let mut files = write_tables(&analysis, &out_dir)?;

    let histograms = plots::plot_histograms(
        &df,
        &analysis.summary,
        &out_dir,
        config.max_hist_columns,
    )?;
    let histogram_columns: Vec<String> = histograms.iter().map(|(name, _)| name.clone()).collect();
    files.extend(histograms.into_iter().map(|(_, p)| p));

    let matrix_path = out_dir.join(MISSING_MATRIX_FILE);
    plots::plot_missing_matrix(&df, &matrix_path)?;
    files.push(matrix_path);

    let heatmap_path = out_dir.join(CORRELATION_HEATMAP_FILE);
    plots::plot_correlation_heatmap(&analysis.correlation, &heatmap_path)?;
    files.push(heatmap_path);

    let mut categorical_bar_written = false;
    if let Some(column) = config.categorical_bar_column.as_deref().filter(|c| !c.is_empty()) {
        let bar_path = out_dir.join(CATEGORICAL_BAR_FILE);
        if plots::plot_categorical_bar(&df, column, &bar_path, config.categorical_bar_top_n)? {
            files.push(bar_path);
            categorical_bar_written = true;
        }
    }

    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let ctx = RenderContext {
        source_name: &source_name,
        histogram_columns: &histogram_columns,
        categorical_bar_written,
        generated_at: Utc::now(),
    };

    let report_md = out_dir.join(REPORT_FILE);
    std::fs::write(&report_md, render_markdown(&analysis, config, &ctx))
        .with_context(|| format!("Failed to write {}", report_md.display()))?;
    files.insert(0, report_md.clone());

    tracing::info!(
        "Report for {} written to {} ({} files, quality score {:.2})",
        source_name,
        out_dir.display(),
        files.len(),
        analysis.flags.quality_score
    );

    Ok(ReportArtifacts {
        out_dir,
        report_md,
        files,
        quality_score: analysis.flags.quality_score,
    })
}

/// Writes the tabular artifacts and `quality_flags.json`.
///
/// # Errors
///
/// Returns an error if a file cannot be created or serialised.
pub fn write_tables(analysis: &Analysis, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let summary_path = out_dir.join(SUMMARY_FILE);
    save_df(&mut flatten_summary(&analysis.summary)?, &summary_path)?;
    files.push(summary_path);

    if !analysis.missing.is_empty() {
        let path = out_dir.join(MISSING_FILE);
        save_df(&mut missing_table_to_df(&analysis.missing)?, &path)?;
        files.push(path);
    }

    if !analysis.correlation.is_empty() {
        let path = out_dir.join(CORRELATION_FILE);
        save_df(&mut correlation_to_df(&analysis.correlation)?, &path)?;
        files.push(path);
    }

    files.extend(write_top_categories(&analysis.top_categories, &out_dir.join(TOP_CATEGORIES_DIR))?);

    let flags_path = out_dir.join(QUALITY_FLAGS_FILE);
    let json = serde_json::to_string_pretty(&analysis.flags)?;
    std::fs::write(&flags_path, json)
        .with_context(|| format!("Failed to write {}", flags_path.display()))?;
    files.push(flags_path);

    Ok(files)
}

/// One `<column>.csv` per frequency table. The directory is always created.
///
/// # Errors
///
/// Returns an error if the directory or a table cannot be written.
pub fn write_top_categories(top: &TopCategories, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut files = Vec::with_capacity(top.len());
    for table in &top.tables {
        let path = dir.join(format!("{}.csv", sanitize_file_stem(&table.column)));
        save_df(&mut category_table_to_df(table)?, &path)?;
        files.push(path);
    }
    Ok(files)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Renders `report.md`.
pub fn render_markdown(analysis: &Analysis, config: &ReportConfig, ctx: &RenderContext<'_>) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", config.title));
    md.push_str(&format!("Source file: `{}`  \n", ctx.source_name));
    md.push_str(&format!(
        "Generated: {}\n\n",
        ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "Rows: **{}**, columns: **{}**\n\n",
        analysis.summary.n_rows, analysis.summary.n_cols
    ));

    render_quality_section(&mut md, analysis, config);
    render_histogram_section(&mut md, config, ctx);
    render_categorical_section(&mut md, analysis, config, ctx);

    md.push_str("## Other artifacts\n\n");
    md.push_str(&format!("- Column summary: `{SUMMARY_FILE}`\n"));
    md.push_str(&format!(
        "- Missing values: `{MISSING_FILE}`, `{MISSING_MATRIX_FILE}`\n"
    ));
    md.push_str(&format!(
        "- Correlation: `{CORRELATION_FILE}`, `{CORRELATION_HEATMAP_FILE}`\n"
    ));
    md.push_str(&format!("- Top categories: `{TOP_CATEGORIES_DIR}/`\n"));
    md.push_str(&format!("- Quality flags: `{QUALITY_FLAGS_FILE}`\n"));

    md
}

fn render_quality_section(md: &mut String, analysis: &Analysis, config: &ReportConfig) {
    let flags = &analysis.flags;

    md.push_str("## Data quality (heuristics)\n\n");
    md.push_str(&format!("- Quality score: **{:.2}**\n", flags.quality_score));
    md.push_str(&format!(
        "- Missing-share threshold for problematic columns: **{:.1}%**\n",
        config.min_missing_share * 100.0
    ));

    let problematic = analysis.problematic_columns(config.min_missing_share);
    if problematic.is_empty() {
        md.push_str("- No problematic columns by missing share.\n");
    } else {
        md.push_str(&format!(
            "- Problematic columns by missing share: `{}`\n",
            problematic.join(", ")
        ));
    }

    md.push_str(&format!("- Too few rows: **{}**\n", yes_no(flags.too_few_rows)));
    md.push_str(&format!(
        "- Too many columns: **{}**\n",
        yes_no(flags.too_many_columns)
    ));
    md.push_str(&format!(
        "- Too many missing values: **{}** (max share {:.1}%)\n",
        yes_no(flags.too_many_missing),
        flags.max_missing_share * 100.0
    ));
    md.push_str(&format!(
        "- Constant columns: **{}**\n",
        yes_no(flags.has_constant_columns)
    ));
    md.push_str(&format!(
        "- High-cardinality categoricals: **{}**\n",
        yes_no(flags.has_high_cardinality_categoricals)
    ));
    md.push_str(&format!(
        "- Duplicated IDs: **{}**\n",
        yes_no(flags.has_suspicious_id_duplicates)
    ));
    md.push_str(&format!(
        "- Zero-heavy numeric columns: **{}**\n\n",
        yes_no(flags.has_many_zero_values)
    ));
}

fn render_histogram_section(md: &mut String, config: &ReportConfig, ctx: &RenderContext<'_>) {
    md.push_str("## Histograms\n\n");
    if ctx.histogram_columns.is_empty() {
        md.push_str("No numeric columns with values to plot.\n\n");
        return;
    }

    md.push_str(&format!(
        "Histograms for the first **{}** numeric columns:\n\n",
        config.max_hist_columns
    ));
    for name in ctx.histogram_columns {
        let file = format!("hist_{}.svg", sanitize_file_stem(name));
        md.push_str(&format!("- `{name}`: [`{file}`]({file})\n"));
    }
    md.push('\n');
}

fn render_categorical_section(
    md: &mut String,
    analysis: &Analysis,
    config: &ReportConfig,
    ctx: &RenderContext<'_>,
) {
    md.push_str("## Categorical columns\n\n");
    if analysis.top_categories.is_empty() {
        md.push_str("No categorical or text columns found.\n\n");
        return;
    }

    md.push_str(&format!(
        "See the tables in `{TOP_CATEGORIES_DIR}/` (top {} values per column).\n",
        config.top_k_categories
    ));
    if ctx.categorical_bar_written {
        if let Some(column) = &config.categorical_bar_column {
            md.push_str(&format!(
                "\nBar chart for **{column}** (top {} values): [`{CATEGORICAL_BAR_FILE}`]({CATEGORICAL_BAR_FILE}).\n",
                config.categorical_bar_top_n
            ));
        }
    }
    md.push('\n');
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]
    use super::*;
    use polars::prelude::*;

    fn sample_df() -> DataFrame {
        df!(
            "user_id" => &[1i64, 2, 2, 4],
            "age" => &[Some(10i64), Some(20), Some(30), None],
            "country" => &[Some("NL"), Some("DE"), Some("NL"), None]
        )
        .unwrap()
    }

    fn render(analysis: &Analysis, config: &ReportConfig, bar: bool) -> String {
        let hist = vec!["user_id".to_owned(), "age".to_owned()];
        let ctx = RenderContext {
            source_name: "people.csv",
            histogram_columns: &hist,
            categorical_bar_written: bar,
            generated_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        render_markdown(analysis, config, &ctx)
    }

    #[test]
    fn test_markdown_sections() -> anyhow::Result<()> {
        let config = ReportConfig {
            title: "People".to_owned(),
            ..ReportConfig::default()
        };
        let analysis = Analysis::compute(&sample_df(), &config)?;
        let md = render(&analysis, &config, true);

        assert!(md.starts_with("# People\n"));
        assert!(md.contains("Source file: `people.csv`"));
        assert!(md.contains("Generated: 1970-01-01 00:00:00 UTC"));
        assert!(md.contains("Rows: **4**, columns: **3**"));
        assert!(md.contains(&format!(
            "Quality score: **{:.2}**",
            analysis.flags.quality_score
        )));
        assert!(md.contains("threshold for problematic columns: **10.0%**"));
        assert!(md.contains("Problematic columns by missing share: `age, country`"));
        assert!(md.contains("Duplicated IDs: **yes**"));
        assert!(md.contains("[`hist_age.svg`](hist_age.svg)"));
        assert!(md.contains("Bar chart for **country**"));
        assert!(md.contains("`top_categories/`"));
        Ok(())
    }

    #[test]
    fn test_markdown_without_problematic_columns_or_bar() -> anyhow::Result<()> {
        let config = ReportConfig {
            min_missing_share: 0.9,
            ..ReportConfig::default()
        };
        let analysis = Analysis::compute(&sample_df(), &config)?;
        let md = render(&analysis, &config, false);

        assert!(md.contains("No problematic columns by missing share."));
        assert!(!md.contains("Bar chart for"));
        assert!(md.contains("threshold for problematic columns: **90.0%**"));
        Ok(())
    }

    #[test]
    fn test_write_tables() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let analysis = Analysis::compute(&sample_df(), &ReportConfig::default())?;
        let files = write_tables(&analysis, dir.path())?;

        for name in [SUMMARY_FILE, MISSING_FILE, CORRELATION_FILE, QUALITY_FLAGS_FILE] {
            assert!(files.contains(&dir.path().join(name)), "{name} missing");
        }
        assert!(dir.path().join(TOP_CATEGORIES_DIR).join("country.csv").exists());

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(QUALITY_FLAGS_FILE))?)?;
        assert_eq!(json["has_suspicious_id_duplicates"], serde_json::json!(true));
        assert!(json["quality_score"].is_number());
        Ok(())
    }

    #[test]
    fn test_write_tables_skips_empty_missing_and_correlation() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let df = df!("name" => Vec::<String>::new())?;
        let analysis = Analysis::compute(&df, &ReportConfig::default())?;
        write_tables(&analysis, dir.path())?;

        assert!(dir.path().join(SUMMARY_FILE).exists());
        assert!(!dir.path().join(MISSING_FILE).exists());
        assert!(!dir.path().join(CORRELATION_FILE).exists());
        assert!(dir.path().join(TOP_CATEGORIES_DIR).is_dir());
        Ok(())
    }
}
