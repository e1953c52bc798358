//! SVG figures for the report directory.
//!
//! Histograms go through a plotters chart with axes; the grid-shaped figures
//! (missing matrix, correlation heatmap, category bars) are laid out by hand
//! in pixel coordinates.

use crate::analyser::logic::profiling;
use crate::analyser::logic::{CorrelationMatrix, DatasetSummary};
use crate::error::{EdaError, Result};
use crate::utils::{sanitize_file_stem, truncate_label};
use plotters::prelude::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};

pub const HISTOGRAM_BINS: usize = 20;

/// Above this many rows the missing matrix shows every n-th row.
pub const MAX_MATRIX_ROWS: usize = 400;

const ACCENT: RGBColor = RGBColor(211, 47, 47);
const NEGATIVE: RGBColor = RGBColor(41, 121, 255);
const NEUTRAL: RGBColor = RGBColor(245, 245, 245);
const UNDEFINED: RGBColor = RGBColor(189, 189, 189);
const MISSING_CELL: RGBColor = RGBColor(33, 33, 33);
const PRESENT_CELL: RGBColor = RGBColor(224, 224, 224);

fn plot_err(e: impl std::fmt::Display) -> EdaError {
    EdaError::Plot(e.to_string())
}

fn font(size: i32) -> FontDesc<'static> {
    ("sans-serif", size).into_font()
}

fn px(v: usize) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

fn dims(width: i32, height: i32) -> (u32, u32) {
    (width.max(1).unsigned_abs(), height.max(1).unsigned_abs())
}

/// A titled figure carrying only a message, for inputs with nothing to draw.
pub fn plot_placeholder(path: &Path, title: &str, message: &str) -> Result<()> {
    let root = SVGBackend::new(path, (640, 200)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    root.draw(&Text::new(title.to_owned(), (20, 30), font(20)))
        .map_err(plot_err)?;
    root.draw(&Text::new(message.to_owned(), (20, 90), font(14)))
        .map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

/// Equal-width histogram of the finite values in `values`.
///
/// Returns `false` without touching the filesystem when there is nothing to
/// bin.
pub fn plot_histogram(values: &[f64], column: &str, path: &Path) -> Result<bool> {
    let bins = profiling::histogram_bins(values, HISTOGRAM_BINS);
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Ok(false);
    };
    let (x_min, x_max) = (first.0, last.1);
    let y_max = bins.iter().map(|b| b.2).max().unwrap_or(1);

    let root = SVGBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Distribution of {column}"), font(22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, 0usize..y_max + 1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(column)
        .y_desc("count")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(bins.iter().map(|&(start, end, count)| {
            Rectangle::new([(start, 0), (end, count)], ACCENT.mix(0.6).filled())
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(true)
}

/// One `hist_<column>.svg` per numeric column, for the first `max_columns`
/// numeric columns in table order.
///
/// Columns without a single finite value are skipped.
pub fn plot_histograms(
    df: &DataFrame,
    summary: &DatasetSummary,
    out_dir: &Path,
    max_columns: usize,
) -> Result<Vec<(String, PathBuf)>> {
    let mut written = Vec::new();
    for col_summary in summary.numeric_columns().take(max_columns) {
        let col = df.column(&col_summary.name)?;
        let values: Vec<f64> = profiling::float_values(col)?
            .into_iter()
            .flatten()
            .collect();

        let path = out_dir.join(format!("hist_{}.svg", sanitize_file_stem(&col_summary.name)));
        if plot_histogram(&values, &col_summary.name, &path)? {
            written.push((col_summary.name.clone(), path));
        } else {
            tracing::debug!("Skipping histogram for '{}': no values", col_summary.name);
        }
    }
    Ok(written)
}

/// Rows x columns grid with missing cells drawn dark.
pub fn plot_missing_matrix(df: &DataFrame, path: &Path) -> Result<()> {
    if df.width() == 0 || df.height() == 0 {
        return plot_placeholder(path, "Missing values", "The table is empty.");
    }

    let step = df.height().div_ceil(MAX_MATRIX_ROWS).max(1);
    let shown: Vec<usize> = (0..df.height()).step_by(step).collect();

    let cell_w = 60;
    let cell_h = (480 / px(shown.len())).clamp(1, 12);
    let label_width = 60;
    let header_height = 70;
    let width = label_width + px(df.width()) * cell_w + 20;
    let height = header_height + px(shown.len()) * cell_h + 20;

    let root = SVGBackend::new(path, dims(width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let title = if step > 1 {
        format!("Missing values (one row in {step})")
    } else {
        "Missing values".to_owned()
    };
    root.draw(&Text::new(title, (10, 20), font(16)))
        .map_err(plot_err)?;
    root.draw(&Text::new("row".to_owned(), (10, header_height), font(11)))
        .map_err(plot_err)?;

    root.draw(&Rectangle::new(
        [
            (label_width, header_height),
            (width - 20, header_height + px(shown.len()) * cell_h),
        ],
        PRESENT_CELL.filled(),
    ))
    .map_err(plot_err)?;

    for (j, col) in df.get_columns().iter().enumerate() {
        let x0 = label_width + px(j) * cell_w;
        root.draw(&Text::new(
            truncate_label(col.name(), 9),
            (x0 + 2, header_height - 12),
            font(10),
        ))
        .map_err(plot_err)?;

        let mask = col.as_materialized_series().is_null();
        for (k, &row) in shown.iter().enumerate() {
            if mask.get(row).unwrap_or(false) {
                let y0 = header_height + px(k) * cell_h;
                root.draw(&Rectangle::new(
                    [(x0 + 1, y0), (x0 + cell_w - 1, y0 + cell_h)],
                    MISSING_CELL.filled(),
                ))
                .map_err(plot_err)?;
            }
        }
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

fn blend(from: RGBColor, to: RGBColor, t: f64) -> RGBColor {
    let channel = |a: u8, b: u8| {
        let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
        v.round().clamp(0.0, 255.0) as u8
    };
    RGBColor(
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}

/// Diverging scale: -1 is blue, 0 is near white, 1 is red. NaN is grey.
pub fn correlation_colour(value: f64) -> RGBColor {
    if value.is_nan() {
        return UNDEFINED;
    }
    let target = if value > 0.0 { ACCENT } else { NEGATIVE };
    blend(NEUTRAL, target, value.abs().min(1.0))
}

/// Annotated heatmap of a correlation matrix.
///
/// An empty matrix produces a placeholder figure instead.
pub fn plot_correlation_heatmap(matrix: &CorrelationMatrix, path: &Path) -> Result<()> {
    if matrix.is_empty() {
        return plot_placeholder(
            path,
            "Correlation heatmap",
            "No numeric columns with data; nothing to correlate.",
        );
    }

    let n = px(matrix.columns.len());
    let cell_size = 48;
    let label_width = 170;
    let header_height = 90;
    let width = label_width + n * cell_size + 20;
    let height = header_height + n * cell_size + 20;

    let root = SVGBackend::new(path, dims(width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    root.draw(&Text::new("Correlation heatmap".to_owned(), (10, 20), font(16)))
        .map_err(plot_err)?;

    for (j, name) in matrix.columns.iter().enumerate() {
        let x = label_width + px(j) * cell_size + 2;
        // Stagger the headers so neighbouring labels do not collide.
        let y = header_height - 12 - if j % 2 == 0 { 0 } else { 16 };
        root.draw(&Text::new(truncate_label(name, 8), (x, y), font(10)))
            .map_err(plot_err)?;
    }

    for (i, (row_name, row)) in matrix.columns.iter().zip(&matrix.data).enumerate() {
        let y0 = header_height + px(i) * cell_size;
        root.draw(&Text::new(
            truncate_label(row_name, 24),
            (10, y0 + cell_size / 2 - 6),
            font(11),
        ))
        .map_err(plot_err)?;

        for (j, &val) in row.iter().enumerate() {
            let x0 = label_width + px(j) * cell_size;
            root.draw(&Rectangle::new(
                [(x0 + 1, y0 + 1), (x0 + cell_size - 1, y0 + cell_size - 1)],
                correlation_colour(val).filled(),
            ))
            .map_err(plot_err)?;

            let label = if val.is_nan() {
                "nan".to_owned()
            } else {
                format!("{val:.2}")
            };
            let text_colour = if val.abs() > 0.6 { WHITE } else { BLACK };
            root.draw(&Text::new(
                label,
                (x0 + 8, y0 + cell_size / 2 - 6),
                font(11).color(&text_colour),
            ))
            .map_err(plot_err)?;
        }
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Horizontal bars for the `top_n` most frequent values of `column`.
///
/// Returns `false` and writes nothing when the column does not exist.
pub fn plot_categorical_bar(
    df: &DataFrame,
    column: &str,
    path: &Path,
    top_n: usize,
) -> Result<bool> {
    let Ok(col) = df.column(column) else {
        tracing::warn!("Column '{column}' not found; skipping categorical bar chart");
        return Ok(false);
    };

    let counts = profiling::top_k_counts(profiling::value_counts_in_order(col)?, top_n);
    if counts.is_empty() {
        plot_placeholder(
            path,
            &format!("Top values of {column}"),
            "The column has no values.",
        )?;
        return Ok(true);
    }

    let max_count = counts.iter().map(|c| c.1).max().unwrap_or(1).max(1);
    let label_width = 190;
    let bar_area = 480;
    let row_height = 28;
    let header_height = 50;
    let width = label_width + bar_area + 80;
    let height = header_height + px(counts.len()) * row_height + 20;

    let root = SVGBackend::new(path, dims(width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    root.draw(&Text::new(format!("Top values of {column}"), (10, 20), font(16)))
        .map_err(plot_err)?;

    for (i, (value, count)) in counts.iter().enumerate() {
        let y0 = header_height + px(i) * row_height;
        let bar_len = (px(*count) * bar_area / px(max_count)).max(1);

        root.draw(&Text::new(
            truncate_label(value, 26),
            (10, y0 + row_height / 2 - 6),
            font(12),
        ))
        .map_err(plot_err)?;
        root.draw(&Rectangle::new(
            [(label_width, y0 + 3), (label_width + bar_len, y0 + row_height - 3)],
            ACCENT.mix(0.7).filled(),
        ))
        .map_err(plot_err)?;
        root.draw(&Text::new(
            count.to_string(),
            (label_width + bar_len + 6, y0 + row_height / 2 - 6),
            font(12),
        ))
        .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(true)
}
