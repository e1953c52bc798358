use super::profiling;
use super::types::{
    CategoryCount, CategoryTable, ColumnSummary, CorrelationMatrix, DatasetSummary, MissingRow,
    MissingTable, TopCategories,
};
use anyhow::{Context as _, Result};
use polars::prelude::*;

pub const DEFAULT_EXAMPLE_VALUES: usize = 3;
pub const DEFAULT_MAX_CATEGORY_COLUMNS: usize = 5;
pub const DEFAULT_TOP_K: usize = 5;

fn missing_share(missing: usize, rows: usize) -> f64 {
    if rows == 0 {
        0.0
    } else {
        missing as f64 / rows as f64
    }
}

/// Summarises every column of `df`, preserving column order.
pub fn summarize_dataset(df: &DataFrame, example_values_per_column: usize) -> Result<DatasetSummary> {
    let n_rows = df.height();
    let mut columns = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let name = col.name().to_string();
        let dtype = col.dtype();

        let non_null = profiling::non_null_count(col);
        let missing = n_rows.saturating_sub(non_null);
        let unique = profiling::unique_non_null(col)
            .with_context(|| format!("Unique count failed for column '{name}'"))?;
        let example_values = profiling::example_values(col, example_values_per_column)
            .with_context(|| format!("Example extraction failed for column '{name}'"))?;

        let is_numeric = profiling::is_numeric_dtype(dtype);
        let stats = if is_numeric && non_null > 0 {
            profiling::numeric_stats(col)
                .with_context(|| format!("Numeric analysis failed for column '{name}'"))?
        } else {
            None
        };

        columns.push(ColumnSummary {
            name,
            dtype: dtype.to_string(),
            non_null,
            missing,
            missing_share: missing_share(missing, n_rows),
            unique,
            example_values,
            is_numeric,
            stats,
        });
    }

    tracing::debug!("Summarised {} columns over {} rows", columns.len(), n_rows);

    Ok(DatasetSummary {
        n_rows,
        n_cols: df.width(),
        columns,
    })
}

/// Missing count and share per column, sorted by descending share.
///
/// Ties keep the original column order. An empty table (no rows or no
/// columns) gives an empty result.
pub fn missing_table(df: &DataFrame) -> MissingTable {
    let n_rows = df.height();
    if n_rows == 0 || df.width() == 0 {
        return MissingTable::default();
    }

    let mut rows: Vec<MissingRow> = df
        .get_columns()
        .iter()
        .map(|col| {
            let missing_count = col.null_count();
            MissingRow {
                column: col.name().to_string(),
                missing_count,
                missing_share: missing_share(missing_count, n_rows),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.missing_share.total_cmp(&a.missing_share));
    MissingTable { rows }
}

/// Pairwise-complete Pearson correlation over the numeric columns.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    if df.height() == 0 {
        return Ok(CorrelationMatrix::default());
    }

    let mut columns = Vec::new();
    let mut values = Vec::new();
    for col in df.get_columns() {
        if profiling::is_numeric_dtype(col.dtype()) {
            columns.push(col.name().to_string());
            values.push(profiling::float_values(col)?);
        }
    }

    if columns.is_empty() {
        return Ok(CorrelationMatrix::default());
    }

    let n = values.len();
    let mut data = vec![vec![f64::NAN; n]; n];
    for (i, x) in values.iter().enumerate() {
        for (j, y) in values.iter().enumerate().skip(i) {
            let r = if i == j {
                if profiling::has_variance(x) { 1.0 } else { f64::NAN }
            } else {
                profiling::pearson_pairwise(x, y)
            };
            if let Some(cell) = data.get_mut(i).and_then(|row| row.get_mut(j)) {
                *cell = r;
            }
            if let Some(cell) = data.get_mut(j).and_then(|row| row.get_mut(i)) {
                *cell = r;
            }
        }
    }

    Ok(CorrelationMatrix { columns, data })
}

/// Top-k value frequencies for the first `max_columns` text/categorical
/// columns.
///
/// Shares are relative to the retained top-k total. Columns without any
/// non-missing value produce no table.
pub fn top_categories(df: &DataFrame, max_columns: usize, top_k: usize) -> Result<TopCategories> {
    let mut tables = Vec::new();

    let candidates = df
        .get_columns()
        .iter()
        .filter(|c| profiling::is_categorical_dtype(c.dtype()))
        .take(max_columns);

    for col in candidates {
        let counts = profiling::value_counts_in_order(col)?;
        let top = profiling::top_k_counts(counts, top_k);
        if top.is_empty() {
            continue;
        }

        let total: usize = top.iter().map(|(_, c)| c).sum();
        let rows = top
            .into_iter()
            .map(|(value, count)| CategoryCount {
                value,
                count,
                share: count as f64 / total as f64,
            })
            .collect();

        tables.push(CategoryTable {
            column: col.name().to_string(),
            rows,
        });
    }

    Ok(TopCategories { tables })
}

/// One row per column with the printable summary fields.
pub fn flatten_summary(summary: &DatasetSummary) -> Result<DataFrame> {
    let cols = &summary.columns;

    let names: Vec<&str> = cols.iter().map(|c| c.name.as_str()).collect();
    let dtypes: Vec<&str> = cols.iter().map(|c| c.dtype.as_str()).collect();
    let non_null: Vec<u64> = cols.iter().map(|c| c.non_null as u64).collect();
    let missing: Vec<u64> = cols.iter().map(|c| c.missing as u64).collect();
    let shares: Vec<f64> = cols.iter().map(|c| c.missing_share).collect();
    let unique: Vec<u64> = cols.iter().map(|c| c.unique as u64).collect();
    let is_numeric: Vec<bool> = cols.iter().map(|c| c.is_numeric).collect();
    let min: Vec<Option<f64>> = cols.iter().map(ColumnSummary::min).collect();
    let max: Vec<Option<f64>> = cols.iter().map(ColumnSummary::max).collect();
    let mean: Vec<Option<f64>> = cols.iter().map(ColumnSummary::mean).collect();
    let std: Vec<Option<f64>> = cols.iter().map(ColumnSummary::std).collect();

    let df = DataFrame::new(vec![
        Column::from(Series::new("name".into(), names)),
        Column::from(Series::new("dtype".into(), dtypes)),
        Column::from(Series::new("non_null".into(), non_null)),
        Column::from(Series::new("missing".into(), missing)),
        Column::from(Series::new("missing_share".into(), shares)),
        Column::from(Series::new("unique".into(), unique)),
        Column::from(Series::new("is_numeric".into(), is_numeric)),
        Column::from(Series::new("min".into(), min)),
        Column::from(Series::new("max".into(), max)),
        Column::from(Series::new("mean".into(), mean)),
        Column::from(Series::new("std".into(), std)),
    ])?;
    Ok(df)
}
