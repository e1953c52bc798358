//! Per-column building blocks for the dataset summary.
//!
//! Everything here works on a single Polars column and never fails on
//! degenerate input: an empty or all-null column yields empty examples and no
//! numeric statistics rather than an error. Missing numeric aggregates stay
//! `None` instead of collapsing to zero.

use super::types::NumericStats;
use anyhow::Result;
use polars::prelude::*;
use std::collections::{HashMap, HashSet};

/// True for dtypes that support arithmetic aggregation (integers and floats).
///
/// Text that merely looks numeric does not count, and neither do booleans.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    dtype.is_primitive_numeric()
}

/// True for text and categorical dtypes, the candidates for frequency tables.
pub fn is_categorical_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::String | DataType::Categorical(..) | DataType::Enum(..)
    )
}

pub fn non_null_count(col: &Column) -> usize {
    col.len().saturating_sub(col.null_count())
}

/// Number of distinct values, ignoring nulls.
pub fn unique_non_null(col: &Column) -> Result<usize> {
    let series = col.as_materialized_series().drop_nulls();
    if series.is_empty() {
        return Ok(0);
    }
    Ok(series.n_unique()?)
}

/// Non-null values rendered as strings, in row order.
pub fn string_values(col: &Column) -> Result<Vec<String>> {
    let series = col.as_materialized_series().drop_nulls();
    let as_str = series.cast(&DataType::String)?;
    let ca = as_str.str()?;
    Ok(ca.into_iter().flatten().map(str::to_owned).collect())
}

/// Up to `limit` distinct non-null values in order of first appearance.
pub fn example_values(col: &Column, limit: usize) -> Result<Vec<String>> {
    if limit == 0 || non_null_count(col) == 0 {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    let mut examples = Vec::with_capacity(limit);
    for value in string_values(col)? {
        if examples.len() == limit {
            break;
        }
        if seen.insert(value.clone()) {
            examples.push(value);
        }
    }
    Ok(examples)
}

/// Column cast to `f64`, nulls kept in place.
pub fn float_values(col: &Column) -> Result<Vec<Option<f64>>> {
    let series = col.as_materialized_series().cast(&DataType::Float64)?;
    let ca = series.f64()?;
    Ok(ca.into_iter().collect())
}

/// Min, max, mean and sample std of a numeric column.
///
/// Returns `None` when the column has no non-null values.
pub fn numeric_stats(col: &Column) -> Result<Option<NumericStats>> {
    let series = col.as_materialized_series().cast(&DataType::Float64)?;
    let ca = series.f64()?;
    if ca.len() == ca.null_count() {
        return Ok(None);
    }

    let (Some(min), Some(max), Some(mean)) = (ca.min(), ca.max(), ca.mean()) else {
        return Ok(None);
    };
    let std = ca.std(1).unwrap_or(f64::NAN);

    Ok(Some(NumericStats {
        min,
        max,
        mean,
        std,
    }))
}

/// Occurrence counts of each distinct non-null value, in first-seen order.
pub fn value_counts_in_order(col: &Column) -> Result<Vec<(String, usize)>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for value in string_values(col)? {
        if let Some(&pos) = index.get(&value) {
            if let Some(entry) = counts.get_mut(pos) {
                entry.1 += 1;
            }
        } else {
            index.insert(value.clone(), counts.len());
            counts.push((value, 1));
        }
    }
    Ok(counts)
}

/// The `k` most frequent values, ties kept in first-seen order.
pub fn top_k_counts(mut counts: Vec<(String, usize)>, k: usize) -> Vec<(String, usize)> {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(k);
    counts
}

/// Pearson correlation over the rows where both values are present.
///
/// NaN when fewer than two complete pairs exist or either side has zero
/// variance.
pub fn pearson_pairwise(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let divisor = (sxx * syy).sqrt();
    if divisor == 0.0 {
        return f64::NAN;
    }
    (sxy / divisor).clamp(-1.0, 1.0)
}

/// Variance check used for the diagonal: a column correlates 1.0 with itself
/// only if it has at least two distinct values.
pub fn has_variance(values: &[Option<f64>]) -> bool {
    let mut present = values.iter().flatten().filter(|v| !v.is_nan());
    let Some(first) = present.next() else {
        return false;
    };
    present.any(|v| v != first)
}

/// Equal-width histogram over `values`, as `(bin_start, bin_end, count)`.
///
/// A constant column gets a single unit-wide bin centred on the value.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<(f64, f64, usize)> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let (Some(min_v), Some(max_v)) = (
        finite.iter().copied().reduce(f64::min),
        finite.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };

    if bins == 0 {
        return Vec::new();
    }

    if (max_v - min_v).abs() < f64::EPSILON {
        return vec![(min_v - 0.5, min_v + 0.5, finite.len())];
    }

    let bin_width = (max_v - min_v) / bins as f64;
    let mut counts = vec![0usize; bins];
    for val in &finite {
        let idx = (((val - min_v) / bin_width).floor() as usize).min(bins - 1);
        if let Some(c) = counts.get_mut(idx) {
            *c += 1;
        }
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let start = min_v + i as f64 * bin_width;
            (start, start + bin_width, count)
        })
        .collect()
}
