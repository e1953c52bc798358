//! Rule-based data quality heuristics.
//!
//! Each flag is evaluated independently from the dataset summary and the
//! missing table. The score starts at 1.0, loses the worst missing share, then
//! loses a fixed penalty for every rule in [`PENALTY_RULES`] that fires, and
//! is clamped to [0.0, 1.0].

use super::types::{ColumnSummary, DatasetSummary, MissingTable, QualityFlags};

pub const MIN_ROWS: usize = 100;
pub const MAX_COLUMNS: usize = 100;
pub const MAX_MISSING_SHARE: f64 = 0.5;
pub const HIGH_CARDINALITY_THRESHOLD: usize = 50;
pub const ID_COLUMN_NAMES: [&str; 3] = ["id", "user_id", "customer_id"];
/// A column whose mean is at most this fraction of its max looks zero-heavy.
pub const ZERO_MEAN_RATIO: f64 = 0.1;

/// A boolean flag and the score it costs when set.
pub struct QualityRule {
    pub name: &'static str,
    pub penalty: f64,
    pub fires: fn(&QualityFlags) -> bool,
}

pub const PENALTY_RULES: [QualityRule; 6] = [
    QualityRule {
        name: "too_few_rows",
        penalty: 0.2,
        fires: |f| f.too_few_rows,
    },
    QualityRule {
        name: "too_many_columns",
        penalty: 0.1,
        fires: |f| f.too_many_columns,
    },
    QualityRule {
        name: "has_constant_columns",
        penalty: 0.1,
        fires: |f| f.has_constant_columns,
    },
    QualityRule {
        name: "has_high_cardinality_categoricals",
        penalty: 0.05,
        fires: |f| f.has_high_cardinality_categoricals,
    },
    QualityRule {
        name: "has_suspicious_id_duplicates",
        penalty: 0.15,
        fires: |f| f.has_suspicious_id_duplicates,
    },
    QualityRule {
        name: "has_many_zero_values",
        penalty: 0.1,
        fires: |f| f.has_many_zero_values,
    },
];

pub fn has_constant_columns(summary: &DatasetSummary) -> bool {
    summary.columns.iter().any(|c| c.unique == 1)
}

pub fn has_high_cardinality_categoricals(summary: &DatasetSummary) -> bool {
    summary
        .columns
        .iter()
        .any(|c| !c.is_numeric && c.unique > HIGH_CARDINALITY_THRESHOLD)
}

/// First column whose lowercased name is a known identifier name.
pub fn find_id_column(summary: &DatasetSummary) -> Option<&ColumnSummary> {
    summary
        .columns
        .iter()
        .find(|c| ID_COLUMN_NAMES.contains(&c.name.to_lowercase().as_str()))
}

/// An id column with fewer distinct values than rows holds duplicates.
pub fn has_suspicious_id_duplicates(summary: &DatasetSummary) -> bool {
    find_id_column(summary).is_some_and(|c| c.unique < summary.n_rows)
}

/// Approximates "mostly zeros" from the aggregates alone.
///
/// With a positive max the column is flagged when its min is zero and its
/// mean is small relative to the max. Otherwise only an all-zero column
/// (zero std and zero mean) is flagged.
pub fn looks_zero_heavy(col: &ColumnSummary) -> bool {
    if !col.is_numeric || col.non_null == 0 {
        return false;
    }
    let Some(stats) = col.stats else {
        return false;
    };
    if stats.min != 0.0 {
        return false;
    }

    if stats.max > 0.0 {
        stats.mean <= ZERO_MEAN_RATIO * stats.max
    } else {
        stats.std == 0.0 && stats.mean == 0.0
    }
}

pub fn has_many_zero_values(summary: &DatasetSummary) -> bool {
    summary.columns.iter().any(looks_zero_heavy)
}

/// 1.0 minus the worst missing share minus every fired penalty, clamped.
pub fn quality_score(flags: &QualityFlags) -> f64 {
    let penalties: f64 = PENALTY_RULES
        .iter()
        .filter(|rule| (rule.fires)(flags))
        .map(|rule| rule.penalty)
        .sum();
    (1.0 - flags.max_missing_share - penalties).clamp(0.0, 1.0)
}

/// Names of the penalty rules that fired.
pub fn fired_rules(flags: &QualityFlags) -> Vec<&'static str> {
    PENALTY_RULES
        .iter()
        .filter(|rule| (rule.fires)(flags))
        .map(|rule| rule.name)
        .collect()
}

pub fn compute_quality_flags(summary: &DatasetSummary, missing: &MissingTable) -> QualityFlags {
    let max_missing_share = missing.max_share();

    let mut flags = QualityFlags {
        too_few_rows: summary.n_rows < MIN_ROWS,
        too_many_columns: summary.n_cols > MAX_COLUMNS,
        max_missing_share,
        too_many_missing: max_missing_share > MAX_MISSING_SHARE,
        has_constant_columns: has_constant_columns(summary),
        has_high_cardinality_categoricals: has_high_cardinality_categoricals(summary),
        has_suspicious_id_duplicates: has_suspicious_id_duplicates(summary),
        has_many_zero_values: has_many_zero_values(summary),
        quality_score: 0.0,
    };
    flags.quality_score = quality_score(&flags);

    tracing::debug!(
        "Quality score {:.2}, fired rules: {:?}",
        flags.quality_score,
        fired_rules(&flags)
    );

    flags
}
