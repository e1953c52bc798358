use serde::{Deserialize, Serialize};

/// Numeric aggregates, present only for numeric columns with at least one value.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation (n - 1). NaN for a single observation.
    pub std: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
    pub missing: usize,
    pub missing_share: f64,
    /// Distinct non-missing values.
    pub unique: usize,
    pub example_values: Vec<String>,
    pub is_numeric: bool,
    pub stats: Option<NumericStats>,
}

impl ColumnSummary {
    pub fn min(&self) -> Option<f64> {
        self.stats.map(|s| s.min)
    }

    pub fn max(&self) -> Option<f64> {
        self.stats.map(|s| s.max)
    }

    pub fn mean(&self) -> Option<f64> {
        self.stats.map(|s| s.mean)
    }

    pub fn std(&self) -> Option<f64> {
        self.stats.map(|s| s.std)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct DatasetSummary {
    pub n_rows: usize,
    pub n_cols: usize,
    pub columns: Vec<ColumnSummary>,
}

impl DatasetSummary {
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnSummary> {
        self.columns.iter().filter(|c| c.is_numeric)
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct MissingRow {
    pub column: String,
    pub missing_count: usize,
    pub missing_share: f64,
}

/// Missing counts per column, sorted by descending share.
#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq)]
pub struct MissingTable {
    pub rows: Vec<MissingRow>,
}

impl MissingTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, column: &str) -> Option<&MissingRow> {
        self.rows.iter().find(|r| r.column == column)
    }

    /// Largest missing share, 0.0 when the table is empty.
    pub fn max_share(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.missing_share)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            .unwrap_or(0.0)
    }

    /// Column names whose share reaches `threshold`, in table order.
    pub fn columns_at_or_above(&self, threshold: f64) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|r| r.missing_share >= threshold)
            .map(|r| r.column.as_str())
            .collect()
    }
}

/// Square Pearson matrix over the numeric columns. Undefined cells are NaN.
#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub data: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        self.data.get(i).and_then(|r| r.get(j)).copied()
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    /// Share of the retained top-k total, not of the whole column.
    pub share: f64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CategoryTable {
    pub column: String,
    pub rows: Vec<CategoryCount>,
}

/// Per-column top-k tables in column order.
#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq)]
pub struct TopCategories {
    pub tables: Vec<CategoryTable>,
}

impl TopCategories {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn get(&self, column: &str) -> Option<&CategoryTable> {
        self.tables.iter().find(|t| t.column == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Float(f64),
}

impl std::fmt::Display for FlagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Float(v) => write!(f, "{v:.4}"),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct QualityFlags {
    pub too_few_rows: bool,
    pub too_many_columns: bool,
    pub max_missing_share: f64,
    pub too_many_missing: bool,
    pub has_constant_columns: bool,
    pub has_high_cardinality_categoricals: bool,
    pub has_suspicious_id_duplicates: bool,
    pub has_many_zero_values: bool,
    /// Clamped to [0.0, 1.0].
    pub quality_score: f64,
}

impl QualityFlags {
    /// Flag name to value pairs, in evaluation order.
    pub fn entries(&self) -> Vec<(&'static str, FlagValue)> {
        vec![
            ("too_few_rows", FlagValue::Bool(self.too_few_rows)),
            ("too_many_columns", FlagValue::Bool(self.too_many_columns)),
            ("max_missing_share", FlagValue::Float(self.max_missing_share)),
            ("too_many_missing", FlagValue::Bool(self.too_many_missing)),
            (
                "has_constant_columns",
                FlagValue::Bool(self.has_constant_columns),
            ),
            (
                "has_high_cardinality_categoricals",
                FlagValue::Bool(self.has_high_cardinality_categoricals),
            ),
            (
                "has_suspicious_id_duplicates",
                FlagValue::Bool(self.has_suspicious_id_duplicates),
            ),
            (
                "has_many_zero_values",
                FlagValue::Bool(self.has_many_zero_values),
            ),
            ("quality_score", FlagValue::Float(self.quality_score)),
        ]
    }

    pub fn get(&self, name: &str) -> Option<FlagValue> {
        self.entries()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}
