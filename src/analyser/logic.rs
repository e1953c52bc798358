//! Statistics and quality heuristics over an in-memory table.
//!
//! Every public function here is a pure function of its input: running it
//! twice on the same `DataFrame` gives identical results.

pub mod analysis;
pub mod health;
pub mod io;
pub mod profiling;
pub mod types;

pub use analysis::{
    DEFAULT_EXAMPLE_VALUES, DEFAULT_MAX_CATEGORY_COLUMNS, DEFAULT_TOP_K, correlation_matrix,
    flatten_summary, missing_table, summarize_dataset, top_categories,
};
pub use health::{compute_quality_flags, quality_score};
pub use io::{load_csv, nan_to_null, save_df};
pub use types::{
    CategoryCount, CategoryTable, ColumnSummary, CorrelationMatrix, DatasetSummary, FlagValue,
    MissingRow, MissingTable, NumericStats, QualityFlags, TopCategories,
};
