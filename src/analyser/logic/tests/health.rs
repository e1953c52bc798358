use super::{approx_eq, sample_df};
use crate::analyser::logic::health::{
    self, MIN_ROWS, PENALTY_RULES, fired_rules, looks_zero_heavy,
};
use crate::analyser::logic::*;
use anyhow::Result;
use polars::prelude::*;

fn flags_for(df: &DataFrame) -> Result<QualityFlags> {
    let summary = summarize_dataset(df, DEFAULT_EXAMPLE_VALUES)?;
    let missing = missing_table(df);
    Ok(compute_quality_flags(&summary, &missing))
}

fn clean_flags() -> QualityFlags {
    QualityFlags {
        too_few_rows: false,
        too_many_columns: false,
        max_missing_share: 0.0,
        too_many_missing: false,
        has_constant_columns: false,
        has_high_cardinality_categoricals: false,
        has_suspicious_id_duplicates: false,
        has_many_zero_values: false,
        quality_score: 1.0,
    }
}

#[test]
fn test_missing_table_and_quality_flags() -> Result<()> {
    let flags = flags_for(&sample_df())?;
    assert!(flags.too_few_rows);
    assert!(!flags.too_many_columns);
    assert!(approx_eq(flags.max_missing_share, 0.25));
    assert!(!flags.too_many_missing);
    assert!(!flags.has_constant_columns);
    assert!(!flags.has_suspicious_id_duplicates);
    assert!(!flags.has_many_zero_values);
    assert!(approx_eq(flags.quality_score, 0.55));
    assert!((0.0..=1.0).contains(&flags.quality_score));
    Ok(())
}

#[test]
fn test_compute_quality_flags_has_constant_columns() -> Result<()> {
    let df = df!(
        "id" => &[1i64, 2, 3],
        "const" => &["A", "A", "A"],
        "values" => &[10i64, 20, 30]
    )?;
    let flags = flags_for(&df)?;
    assert!(flags.has_constant_columns);
    assert!(!flags.has_suspicious_id_duplicates);
    Ok(())
}

#[test]
fn test_compute_quality_flags_no_constant_columns() -> Result<()> {
    let df = df!(
        "id" => &[1i64, 2, 3],
        "name" => &["A", "B", "C"],
        "values" => &[10i64, 20, 30]
    )?;
    assert!(!flags_for(&df)?.has_constant_columns);
    Ok(())
}

#[test]
fn test_high_cardinality_boundary() -> Result<()> {
    let at_threshold: Vec<String> = (0..50).map(|i| format!("cat_{i}")).collect();
    let df = df!(
        "id" => (0..50i64).collect::<Vec<_>>(),
        "high_card" => at_threshold
    )?;
    assert!(
        !flags_for(&df)?.has_high_cardinality_categoricals,
        "Exactly 50 distinct values is not high cardinality"
    );

    let above: Vec<String> = (0..51).map(|i| format!("cat_{i}")).collect();
    let df = df!(
        "id" => (0..51i64).collect::<Vec<_>>(),
        "high_card" => above
    )?;
    let flags = flags_for(&df)?;
    assert!(flags.has_high_cardinality_categoricals);
    assert!(!flags.has_suspicious_id_duplicates);
    Ok(())
}

#[test]
fn test_numeric_columns_never_count_as_high_cardinality() -> Result<()> {
    let df = df!("x" => (0..200i64).collect::<Vec<_>>())?;
    assert!(!flags_for(&df)?.has_high_cardinality_categoricals);
    Ok(())
}

#[test]
fn test_compute_quality_flags_has_suspicious_id_duplicates() -> Result<()> {
    let df = df!(
        "user_id" => &[1i64, 2, 2, 4],
        "value" => &[10i64, 20, 20, 40]
    )?;
    assert!(flags_for(&df)?.has_suspicious_id_duplicates);
    Ok(())
}

#[test]
fn test_compute_quality_flags_no_suspicious_id_duplicates() -> Result<()> {
    let df = df!(
        "user_id" => &[1i64, 2, 3, 4],
        "value" => &[10i64, 20, 30, 40]
    )?;
    assert!(!flags_for(&df)?.has_suspicious_id_duplicates);
    Ok(())
}

#[test]
fn test_id_column_match_is_case_insensitive_and_first_only() -> Result<()> {
    let upper = df!("ID" => &[7i64, 7, 8])?;
    assert!(flags_for(&upper)?.has_suspicious_id_duplicates);

    let df = df!(
        "Customer_ID" => &[1i64, 2, 3],
        "id" => &[1i64, 1, 1]
    )?;
    let summary = summarize_dataset(&df, DEFAULT_EXAMPLE_VALUES)?;
    assert_eq!(
        health::find_id_column(&summary).map(|c| c.name.as_str()),
        Some("Customer_ID")
    );
    assert!(
        !health::has_suspicious_id_duplicates(&summary),
        "Only the first id-like column is checked"
    );
    Ok(())
}

#[test]
fn test_id_column_with_missing_values_counts_as_duplicated() -> Result<()> {
    let df = df!("id" => &[Some(1i64), Some(2), None])?;
    assert!(flags_for(&df)?.has_suspicious_id_duplicates);
    Ok(())
}

#[test]
fn test_many_zero_values_heuristic() -> Result<()> {
    let mut clicks = vec![0i64; 19];
    clicks.push(10);
    let mostly_zero = df!("clicks" => clicks)?;
    assert!(flags_for(&mostly_zero)?.has_many_zero_values);

    let all_zero = df!("z" => &[0.0f64, 0.0, 0.0])?;
    assert!(flags_for(&all_zero)?.has_many_zero_values);

    let spread = df!("x" => &[0i64, 5, 10])?;
    assert!(!flags_for(&spread)?.has_many_zero_values);

    let negative = df!("x" => &[-5i64, 0, 0])?;
    assert!(!flags_for(&negative)?.has_many_zero_values);

    let text = df!("s" => &["0", "0"])?;
    assert!(!flags_for(&text)?.has_many_zero_values);
    Ok(())
}

#[test]
fn test_single_zero_tolerates_nan_std() -> Result<()> {
    let df = df!("x" => &[Some(0.0f64), None])?;
    let summary = summarize_dataset(&df, DEFAULT_EXAMPLE_VALUES)?;
    assert!(summary.columns[0].std().unwrap().is_nan());
    assert!(!looks_zero_heavy(&summary.columns[0]));
    Ok(())
}

#[test]
fn test_too_many_missing_threshold() -> Result<()> {
    let half = df!("a" => &[Some(1i64), None])?;
    let flags = flags_for(&half)?;
    assert!(approx_eq(flags.max_missing_share, 0.5));
    assert!(!flags.too_many_missing, "Exactly half is not too many");

    let most = df!("a" => &[Some(1i64), None, None])?;
    assert!(flags_for(&most)?.too_many_missing);
    Ok(())
}

#[test]
fn test_row_and_column_limits() -> Result<()> {
    let rows = df!("x" => (0..MIN_ROWS as i64).collect::<Vec<_>>())?;
    assert!(!flags_for(&rows)?.too_few_rows);

    let columns: Vec<Column> = (0..101)
        .map(|i| Column::from(Series::new(format!("c{i}").as_str().into(), &[i as i64])))
        .collect();
    let wide = DataFrame::new(columns)?;
    assert!(flags_for(&wide)?.too_many_columns);
    Ok(())
}

#[test]
fn test_empty_table_score_is_bounded() -> Result<()> {
    let flags = flags_for(&DataFrame::empty())?;
    assert_eq!(flags.max_missing_share, 0.0);
    assert!(flags.too_few_rows);
    assert!(approx_eq(flags.quality_score, 0.8));
    Ok(())
}

#[test]
fn test_score_penalties_are_additive_and_clamped() {
    let flags = QualityFlags {
        too_few_rows: true,
        has_suspicious_id_duplicates: true,
        max_missing_share: 0.1,
        ..clean_flags()
    };
    assert!(approx_eq(quality_score(&flags), 1.0 - 0.1 - 0.2 - 0.15));
    assert_eq!(
        fired_rules(&flags),
        vec!["too_few_rows", "has_suspicious_id_duplicates"]
    );

    let worst = QualityFlags {
        too_few_rows: true,
        too_many_columns: true,
        max_missing_share: 1.0,
        too_many_missing: true,
        has_constant_columns: true,
        has_high_cardinality_categoricals: true,
        has_suspicious_id_duplicates: true,
        has_many_zero_values: true,
        quality_score: 0.0,
    };
    assert_eq!(quality_score(&worst), 0.0);
    assert_eq!(quality_score(&clean_flags()), 1.0);
}

#[test]
fn test_penalty_table() {
    let total: f64 = PENALTY_RULES.iter().map(|r| r.penalty).sum();
    assert!(approx_eq(total, 0.7));
    assert!(
        PENALTY_RULES.iter().all(|r| !(r.fires)(&clean_flags())),
        "No rule fires on a clean dataset"
    );
}
