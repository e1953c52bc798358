use super::{approx_eq, sample_df};
use crate::analyser::logic::io::{correlation_to_df, missing_table_to_df};
use crate::analyser::logic::*;
use crate::config::CsvOptions;
use crate::error::EdaError;
use anyhow::Result;
use polars::prelude::*;

fn write_temp(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_csv_missing_file_is_invalid_path() {
    let err = load_csv(
        std::path::Path::new("definitely/not/here.csv"),
        &CsvOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, EdaError::InvalidPath(_)));
    assert!(err.to_string().contains("definitely/not/here.csv"));
}

#[test]
fn test_load_csv_with_custom_separator() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_temp(&dir, "semi.csv", "a;b\n1;x\n2;\n");
    let opts = CsvOptions::from_args(";", "utf-8")?;

    let df = load_csv(&path, &opts)?;
    assert_eq!(df.height(), 2);
    assert_eq!(df.width(), 2);

    let summary = summarize_dataset(&df, DEFAULT_EXAMPLE_VALUES)?;
    assert!(summary.columns[0].is_numeric, "Integers are inferred as numeric");
    assert_eq!(summary.columns[1].missing, 1, "Empty fields are missing");
    Ok(())
}

#[test]
fn test_load_csv_parse_failure_is_wrapped() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_temp(&dir, "ragged.csv", "a,b\n1,2\n3,4,5,6\n");

    let err = load_csv(&path, &CsvOptions::default()).unwrap_err();
    assert!(matches!(err, EdaError::CsvParse(_)));
    assert!(err.to_string().contains("Failed to read CSV"));
    Ok(())
}

#[test]
fn test_save_missing_table() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("missing.csv");

    let mut df = missing_table_to_df(&missing_table(&sample_df()))?;
    save_df(&mut df, &path)?;

    let text = std::fs::read_to_string(&path)?;
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("column,missing_count,missing_share"));
    assert!(lines.next().unwrap().starts_with("age,1,"));
    assert_eq!(text.lines().count(), 4);
    Ok(())
}

#[test]
fn test_correlation_frame_has_label_column() -> Result<()> {
    let corr = correlation_matrix(&sample_df())?;
    let df = correlation_to_df(&corr)?;
    assert_eq!(df.width(), 3);
    assert_eq!(df.height(), 2);
    Ok(())
}

#[test]
fn test_load_csv_reads_na_tokens_as_missing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_temp(
        &dir,
        "tokens.csv",
        "id,age,score,tag\n1,23,1.5,x\n2,NA,NaN,None\n3,31,,null\n4,27,2.0,N/A\n",
    );

    let df = load_csv(&path, &CsvOptions::default())?;
    let summary = summarize_dataset(&df, DEFAULT_EXAMPLE_VALUES)?;

    let age = summary.column("age").unwrap();
    assert!(age.is_numeric, "NA does not turn a numeric column into text");
    assert_eq!(age.missing, 1);

    let score = summary.column("score").unwrap();
    assert_eq!(score.missing, 2);
    assert!(approx_eq(score.mean().unwrap(), 1.75));

    let tag = summary.column("tag").unwrap();
    assert_eq!(tag.missing, 3);
    assert_eq!(tag.example_values, vec!["x"]);

    let corr = correlation_matrix(&df)?;
    assert_eq!(corr.columns, vec!["id", "age", "score"]);
    Ok(())
}

#[test]
fn test_nan_to_null_clears_float_nan() -> Result<()> {
    let df = df!(
        "f64" => &[Some(1.0f64), Some(f64::NAN), None],
        "f32" => &[f32::NAN, 2.0, 3.0],
        "int" => &[1i64, 2, 3]
    )?;

    let df = nan_to_null(df)?;
    assert_eq!(df.column("f64")?.null_count(), 2);
    assert_eq!(df.column("f32")?.null_count(), 1);
    assert_eq!(df.column("f32")?.dtype(), &DataType::Float32);
    assert_eq!(df.column("int")?.null_count(), 0);

    let summary = summarize_dataset(&df, DEFAULT_EXAMPLE_VALUES)?;
    assert_eq!(summary.columns[0].non_null, 1);
    assert!(approx_eq(summary.columns[0].mean().unwrap(), 1.0));
    Ok(())
}

#[test]
fn test_load_csv_decodes_legacy_encoding() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("latin.csv");
    // "café,3" in ISO-8859-1
    std::fs::write(&path, b"name,n\ncaf\xe9,3\n")?;

    let opts = CsvOptions::from_args(",", "latin1")?;
    let df = load_csv(&path, &opts)?;
    let summary = summarize_dataset(&df, DEFAULT_EXAMPLE_VALUES)?;
    assert_eq!(summary.columns[0].example_values, vec!["café"]);

    let err = load_csv(&path, &CsvOptions::default()).unwrap_err();
    assert!(matches!(err, EdaError::CsvParse(_)), "Strict UTF-8 rejects 0xE9");

    let lossy = load_csv(&path, &CsvOptions::from_args(",", "utf-8-lossy")?)?;
    assert_eq!(lossy.height(), 1);
    Ok(())
}

#[test]
fn test_load_csv_unreadable_path_is_invalid_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let err = load_csv(dir.path(), &CsvOptions::default()).unwrap_err();
    assert!(matches!(err, EdaError::InvalidPath(_)));
    assert!(err.to_string().contains(&dir.path().display().to_string()));
    Ok(())
}
