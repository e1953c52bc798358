use super::types::{CategoryTable, CorrelationMatrix, MissingTable};
use crate::config::{CsvOptions, CsvTextEncoding};
use crate::error::{EdaError, Result, ResultExt as _};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

/// Field values read as missing, in addition to empty fields.
pub const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Reads a CSV file with a header row into a `DataFrame`.
///
/// The file is decoded with `options.encoding` first. Empty fields and the
/// [`NA_TOKENS`] become nulls, and so does any float NaN left after parsing.
///
/// # Errors
///
/// `InvalidPath` if the file does not exist or cannot be read, `CsvParse`
/// if the bytes are not valid in the requested encoding or Polars rejects
/// the text.
pub fn load_csv(path: &Path, options: &CsvOptions) -> Result<DataFrame> {
    let bytes = read_input(path)?;
    let text = decode_input(&bytes, options.encoding, path)?;

    let null_values = NullValues::AllColumns(NA_TOKENS.iter().map(|t| (*t).into()).collect());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10_000))
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(options.separator)
                .with_null_values(Some(null_values)),
        )
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()
        .map_err(|e| EdaError::CsvParse(format!("Failed to read CSV: {e}")))?;
    let df = nan_to_null(df)?;

    tracing::info!(
        "Loaded {} rows x {} columns from {} ({})",
        df.height(),
        df.width(),
        path.display(),
        options.encoding
    );
    Ok(df)
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EdaError::InvalidPath(format!("File '{}' not found", path.display()))
        } else {
            EdaError::InvalidPath(format!("Cannot read '{}': {e}", path.display()))
        }
    })
}

/// Decodes `bytes` to UTF-8 text. A byte order mark overrides the label.
fn decode_input(bytes: &[u8], encoding: CsvTextEncoding, path: &Path) -> Result<String> {
    let (text, used, had_errors) = encoding.encoding().decode(bytes);
    if had_errors {
        if !encoding.is_lossy() {
            return Err(EdaError::CsvParse(format!(
                "Failed to read CSV: '{}' is not valid {}",
                path.display(),
                used.name()
            )));
        }
        tracing::warn!(
            "Replaced malformed {} sequences in {}",
            used.name(),
            path.display()
        );
    }
    Ok(text.into_owned())
}

/// Replaces NaN in every float column with null.
///
/// # Errors
///
/// Returns an error if the rebuilt columns do not form a valid frame.
pub fn nan_to_null(df: DataFrame) -> Result<DataFrame> {
    let columns = df
        .take_columns()
        .into_iter()
        .map(|col| {
            if matches!(col.dtype(), DataType::Float32 | DataType::Float64) {
                float_nan_to_null(&col)
            } else {
                Ok(col)
            }
        })
        .collect::<PolarsResult<Vec<_>>>()?;
    Ok(DataFrame::new(columns)?)
}

fn float_nan_to_null(col: &Column) -> PolarsResult<Column> {
    let name = col.name().clone();
    let series = col.as_materialized_series();
    let cleaned = if let Ok(ca) = series.f32() {
        ca.into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect::<Float32Chunked>()
            .with_name(name)
            .into_series()
    } else {
        series
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect::<Float64Chunked>()
            .with_name(name)
            .into_series()
    };
    Ok(Column::from(cleaned))
}

/// Writes `df` as a comma-separated file with a header.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_df(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

pub fn missing_table_to_df(table: &MissingTable) -> Result<DataFrame> {
    let names: Vec<&str> = table.rows.iter().map(|r| r.column.as_str()).collect();
    let counts: Vec<u64> = table.rows.iter().map(|r| r.missing_count as u64).collect();
    let shares: Vec<f64> = table.rows.iter().map(|r| r.missing_share).collect();

    Ok(DataFrame::new(vec![
        Column::from(Series::new("column".into(), names)),
        Column::from(Series::new("missing_count".into(), counts)),
        Column::from(Series::new("missing_share".into(), shares)),
    ])?)
}

/// The matrix with an unnamed leading label column, like an indexed table.
pub fn correlation_to_df(matrix: &CorrelationMatrix) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(matrix.columns.len() + 1);
    columns.push(Column::from(Series::new(
        "".into(),
        matrix.columns.iter().map(String::as_str).collect::<Vec<_>>(),
    )));

    for (j, name) in matrix.columns.iter().enumerate() {
        let values: Vec<f64> = matrix
            .data
            .iter()
            .map(|row| row.get(j).copied().unwrap_or(f64::NAN))
            .collect();
        columns.push(Column::from(Series::new(name.as_str().into(), values)));
    }

    Ok(DataFrame::new(columns)?)
}

pub fn category_table_to_df(table: &CategoryTable) -> Result<DataFrame> {
    let values: Vec<&str> = table.rows.iter().map(|r| r.value.as_str()).collect();
    let counts: Vec<u64> = table.rows.iter().map(|r| r.count as u64).collect();
    let shares: Vec<f64> = table.rows.iter().map(|r| r.share).collect();

    Ok(DataFrame::new(vec![
        Column::from(Series::new("value".into(), values)),
        Column::from(Series::new("count".into(), counts)),
        Column::from(Series::new("share".into(), shares)),
    ])?)
}
