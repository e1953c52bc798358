use crate::error::{EdaError, Result};
use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Text encoding of the input file.
///
/// Any WHATWG label `encoding_rs` knows (`utf-8`, `latin1`, `cp1251`,
/// `windows-1252`, `utf-16le`, ...) is accepted, plus `latin-1`. A `-lossy`
/// suffix replaces malformed byte sequences with U+FFFD instead of failing;
/// plain `lossy` means `utf-8-lossy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CsvTextEncoding {
    encoding: &'static Encoding,
    lossy: bool,
}

impl CsvTextEncoding {
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn is_lossy(&self) -> bool {
        self.lossy
    }

    pub fn is_utf8(&self) -> bool {
        self.encoding == UTF_8
    }
}

impl Default for CsvTextEncoding {
    fn default() -> Self {
        Self {
            encoding: UTF_8,
            lossy: false,
        }
    }
}

impl fmt::Display for CsvTextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.encoding.name().to_lowercase();
        if self.lossy {
            write!(f, "{name}-lossy")
        } else {
            f.write_str(&name)
        }
    }
}

impl FromStr for CsvTextEncoding {
    type Err = EdaError;

    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim().to_lowercase();
        let (label, lossy) = match label.strip_suffix("-lossy") {
            Some(base) => (base, true),
            None if label == "lossy" => ("utf-8", true),
            None => (label.as_str(), false),
        };
        let label = match label {
            "latin-1" => "latin1",
            other => other,
        };

        Encoding::for_label_no_replacement(label.as_bytes())
            .map(|encoding| Self { encoding, lossy })
            .ok_or_else(|| EdaError::Config(format!("Unsupported encoding '{}'", s.trim())))
    }
}

impl TryFrom<String> for CsvTextEncoding {
    type Error = EdaError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CsvTextEncoding> for String {
    fn from(value: CsvTextEncoding) -> Self {
        value.to_string()
    }
}

/// How to parse the input file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CsvOptions {
    pub separator: u8,
    pub encoding: CsvTextEncoding,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            encoding: CsvTextEncoding::default(),
        }
    }
}

impl CsvOptions {
    /// Builds options from the textual CLI values.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the separator is not a single ASCII character or
    /// the encoding is unknown.
    pub fn from_args(sep: &str, encoding: &str) -> Result<Self> {
        let separator = match sep.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ if sep == "\\t" => b'\t',
            _ => {
                return Err(EdaError::Config(format!(
                    "Separator must be a single ASCII character, got '{sep}'"
                )));
            }
        };
        Ok(Self {
            separator,
            encoding: encoding.parse()?,
        })
    }
}

/// Parameters of the `report` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    pub out_dir: PathBuf,
    /// Histograms are drawn for at most this many numeric columns.
    pub max_hist_columns: usize,
    pub top_k_categories: usize,
    pub max_category_columns: usize,
    pub title: String,
    /// Columns with a missing share at or above this are listed as problematic.
    pub min_missing_share: f64,
    pub categorical_bar_column: Option<String>,
    pub categorical_bar_top_n: usize,
    pub example_values_per_column: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("reports"),
            max_hist_columns: 6,
            top_k_categories: 5,
            max_category_columns: 5,
            title: "EDA report".to_owned(),
            min_missing_share: 0.1,
            categorical_bar_column: Some("country".to_owned()),
            categorical_bar_top_n: 10,
            example_values_per_column: 3,
        }
    }
}

impl ReportConfig {
    /// # Errors
    ///
    /// Returns `Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_missing_share) {
            return Err(EdaError::Config(format!(
                "min_missing_share must be within [0.0, 1.0], got {}",
                self.min_missing_share
            )));
        }
        if self.top_k_categories == 0 {
            return Err(EdaError::Config(
                "top_k_categories must be at least 1".to_owned(),
            ));
        }
        if self.categorical_bar_top_n == 0 {
            return Err(EdaError::Config(
                "categorical_bar_top_n must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_csv_options_from_args() {
        let opts = CsvOptions::from_args(";", "UTF8").unwrap();
        assert_eq!(opts.separator, b';');
        assert_eq!(opts.encoding, CsvTextEncoding::default());

        let tab = CsvOptions::from_args("\\t", "lossy").unwrap();
        assert_eq!(tab.separator, b'\t');
        assert!(tab.encoding.is_utf8());
        assert!(tab.encoding.is_lossy());

        assert!(CsvOptions::from_args(";;", "utf-8").is_err());
        assert!(matches!(
            CsvOptions::from_args(",", "klingon"),
            Err(EdaError::Config(_))
        ));
    }

    #[test]
    fn test_legacy_encoding_labels() {
        let cyrillic: CsvTextEncoding = "cp1251".parse().unwrap();
        assert_eq!(cyrillic.encoding(), encoding_rs::WINDOWS_1251);
        assert!(!cyrillic.is_lossy());

        let latin: CsvTextEncoding = "Latin-1".parse().unwrap();
        assert_eq!(latin.encoding(), encoding_rs::WINDOWS_1252);

        let lossy: CsvTextEncoding = "iso-8859-1-lossy".parse().unwrap();
        assert!(lossy.is_lossy());
        assert_eq!(lossy.to_string(), "windows-1252-lossy");

        assert!("replacement".parse::<CsvTextEncoding>().is_err());
    }

    #[test]
    fn test_csv_options_roundtrip_through_json() {
        let opts = CsvOptions::from_args(";", "cp1251").unwrap();
        let json = serde_json::to_string(&opts).unwrap();
        assert!(json.contains("\"windows-1251\""));
        let back: CsvOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);
    }

    #[test]
    fn test_report_config_validation() {
        assert!(ReportConfig::default().validate().is_ok());

        let bad_share = ReportConfig {
            min_missing_share: 1.5,
            ..Default::default()
        };
        assert!(matches!(bad_share.validate(), Err(EdaError::Config(_))));

        let bad_top_k = ReportConfig {
            top_k_categories: 0,
            ..Default::default()
        };
        assert!(bad_top_k.validate().is_err());
    }

    #[test]
    fn test_report_config_roundtrips_through_json() {
        let cfg = ReportConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ReportConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
