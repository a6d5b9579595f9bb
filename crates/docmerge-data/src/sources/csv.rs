//! CSV data source.

use std::path::Path;

use docmerge_core::Value;

use crate::error::{DataError, Result};
use crate::sources::DataSource;

/// Options for CSV parsing
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// Whether to trim whitespace from fields (default: off, so column
    /// names stay exactly as written)
    pub trim: bool,
    /// Whether to allow flexible column counts
    pub flexible: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            trim: false,
            flexible: true,
        }
    }
}

impl CsvOptions {
    /// Create options for tab-separated values (TSV)
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    /// Create options for semicolon-separated values (common in European locales)
    pub fn semicolon() -> Self {
        Self {
            delimiter: b';',
            ..Default::default()
        }
    }
}

/// CSV data source
pub struct CsvSource {
    bytes: Vec<u8>,
    /// Parsing options
    options: CsvOptions,
}

impl CsvSource {
    /// Create a new CSV source from a file path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(path, CsvOptions::default())
    }

    /// Create a new CSV source with custom options
    pub fn with_options(path: impl AsRef<Path>, options: CsvOptions) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DataError::FileNotFound(path.display().to_string()));
        }

        Ok(Self::from_bytes(std::fs::read(path)?, options))
    }

    /// Create a CSV source over in-memory content
    pub fn from_bytes(bytes: Vec<u8>, options: CsvOptions) -> Self {
        Self { bytes, options }
    }

    /// Read all records as raw strings, header row included
    pub fn read_all(&self) -> Result<Vec<Vec<String>>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .has_headers(false) // We handle headers ourselves
            .trim(if self.options.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .flexible(self.options.flexible)
            .from_reader(self.bytes.as_slice());

        let mut result = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            result.push(row);
        }

        Ok(result)
    }
}

impl DataSource for CsvSource {
    fn read_grid(&self, _sheet: Option<&str>) -> Result<Vec<Vec<Value>>> {
        // CSV doesn't have sheets, ignore the sheet parameter
        Ok(self
            .read_all()?
            .iter()
            .map(|row| row.iter().map(|cell| infer_value(cell)).collect())
            .collect())
    }

    fn list_sheets(&self) -> Result<Vec<String>> {
        Ok(vec!["data".to_string()])
    }

    fn default_sheet(&self) -> Option<String> {
        Some("data".to_string())
    }
}

/// Type a CSV field the way a spreadsheet would have stored it
///
/// Digit strings with a leading zero or a leading `+` (account numbers,
/// phone numbers) stay text.
pub fn infer_value(field: &str) -> Value {
    if field.is_empty() {
        return Value::Empty;
    }
    // Padding around a number or boolean doesn't make it text
    let value = field.trim();
    if value.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    let digits = value.strip_prefix('-').unwrap_or(value);
    let keeps_text = value.starts_with('+')
        || (digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0."));
    if keeps_text || !digits.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Value::Text(field.to_string());
    }

    if let Ok(i) = value.parse::<i64>() {
        return Value::Integer(i);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::Number(f),
        _ => Value::Text(field.to_string()),
    }
}
