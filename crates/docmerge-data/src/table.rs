//! A header row plus data rows, and conversion into merge mappings.

use docmerge_core::{DataMapping, Value};
use tracing::debug;

use crate::error::{DataError, Result};

/// Tabular merge data: one header row, one data row per output document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataTable {
    /// Build a table from a raw grid whose first row holds the column names
    ///
    /// Column names are kept exactly as written, surrounding spaces included,
    /// since placeholders match them verbatim. Rows with no non-empty cell
    /// are dropped, as a spreadsheet reader would skip them. `origin` names
    /// the source in errors.
    pub fn from_grid(grid: Vec<Vec<Value>>, origin: &str) -> Result<Self> {
        let mut grid = grid.into_iter();
        let headers: Vec<String> = grid
            .next()
            .ok_or_else(|| DataError::MissingHeader(origin.to_string()))?
            .iter()
            .map(Value::to_string)
            .collect();

        let rows: Vec<Vec<Value>> = grid
            .filter(|row| row.iter().any(|cell| *cell != Value::Empty))
            .collect();

        debug!(
            source = origin,
            columns = headers.len(),
            rows = rows.len(),
            "loaded data table"
        );
        Ok(Self { headers, rows })
    }

    /// Column names, in sheet order
    pub fn columns(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One mapping per data row, keyed by column name
    ///
    /// Cells missing from a short row map to [`Value::Empty`]; columns with a
    /// blank header are not addressable and are skipped.
    pub fn mappings(&self) -> Vec<DataMapping> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .enumerate()
                    .filter(|(_, name)| !name.trim().is_empty())
                    .map(|(i, name)| (name.as_str(), row.get(i).cloned().unwrap_or(Value::Empty)))
                    .collect()
            })
            .collect()
    }

    /// Read the first two columns as key/value pairs into one mapping
    ///
    /// Keys come from the first column of each data row; rows with a blank
    /// key are skipped. A repeated key keeps its last value.
    pub fn key_value_mapping(&self) -> Result<DataMapping> {
        if self.headers.len() < 2 {
            return Err(DataError::NotKeyValue(self.headers.len()));
        }

        let mut mapping = DataMapping::new();
        for row in &self.rows {
            let key = row.first().map(Value::to_string).unwrap_or_default();
            if key.trim().is_empty() {
                continue;
            }
            mapping.insert(key, row.get(1).cloned().unwrap_or(Value::Empty));
        }
        Ok(mapping)
    }
}
