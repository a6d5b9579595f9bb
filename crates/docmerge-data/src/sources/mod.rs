//! Data source implementations.
//!
//! This module contains adapters for the tabular sources merge data comes
//! from (Excel, CSV).

pub mod csv;
pub mod excel;

pub use self::csv::{infer_value, CsvOptions, CsvSource};
pub use self::excel::ExcelSource;

use docmerge_core::Value;

use crate::error::Result;

/// Trait for data sources that can provide a grid of cell values
pub trait DataSource {
    /// Read every row of a sheet, header row included
    ///
    /// `None` selects the default sheet.
    fn read_grid(&self, sheet: Option<&str>) -> Result<Vec<Vec<Value>>>;

    /// List available sheets/tables in the source
    fn list_sheets(&self) -> Result<Vec<String>>;

    /// Get the default sheet name
    fn default_sheet(&self) -> Option<String>;
}
