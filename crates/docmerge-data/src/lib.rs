//! # docmerge-data
//!
//! Merge data for docmerge: read Excel or CSV sources and turn them into
//! one [`docmerge_core::DataMapping`] per output document.
//!
//! ## Features
//!
//! - **Excel Support**: Read `.xlsx` sheets using `calamine` (first sheet by
//!   default, or a named sheet)
//! - **CSV Support**: Comma, semicolon or tab separated files with typed cells
//! - **Key/Value Mode**: A two-column sheet read as a single mapping
//!
//! ## Example
//!
//! ```rust,ignore
//! use docmerge_data::DataEngine;
//!
//! let table = DataEngine::load("data.xlsx", None)?;
//! for mapping in table.mappings() {
//!     println!("{:?}", mapping);
//! }
//! ```

pub mod error;
pub mod sources;
pub mod table;

use std::path::Path;

// Re-exports
pub use error::{DataError, Result};
pub use sources::{infer_value, CsvOptions, CsvSource, DataSource, ExcelSource};
pub use table::DataTable;

/// Entry point for loading merge data from a file
pub struct DataEngine;

impl DataEngine {
    /// Load a data table, choosing the reader from the file extension
    ///
    /// # Arguments
    /// * `path` - `.xlsx`/`.xlsm`, `.csv` or `.tsv` file
    /// * `sheet` - Sheet name (Excel only; uses first sheet if None)
    pub fn load(path: impl AsRef<Path>, sheet: Option<&str>) -> Result<DataTable> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        let grid = match extension.as_str() {
            "xlsx" | "xlsm" => ExcelSource::new(path)?.read_grid(sheet)?,
            "csv" => CsvSource::new(path)?.read_grid(sheet)?,
            "tsv" => CsvSource::with_options(path, CsvOptions::tsv())?.read_grid(sheet)?,
            _ => return Err(DataError::UnsupportedFormat(origin)),
        };

        DataTable::from_grid(grid, &origin)
    }
}
