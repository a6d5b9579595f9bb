//! Excel/XLSX data source using calamine.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use docmerge_core::Value;

use crate::error::{DataError, Result};
use crate::sources::DataSource;

/// Excel workbook data source
///
/// The workbook bytes are held in memory; each read opens a fresh reader
/// over them.
pub struct ExcelSource {
    /// Where the workbook came from, for error messages
    origin: String,
    bytes: Vec<u8>,
    /// Sheet names cache
    sheet_names: Vec<String>,
}

impl ExcelSource {
    /// Create a new Excel source from a file path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();

        if !path.exists() {
            return Err(DataError::FileNotFound(origin));
        }

        let bytes = std::fs::read(path)?;
        Self::from_named_bytes(origin, bytes)
    }

    /// Create an Excel source from workbook bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_named_bytes("<memory>".to_string(), bytes)
    }

    fn from_named_bytes(origin: String, bytes: Vec<u8>) -> Result<Self> {
        let workbook = Self::open(&origin, &bytes)?;
        let sheet_names = workbook.sheet_names().to_vec();
        Ok(Self {
            origin,
            bytes,
            sheet_names,
        })
    }

    fn open<'b>(origin: &str, bytes: &'b [u8]) -> Result<Xlsx<Cursor<&'b [u8]>>> {
        Xlsx::new(Cursor::new(bytes))
            .map_err(|e| DataError::WorkbookOpen(format!("{}: {}", origin, e)))
    }

    /// Convert a calamine cell to a merge value
    fn cell_to_value(cell: &Data) -> Value {
        match cell {
            Data::Empty => Value::Empty,
            Data::String(s) => Value::Text(s.clone()),
            Data::Int(i) => Value::Integer(*i),
            Data::Float(f) => Value::Number(*f),
            Data::Bool(b) => Value::Bool(*b),
            Data::Error(e) => Value::Text(format!("#ERROR: {:?}", e)),
            Data::DateTime(dt) => Value::Text(format!("{}", dt)),
            Data::DateTimeIso(s) => Value::Text(s.clone()),
            Data::DurationIso(s) => Value::Text(s.clone()),
        }
    }
}

impl DataSource for ExcelSource {
    fn read_grid(&self, sheet: Option<&str>) -> Result<Vec<Vec<Value>>> {
        let sheet = match sheet {
            Some(name) => name.to_string(),
            None => self
                .default_sheet()
                .ok_or_else(|| DataError::SheetNotFound(format!("{}: no sheets", self.origin)))?,
        };

        let mut workbook = Self::open(&self.origin, &self.bytes)?;
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| DataError::SheetNotFound(format!("{}: {}", sheet, e)))?;

        Ok(range
            .rows()
            .map(|row| row.iter().map(Self::cell_to_value).collect())
            .collect())
    }

    fn list_sheets(&self) -> Result<Vec<String>> {
        Ok(self.sheet_names.clone())
    }

    fn default_sheet(&self) -> Option<String> {
        self.sheet_names.first().cloned()
    }
}
