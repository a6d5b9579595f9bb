//! docmerge CLI - Command-line interface library
//!
//! This library provides the CLI functionality for docmerge:
//! - Scan: List template placeholders and those the data lacks
//! - Generate: Fill every template with every data row
//! - Check: Report figure/verbal consistency of documents
//!
//! # Library Usage
//!
//! ```ignore
//! use docmerge_cli::{generate_command, GenerateOptions, Settings};
//!
//! let options = GenerateOptions { sheet: None, key_value: false, output: "out".into() };
//! let summary = generate_command(&templates, &data, &options, &Settings::default())?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Placeholders per template, with the ones the data lacks
//! docmerge scan kontrak.docx surat.docx --data data.xlsx
//!
//! # One document per row and template, bundled into generated_reports.zip
//! docmerge generate kontrak.docx surat.docx --data data.xlsx --output out/
//!
//! # Consistency of amounts in finished documents
//! docmerge check out/1_kontrak.docx --format json
//! ```

pub mod app;
pub mod batch;
pub mod bundle;
pub mod config;

// Re-export main entry point and types
pub use app::{
    check_command, generate_command, run_cli, scan_command, CheckedDocument, GenerateOptions,
    GenerateSummary, OutputFormat, ScanSummary, SyntaxArg,
};
pub use batch::{load_templates, output_name, GeneratedDocument, MergeEngine};
pub use bundle::{write_outputs, zip_documents};
pub use config::Settings;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
