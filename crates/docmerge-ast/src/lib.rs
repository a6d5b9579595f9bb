//! docmerge-ast - Document tree definitions
//!
//! This crate provides the format-independent tree that docmerge scans and
//! rewrites: `Document → Block{Paragraph, Table} → Run / TableRow → TableCell`.
//! Container formats (DOCX) parse into it and write back from it, so the
//! placeholder engine never touches XML.

pub mod block;
pub mod document;
pub mod run;
pub mod visit;

pub use block::{Block, Paragraph, Table, TableCell, TableRow};
pub use document::Document;
pub use run::{Run, RunFormat};
pub use visit::{Visit, VisitMut};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
