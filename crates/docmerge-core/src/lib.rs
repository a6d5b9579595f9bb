//! docmerge-core - Placeholder engine
//!
//! Locates `{name}` / `{{name}}` placeholders in a [`docmerge_ast::Document`],
//! replaces them with data values while keeping run formatting, and checks
//! that monetary figures in the rendered text have spelled-out counterparts.
//!
//! # Example
//!
//! ```
//! use docmerge_ast::{Block, Document, Paragraph, Run};
//! use docmerge_core::{scan_placeholders, DataMapping, PlaceholderSyntax, Substituter, Value};
//!
//! let mut doc = Document::new();
//! doc.push(Block::Paragraph(Paragraph::from_runs(vec![Run::new("Total: {{amount}}")])));
//!
//! let syntax = PlaceholderSyntax::double();
//! assert_eq!(scan_placeholders(&doc, &syntax), vec!["amount"]);
//!
//! let mut mapping = DataMapping::new();
//! mapping.insert("amount", Value::Integer(12000));
//! Substituter::new(syntax).substitute(&mut doc, &mapping);
//!
//! assert_eq!(doc.plain_text(), "Total: 12.000,00");
//! ```

pub mod consistency;
pub mod error;
pub mod localize;
pub mod scanner;
pub mod substitute;
pub mod syntax;
pub mod value;

// Re-export main types and functions
pub use consistency::{
    ConsistencyChecker, ConsistencyReport, ConsistencyRow, CurrencyConvention, PairStatus,
};
pub use error::{CoreError, Result};
pub use localize::{localize, localize_integer, NumberFormat};
pub use scanner::{scan_documents, scan_placeholders, scan_text, unmatched_placeholders};
pub use substitute::{substitute, SubstitutionReport, Substituter};
pub use syntax::{PlaceholderSyntax, SyntaxKind, TokenMatch};
pub use value::{DataMapping, Value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
