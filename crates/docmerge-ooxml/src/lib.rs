//! # docmerge-ooxml
//!
//! DOCX reading and writing for docmerge.
//!
//! This crate provides functionality to:
//! - Unpack DOCX packages and parse the body into a [`docmerge_ast::Document`]
//! - Patch edited run text back into `word/document.xml`, leaving every other
//!   part and all run properties untouched
//! - Keep an immutable [`Template`] that yields a fresh document per job
//!
//! ## Example
//!
//! ```no_run
//! use docmerge_ooxml::DocxDocument;
//!
//! let mut doc = DocxDocument::open("surat.docx")?;
//! for paragraph in doc.document_mut().paragraphs_mut() {
//!     for run in &mut paragraph.runs {
//!         run.text = run.text.replace("{nama}", "Budi");
//!     }
//! }
//! doc.save("surat-budi.docx")?;
//! # Ok::<(), docmerge_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod document;
pub mod docx;
pub mod error;
mod locate;
pub mod template;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_utils;

pub use archive::{OoxmlArchive, DOCUMENT_XML};
pub use document::parse_document;
pub use docx::DocxDocument;
pub use error::{OoxmlError, Result};
pub use template::Template;
pub use writer::patch_document_xml;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
