//! An opened DOCX package with its editable body

use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use docmerge_ast::Document;

use crate::archive::{OoxmlArchive, DOCUMENT_XML};
use crate::document::parse_document;
use crate::error::Result;
use crate::writer::patch_document_xml;

/// A DOCX package whose body can be edited as a [`Document`] tree
///
/// The archive itself is never modified; edits to the tree are patched into
/// `word/document.xml` when the package is written.
#[derive(Debug, Clone)]
pub struct DocxDocument {
    archive: OoxmlArchive,
    document: Document,
}

impl DocxDocument {
    /// Open a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_archive(OoxmlArchive::open(path)?)
    }

    /// Open a DOCX package held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_archive(OoxmlArchive::from_bytes(bytes)?)
    }

    pub fn from_archive(archive: OoxmlArchive) -> Result<Self> {
        let document = parse_document(archive.document_xml()?)?;
        Ok(Self { archive, document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn archive(&self) -> &OoxmlArchive {
        &self.archive
    }

    /// Body text, one line per paragraph
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Write the package with the current tree to any writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let body = patch_document_xml(self.archive.document_xml()?, &self.document)?;
        self.archive
            .write_replacing(writer, &[(DOCUMENT_XML, body.as_slice())])
    }

    /// Serialize the package to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Write the package to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }
}
