//! Template loading for mail-merge generation
//!
//! A [`Template`] keeps the original DOCX bytes and never changes. Each
//! generation job calls [`Template::instantiate`] to get a fresh
//! [`DocxDocument`], so substitutions from one job cannot leak into the next.
//!
//! # Example
//!
//! ```ignore
//! use docmerge_ooxml::Template;
//!
//! let template = Template::load("kontrak.docx")?;
//! let mut doc = template.instantiate()?;
//! doc.document_mut().paragraphs_mut()[0].runs[0].text = "Hello".into();
//! doc.save("1_kontrak.docx")?;
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::docx::DocxDocument;
use crate::error::{OoxmlError, Result};

/// An immutable DOCX template
#[derive(Debug, Clone)]
pub struct Template {
    /// File name, used to name generated outputs
    name: String,
    bytes: Arc<[u8]>,
}

impl Template {
    /// Load a template from a file path
    ///
    /// The file is validated as a DOCX package right away, so a bad template
    /// is reported once instead of once per job.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                OoxmlError::InvalidStructure(format!("{} is not a file path", path.display()))
            })?;
        let bytes = std::fs::read(path)?;
        Self::from_bytes(name, bytes)
    }

    /// Load a template from bytes
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes: Vec<u8> = bytes.into();
        let template = Self {
            name: name.into(),
            bytes: Arc::from(bytes),
        };
        // Fail early on anything that would fail every instantiation
        template.instantiate()?;
        debug!(template = %template.name, size = template.bytes.len(), "loaded template");
        Ok(template)
    }

    /// Template file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The original template bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Materialize a fresh, independent copy of the template
    pub fn instantiate(&self) -> Result<DocxDocument> {
        DocxDocument::from_bytes(&self.bytes)
    }
}
