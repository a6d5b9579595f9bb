//! Writing generated documents to disk

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::batch::GeneratedDocument;

/// Pack documents into one deflated ZIP archive, in generation order
pub fn zip_documents(documents: &[GeneratedDocument]) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for doc in documents {
        zip.start_file(doc.name.as_str(), options)
            .with_context(|| format!("Failed to add {} to archive", doc.name))?;
        zip.write_all(&doc.bytes)?;
    }

    zip.finish().context("Failed to finish archive")?;
    Ok(buffer.into_inner())
}

/// Write the outputs into `output_dir`
///
/// A single document is written standalone under its own name; more than one
/// is bundled into `archive_name`. Returns the path written.
pub fn write_outputs(
    documents: &[GeneratedDocument],
    output_dir: &Path,
    archive_name: &str,
) -> Result<PathBuf> {
    let (name, bytes) = match documents {
        [] => bail!("No documents were generated"),
        [single] => (single.name.as_str(), single.bytes.clone()),
        many => (archive_name, zip_documents(many)?),
    };

    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let path = output_dir.join(name);
    fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), documents = documents.len(), "wrote output");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn document(name: &str, content: &[u8]) -> GeneratedDocument {
        GeneratedDocument {
            name: name.to_string(),
            bytes: content.to_vec(),
            substitution: Default::default(),
            consistency: Default::default(),
        }
    }

    #[test]
    fn test_zip_documents_keeps_order_and_content() {
        let docs = vec![document("1_a.docx", b"first"), document("1_b.docx", b"second")];
        let bytes = zip_documents(&docs).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "1_a.docx");

        let mut content = String::new();
        archive
            .by_name("1_b.docx")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn test_single_output_written_standalone() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_outputs(&[document("1_a.docx", b"x")], dir.path(), "all.zip").unwrap();

        assert_eq!(path, dir.path().join("1_a.docx"));
        assert_eq!(fs::read(&path).unwrap(), b"x");
        assert!(!dir.path().join("all.zip").exists());
    }

    #[test]
    fn test_many_outputs_bundled() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let docs = vec![document("1_a.docx", b"x"), document("2_a.docx", b"y")];

        let path = write_outputs(&docs, &out, "all.zip").unwrap();

        assert_eq!(path, out.join("all.zip"));
        let archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_nothing_to_write() {
        let dir = tempfile::tempdir().unwrap();
        assert!(write_outputs(&[], dir.path(), "all.zip").is_err());
    }
}
