//! Placeholder discovery.
//!
//! Detection works on whole words of each paragraph's concatenated text: a
//! word counts only if it starts with the opening delimiter and ends with the
//! closing one. A placeholder glued to punctuation (`{name},`) is therefore
//! not reported, although the substituter still replaces it.

use std::collections::BTreeSet;

use docmerge_ast::{Document, Paragraph, Visit};

use crate::syntax::PlaceholderSyntax;

struct Scanner<'s> {
    syntax: &'s PlaceholderSyntax,
    found: BTreeSet<String>,
}

impl Visit for Scanner<'_> {
    fn visit_paragraph(&mut self, paragraph: &Paragraph) {
        scan_text(&paragraph.text(), self.syntax, &mut self.found);
    }
}

/// Add the placeholder names found in `text` to `found`
pub fn scan_text(text: &str, syntax: &PlaceholderSyntax, found: &mut BTreeSet<String>) {
    if !text.contains(syntax.open()) || !text.contains(syntax.close()) {
        return;
    }
    for word in text.split_whitespace() {
        if let Some(name) = syntax.name_of(word) {
            found.insert(name.to_string());
        }
    }
}

/// Distinct placeholder names in a document, sorted
pub fn scan_placeholders(doc: &Document, syntax: &PlaceholderSyntax) -> Vec<String> {
    scan_documents(std::iter::once(doc), syntax)
}

/// Union of the placeholder names of several documents, sorted
pub fn scan_documents<'a>(
    docs: impl IntoIterator<Item = &'a Document>,
    syntax: &PlaceholderSyntax,
) -> Vec<String> {
    let mut scanner = Scanner {
        syntax,
        found: BTreeSet::new(),
    };
    for doc in docs {
        scanner.visit_document(doc);
    }
    scanner.found.into_iter().collect()
}

/// Placeholders with no matching data column, sorted
pub fn unmatched_placeholders<S: AsRef<str>>(found: &[String], columns: &[S]) -> Vec<String> {
    let columns: BTreeSet<&str> = columns.iter().map(|c| c.as_ref()).collect();
    let unmatched: BTreeSet<&String> = found
        .iter()
        .filter(|name| !columns.contains(name.as_str()))
        .collect();
    unmatched.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmerge_ast::{Block, Run, Table, TableCell, TableRow};

    fn para(runs: &[&str]) -> Block {
        Block::Paragraph(Paragraph::from_runs(runs.iter().map(|t| Run::new(*t)).collect()))
    }

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.push(para(&["Nama: {nama} ", "alamat {alamat}"]));
        doc.push(Block::Table(Table {
            rows: vec![TableRow {
                cells: vec![TableCell {
                    blocks: vec![para(&["{total}"]), para(&["again {nama}"])],
                }],
            }],
            style_id: None,
        }));
        doc
    }

    #[test]
    fn test_scan_sorted_unique_including_tables() {
        let found = scan_placeholders(&sample(), &PlaceholderSyntax::single());
        assert_eq!(found, vec!["alamat", "nama", "total"]);
    }

    #[test]
    fn test_scan_sees_split_runs() {
        let mut doc = Document::new();
        doc.push(para(&["Total: {{amo", "unt}} due"]));
        let found = scan_placeholders(&doc, &PlaceholderSyntax::double());
        assert_eq!(found, vec!["amount"]);
    }

    #[test]
    fn test_scan_ignores_punctuation_glued_tokens() {
        let mut doc = Document::new();
        doc.push(para(&["Dear {nama}, you owe ({total})."]));
        let found = scan_placeholders(&doc, &PlaceholderSyntax::single());
        assert!(found.is_empty());
    }

    #[test]
    fn test_scan_empty_document() {
        let found = scan_placeholders(&Document::new(), &PlaceholderSyntax::single());
        assert!(found.is_empty());
    }

    #[test]
    fn test_scan_documents_union() {
        let mut other = Document::new();
        other.push(para(&["{tanggal}"]));
        let docs = [sample(), other];
        let found = scan_documents(docs.iter(), &PlaceholderSyntax::single());
        assert_eq!(found, vec!["alamat", "nama", "tanggal", "total"]);
    }

    #[test]
    fn test_unmatched_placeholders() {
        let found = vec!["alamat".to_string(), "nama".to_string(), "total".to_string()];
        let columns = ["nama", "Total"];
        assert_eq!(unmatched_placeholders(&found, &columns), vec!["alamat", "total"]);
        assert!(unmatched_placeholders(&found, &["alamat", "nama", "total"]).is_empty());
    }
}
