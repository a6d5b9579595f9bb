//! Tree walkers
//!
//! The scanner and the substituter only care about paragraphs, wherever they
//! sit. [`Visit`] and [`VisitMut`] walk the whole tree, recursing through
//! table cells at any depth; implementors override the hooks they need.

use crate::block::{Block, Paragraph, Table};
use crate::document::Document;

/// Read-only visitor over a document tree
pub trait Visit {
    /// Called for every paragraph, top level or inside a table cell
    fn visit_paragraph(&mut self, _paragraph: &Paragraph) {}

    /// Called for every table; the default recurses into its cells
    fn visit_table(&mut self, table: &Table) {
        for cell in table.rows.iter().flat_map(|row| row.cells.iter()) {
            self.visit_blocks(&cell.blocks);
        }
    }

    /// Dispatch over a sequence of blocks
    fn visit_blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            match block {
                Block::Paragraph(p) => self.visit_paragraph(p),
                Block::Table(t) => self.visit_table(t),
            }
        }
    }

    /// Walk an entire document
    fn visit_document(&mut self, doc: &Document) {
        self.visit_blocks(&doc.blocks);
    }
}

/// Mutating visitor over a document tree
pub trait VisitMut {
    /// Called for every paragraph, top level or inside a table cell
    fn visit_paragraph_mut(&mut self, _paragraph: &mut Paragraph) {}

    /// Called for every table; the default recurses into its cells
    fn visit_table_mut(&mut self, table: &mut Table) {
        for cell in table.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
            self.visit_blocks_mut(&mut cell.blocks);
        }
    }

    /// Dispatch over a sequence of blocks
    fn visit_blocks_mut(&mut self, blocks: &mut [Block]) {
        for block in blocks {
            match block {
                Block::Paragraph(p) => self.visit_paragraph_mut(p),
                Block::Table(t) => self.visit_table_mut(t),
            }
        }
    }

    /// Walk an entire document
    fn visit_document_mut(&mut self, doc: &mut Document) {
        self.visit_blocks_mut(&mut doc.blocks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{TableCell, TableRow};
    use crate::run::Run;

    fn nested_doc() -> Document {
        let inner = Table {
            rows: vec![TableRow {
                cells: vec![TableCell::from_paragraph(Paragraph::from_runs(vec![
                    Run::new("deep"),
                ]))],
            }],
            style_id: None,
        };
        let outer = Table {
            rows: vec![TableRow {
                cells: vec![TableCell {
                    blocks: vec![
                        Block::Paragraph(Paragraph::from_runs(vec![Run::new("cell")])),
                        Block::Table(inner),
                    ],
                }],
            }],
            style_id: None,
        };
        let mut doc = Document::new();
        doc.push(Block::Paragraph(Paragraph::from_runs(vec![Run::new("top")])));
        doc.push(Block::Table(outer));
        doc
    }

    struct Collect(Vec<String>);

    impl Visit for Collect {
        fn visit_paragraph(&mut self, paragraph: &Paragraph) {
            self.0.push(paragraph.text());
        }
    }

    struct Upper;

    impl VisitMut for Upper {
        fn visit_paragraph_mut(&mut self, paragraph: &mut Paragraph) {
            for run in &mut paragraph.runs {
                run.text = run.text.to_uppercase();
            }
        }
    }

    #[test]
    fn test_visit_reaches_nested_tables() {
        let mut collect = Collect(Vec::new());
        collect.visit_document(&nested_doc());
        assert_eq!(collect.0, vec!["top", "cell", "deep"]);
    }

    #[test]
    fn test_visit_mut_reaches_nested_tables() {
        let mut doc = nested_doc();
        Upper.visit_document_mut(&mut doc);

        let mut collect = Collect(Vec::new());
        collect.visit_document(&doc);
        assert_eq!(collect.0, vec!["TOP", "CELL", "DEEP"]);
    }
}
