//! Document root
//!
//! A document is an ordered list of blocks. It is the unit a generation job
//! owns: one fresh copy per (row, template) pair.

use serde::{Deserialize, Serialize};

use crate::block::{Block, Paragraph};
use crate::visit::Visit;

/// A complete document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document content blocks
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Add a block to the document
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the document is empty (no blocks)
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of top-level blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// All paragraphs in document order, including those inside table cells
    pub fn paragraphs(&self) -> Vec<&Paragraph> {
        let mut out = Vec::new();
        collect(&self.blocks, &mut out);
        out
    }

    /// Mutable access to all paragraphs in document order
    pub fn paragraphs_mut(&mut self) -> Vec<&mut Paragraph> {
        let mut out = Vec::new();
        collect_mut(&mut self.blocks, &mut out);
        out
    }

    /// Render the document as plain text, one paragraph per line
    pub fn plain_text(&self) -> String {
        struct Lines(Vec<String>);

        impl Visit for Lines {
            fn visit_paragraph(&mut self, paragraph: &Paragraph) {
                self.0.push(paragraph.text());
            }
        }

        let mut lines = Lines(Vec::new());
        lines.visit_document(self);
        lines.0.join("\n")
    }
}

fn collect<'a>(blocks: &'a [Block], out: &mut Vec<&'a Paragraph>) {
    for block in blocks {
        match block {
            Block::Paragraph(p) => out.push(p),
            Block::Table(t) => {
                for cell in t.rows.iter().flat_map(|r| r.cells.iter()) {
                    collect(&cell.blocks, out);
                }
            }
        }
    }
}

fn collect_mut<'a>(blocks: &'a mut [Block], out: &mut Vec<&'a mut Paragraph>) {
    for block in blocks.iter_mut() {
        match block {
            Block::Paragraph(p) => out.push(p),
            Block::Table(t) => {
                for cell in t.rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
                    collect_mut(&mut cell.blocks, out);
                }
            }
        }
    }
}
