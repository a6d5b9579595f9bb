//! Block-level elements for document structure
//!
//! Templates only need two kinds of blocks: paragraphs and tables. Table
//! cells hold blocks again, so tables may nest.

use serde::{Deserialize, Serialize};

use crate::run::Run;

/// Block-level content element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),
    /// A table
    Table(Table),
}

/// A paragraph block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Runs in document order
    pub runs: Vec<Run>,
    /// Style ID from source document (e.g., OOXML style reference)
    pub style_id: Option<String>,
    /// Position of this paragraph in the source container, if it came from one
    pub origin: Option<usize>,
}

/// A table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Table rows
    pub rows: Vec<TableRow>,
    /// Style ID from source document
    pub style_id: Option<String>,
}

/// A table row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in this row
    pub cells: Vec<TableCell>,
}

/// A table cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content (paragraphs and nested tables)
    pub blocks: Vec<Block>,
}

impl Paragraph {
    /// Create an empty paragraph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph from runs
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self {
            runs,
            ..Default::default()
        }
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Append a run
    pub fn push_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Check if the paragraph carries no text
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(Run::is_empty)
    }
}

impl TableCell {
    /// Create a cell holding a single paragraph
    pub fn from_paragraph(paragraph: Paragraph) -> Self {
        Self {
            blocks: vec![Block::Paragraph(paragraph)],
        }
    }
}
