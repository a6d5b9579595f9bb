//! Document content parsing (word/document.xml)
//!
//! Builds a [`docmerge_ast::Document`] from the main document part. Every
//! body paragraph and run carries its position in the source XML as
//! `origin`, which is what [`crate::writer`] uses to patch text back in.
//!
//! A run's text is its `w:t` content with `w:tab` read as `'\t'` and
//! line breaks (`w:br`, `w:cr`) as `'\n'`, so words either side of a tab
//! stay separate. Field instructions (`w:instrText`), deleted text
//! (`w:delText`) and page breaks are not part of a run's text.

use docmerge_ast::{Block, Document, Paragraph, Run, RunFormat, Table, TableCell, TableRow};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{OoxmlError, Result};
use crate::locate::{text_char, Locator, Mark};

/// Parse `word/document.xml` into a document tree
pub fn parse_document(xml: &[u8]) -> Result<Document> {
    let mut reader = Reader::from_reader(xml);
    // Don't trim text - preserve whitespace in runs
    reader.config_mut().trim_text(false);

    let mut tree = TreeBuilder::default();
    let mut locator = Locator::default();
    let mut paragraph: Option<Paragraph> = None;
    let mut run: Option<Run> = None;
    let mut in_run_props = false;
    let mut saw_body = false;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = e.name();
                match locator.start(name.as_ref()) {
                    Mark::ParagraphStart(id) => {
                        paragraph = Some(Paragraph {
                            origin: Some(id),
                            ..Default::default()
                        });
                    }
                    Mark::RunStart(id) => {
                        run = Some(Run {
                            origin: Some(id),
                            ..Default::default()
                        });
                    }
                    _ => {
                        if name.as_ref() == b"w:body" {
                            saw_body = true;
                        }
                        handle_element(e, &locator, &mut tree, &mut paragraph, &mut run);
                        if name.as_ref() == b"w:rPr" {
                            in_run_props = locator.in_run();
                        } else if in_run_props {
                            if let Some(run) = run.as_mut() {
                                apply_run_property(&mut run.format, e);
                            }
                        } else {
                            push_text_char(e, &locator, &mut run);
                        }
                    }
                }
            }
            Event::Empty(ref e) => {
                let name = e.name();
                match locator.empty(name.as_ref()) {
                    Mark::EmptyParagraph(id) => tree.push_block(Block::Paragraph(Paragraph {
                        origin: Some(id),
                        ..Default::default()
                    })),
                    Mark::EmptyRun(id) => {
                        if let Some(paragraph) = paragraph.as_mut() {
                            paragraph.push_run(Run {
                                origin: Some(id),
                                ..Default::default()
                            });
                        }
                    }
                    _ => {
                        if name.as_ref() == b"w:body" {
                            saw_body = true;
                        }
                        handle_element(e, &locator, &mut tree, &mut paragraph, &mut run);
                        if in_run_props {
                            if let Some(run) = run.as_mut() {
                                apply_run_property(&mut run.format, e);
                            }
                        } else {
                            push_text_char(e, &locator, &mut run);
                        }
                    }
                }
            }
            Event::End(ref e) => {
                let name = e.name();
                match locator.end(name.as_ref()) {
                    Mark::RunEnd(_) => {
                        in_run_props = false;
                        if let (Some(paragraph), Some(run)) = (paragraph.as_mut(), run.take()) {
                            paragraph.push_run(run);
                        }
                    }
                    Mark::ParagraphEnd(_) => {
                        if let Some(paragraph) = paragraph.take() {
                            tree.push_block(Block::Paragraph(paragraph));
                        }
                    }
                    _ => match name.as_ref() {
                        b"w:rPr" => in_run_props = false,
                        b"w:tc" if can_hold_tables(&locator) => tree.close_cell(),
                        b"w:tr" if can_hold_tables(&locator) => tree.close_row(),
                        b"w:tbl" if can_hold_tables(&locator) => tree.close_table(),
                        _ => {}
                    },
                }
            }
            Event::Text(ref e) if locator.in_text() => {
                if let Some(run) = run.as_mut() {
                    run.text.push_str(&e.unescape()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_body {
        return Err(OoxmlError::InvalidStructure(
            "document has no w:body element".to_string(),
        ));
    }
    let document = tree.finish()?;
    debug!(
        blocks = document.len(),
        paragraphs = document.paragraphs().len(),
        "parsed document body"
    );
    Ok(document)
}

/// Tables only open at block level of the body, never inside a paragraph
fn can_hold_tables(locator: &Locator) -> bool {
    locator.tracking() && !locator.in_paragraph()
}

/// Structural elements that are neither paragraphs nor runs
fn handle_element(
    e: &BytesStart,
    locator: &Locator,
    tree: &mut TreeBuilder,
    paragraph: &mut Option<Paragraph>,
    run: &mut Option<Run>,
) {
    match e.name().as_ref() {
        b"w:tbl" if can_hold_tables(locator) => tree.open(Container::Table(Table::default())),
        b"w:tr" if can_hold_tables(locator) => tree.open(Container::Row(TableRow::default())),
        b"w:tc" if can_hold_tables(locator) => tree.open(Container::Cell(TableCell::default())),
        b"w:tblStyle" if can_hold_tables(locator) => {
            if let Some(Container::Table(table)) = tree.open.last_mut() {
                table.style_id = get_attr(e, b"w:val");
            }
        }
        b"w:pStyle" if locator.in_paragraph() && run.is_none() => {
            if let Some(paragraph) = paragraph.as_mut() {
                paragraph.style_id = get_attr(e, b"w:val");
            }
        }
        _ => {}
    }
}

fn push_text_char(e: &BytesStart, locator: &Locator, run: &mut Option<Run>) {
    if let (Some(c), Some(run)) = (text_char(locator, e), run.as_mut()) {
        run.text.push(c);
    }
}

/// Read one `w:rPr` child into the run format
fn apply_run_property(format: &mut RunFormat, e: &BytesStart) {
    match e.name().as_ref() {
        b"w:b" => format.bold = toggle_on(e),
        b"w:i" => format.italic = toggle_on(e),
        b"w:u" => {
            format.underline = match get_attr(e, b"w:val") {
                Some(val) if val == "none" => None,
                Some(val) => Some(val),
                None => Some("single".to_string()),
            };
        }
        b"w:rFonts" => {
            format.font_name = get_attr(e, b"w:ascii").or_else(|| get_attr(e, b"w:hAnsi"));
        }
        b"w:sz" => format.font_size = get_attr(e, b"w:val").and_then(|v| v.parse().ok()),
        b"w:color" => format.color = get_attr(e, b"w:val"),
        _ => {}
    }
}

/// On/off properties are on unless `w:val` says otherwise
fn toggle_on(e: &BytesStart) -> bool {
    !matches!(
        get_attr(e, b"w:val").as_deref(),
        Some("0") | Some("false") | Some("off")
    )
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| String::from_utf8(a.value.to_vec()).ok())
}

#[derive(Debug)]
enum Container {
    Table(Table),
    Row(TableRow),
    Cell(TableCell),
}

/// Assembles blocks into nested tables as they close
#[derive(Debug, Default)]
struct TreeBuilder {
    blocks: Vec<Block>,
    open: Vec<Container>,
}

impl TreeBuilder {
    fn open(&mut self, container: Container) {
        self.open.push(container);
    }

    fn push_block(&mut self, block: Block) {
        match self.open.last_mut() {
            Some(Container::Cell(cell)) => cell.blocks.push(block),
            // A paragraph directly in a row is malformed; keep it rather than
            // lose its runs
            _ => self.blocks.push(block),
        }
    }

    fn close_cell(&mut self) {
        if let Some(Container::Cell(cell)) = self.open.pop() {
            if let Some(Container::Row(row)) = self.open.last_mut() {
                row.cells.push(cell);
            }
        }
    }

    fn close_row(&mut self) {
        if let Some(Container::Row(row)) = self.open.pop() {
            if let Some(Container::Table(table)) = self.open.last_mut() {
                table.rows.push(row);
            }
        }
    }

    fn close_table(&mut self) {
        if let Some(Container::Table(table)) = self.open.pop() {
            self.push_block(Block::Table(table));
        }
    }

    fn finish(self) -> Result<Document> {
        if !self.open.is_empty() {
            return Err(OoxmlError::InvalidStructure(format!(
                "{} table element(s) left open",
                self.open.len()
            )));
        }
        Ok(Document {
            blocks: self.blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{inner}</w:body></w:document>"#
        )
    }

    #[test]
    fn test_parse_simple_paragraph() {
        let xml = body(r#"<w:p><w:r><w:t>Hello {name}</w:t></w:r></w:p>"#);
        let doc = parse_document(xml.as_bytes()).unwrap();

        assert_eq!(doc.len(), 1);
        let paragraphs = doc.paragraphs();
        assert_eq!(paragraphs[0].text(), "Hello {name}");
        assert_eq!(paragraphs[0].origin, Some(0));
        assert_eq!(paragraphs[0].runs[0].origin, Some(0));
    }

    #[test]
    fn test_parse_split_runs_and_whitespace() {
        let xml = body(
            r#"<w:p><w:r><w:t xml:space="preserve">Dear {na</w:t></w:r><w:r><w:t>me},  </w:t></w:r></w:p>"#,
        );
        let doc = parse_document(xml.as_bytes()).unwrap();
        let p = doc.paragraphs()[0];

        assert_eq!(p.runs.len(), 2);
        assert_eq!(p.runs[0].text, "Dear {na");
        assert_eq!(p.runs[1].text, "me},  ");
        assert_eq!(p.runs[1].origin, Some(1));
    }

    #[test]
    fn test_parse_run_formatting() {
        let xml = body(
            r#"<w:p><w:r><w:rPr><w:rFonts w:ascii="Arial" w:hAnsi="Arial"/><w:b/><w:i w:val="0"/><w:color w:val="FF0000"/><w:sz w:val="24"/><w:u w:val="double"/></w:rPr><w:t>x</w:t></w:r></w:p>"#,
        );
        let doc = parse_document(xml.as_bytes()).unwrap();
        let format = &doc.paragraphs()[0].runs[0].format;

        assert!(format.bold);
        assert!(!format.italic);
        assert_eq!(format.font_name.as_deref(), Some("Arial"));
        assert_eq!(format.color.as_deref(), Some("FF0000"));
        assert_eq!(format.font_size, Some(24));
        assert_eq!(format.underline.as_deref(), Some("double"));
    }

    #[test]
    fn test_paragraph_mark_properties_are_not_run_formatting() {
        let xml = body(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
        );
        let doc = parse_document(xml.as_bytes()).unwrap();
        let p = doc.paragraphs()[0];

        assert_eq!(p.style_id.as_deref(), Some("Heading1"));
        assert!(!p.runs[0].format.bold);
    }

    #[test]
    fn test_parse_entities() {
        let xml = body(r#"<w:p><w:r><w:t>A &amp; B &lt;{x}&gt;</w:t></w:r></w:p>"#);
        let doc = parse_document(xml.as_bytes()).unwrap();
        assert_eq!(doc.plain_text(), "A & B <{x}>");
    }

    #[test]
    fn test_field_instructions_are_not_text() {
        let xml = body(
            r#"<w:p><w:r><w:instrText> PAGE </w:instrText></w:r><w:r><w:t>1</w:t></w:r><w:r><w:delText>gone</w:delText></w:r></w:p>"#,
        );
        let doc = parse_document(xml.as_bytes()).unwrap();
        let p = doc.paragraphs()[0];

        assert_eq!(p.runs.len(), 3);
        assert_eq!(p.text(), "1");
    }

    #[test]
    fn test_tabs_and_breaks_are_text() {
        let xml = body(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="2880"/></w:tabs></w:pPr><w:r><w:t>Nama:</w:t><w:tab/><w:t>{nama}</w:t></w:r><w:r><w:t>Baris1</w:t><w:br/><w:t>{kota}</w:t><w:cr/><w:br w:type="page"/></w:r><w:r><w:tab></w:tab></w:r></w:p>"#,
        );
        let doc = parse_document(xml.as_bytes()).unwrap();
        let p = doc.paragraphs()[0];

        assert_eq!(p.runs.len(), 3);
        assert_eq!(p.runs[0].text, "Nama:\t{nama}");
        assert_eq!(p.runs[1].text, "Baris1\n{kota}\n");
        assert_eq!(p.runs[2].text, "\t");
    }

    #[test]
    fn test_parse_nested_tables() {
        let xml = body(
            r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr><w:tr><w:tc><w:p><w:r><w:t>{a}</w:t></w:r></w:p></w:tc><w:tc><w:tbl><w:tr><w:tc><w:p><w:r><w:t>{b}</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p/></w:tc></w:tr></w:tbl><w:p><w:r><w:t>after</w:t></w:r></w:p>"#,
        );
        let doc = parse_document(xml.as_bytes()).unwrap();

        assert_eq!(doc.len(), 2);
        match &doc.blocks[0] {
            Block::Table(table) => {
                assert_eq!(table.style_id.as_deref(), Some("TableGrid"));
                assert_eq!(table.rows[0].cells.len(), 2);
                assert!(matches!(table.rows[0].cells[1].blocks[0], Block::Table(_)));
            }
            other => panic!("expected table, got {other:?}"),
        }
        let texts: Vec<String> = doc.paragraphs().iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["{a}", "{b}", "", "after"]);
    }

    #[test]
    fn test_textbox_paragraphs_are_skipped() {
        let xml = body(
            r#"<w:p><w:r><w:t>outer</w:t></w:r><w:r><w:pict><v:textbox xmlns:v="urn:schemas-microsoft-com:vml"><w:txbxContent><w:p><w:r><w:t>{inner}</w:t></w:r></w:p></w:txbxContent></v:textbox></w:pict></w:r></w:p>"#,
        );
        let doc = parse_document(xml.as_bytes()).unwrap();
        let paragraphs = doc.paragraphs();

        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text(), "outer");
        assert_eq!(paragraphs[0].runs.len(), 2);
    }

    #[test]
    fn test_missing_body() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;
        assert!(matches!(
            parse_document(xml.as_bytes()),
            Err(OoxmlError::InvalidStructure(_))
        ));
    }
}
