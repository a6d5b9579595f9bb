//! Writing a substituted document back into `word/document.xml`
//!
//! The original XML is streamed through unchanged except for the runs whose
//! text differs from what the source contained:
//!
//! - a changed run gets its new text where its first text element was, as
//!   `w:t` segments (with `xml:space="preserve"`) separated by `w:tab` and
//!   `w:br`; its other `w:t`, `w:tab` and line-break elements are dropped,
//!   and a changed run with none of them gets the text appended
//! - a run missing from the tree is removed
//! - a run without `origin` is appended at the end of its paragraph with a
//!   `w:rPr` generated from its [`RunFormat`]
//!
//! Run properties of existing runs are never touched, so their formatting
//! survives exactly as authored. Neither are page breaks, drawings or field
//! characters inside a changed run.

use std::collections::{HashMap, HashSet};

use docmerge_ast::{Document, Run, RunFormat};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::{debug, warn};

use crate::document::parse_document;
use crate::error::Result;
use crate::locate::{text_char, Locator, Mark};

/// Patch `xml` so its body text matches `doc`
///
/// `doc` is expected to come from [`parse_document`] on the same XML, with
/// edits applied. If nothing changed the input is returned as is.
pub fn patch_document_xml(xml: &[u8], doc: &Document) -> Result<Vec<u8>> {
    let original = parse_document(xml)?;
    let plan = PatchPlan::new(&original, doc);
    if plan.is_empty() {
        return Ok(xml.to_vec());
    }
    debug!(
        rewritten = plan.rewrites.len(),
        removed = plan.removed.len(),
        appended = plan.appended.values().map(Vec::len).sum::<usize>(),
        "patching document body"
    );

    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let mut locator = Locator::default();
    let mut mode = RunMode::Pass;
    // Name of a dropped element whose content is skipped up to its end tag
    let mut skipping: Option<Vec<u8>> = None;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let event = reader.read_event_into(&mut buf)?;
        let keep = match &event {
            Event::Eof => break,
            Event::Start(e) => {
                let mark = locator.start(e.name().as_ref());
                if skipping.is_some() {
                    false
                } else {
                    match mark {
                        Mark::RunStart(id) => {
                            mode = plan.mode(id);
                            !mode.is_remove()
                        }
                        Mark::TextStart => {
                            let keep = replace_text(&mut writer, &mut mode)?;
                            if !keep {
                                skipping = Some(e.name().as_ref().to_vec());
                            }
                            keep
                        }
                        _ if text_char(&locator, e).is_some() => {
                            let keep = replace_text(&mut writer, &mut mode)?;
                            if !keep {
                                skipping = Some(e.name().as_ref().to_vec());
                            }
                            keep
                        }
                        _ => !mode.is_remove(),
                    }
                }
            }
            Event::End(e) => {
                let mark = locator.end(e.name().as_ref());
                if let Some(name) = skipping.as_deref() {
                    if name == e.name().as_ref() {
                        skipping = None;
                    }
                    false
                } else {
                    match mark {
                        Mark::RunEnd(_) => match std::mem::replace(&mut mode, RunMode::Pass) {
                            RunMode::Remove => false,
                            RunMode::Rewrite {
                                text,
                                written: false,
                            } => {
                                write_run_text(&mut writer, text)?;
                                true
                            }
                            _ => true,
                        },
                        Mark::ParagraphEnd(id) => {
                            for run in plan.appended(id) {
                                write_new_run(&mut writer, run)?;
                            }
                            true
                        }
                        _ => !mode.is_remove(),
                    }
                }
            }
            Event::Empty(e) => {
                let mark = locator.empty(e.name().as_ref());
                if skipping.is_some() {
                    false
                } else {
                    match mark {
                        Mark::EmptyParagraph(id) if !plan.appended(id).is_empty() => {
                            writer.write_event(Event::Start(e.borrow()))?;
                            for run in plan.appended(id) {
                                write_new_run(&mut writer, run)?;
                            }
                            writer.write_event(Event::End(e.to_end()))?;
                            false
                        }
                        Mark::EmptyRun(id) => match plan.mode(id) {
                            RunMode::Remove => false,
                            RunMode::Rewrite { text, .. } if !text.is_empty() => {
                                writer.write_event(Event::Start(e.borrow()))?;
                                write_run_text(&mut writer, text)?;
                                writer.write_event(Event::End(e.to_end()))?;
                                false
                            }
                            _ => true,
                        },
                        Mark::EmptyText => replace_text(&mut writer, &mut mode)?,
                        _ if text_char(&locator, e).is_some() => {
                            replace_text(&mut writer, &mut mode)?
                        }
                        _ => !mode.is_remove(),
                    }
                }
            }
            _ => !mode.is_remove() && skipping.is_none(),
        };
        if keep {
            writer.write_event(event)?;
        }
    }

    Ok(writer.into_inner())
}

/// Handle one text element of the current run (`w:t`, `w:tab`, a line
/// break): a rewritten run emits its whole new text in place of the first
/// one and drops the rest. Returns whether the source element is kept.
fn replace_text(writer: &mut Writer<Vec<u8>>, mode: &mut RunMode<'_>) -> Result<bool> {
    match mode {
        RunMode::Rewrite { text, written } => {
            if !*written {
                write_run_text(writer, *text)?;
                *written = true;
            }
            Ok(false)
        }
        RunMode::Remove => Ok(false),
        RunMode::Pass => Ok(true),
    }
}

/// Emit run text as `w:t` segments, with `<w:tab/>` for tabs and `<w:br/>`
/// for line breaks
fn write_run_text(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<()> {
    let mut segment = 0;
    let mut after_cr = false;
    for (i, c) in text.char_indices() {
        let element = match c {
            '\t' => "w:tab",
            '\n' if after_cr => {
                segment = i + 1;
                after_cr = false;
                continue;
            }
            '\n' | '\r' => "w:br",
            _ => {
                after_cr = false;
                continue;
            }
        };
        after_cr = c == '\r';
        write_text(writer, &text[segment..i])?;
        writer.write_event(Event::Empty(BytesStart::new(element)))?;
        segment = i + 1;
    }
    write_text(writer, &text[segment..])
}

/// `<w:t xml:space="preserve">text</w:t>`, nothing for an empty segment
fn write_text(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let mut start = BytesStart::new("w:t");
    start.push_attribute(("xml:space", "preserve"));
    writer.write_event(Event::Start(start.borrow()))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(start.to_end()))?;
    Ok(())
}

fn write_new_run(writer: &mut Writer<Vec<u8>>, run: &Run) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:r")))?;
    if !run.format.is_plain() {
        write_run_properties(writer, &run.format)?;
    }
    write_run_text(writer, &run.text)?;
    writer.write_event(Event::End(BytesStart::new("w:r").to_end()))?;
    Ok(())
}

/// `w:rPr` children in schema order
fn write_run_properties(writer: &mut Writer<Vec<u8>>, format: &RunFormat) -> Result<()> {
    let rpr = BytesStart::new("w:rPr");
    writer.write_event(Event::Start(rpr.borrow()))?;

    if let Some(font) = &format.font_name {
        let mut fonts = BytesStart::new("w:rFonts");
        fonts.push_attribute(("w:ascii", font.as_str()));
        fonts.push_attribute(("w:hAnsi", font.as_str()));
        writer.write_event(Event::Empty(fonts))?;
    }
    if format.bold {
        writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
    }
    if format.italic {
        writer.write_event(Event::Empty(BytesStart::new("w:i")))?;
    }
    if let Some(color) = &format.color {
        writer.write_event(Event::Empty(valued("w:color", color)))?;
    }
    if let Some(size) = format.font_size {
        writer.write_event(Event::Empty(valued("w:sz", &size.to_string())))?;
    }
    if let Some(underline) = &format.underline {
        writer.write_event(Event::Empty(valued("w:u", underline)))?;
    }

    writer.write_event(Event::End(rpr.to_end()))?;
    Ok(())
}

fn valued<'a>(name: &'a str, val: &str) -> BytesStart<'a> {
    let mut element = BytesStart::new(name);
    element.push_attribute(("w:val", val));
    element
}

#[derive(Debug)]
enum RunMode<'d> {
    Pass,
    Rewrite { text: &'d str, written: bool },
    Remove,
}

impl RunMode<'_> {
    fn is_remove(&self) -> bool {
        matches!(self, RunMode::Remove)
    }
}

/// Differences between the parsed source and the edited tree
#[derive(Debug, Default)]
struct PatchPlan<'d> {
    rewrites: HashMap<usize, &'d str>,
    removed: HashSet<usize>,
    appended: HashMap<usize, Vec<&'d Run>>,
}

impl<'d> PatchPlan<'d> {
    fn new(original: &Document, edited: &'d Document) -> Self {
        let source: HashMap<usize, &str> = original
            .paragraphs()
            .into_iter()
            .flat_map(|p| p.runs.iter())
            .filter_map(|r| r.origin.map(|id| (id, r.text.as_str())))
            .collect();

        let mut plan = PatchPlan::default();
        let mut seen = HashSet::new();

        for paragraph in edited.paragraphs() {
            for run in &paragraph.runs {
                match (run.origin, paragraph.origin) {
                    (Some(id), _) => {
                        seen.insert(id);
                        if source.get(&id) != Some(&run.text.as_str()) {
                            plan.rewrites.insert(id, run.text.as_str());
                        }
                    }
                    (None, Some(pid)) => plan.appended.entry(pid).or_default().push(run),
                    (None, None) => {
                        warn!(text = %run.text, "run in a paragraph with no source position is not written");
                    }
                }
            }
        }

        plan.removed = source
            .keys()
            .filter(|id| !seen.contains(*id))
            .copied()
            .collect();
        plan
    }

    fn is_empty(&self) -> bool {
        self.rewrites.is_empty() && self.removed.is_empty() && self.appended.is_empty()
    }

    fn mode(&self, id: usize) -> RunMode<'d> {
        if self.removed.contains(&id) {
            RunMode::Remove
        } else if let Some(text) = self.rewrites.get(&id) {
            RunMode::Rewrite {
                text,
                written: false,
            }
        } else {
            RunMode::Pass
        }
    }

    fn appended(&self, paragraph: usize) -> &[&'d Run] {
        self.appended
            .get(&paragraph)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
