//! Stable positions for paragraphs and runs in `word/document.xml`
//!
//! The parser and the patch writer both walk the same XML with a
//! [`Locator`], so the n-th body paragraph and the n-th body run get the same
//! index on both sides. Text boxes are skipped entirely: their paragraphs are
//! neither indexed nor substituted.
//!
//! Elements are matched on their qualified `w:` names so DrawingML `a:p` /
//! `a:t` inside drawings never interfere with WordprocessingML structure.
//!
//! A run's text is its `w:t` content plus [`text_char`] elements: `w:tab`
//! reads as `'\t'`, `w:br` and `w:cr` as `'\n'`.

use quick_xml::events::BytesStart;

/// What an XML event means for paragraph/run tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mark {
    ParagraphStart(usize),
    ParagraphEnd(usize),
    /// `<w:p/>`
    EmptyParagraph(usize),
    RunStart(usize),
    RunEnd(usize),
    /// `<w:r/>`
    EmptyRun(usize),
    TextStart,
    TextEnd,
    /// `<w:t/>`
    EmptyText,
    Other,
}

#[derive(Debug, Default)]
pub(crate) struct Locator {
    body_depth: usize,
    textbox_depth: usize,
    paragraph: Option<usize>,
    run: Option<usize>,
    in_text: bool,
    paragraphs: usize,
    runs: usize,
}

impl Locator {
    /// Whether events currently belong to a body paragraph
    pub(crate) fn tracking(&self) -> bool {
        self.body_depth > 0 && self.textbox_depth == 0
    }

    pub(crate) fn in_run(&self) -> bool {
        self.tracking() && self.run.is_some()
    }

    pub(crate) fn in_paragraph(&self) -> bool {
        self.tracking() && self.paragraph.is_some()
    }

    pub(crate) fn in_text(&self) -> bool {
        self.tracking() && self.in_text
    }

    /// Inside a run but outside its `w:t` elements
    pub(crate) fn in_run_body(&self) -> bool {
        self.in_run() && !self.in_text
    }

    fn next_paragraph(&mut self) -> usize {
        let id = self.paragraphs;
        self.paragraphs += 1;
        id
    }

    fn next_run(&mut self) -> usize {
        let id = self.runs;
        self.runs += 1;
        id
    }

    pub(crate) fn start(&mut self, name: &[u8]) -> Mark {
        match name {
            b"w:body" => {
                self.body_depth += 1;
                Mark::Other
            }
            b"w:txbxContent" => {
                self.textbox_depth += 1;
                Mark::Other
            }
            _ if !self.tracking() => Mark::Other,
            b"w:p" if self.paragraph.is_none() => {
                let id = self.next_paragraph();
                self.paragraph = Some(id);
                Mark::ParagraphStart(id)
            }
            b"w:r" if self.paragraph.is_some() && self.run.is_none() => {
                let id = self.next_run();
                self.run = Some(id);
                Mark::RunStart(id)
            }
            b"w:t" if self.run.is_some() => {
                self.in_text = true;
                Mark::TextStart
            }
            _ => Mark::Other,
        }
    }

    pub(crate) fn end(&mut self, name: &[u8]) -> Mark {
        match name {
            b"w:body" => {
                self.body_depth = self.body_depth.saturating_sub(1);
                Mark::Other
            }
            b"w:txbxContent" => {
                self.textbox_depth = self.textbox_depth.saturating_sub(1);
                Mark::Other
            }
            _ if !self.tracking() => Mark::Other,
            b"w:t" if self.in_text => {
                self.in_text = false;
                Mark::TextEnd
            }
            b"w:r" => match self.run.take() {
                Some(id) => Mark::RunEnd(id),
                None => Mark::Other,
            },
            b"w:p" => match self.paragraph.take() {
                Some(id) => Mark::ParagraphEnd(id),
                None => Mark::Other,
            },
            _ => Mark::Other,
        }
    }

    pub(crate) fn empty(&mut self, name: &[u8]) -> Mark {
        if !self.tracking() {
            return Mark::Other;
        }
        match name {
            b"w:p" if self.paragraph.is_none() => Mark::EmptyParagraph(self.next_paragraph()),
            b"w:r" if self.paragraph.is_some() && self.run.is_none() => {
                Mark::EmptyRun(self.next_run())
            }
            b"w:t" if self.run.is_some() => Mark::EmptyText,
            _ => Mark::Other,
        }
    }
}

/// The character a run child stands for, if it is part of the run's text
///
/// Only text-wrapping breaks count; page and column breaks are layout.
pub(crate) fn text_char(locator: &Locator, e: &BytesStart) -> Option<char> {
    if !locator.in_run_body() {
        return None;
    }
    match e.name().as_ref() {
        b"w:tab" => Some('\t'),
        b"w:cr" => Some('\n'),
        b"w:br" => {
            let kind = e
                .attributes()
                .filter_map(|a| a.ok())
                .find(|a| a.key.as_ref() == b"w:type");
            match kind {
                Some(attr) if attr.value.as_ref() != b"textWrapping" => None,
                _ => Some('\n'),
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_sequential() {
        let mut loc = Locator::default();
        assert_eq!(loc.start(b"w:p"), Mark::Other);
        loc.start(b"w:body");
        assert_eq!(loc.start(b"w:p"), Mark::ParagraphStart(0));
        assert_eq!(loc.start(b"w:r"), Mark::RunStart(0));
        assert_eq!(loc.start(b"w:t"), Mark::TextStart);
        assert!(loc.in_text());
        assert_eq!(loc.end(b"w:t"), Mark::TextEnd);
        assert_eq!(loc.end(b"w:r"), Mark::RunEnd(0));
        assert_eq!(loc.empty(b"w:r"), Mark::EmptyRun(1));
        assert_eq!(loc.end(b"w:p"), Mark::ParagraphEnd(0));
        assert_eq!(loc.empty(b"w:p"), Mark::EmptyParagraph(1));
        assert_eq!(loc.start(b"w:p"), Mark::ParagraphStart(2));
    }

    #[test]
    fn test_textbox_is_skipped() {
        let mut loc = Locator::default();
        loc.start(b"w:body");
        loc.start(b"w:p");
        loc.start(b"w:r");
        loc.start(b"w:txbxContent");
        assert_eq!(loc.start(b"w:p"), Mark::Other);
        assert_eq!(loc.start(b"w:r"), Mark::Other);
        assert_eq!(loc.end(b"w:r"), Mark::Other);
        assert_eq!(loc.end(b"w:p"), Mark::Other);
        loc.end(b"w:txbxContent");
        assert_eq!(loc.end(b"w:r"), Mark::RunEnd(0));
        assert_eq!(loc.end(b"w:p"), Mark::ParagraphEnd(0));
    }

    #[test]
    fn test_drawingml_names_ignored() {
        let mut loc = Locator::default();
        loc.start(b"w:body");
        loc.start(b"w:p");
        loc.start(b"w:r");
        assert_eq!(loc.start(b"a:p"), Mark::Other);
        assert_eq!(loc.start(b"a:t"), Mark::Other);
        assert_eq!(loc.end(b"a:p"), Mark::Other);
        assert!(loc.in_paragraph());
    }

    #[test]
    fn test_text_chars_only_inside_runs() {
        let tab = BytesStart::new("w:tab");
        let mut page = BytesStart::new("w:br");
        page.push_attribute(("w:type", "page"));

        let mut loc = Locator::default();
        loc.start(b"w:body");
        loc.start(b"w:p");
        // Tab stops in paragraph properties are not text
        assert_eq!(text_char(&loc, &tab), None);

        loc.start(b"w:r");
        assert_eq!(text_char(&loc, &tab), Some('\t'));
        assert_eq!(text_char(&loc, &BytesStart::new("w:br")), Some('\n'));
        assert_eq!(text_char(&loc, &BytesStart::new("w:cr")), Some('\n'));
        assert_eq!(text_char(&loc, &page), None);
        assert_eq!(text_char(&loc, &BytesStart::new("w:rPr")), None);
    }
}
