//! Placeholder substitution.
//!
//! Each paragraph is handled on its own. Tokens are located once, on the
//! paragraph's concatenated text, and only names present in the mapping are
//! considered:
//!
//! - if every located token lies inside a single run, each affected run is
//!   rewritten from its own text and keeps its formatting;
//! - if any token crosses a run boundary, the whole paragraph text is
//!   substituted and written into the first run that carries text, and the
//!   other runs are emptied. Formatting differences inside that paragraph
//!   are lost.
//!
//! Inserted values are never scanned again, so the result does not depend on
//! mapping order and a value that itself looks like a token stays literal.

use std::collections::BTreeSet;

use docmerge_ast::{Document, Paragraph, Run, VisitMut};
use serde::Serialize;
use tracing::debug;

use crate::localize::NumberFormat;
use crate::syntax::{PlaceholderSyntax, TokenMatch};
use crate::value::DataMapping;

/// Outcome of a substitution pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubstitutionReport {
    /// Number of token occurrences replaced
    pub replaced: usize,
    /// Distinct names that were replaced at least once
    pub names: BTreeSet<String>,
    /// Paragraphs rewritten through the paragraph-level fallback
    pub fallback_paragraphs: usize,
}

impl SubstitutionReport {
    /// True if nothing was replaced
    pub fn is_noop(&self) -> bool {
        self.replaced == 0
    }
}

/// Placeholder substituter configured with a syntax and a number rule
#[derive(Debug, Clone, Default)]
pub struct Substituter {
    syntax: PlaceholderSyntax,
    number_format: Option<NumberFormat>,
}

impl Substituter {
    /// Create a substituter with the Indonesian number rule
    pub fn new(syntax: PlaceholderSyntax) -> Self {
        Self {
            syntax,
            number_format: Some(NumberFormat::default()),
        }
    }

    /// Replace the number rule; `None` leaves numbers unformatted
    pub fn with_number_format(mut self, number_format: Option<NumberFormat>) -> Self {
        self.number_format = number_format;
        self
    }

    /// Configured syntax
    pub fn syntax(&self) -> &PlaceholderSyntax {
        &self.syntax
    }

    /// Substitute placeholders in `doc` in place
    pub fn substitute(&self, doc: &mut Document, mapping: &DataMapping) -> SubstitutionReport {
        let mut pass = Pass {
            substituter: self,
            mapping,
            report: SubstitutionReport::default(),
        };
        pass.visit_document_mut(doc);
        pass.report
    }

    /// Substitute placeholders in a plain string
    pub fn substitute_text(&self, text: &str, mapping: &DataMapping) -> String {
        let tokens = self.tokens(text, mapping);
        self.splice(text, 0, &tokens, mapping)
    }

    fn tokens<'t>(&self, text: &'t str, mapping: &DataMapping) -> Vec<TokenMatch<'t>> {
        self.syntax
            .find_tokens(text, |name| mapping.contains_key(name))
    }

    /// Replace `tokens` (offsets relative to `base`) inside `text`
    fn splice(
        &self,
        text: &str,
        base: usize,
        tokens: &[TokenMatch<'_>],
        mapping: &DataMapping,
    ) -> String {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for token in tokens {
            let start = token.start - base;
            out.push_str(&text[cursor..start]);
            match mapping.get(token.name) {
                Some(value) => out.push_str(&value.render(self.number_format.as_ref())),
                None => out.push_str(&text[start..token.end - base]),
            }
            cursor = token.end - base;
        }
        out.push_str(&text[cursor..]);
        out
    }

    fn substitute_paragraph(
        &self,
        paragraph: &mut Paragraph,
        mapping: &DataMapping,
        report: &mut SubstitutionReport,
    ) {
        let text = paragraph.text();
        let tokens = self.tokens(&text, mapping);
        if tokens.is_empty() {
            return;
        }

        let mut bounds = Vec::with_capacity(paragraph.runs.len());
        let mut offset = 0;
        for run in &paragraph.runs {
            bounds.push((offset, offset + run.text.len()));
            offset += run.text.len();
        }

        let owner = |token: &TokenMatch<'_>| {
            bounds
                .iter()
                .position(|&(start, end)| token.start >= start && token.end <= end)
        };
        let owners: Vec<Option<usize>> = tokens.iter().map(owner).collect();

        report.replaced += tokens.len();
        report
            .names
            .extend(tokens.iter().map(|t| t.name.to_string()));

        if owners.iter().all(Option::is_some) {
            for (index, &(start, _)) in bounds.iter().enumerate() {
                let own: Vec<TokenMatch<'_>> = tokens
                    .iter()
                    .zip(&owners)
                    .filter(|(_, owner)| **owner == Some(index))
                    .map(|(t, _)| t.clone())
                    .collect();
                if own.is_empty() {
                    continue;
                }
                let run = &paragraph.runs[index];
                let rewritten = run.with_text(self.splice(&run.text, start, &own, mapping));
                paragraph.runs[index] = rewritten;
            }
            return;
        }

        debug!(
            runs = paragraph.runs.len(),
            "placeholder spans runs, rewriting paragraph as a single run"
        );
        report.fallback_paragraphs += 1;

        let mut rewritten = self.splice(&text, 0, &tokens, mapping);
        // Runs ahead of the first one with text hold only drawings or fields
        // and stay where they are
        match paragraph.runs.iter().position(|run| !run.text.is_empty()) {
            Some(target) => {
                for (index, run) in paragraph.runs.iter_mut().enumerate() {
                    let text = if index == target {
                        std::mem::take(&mut rewritten)
                    } else {
                        String::new()
                    };
                    *run = run.with_text(text);
                }
            }
            None => paragraph.push_run(Run::new(rewritten)),
        }
    }
}

struct Pass<'a> {
    substituter: &'a Substituter,
    mapping: &'a DataMapping,
    report: SubstitutionReport,
}

impl VisitMut for Pass<'_> {
    fn visit_paragraph_mut(&mut self, paragraph: &mut Paragraph) {
        self.substituter
            .substitute_paragraph(paragraph, self.mapping, &mut self.report);
    }
}

/// Substitute with a one-off [`Substituter`]
pub fn substitute(
    doc: &mut Document,
    mapping: &DataMapping,
    syntax: &PlaceholderSyntax,
    number_format: Option<&NumberFormat>,
) -> SubstitutionReport {
    Substituter::new(syntax.clone())
        .with_number_format(number_format.cloned())
        .substitute(doc, mapping)
}
