//! Batch generation over every (row × template) pair
//!
//! Each pair gets its own copy of the template, materialized from the
//! template's original bytes, so nothing substituted for one row can show up
//! in another.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use docmerge_core::{
    scan_documents, scan_placeholders, unmatched_placeholders, ConsistencyChecker,
    ConsistencyReport, DataMapping, SubstitutionReport, Substituter,
};
use docmerge_ooxml::Template;

use crate::config::Settings;

/// One filled document
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDocument {
    /// `{row+1}_{template name}`
    pub name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub substitution: SubstitutionReport,
    pub consistency: ConsistencyReport,
}

/// Output file name for a data row and a template
pub fn output_name(row_index: usize, template_name: &str) -> String {
    format!("{}_{}", row_index + 1, template_name)
}

/// Load templates, rejecting two templates that would produce the same
/// output names
pub fn load_templates(paths: &[impl AsRef<Path>]) -> Result<Vec<Template>> {
    let mut templates: Vec<Template> = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let template = Template::load(path)
            .with_context(|| format!("Failed to load template: {}", path.display()))?;
        if templates.iter().any(|t| t.name() == template.name()) {
            bail!(
                "Two templates are named {}; output names would collide",
                template.name()
            );
        }
        templates.push(template);
    }
    Ok(templates)
}

/// Scanner, substituter and consistency checker configured from settings
#[derive(Debug, Clone)]
pub struct MergeEngine {
    substituter: Substituter,
    checker: ConsistencyChecker,
}

impl MergeEngine {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let substituter =
            Substituter::new(settings.syntax()).with_number_format(settings.number_format());
        let checker = ConsistencyChecker::new(&settings.currency())
            .context("Invalid consistency settings")?;
        Ok(Self {
            substituter,
            checker,
        })
    }

    /// Placeholders of each template, keyed by template name
    pub fn scan(&self, templates: &[Template]) -> Result<BTreeMap<String, Vec<String>>> {
        let mut found = BTreeMap::new();
        for template in templates {
            let doc = template.instantiate()?;
            found.insert(
                template.name().to_string(),
                scan_placeholders(doc.document(), self.substituter.syntax()),
            );
        }
        Ok(found)
    }

    /// Placeholders used by any template but absent from `columns`
    ///
    /// Logged as a warning; generation still proceeds and leaves those
    /// placeholders literal.
    pub fn unmatched<S: AsRef<str>>(
        &self,
        templates: &[Template],
        columns: &[S],
    ) -> Result<Vec<String>> {
        let docs = templates
            .iter()
            .map(|t| t.instantiate())
            .collect::<docmerge_ooxml::Result<Vec<_>>>()?;
        let all = scan_documents(docs.iter().map(|d| d.document()), self.substituter.syntax());
        let unmatched = unmatched_placeholders(&all, columns);
        if !unmatched.is_empty() {
            warn!("Unmatched placeholders: {}", unmatched.join(", "));
        }
        Ok(unmatched)
    }

    /// Fill one template with one row
    pub fn generate_one(
        &self,
        template: &Template,
        mapping: &DataMapping,
        row_index: usize,
    ) -> Result<GeneratedDocument> {
        let name = output_name(row_index, template.name());
        let mut doc = template
            .instantiate()
            .with_context(|| format!("Failed to open template: {}", template.name()))?;

        let substitution = self.substituter.substitute(doc.document_mut(), mapping);
        let consistency = self.checker.check(&doc.plain_text());
        let bytes = doc
            .to_bytes()
            .with_context(|| format!("Failed to write document: {}", name))?;

        debug!(
            document = %name,
            replaced = substitution.replaced,
            fallback = substitution.fallback_paragraphs,
            pairs = consistency.len(),
            "generated document"
        );
        Ok(GeneratedDocument {
            name,
            bytes,
            substitution,
            consistency,
        })
    }

    /// Fill every template with every row, row-major
    pub fn generate(
        &self,
        templates: &[Template],
        mappings: &[DataMapping],
    ) -> Result<Vec<GeneratedDocument>> {
        let mut generated = Vec::with_capacity(templates.len() * mappings.len());
        for (row_index, mapping) in mappings.iter().enumerate() {
            for template in templates {
                generated.push(self.generate_one(template, mapping, row_index)?);
            }
        }
        info!(
            documents = generated.len(),
            rows = mappings.len(),
            templates = templates.len(),
            "batch complete"
        );
        Ok(generated)
    }

    /// Consistency report for already rendered text
    pub fn check_text(&self, text: &str) -> ConsistencyReport {
        self.checker.check(text)
    }
}
