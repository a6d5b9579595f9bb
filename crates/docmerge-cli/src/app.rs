//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use docmerge_core::{ConsistencyReport, DataMapping, SyntaxKind};
use docmerge_data::DataEngine;
use docmerge_ooxml::DocxDocument;

use crate::batch::{load_templates, GeneratedDocument, MergeEngine};
use crate::bundle::write_outputs;
use crate::config::Settings;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

/// Placeholder delimiters on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SyntaxArg {
    /// `{name}`
    Single,
    /// `{{name}}`
    Double,
}

impl From<SyntaxArg> for SyntaxKind {
    fn from(arg: SyntaxArg) -> Self {
        match arg {
            SyntaxArg::Single => SyntaxKind::Single,
            SyntaxArg::Double => SyntaxKind::Double,
        }
    }
}

#[derive(Parser)]
#[command(name = "docmerge")]
#[command(author, version, about = "Fill DOCX templates from spreadsheet rows", long_about = None)]
struct Cli {
    /// Configuration file (default: ./docmerge.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the placeholders used by DOCX templates
    Scan {
        /// Template DOCX files
        #[arg(required = true)]
        templates: Vec<PathBuf>,

        /// Data file (.xlsx, .csv, .tsv) to report unmatched placeholders against
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Sheet name (Excel only, default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Placeholder syntax (overrides the config file)
        #[arg(long, value_enum)]
        syntax: Option<SyntaxArg>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Generate one document per data row and template
    Generate {
        /// Template DOCX files
        #[arg(required = true)]
        templates: Vec<PathBuf>,

        /// Data file (.xlsx, .csv, .tsv)
        #[arg(short, long)]
        data: PathBuf,

        /// Sheet name (Excel only, default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Read the data as key/value pairs (first two columns) for a single document
        #[arg(long)]
        key_value: bool,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Placeholder syntax (overrides the config file)
        #[arg(long, value_enum)]
        syntax: Option<SyntaxArg>,

        /// Report format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Check figure/verbal consistency of DOCX documents
    Check {
        /// DOCX files to check
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan {
            templates,
            data,
            sheet,
            syntax,
            format,
        } => {
            apply_syntax(&mut settings, syntax);
            let summary = scan_command(&templates, data.as_deref(), sheet.as_deref(), &settings)?;
            print_scan(&summary, format)?;
        }
        Commands::Generate {
            templates,
            data,
            sheet,
            key_value,
            output,
            syntax,
            format,
        } => {
            apply_syntax(&mut settings, syntax);
            let options = GenerateOptions {
                sheet,
                key_value,
                output,
            };
            let summary = generate_command(&templates, &data, &options, &settings)?;
            print_generate(&summary, format)?;
        }
        Commands::Check { inputs, format } => {
            let checked = check_command(&inputs, &settings)?;
            print_check(&checked, format)?;
        }
    }

    Ok(())
}

fn apply_syntax(settings: &mut Settings, syntax: Option<SyntaxArg>) {
    if let Some(syntax) = syntax {
        settings.placeholders.syntax = syntax.into();
    }
}

/// Placeholders found per template, and those the data does not provide
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    pub templates: BTreeMap<String, Vec<String>>,
    /// Only filled when a data file was given
    pub unmatched: Vec<String>,
}

/// Execute the scan command
pub fn scan_command(
    templates: &[PathBuf],
    data: Option<&Path>,
    sheet: Option<&str>,
    settings: &Settings,
) -> Result<ScanSummary> {
    let engine = MergeEngine::from_settings(settings)?;
    let templates = load_templates(templates)?;

    let unmatched = match data {
        Some(data) => {
            let (_, columns) = load_mappings(data, sheet, false)?;
            engine.unmatched(&templates, &columns)?
        }
        None => Vec::new(),
    };

    Ok(ScanSummary {
        templates: engine.scan(&templates)?,
        unmatched,
    })
}

/// Options of the generate command besides templates and data
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub sheet: Option<String>,
    pub key_value: bool,
    pub output: PathBuf,
}

/// What a generate run produced
#[derive(Debug, Clone, Serialize)]
pub struct GenerateSummary {
    /// The standalone document or the archive written
    pub output: PathBuf,
    pub documents: Vec<GeneratedDocument>,
    pub unmatched: Vec<String>,
}

/// Execute the generate command
pub fn generate_command(
    templates: &[PathBuf],
    data: &Path,
    options: &GenerateOptions,
    settings: &Settings,
) -> Result<GenerateSummary> {
    let engine = MergeEngine::from_settings(settings)?;
    let templates = load_templates(templates)?;
    let (mappings, columns) = load_mappings(data, options.sheet.as_deref(), options.key_value)?;

    let unmatched = engine.unmatched(&templates, &columns)?;
    let documents = engine.generate(&templates, &mappings)?;
    let output = write_outputs(&documents, &options.output, &settings.output.archive_name)?;

    Ok(GenerateSummary {
        output,
        documents,
        unmatched,
    })
}

/// Consistency report of one checked document
#[derive(Debug, Clone, Serialize)]
pub struct CheckedDocument {
    pub name: String,
    pub consistency: ConsistencyReport,
}

/// Execute the check command
pub fn check_command(inputs: &[PathBuf], settings: &Settings) -> Result<Vec<CheckedDocument>> {
    let engine = MergeEngine::from_settings(settings)?;

    inputs
        .iter()
        .map(|input| -> Result<CheckedDocument> {
            let doc = DocxDocument::open(input)
                .with_context(|| format!("Failed to open DOCX file: {}", input.display()))?;
            Ok(CheckedDocument {
                name: input.display().to_string(),
                consistency: engine.check_text(&doc.plain_text()),
            })
        })
        .collect()
}

/// Read the data file into mappings plus the names placeholders can use
fn load_mappings(
    data: &Path,
    sheet: Option<&str>,
    key_value: bool,
) -> Result<(Vec<DataMapping>, Vec<String>)> {
    let table = DataEngine::load(data, sheet)
        .with_context(|| format!("Failed to read data file: {}", data.display()))?;

    if key_value {
        let mapping = table
            .key_value_mapping()
            .with_context(|| format!("Failed to read key/value data: {}", data.display()))?;
        let columns = mapping.keys().map(str::to_string).collect();
        return Ok((vec![mapping], columns));
    }

    if table.is_empty() {
        bail!("No data rows in {}", data.display());
    }
    Ok((table.mappings(), table.columns().to_vec()))
}

fn print_scan(summary: &ScanSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Text => {
            for (template, names) in &summary.templates {
                if names.is_empty() {
                    println!("{}: no placeholders", template);
                } else {
                    println!("{}: {}", template, names.join(", "));
                }
            }
            if !summary.unmatched.is_empty() {
                println!("Unmatched placeholders: {}", summary.unmatched.join(", "));
            }
        }
    }
    Ok(())
}

fn print_generate(summary: &GenerateSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        OutputFormat::Text => {
            println!("docmerge v{}", crate::VERSION);
            if !summary.unmatched.is_empty() {
                println!("Unmatched placeholders: {}", summary.unmatched.join(", "));
            }
            for doc in &summary.documents {
                println!(
                    "  {}: {} placeholder(s) replaced",
                    doc.name, doc.substitution.replaced
                );
                print_consistency(&doc.consistency);
            }
            println!(
                "Generated {} document(s): {}",
                summary.documents.len(),
                summary.output.display()
            );
        }
    }
    Ok(())
}

fn print_check(checked: &[CheckedDocument], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(checked)?),
        OutputFormat::Text => {
            for doc in checked {
                println!("{}", doc.name);
                if doc.consistency.is_empty() {
                    println!("    no amounts found");
                }
                print_consistency(&doc.consistency);
            }
        }
    }
    Ok(())
}

fn print_consistency(report: &ConsistencyReport) {
    for row in &report.rows {
        println!("    {} | {} | {}", row.figure, row.verbal, row.status);
    }
}
