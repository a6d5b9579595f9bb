//! End-to-end tests for the placeholder engine
//!
//! Scanner, substituter and consistency checker working on the same tree.

use docmerge_ast::{Block, Document, Paragraph, Run, RunFormat, Table, TableCell, TableRow};
use docmerge_core::{
    scan_placeholders, ConsistencyChecker, CurrencyConvention, DataMapping, PairStatus,
    PlaceholderSyntax, Substituter, Value,
};

fn contract() -> Document {
    let heading = RunFormat {
        bold: true,
        font_size: Some(28),
        ..Default::default()
    };
    let mut doc = Document::new();
    doc.push(Block::Paragraph(Paragraph::from_runs(vec![Run::formatted(
        "PERJANJIAN {nomor}",
        heading,
    )])));
    doc.push(Block::Paragraph(Paragraph::from_runs(vec![
        Run::new("Pihak kedua: "),
        Run::formatted(
            "{nama}",
            RunFormat {
                underline: Some("single".to_string()),
                ..Default::default()
            },
        ),
    ])));
    doc.push(Block::Table(Table {
        rows: vec![TableRow {
            cells: vec![
                TableCell::from_paragraph(Paragraph::from_runs(vec![Run::new("Nilai")])),
                TableCell::from_paragraph(Paragraph::from_runs(vec![
                    Run::new("Rp {nilai} ("),
                    Run::new("{terbilang})"),
                ])),
            ],
        }],
        style_id: Some("TableGrid".to_string()),
    }));
    doc
}

fn row() -> DataMapping {
    [
        ("nomor", Value::from("001/SRR/2024")),
        ("nama", Value::from("Budi Santoso")),
        ("nilai", Value::Integer(12000)),
        ("terbilang", Value::from("DUA BELAS RIBU RUPIAH")),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_scan_then_substitute_then_check() {
    let syntax = PlaceholderSyntax::single();
    let mut doc = contract();

    assert_eq!(
        scan_placeholders(&doc, &syntax),
        vec!["nama", "nilai", "nomor"]
    );

    let report = Substituter::new(syntax.clone()).substitute(&mut doc, &row());
    assert_eq!(report.replaced, 4);
    assert_eq!(report.fallback_paragraphs, 0);
    assert!(scan_placeholders(&doc, &syntax).is_empty());

    let text = doc.plain_text();
    assert!(text.contains("PERJANJIAN 001/SRR/2024"));
    assert!(text.contains("Rp 12.000,00 (DUA BELAS RIBU RUPIAH)"));

    let checker = ConsistencyChecker::new(&CurrencyConvention::default()).unwrap();
    let consistency = checker.check(&text);
    assert_eq!(consistency.len(), 1);
    assert_eq!(consistency.rows[0].amount, Some(12000));
    assert_eq!(consistency.rows[0].status, PairStatus::Match);
}

#[test]
fn test_formatting_survives_per_run_substitution() {
    let mut doc = contract();
    let before: Vec<RunFormat> = doc
        .paragraphs()
        .iter()
        .flat_map(|p| p.runs.iter().map(|r| r.format.clone()))
        .collect();

    Substituter::new(PlaceholderSyntax::single()).substitute(&mut doc, &row());

    let after: Vec<RunFormat> = doc
        .paragraphs()
        .iter()
        .flat_map(|p| p.runs.iter().map(|r| r.format.clone()))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_missing_value_leaves_mismatch_visible() {
    let mut doc = contract();
    let mut mapping = row();
    mapping.insert("terbilang", Value::from("dua belas ribu"));

    Substituter::new(PlaceholderSyntax::single()).substitute(&mut doc, &mapping);

    let checker = ConsistencyChecker::new(&CurrencyConvention::default()).unwrap();
    let consistency = checker.check(&doc.plain_text());
    assert_eq!(consistency.rows[0].status, PairStatus::Mismatch);
    assert_eq!(consistency.rows[0].verbal, "not found");
}

#[test]
fn test_double_brace_deployment() {
    let mut doc = Document::new();
    doc.push(Block::Paragraph(Paragraph::from_runs(vec![Run::new(
        "Total: {{amount}}",
    )])));
    let mapping: DataMapping = [("amount", Value::Integer(12000))].into_iter().collect();

    Substituter::new(PlaceholderSyntax::double()).substitute(&mut doc, &mapping);

    assert_eq!(doc.plain_text(), "Total: 12.000,00");
}

/// Letter layout: a picture run before the text, a tab after the label and a
/// soft line break between address lines
fn letter() -> Document {
    let mut doc = Document::new();
    doc.push(Block::Paragraph(Paragraph::from_runs(vec![
        Run::new(""),
        Run::new("Nama:\t{nama}"),
    ])));
    doc.push(Block::Paragraph(Paragraph::from_runs(vec![
        Run::new("Jl. Merdeka 1\n{ko"),
        Run::new("ta}"),
    ])));
    doc
}

#[test]
fn test_tabs_and_line_breaks_in_letter() {
    let syntax = PlaceholderSyntax::single();
    let mut doc = letter();
    assert_eq!(scan_placeholders(&doc, &syntax), ["kota", "nama"]);

    let mapping: DataMapping = [("nama", "Budi Santoso"), ("kota", "Bandung")]
        .into_iter()
        .collect();
    let report = Substituter::new(syntax.clone()).substitute(&mut doc, &mapping);
    assert_eq!(report.replaced, 2);
    assert_eq!(report.fallback_paragraphs, 1);

    let paragraphs = doc.paragraphs();
    assert!(paragraphs[0].runs[0].text.is_empty());
    assert_eq!(paragraphs[0].runs[1].text, "Nama:\tBudi Santoso");
    assert_eq!(paragraphs[1].runs[0].text, "Jl. Merdeka 1\nBandung");
    assert!(paragraphs[1].runs[1].text.is_empty());
    assert!(scan_placeholders(&doc, &syntax).is_empty());
}
