//! Digit/word amount consistency check.
//!
//! Contracts typically state a sum twice: `Rp 12.000,00 (DUA BELAS RIBU
//! RUPIAH)`. The checker collects every digit amount that is followed by an
//! opening parenthesis and every parenthesized uppercase block ending in the
//! currency name, then pairs them by position.
//!
//! A pair is a `Match` when both sides exist. The words are **not** converted
//! back to a number; this only verifies that each figure has a spelled-out
//! counterpart and vice versa.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, Result};

/// Currency naming used to locate amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConvention {
    /// Symbol written before the figure (`Rp`)
    pub symbol: String,
    /// Uppercase word closing the verbal block (`RUPIAH`)
    pub name: String,
    /// Text shown for the missing side of a pair
    pub missing: String,
}

impl Default for CurrencyConvention {
    fn default() -> Self {
        Self {
            symbol: "Rp".to_string(),
            name: "RUPIAH".to_string(),
            missing: "not found".to_string(),
        }
    }
}

/// Outcome of one pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairStatus {
    /// Both the figure and the verbal block are present
    Match,
    /// One side of the pair is missing
    Mismatch,
}

impl fmt::Display for PairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairStatus::Match => f.write_str("match"),
            PairStatus::Mismatch => f.write_str("mismatch"),
        }
    }
}

/// One row of the consistency report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyRow {
    /// Integer part of the figure, if a figure exists at this position
    pub amount: Option<u64>,
    /// The figure as written (`12.000,00`), or the missing sentinel
    pub figure: String,
    /// The verbal block without parentheses, or the missing sentinel
    pub verbal: String,
    /// Pair status
    pub status: PairStatus,
}

/// All pairs found in a text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    /// Rows in positional order
    pub rows: Vec<ConsistencyRow>,
}

impl ConsistencyReport {
    /// True if every pair matched (an empty report is consistent)
    pub fn is_consistent(&self) -> bool {
        self.rows.iter().all(|r| r.status == PairStatus::Match)
    }

    /// Rows whose status is `Mismatch`
    pub fn mismatches(&self) -> impl Iterator<Item = &ConsistencyRow> {
        self.rows.iter().filter(|r| r.status == PairStatus::Mismatch)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no amounts were found at all
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Compiled checker for one currency convention
#[derive(Debug, Clone)]
pub struct ConsistencyChecker {
    amount: Regex,
    verbal: Regex,
    missing: String,
}

impl ConsistencyChecker {
    /// Build the patterns for `convention`
    pub fn new(convention: &CurrencyConvention) -> Result<Self> {
        if convention.symbol.trim().is_empty() {
            return Err(CoreError::InvalidConvention(
                "currency symbol must not be empty".to_string(),
            ));
        }
        if convention.name.trim().is_empty() {
            return Err(CoreError::InvalidConvention(
                "currency name must not be empty".to_string(),
            ));
        }

        let amount = Regex::new(&format!(
            r"{}\.?\s*(\d{{1,3}}(?:\.\d{{3}})*,\d{{2}})\s*\(",
            regex::escape(convention.symbol.trim())
        ))?;
        let verbal = Regex::new(&format!(
            r"\(\s*((?:[A-Z]+(?:-[A-Z]+)*\s+)+{})\s*\)",
            regex::escape(convention.name.trim())
        ))?;

        Ok(Self {
            amount,
            verbal,
            missing: convention.missing.clone(),
        })
    }

    /// Pair digit amounts with verbal blocks in `text`
    pub fn check(&self, text: &str) -> ConsistencyReport {
        let figures: Vec<(&str, u64)> = self
            .amount
            .captures_iter(text)
            .filter_map(|caps| {
                let figure = caps.get(1)?.as_str();
                match parse_figure(figure) {
                    Some(value) => Some((figure, value)),
                    None => {
                        warn!(figure, "amount too large, skipped");
                        None
                    }
                }
            })
            .collect();
        let verbals: Vec<String> = self
            .verbal
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| normalize_spaces(m.as_str()))
            .collect();

        let len = figures.len().max(verbals.len());
        let rows = (0..len)
            .map(|i| {
                let figure = figures.get(i);
                let verbal = verbals.get(i);
                let status = if figure.is_some() && verbal.is_some() {
                    PairStatus::Match
                } else {
                    PairStatus::Mismatch
                };
                ConsistencyRow {
                    amount: figure.map(|(_, value)| *value),
                    figure: figure
                        .map(|(text, _)| (*text).to_string())
                        .unwrap_or_else(|| self.missing.clone()),
                    verbal: verbal.cloned().unwrap_or_else(|| self.missing.clone()),
                    status,
                }
            })
            .collect();

        ConsistencyReport { rows }
    }
}

/// Integer value of a `12.000,00` style figure
fn parse_figure(figure: &str) -> Option<u64> {
    let integer = figure.split(',').next()?;
    integer.replace('.', "").parse().ok()
}

fn normalize_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
