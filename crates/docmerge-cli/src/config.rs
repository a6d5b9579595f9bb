//! Configuration Settings
//!
//! `docmerge.toml` holds per-deployment conventions: the placeholder syntax,
//! the number format and the currency used by the consistency check.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use docmerge_core::{CurrencyConvention, NumberFormat, PlaceholderSyntax, SyntaxKind};

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "docmerge.toml";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Placeholder delimiters
    pub placeholders: PlaceholderSettings,
    /// Numeric value formatting
    pub numbers: NumberSettings,
    /// Figure/verbal consistency check
    pub consistency: ConsistencySettings,
    /// Output naming
    pub output: OutputSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from `path`, or from `./docmerge.toml` if present
    ///
    /// An explicit path must exist; the implicit file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !implicit.exists() {
                    return Ok(Self::default());
                }
                implicit
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let settings = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        debug!(config = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// The configured placeholder syntax
    pub fn syntax(&self) -> PlaceholderSyntax {
        self.placeholders.syntax.into()
    }

    /// The number rule, or `None` when localization is switched off
    pub fn number_format(&self) -> Option<NumberFormat> {
        self.numbers.localize.then(|| NumberFormat {
            decimal_separator: self.numbers.decimal_separator,
            thousands_separator: self.numbers.thousands_separator,
            decimals: self.numbers.decimals,
        })
    }

    /// The currency convention for the consistency check
    pub fn currency(&self) -> CurrencyConvention {
        CurrencyConvention {
            symbol: self.consistency.currency_symbol.clone(),
            name: self.consistency.currency_name.clone(),
            missing: self.consistency.missing.clone(),
        }
    }
}

/// Placeholder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlaceholderSettings {
    /// `single` for `{name}`, `double` for `{{name}}`
    pub syntax: SyntaxKind,
}

/// Number formatting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberSettings {
    /// Apply regional formatting to numeric values
    pub localize: bool,
    pub decimal_separator: char,
    pub thousands_separator: char,
    pub decimals: usize,
}

impl Default for NumberSettings {
    fn default() -> Self {
        let rule = NumberFormat::indonesian();
        Self {
            localize: true,
            decimal_separator: rule.decimal_separator,
            thousands_separator: rule.thousands_separator,
            decimals: rule.decimals,
        }
    }
}

/// Consistency check configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsistencySettings {
    pub currency_symbol: String,
    pub currency_name: String,
    /// Shown for the missing side of a pair
    pub missing: String,
}

impl Default for ConsistencySettings {
    fn default() -> Self {
        let convention = CurrencyConvention::default();
        Self {
            currency_symbol: convention.symbol,
            currency_name: convention.name,
            missing: convention.missing,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Archive file name used when more than one document is generated
    pub archive_name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            archive_name: "generated_reports.zip".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.syntax(), PlaceholderSyntax::single());
        assert_eq!(settings.number_format(), Some(NumberFormat::indonesian()));
        assert_eq!(settings.currency(), CurrencyConvention::default());
        assert_eq!(settings.output.archive_name, "generated_reports.zip");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::from_toml_str(
            r#"
[placeholders]
syntax = "double"

[numbers]
decimals = 0
"#,
        )
        .unwrap();

        assert_eq!(settings.syntax(), PlaceholderSyntax::double());
        let rule = settings.number_format().unwrap();
        assert_eq!(rule.decimals, 0);
        assert_eq!(rule.decimal_separator, ',');
        assert_eq!(settings.consistency.currency_name, "RUPIAH");
    }

    #[test]
    fn test_localize_off() {
        let settings = Settings::from_toml_str("[numbers]\nlocalize = false\n").unwrap();
        assert_eq!(settings.number_format(), None);
    }

    #[test]
    fn test_currency_section() {
        let settings = Settings::from_toml_str(
            r#"
[consistency]
currency_symbol = "USD"
currency_name = "DOLLARS"
missing = "-"
"#,
        )
        .unwrap();

        let currency = settings.currency();
        assert_eq!(currency.symbol, "USD");
        assert_eq!(currency.name, "DOLLARS");
        assert_eq!(currency.missing, "-");
    }

    #[test]
    fn test_invalid_syntax_rejected() {
        assert!(Settings::from_toml_str("[placeholders]\nsyntax = \"angle\"\n").is_err());
    }

    #[test]
    fn test_load_explicit_missing_file() {
        assert!(Settings::load(Some(Path::new("/nonexistent/docmerge.toml"))).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docmerge.toml");
        std::fs::write(&path, "[output]\narchive_name = \"laporan.zip\"\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.output.archive_name, "laporan.zip");
    }
}
