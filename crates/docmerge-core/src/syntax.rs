//! Placeholder delimiter syntax.
//!
//! A deployment fixes one delimiter pair: `{name}` or `{{name}}`. Both the
//! scanner and the substituter take the pair from here.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Well-known delimiter conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxKind {
    /// `{name}`
    #[default]
    Single,
    /// `{{name}}`
    Double,
}

/// A configured delimiter pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSyntax {
    open: String,
    close: String,
}

/// A placeholder occurrence located in a piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch<'t> {
    /// Byte offset of the opening delimiter
    pub start: usize,
    /// Byte offset just past the closing delimiter
    pub end: usize,
    /// Name between the delimiters
    pub name: &'t str,
}

impl PlaceholderSyntax {
    /// `{name}`
    pub fn single() -> Self {
        Self {
            open: "{".to_string(),
            close: "}".to_string(),
        }
    }

    /// `{{name}}`
    pub fn double() -> Self {
        Self {
            open: "{{".to_string(),
            close: "}}".to_string(),
        }
    }

    /// Arbitrary delimiter pair; both sides must be non-empty
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Result<Self> {
        let open = open.into();
        let close = close.into();
        if open.is_empty() || close.is_empty() {
            return Err(CoreError::InvalidSyntax(
                "delimiters must not be empty".to_string(),
            ));
        }
        if open.chars().any(char::is_whitespace) || close.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidSyntax(format!(
                "delimiters must not contain whitespace: '{}' '{}'",
                open, close
            )));
        }
        Ok(Self { open, close })
    }

    /// Opening delimiter
    pub fn open(&self) -> &str {
        &self.open
    }

    /// Closing delimiter
    pub fn close(&self) -> &str {
        &self.close
    }

    /// Render the token for a name, e.g. `amount` → `{amount}`
    pub fn token(&self, name: &str) -> String {
        format!("{}{}{}", self.open, name, self.close)
    }

    /// Extract the placeholder name from a whitespace-delimited word.
    ///
    /// The word must start with the opening and end with the closing
    /// delimiter; repeated delimiters on either end are all removed, so with
    /// single braces `{{a}}` names `a`.
    pub fn name_of<'w>(&self, word: &'w str) -> Option<&'w str> {
        if word.len() < self.open.len() + self.close.len()
            || !word.starts_with(self.open.as_str())
            || !word.ends_with(self.close.as_str())
        {
            return None;
        }
        let name = word
            .trim_start_matches(self.open.as_str())
            .trim_end_matches(self.close.as_str());
        (!name.is_empty()).then_some(name)
    }

    /// Find placeholder occurrences whose name passes `accept`, scanning
    /// left to right without overlap.
    ///
    /// When a delimited name is rejected the scan resumes one character
    /// after the rejected opening delimiter, so `{x {a}` still yields `a`.
    pub fn find_tokens<'t>(
        &self,
        text: &'t str,
        mut accept: impl FnMut(&str) -> bool,
    ) -> Vec<TokenMatch<'t>> {
        let mut found = Vec::new();
        let mut cursor = 0;

        while let Some(rel) = text[cursor..].find(self.open.as_str()) {
            let start = cursor + rel;
            let name_start = start + self.open.len();
            let Some(close_rel) = text[name_start..].find(self.close.as_str()) else {
                break;
            };
            let name_end = name_start + close_rel;
            let name = &text[name_start..name_end];

            if accept(name) {
                let end = name_end + self.close.len();
                found.push(TokenMatch { start, end, name });
                cursor = end;
            } else {
                cursor = start + text[start..].chars().next().map_or(1, char::len_utf8);
            }
        }

        found
    }
}

impl Default for PlaceholderSyntax {
    fn default() -> Self {
        SyntaxKind::default().into()
    }
}

impl From<SyntaxKind> for PlaceholderSyntax {
    fn from(kind: SyntaxKind) -> Self {
        match kind {
            SyntaxKind::Single => Self::single(),
            SyntaxKind::Double => Self::double(),
        }
    }
}
