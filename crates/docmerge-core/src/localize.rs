//! Regional number formatting.
//!
//! The rule is an explicit value rather than process locale state. Passing
//! `None` means "no regional formatting available" and yields the raw number.

use serde::{Deserialize, Serialize};

/// Decimal/thousands convention for numeric substitution values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    /// Separator between integer and fractional part
    pub decimal_separator: char,
    /// Separator between groups of three integer digits
    pub thousands_separator: char,
    /// Number of fractional digits
    pub decimals: usize,
}

impl NumberFormat {
    /// Indonesian convention: `12.000,00`
    pub fn indonesian() -> Self {
        Self {
            decimal_separator: ',',
            thousands_separator: '.',
            decimals: 2,
        }
    }

    /// Format a floating point value
    pub fn format(&self, value: f64) -> String {
        let fixed = format!("{:.*}", self.decimals, value);
        let (sign, digits) = match fixed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", fixed.as_str()),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits, None),
        };

        let mut out = String::with_capacity(fixed.len() + fixed.len() / 3);
        out.push_str(sign);
        out.push_str(&group_thousands(int_part, self.thousands_separator));
        if let Some(frac) = frac_part {
            out.push(self.decimal_separator);
            out.push_str(frac);
        }
        out
    }

    /// Format an integer without going through floating point
    pub fn format_integer(&self, value: i64) -> String {
        let digits = value.unsigned_abs().to_string();
        let mut out = String::new();
        if value < 0 {
            out.push('-');
        }
        out.push_str(&group_thousands(&digits, self.thousands_separator));
        if self.decimals > 0 {
            out.push(self.decimal_separator);
            out.extend(std::iter::repeat('0').take(self.decimals));
        }
        out
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::indonesian()
    }
}

/// Format a number with `rule`, or return it unformatted when no rule is
/// available or the value is not finite.
pub fn localize(value: f64, rule: Option<&NumberFormat>) -> String {
    match rule {
        Some(rule) if value.is_finite() => rule.format(value),
        _ => value.to_string(),
    }
}

/// Integer counterpart of [`localize`]
pub fn localize_integer(value: i64, rule: Option<&NumberFormat>) -> String {
    match rule {
        Some(rule) => rule.format_integer(value),
        None => value.to_string(),
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localize_indonesian() {
        let rule = NumberFormat::indonesian();
        assert_eq!(localize(12000.0, Some(&rule)), "12.000,00");
        assert_eq!(localize(0.0, Some(&rule)), "0,00");
        assert_eq!(localize(1234567.891, Some(&rule)), "1.234.567,89");
        assert_eq!(localize(999.5, Some(&rule)), "999,50");
        assert_eq!(localize(-1500.25, Some(&rule)), "-1.500,25");
    }

    #[test]
    fn test_localize_without_rule_is_raw() {
        assert_eq!(localize(12000.0, None), "12000");
        assert_eq!(localize(12.5, None), "12.5");
    }

    #[test]
    fn test_localize_non_finite_is_raw() {
        let rule = NumberFormat::indonesian();
        assert_eq!(localize(f64::NAN, Some(&rule)), "NaN");
        assert_eq!(localize(f64::INFINITY, Some(&rule)), "inf");
    }

    #[test]
    fn test_localize_integer() {
        let rule = NumberFormat::indonesian();
        assert_eq!(localize_integer(12000, Some(&rule)), "12.000,00");
        assert_eq!(localize_integer(0, Some(&rule)), "0,00");
        assert_eq!(localize_integer(-7, Some(&rule)), "-7,00");
        assert_eq!(localize_integer(i64::MIN, Some(&rule)), "-9.223.372.036.854.775.808,00");
        assert_eq!(localize_integer(42, None), "42");
    }

    #[test]
    fn test_custom_rule() {
        let rule = NumberFormat {
            decimal_separator: '.',
            thousands_separator: ',',
            decimals: 0,
        };
        assert_eq!(localize(1234567.4, Some(&rule)), "1,234,567");
        assert_eq!(localize_integer(1000, Some(&rule)), "1,000");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1", '.'), "1");
        assert_eq!(group_thousands("123", '.'), "123");
        assert_eq!(group_thousands("1234", '.'), "1.234");
        assert_eq!(group_thousands("123456", '.'), "123.456");
    }
}
