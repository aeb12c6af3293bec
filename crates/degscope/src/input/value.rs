//! Cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Empty cell or a recognised NA token.
    #[default]
    Missing,
    Bool(bool),
    /// Always finite; non-finite numbers are stored as `Missing`.
    Number(f64),
    Text(String),
}

impl Value {
    /// Build a numeric value, mapping NaN and infinities to `Missing`.
    pub fn number(n: f64) -> Self {
        if n.is_finite() {
            Value::Number(n)
        } else {
            Value::Missing
        }
    }

    /// Read a raw spreadsheet cell.
    ///
    /// NA tokens become `Missing`; anything else is kept as the exact source text.
    /// Numeric columns are typed later, when a mapping says which ones they are,
    /// so identifiers such as `04110` or `1e3` survive loading unchanged.
    pub fn parse(raw: &str) -> Self {
        if is_null_value(raw) {
            Value::Missing
        } else {
            Value::Text(raw.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of the cell. Text is parsed; anything unparseable is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Value::Missing | Value::Bool(_) => None,
        }
    }

    /// Coerce to a numeric cell, failing to `Missing`.
    pub fn to_numeric(&self) -> Value {
        self.as_f64().map(Value::Number).unwrap_or(Value::Missing)
    }

    /// Identifier view of the cell.
    ///
    /// Text is returned verbatim (no trimming, no case folding); empty text is `None`.
    pub fn as_identifier(&self) -> Option<String> {
        match self {
            Value::Text(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

/// Check if a raw cell represents a missing/null value.
pub fn is_null_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed == "."
        || trimmed == "-"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null_value() {
        assert!(is_null_value(""));
        assert!(is_null_value("NA"));
        assert!(is_null_value("na"));
        assert!(is_null_value("N/A"));
        assert!(is_null_value("NaN"));
        assert!(is_null_value("NULL"));
        assert!(is_null_value("."));
        assert!(!is_null_value("value"));
        assert!(!is_null_value("0"));
    }

    #[test]
    fn test_parse_keeps_source_text() {
        assert_eq!(Value::parse("04110"), Value::from("04110"));
        assert_eq!(Value::parse("1e3"), Value::from("1e3"));
        assert_eq!(Value::parse("TRUE"), Value::from("TRUE"));
        assert_eq!(Value::parse(" TP53"), Value::from(" TP53"));
        assert_eq!(Value::parse("NA"), Value::Missing);
        assert_eq!(Value::parse("1.5e-3").as_f64(), Some(0.0015));
        assert_eq!(Value::parse("Inf").as_f64(), None);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(Value::from(" 3.25 ").to_numeric(), Value::Number(3.25));
        assert_eq!(Value::from("abc").to_numeric(), Value::Missing);
        assert_eq!(Value::Bool(true).to_numeric(), Value::Missing);
        assert_eq!(Value::number(f64::NAN), Value::Missing);
    }

    #[test]
    fn test_identifier_is_verbatim() {
        assert_eq!(Value::from(" tp53 ").as_identifier(), Some(" tp53 ".to_string()));
        assert_eq!(Value::from("").as_identifier(), None);
        assert_eq!(Value::Number(7157.0).as_identifier(), Some("7157".to_string()));
        assert_eq!(Value::Missing.as_identifier(), None);
    }

    #[test]
    fn test_json_round_trip() {
        let values = vec![
            Value::Missing,
            Value::Bool(false),
            Value::Number(1.25),
            Value::from("BRCA1"),
        ];
        let json = serde_json::to_string(&values).unwrap();
        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(values, back);
    }
}
