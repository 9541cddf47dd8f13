use std::fmt;

use serde::{Serialize, Serializer};

/// A typed cell of the normalized table. Missing cells are `None` at the row level.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{f:.1}")
                } else {
                    f.to_string()
                }
            }
            Value::Text(s) => s.clone(),
        }
    }

    /// Numeric view of the cell; text never coerces.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Infers the type of a single raw cell.
///
/// Blank cells are missing. Integers win over floats; floats must be finite, so
/// tokens such as `NaN` or `inf` stay textual and disqualify their column as a metric.
/// Text is kept verbatim, surrounding whitespace included.
pub fn infer_value(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = trimmed.parse::<i64>() {
        return Some(Value::Integer(parsed));
    }
    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Some(Value::Float(parsed)),
        _ => Some(Value::Text(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_value_prefers_integers() {
        assert_eq!(infer_value("42"), Some(Value::Integer(42)));
        assert_eq!(infer_value(" -7 "), Some(Value::Integer(-7)));
        assert_eq!(infer_value("55.5"), Some(Value::Float(55.5)));
    }

    #[test]
    fn infer_value_treats_blank_as_missing() {
        assert_eq!(infer_value(""), None);
        assert_eq!(infer_value("   "), None);
    }

    #[test]
    fn infer_value_keeps_non_finite_tokens_textual() {
        assert_eq!(infer_value("NaN"), Some(Value::Text("NaN".to_string())));
        assert_eq!(infer_value("inf"), Some(Value::Text("inf".to_string())));
        assert_eq!(
            infer_value("1,234"),
            Some(Value::Text("1,234".to_string()))
        );
    }

    #[test]
    fn infer_value_keeps_text_verbatim() {
        assert_eq!(infer_value(" India "), Some(Value::Text(" India ".to_string())));
    }

    #[test]
    fn as_f64_never_coerces_text() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Text("3".to_string()).as_f64(), None);
    }
}
