use std::fmt::{Display, Formatter};

/// Formatting characters providers put in numeric text: thousands separators,
/// footnote asterisks, and `-`/`?` placeholders for missing values.
pub const STRIPPED_CHARS: [char; 4] = [',', '-', '*', '?'];

/// Free-text cell coerced to its native type.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Strip [`STRIPPED_CHARS`], then try integer, then float, else keep the text.
    pub fn coerce(raw: &str) -> Self {
        let cleaned = raw
            .trim()
            .chars()
            .filter(|ch| !STRIPPED_CHARS.contains(ch))
            .collect::<String>();

        if let Ok(value) = cleaned.parse::<i64>() {
            return Self::Int(value);
        }
        match cleaned.parse::<f64>() {
            Ok(value) if value.is_finite() => Self::Float(value),
            _ => Self::Text(cleaned),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text(_))
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}
