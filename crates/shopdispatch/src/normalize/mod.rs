//! Field normalization — the single choke point where raw export text
//! becomes a typed value or `Absent`.
//!
//! Malformed input never aborts a load: every failure degrades to a default
//! (or `Absent`) and is reported to the caller through the `coerced` flag so
//! row-level diagnostics can be recorded.

use chrono::NaiveDate;
use regex::Regex;

/// Target type for a raw field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Number,
    Date,
    Text,
}

/// A normalized field value. `Absent` means blank or unparseable; callers
/// apply field-specific defaults (typically 0 for numbers, "" for text).
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalValue {
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
    Absent,
}

impl CanonicalValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, CanonicalValue::Absent)
    }

    /// Boolean view; anything that is not `Bool(true)` reads as false.
    pub fn as_bool(&self) -> bool {
        matches!(self, CanonicalValue::Bool(true))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CanonicalValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CanonicalValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Text view with the "" default applied.
    pub fn into_text(self) -> String {
        match self {
            CanonicalValue::Text(s) => s,
            _ => String::new(),
        }
    }

    /// Canonical textual rendering. Feeding the rendering back through
    /// `normalize` with the same kind yields the same value.
    pub fn render(&self) -> String {
        match self {
            CanonicalValue::Bool(b) => b.to_string(),
            CanonicalValue::Number(n) => n.to_string(),
            CanonicalValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CanonicalValue::Text(s) => s.clone(),
            CanonicalValue::Absent => String::new(),
        }
    }
}

/// Result of normalizing one raw field. `coerced` is set when non-blank
/// input failed to parse for its kind and a default was substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedField {
    pub value: CanonicalValue,
    pub coerced: bool,
}

impl NormalizedField {
    fn clean(value: CanonicalValue) -> Self {
        Self {
            value,
            coerced: false,
        }
    }

    fn coerced(value: CanonicalValue) -> Self {
        Self {
            value,
            coerced: true,
        }
    }
}

/// Date formats accepted by the normalizer: US slash dates (4- and 2-digit
/// year) and ISO.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%m/%d/%y"];

/// Normalizer with its cleanup pattern compiled once up front.
pub struct FieldNormalizer {
    /// Thousands separators, currency symbols, and inner whitespace that
    /// ERP exports sprinkle into numeric cells.
    numeric_junk: Regex,
}

impl FieldNormalizer {
    pub fn new() -> Self {
        Self {
            numeric_junk: Regex::new(r"[,\s$€£]").expect("literal pattern compiles"),
        }
    }

    pub fn normalize(&self, raw: &str, kind: FieldKind) -> NormalizedField {
        match kind {
            FieldKind::Bool => self.normalize_bool(raw),
            FieldKind::Number => self.normalize_number(raw),
            FieldKind::Date => self.normalize_date(raw),
            FieldKind::Text => self.normalize_text(raw),
        }
    }

    fn normalize_bool(&self, raw: &str) -> NormalizedField {
        let lowered = raw.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "true" | "yes" | "1" | "y" => NormalizedField::clean(CanonicalValue::Bool(true)),
            "false" | "no" | "0" | "n" | "" => NormalizedField::clean(CanonicalValue::Bool(false)),
            other => {
                log::warn!("Unrecognized boolean value '{}', defaulting to false", other);
                NormalizedField::coerced(CanonicalValue::Bool(false))
            }
        }
    }

    fn normalize_number(&self, raw: &str) -> NormalizedField {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return NormalizedField::clean(CanonicalValue::Absent);
        }

        let cleaned = self.numeric_junk.replace_all(trimmed, "");
        match cleaned.parse::<f64>() {
            Ok(n) if n.is_finite() => NormalizedField::clean(CanonicalValue::Number(n)),
            _ => NormalizedField::coerced(CanonicalValue::Absent),
        }
    }

    fn normalize_date(&self, raw: &str) -> NormalizedField {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return NormalizedField::clean(CanonicalValue::Absent);
        }

        // Tolerate a trailing time component ("3/5/2024 14:30", ISO 'T').
        let date_part = trimmed
            .split(|c: char| c == 'T' || c.is_whitespace())
            .next()
            .unwrap_or(trimmed);

        match DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        {
            Some(date) => NormalizedField::clean(CanonicalValue::Date(date)),
            None => NormalizedField::coerced(CanonicalValue::Absent),
        }
    }

    fn normalize_text(&self, raw: &str) -> NormalizedField {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            NormalizedField::clean(CanonicalValue::Absent)
        } else {
            NormalizedField::clean(CanonicalValue::Text(trimmed.to_string()))
        }
    }
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
