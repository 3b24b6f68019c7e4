//! Rule-based field extractors for EDC card-payment slips.

pub mod amounts;
pub mod dates;
pub mod lines;
pub mod merchant;
pub mod patterns;
pub mod status;
pub mod table;

pub use amounts::{apply_void_sign, format_rupiah, normalize_amount, parse_rupiah_amount};
pub use dates::{apply_century, resolve_date_time, ResolvedDateTime};
pub use lines::{normalize_lines, RawDocument};
pub use merchant::{MerchantNameCandidate, MerchantNameResolver};
pub use status::StatusClassifier;
pub use table::{rule_for, RULES};

use regex::Regex;

use crate::models::receipt::{Field, FieldValue};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A resolved value together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Which pattern of the rule produced it (0 = primary).
    pub pattern_index: usize,
    /// Byte range of the capture in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, pattern_index: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            pattern_index,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    /// Whether a fallback pattern was needed.
    pub fn is_fallback(&self) -> bool {
        self.pattern_index > 0
    }
}

/// Maps a captured string to a typed value, or rejects it.
pub type Transform = fn(&str) -> Option<FieldValue>;

/// One regex of a rule plus the capture group it reads and its transform.
#[derive(Debug, Clone, Copy)]
pub struct RulePattern {
    pub regex: &'static Regex,
    pub group: usize,
    pub transform: Transform,
}

/// Ordered fallback patterns for one field.
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    pub field: Field,
    pub patterns: Vec<RulePattern>,
}

impl ExtractionRule {
    pub fn new(field: Field) -> Self {
        Self {
            field,
            patterns: Vec::new(),
        }
    }

    /// Append a lower-priority pattern.
    pub fn pattern(mut self, regex: &'static Regex, group: usize, transform: Transform) -> Self {
        self.patterns.push(RulePattern {
            regex,
            group,
            transform,
        });
        self
    }

    fn matches(&self, text: &str) -> impl Iterator<Item = ExtractionMatch<FieldValue>> {
        self.patterns
            .iter()
            .enumerate()
            .flat_map(move |(index, pattern)| {
                pattern.regex.captures_iter(text).filter_map(move |caps| {
                    let m = caps.get(pattern.group)?;
                    let value = (pattern.transform)(m.as_str())?;
                    Some(
                        ExtractionMatch::new(value, index, m.as_str())
                            .with_position(m.start(), m.end()),
                    )
                })
            })
    }
}

impl FieldExtractor for ExtractionRule {
    type Output = ExtractionMatch<FieldValue>;

    /// First pattern, in priority order, whose match also survives its
    /// transform.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.matches(text).next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.matches(text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use pretty_assertions::assert_eq;

    lazy_static! {
        static ref CODE: Regex = Regex::new(r"CODE (\w+)").unwrap();
        static ref NUMBER: Regex = Regex::new(r"(\d+)").unwrap();
    }

    fn digits_only(s: &str) -> Option<FieldValue> {
        s.chars()
            .all(|c| c.is_ascii_digit())
            .then(|| FieldValue::Text(s.to_string()))
    }

    fn any_text(s: &str) -> Option<FieldValue> {
        Some(FieldValue::Text(s.to_string()))
    }

    #[test]
    fn test_primary_pattern_wins() {
        let rule = ExtractionRule::new(Field::ApprovalCode)
            .pattern(&CODE, 1, any_text)
            .pattern(&NUMBER, 1, any_text);
        let m = rule.extract("123 CODE ABC").unwrap();
        assert_eq!(m.value, FieldValue::Text("ABC".into()));
        assert_eq!(m.pattern_index, 0);
        assert_eq!(m.position, Some((9, 12)));
        assert!(!m.is_fallback());
    }

    #[test]
    fn test_rejected_transform_falls_through() {
        let rule = ExtractionRule::new(Field::ApprovalCode)
            .pattern(&CODE, 1, digits_only)
            .pattern(&NUMBER, 1, any_text);
        let m = rule.extract("CODE ABC 42").unwrap();
        assert_eq!(m.value, FieldValue::Text("42".into()));
        assert!(m.is_fallback());
    }

    #[test]
    fn test_later_match_of_same_pattern() {
        let rule = ExtractionRule::new(Field::ApprovalCode).pattern(&CODE, 1, digits_only);
        let m = rule.extract("CODE ABC CODE 77").unwrap();
        assert_eq!(m.source, "77");
        assert_eq!(rule.extract_all("CODE 1 CODE X CODE 2").len(), 2);
    }

    #[test]
    fn test_no_match() {
        let rule = ExtractionRule::new(Field::ApprovalCode).pattern(&CODE, 1, any_text);
        assert!(rule.extract("nothing here").is_none());
    }
}
