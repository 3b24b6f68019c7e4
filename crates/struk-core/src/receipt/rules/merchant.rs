//! Merchant name resolution from the slip's line sequence.

use regex::Regex;
use tracing::debug;

use crate::error::{Result, StrukError};
use crate::models::config::{ExtractionConfig, MerchantStrategy};

use super::lines::{contains_keyword, RawDocument};
use super::patterns::{DATE_SUFFIX, MERCHANT_EXCLUSION, MID_PREFIX};

/// Minimum number of characters a merchant name must exceed.
const MIN_NAME_LEN: usize = 3;

/// A line picked as the merchant name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantNameCandidate {
    /// Index into the normalized line sequence.
    pub index: usize,
    /// Cleaned line text.
    pub text: String,
}

/// Picks the merchant name using one of two layout heuristics.
#[derive(Debug, Clone)]
pub struct MerchantNameResolver {
    strategy: MerchantStrategy,
    anchor: String,
    extra_exclusions: Option<Regex>,
    noise_tokens: Vec<String>,
}

impl MerchantNameResolver {
    /// Resolver with the default `BCA` anchor and built-in blacklist.
    pub fn new() -> Self {
        let defaults = ExtractionConfig::default();
        Self {
            strategy: defaults.merchant_strategy,
            anchor: defaults.anchor,
            extra_exclusions: None,
            noise_tokens: defaults.noise_tokens,
        }
    }

    /// Build a resolver from extraction settings.
    ///
    /// Fails only when one of the configured exclusion patterns is not a
    /// valid regex.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Self::new()
            .with_strategy(config.merchant_strategy)
            .with_anchor(&config.anchor)
            .with_noise_tokens(config.noise_tokens.clone())
            .with_exclusion_patterns(&config.exclusion_patterns)
    }

    /// Set the heuristic.
    pub fn with_strategy(mut self, strategy: MerchantStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the institution marker that opens the merchant block.
    pub fn with_anchor(mut self, anchor: &str) -> Self {
        self.anchor = anchor.trim().to_string();
        self
    }

    /// Set tokens that disqualify a line under the first-line heuristic.
    pub fn with_noise_tokens(mut self, tokens: Vec<String>) -> Self {
        self.noise_tokens = tokens;
        self
    }

    /// Add regexes to the built-in blacklist.
    pub fn with_exclusion_patterns(mut self, patterns: &[String]) -> Result<Self> {
        let patterns: Vec<&str> = patterns
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();

        if patterns.is_empty() {
            self.extra_exclusions = None;
            return Ok(self);
        }

        for pattern in &patterns {
            Regex::new(pattern).map_err(|source| StrukError::InvalidPattern {
                name: format!("exclusion pattern '{pattern}'"),
                source,
            })?;
        }

        let composite = format!(
            "(?i){}",
            patterns
                .iter()
                .map(|p| format!("(?:{p})"))
                .collect::<Vec<_>>()
                .join("|")
        );
        let regex = Regex::new(&composite).map_err(|source| StrukError::InvalidPattern {
            name: "exclusion patterns".to_string(),
            source,
        })?;

        self.extra_exclusions = Some(regex);
        Ok(self)
    }

    pub fn strategy(&self) -> MerchantStrategy {
        self.strategy
    }

    /// Resolve the merchant name with the configured heuristic.
    pub fn resolve(&self, document: &RawDocument<'_>) -> Option<MerchantNameCandidate> {
        self.resolve_lines(document.lines())
    }

    /// Resolve directly from a line sequence.
    pub fn resolve_lines(&self, lines: &[&str]) -> Option<MerchantNameCandidate> {
        let candidate = match self.strategy {
            MerchantStrategy::AnchorScan => self.scan_from_anchor(lines),
            MerchantStrategy::FirstLine => self.first_meaningful_line(lines),
        };

        match &candidate {
            Some(c) => debug!("Merchant name '{}' taken from line {}", c.text, c.index),
            None => debug!("No merchant name found ({})", self.strategy),
        }

        candidate
    }

    /// Whether a line may be used as the merchant name under the anchor scan.
    pub fn is_plausible_name(&self, line: &str) -> bool {
        let line = line.trim();
        line.chars().count() > MIN_NAME_LEN
            && line.chars().any(char::is_alphabetic)
            && !self.is_excluded(line)
    }

    fn is_excluded(&self, line: &str) -> bool {
        MERCHANT_EXCLUSION.is_match(line)
            || self
                .extra_exclusions
                .as_ref()
                .is_some_and(|re| re.is_match(line))
            || is_mostly_noise(line)
    }

    fn scan_from_anchor(&self, lines: &[&str]) -> Option<MerchantNameCandidate> {
        if self.anchor.is_empty() {
            return None;
        }

        let anchor_index = lines
            .iter()
            .position(|l| contains_keyword(l, &self.anchor, true))?;

        lines
            .iter()
            .enumerate()
            .skip(anchor_index + 1)
            .map(|(index, line)| (index, line.trim()))
            .find(|(_, line)| self.is_plausible_name(line))
            .map(|(index, line)| MerchantNameCandidate {
                index,
                text: line.to_string(),
            })
    }

    fn first_meaningful_line(&self, lines: &[&str]) -> Option<MerchantNameCandidate> {
        for (index, line) in lines.iter().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.eq_ignore_ascii_case(&self.anchor) {
                continue;
            }
            if self
                .noise_tokens
                .iter()
                .any(|t| contains_keyword(line, t, false))
            {
                continue;
            }

            let without_mid = MID_PREFIX.replace(line, "");
            let cleaned = DATE_SUFFIX.replace(&without_mid, "");
            let cleaned = cleaned.trim();

            if !cleaned.is_empty() {
                return Some(MerchantNameCandidate {
                    index,
                    text: cleaned.to_string(),
                });
            }
        }
        None
    }
}

impl Default for MerchantNameResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// OCR artifact lines: fewer letters than digits and symbols combined.
fn is_mostly_noise(line: &str) -> bool {
    let visible: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    if visible.is_empty() {
        return true;
    }
    let letters = visible.iter().filter(|c| c.is_alphabetic()).count();
    letters * 2 < visible.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn name(resolver: &MerchantNameResolver, lines: &[&str]) -> Option<String> {
        resolver.resolve_lines(lines).map(|c| c.text)
    }

    #[test]
    fn test_anchor_scan_skips_address() {
        let resolver = MerchantNameResolver::new();
        let lines = ["BCA", "JL. SUDIRMAN NO 1", "TOKO MAKMUR JAYA", "DATE: 01JAN24"];
        let candidate = resolver.resolve_lines(&lines).unwrap();
        assert_eq!(candidate.text, "TOKO MAKMUR JAYA");
        assert_eq!(candidate.index, 2);
    }

    #[test]
    fn test_anchor_scan_skips_noise_lines() {
        let resolver = MerchantNameResolver::new();
        let lines = [
            "xx BCA xx",
            "12.3-4/5",
            "Rp",
            "TERM# 12345678 MERC# 000885000123",
            "*** CARDHOLDER COPY ***",
            "A1234567",
            "WARUNG SEDERHANA",
        ];
        assert_eq!(name(&resolver, &lines), Some("WARUNG SEDERHANA".to_string()));
    }

    #[test]
    fn test_anchor_scan_first_match_wins() {
        let resolver = MerchantNameResolver::new();
        let lines = ["BCA", "KOPI KENANGAN", "TOKO MAKMUR JAYA"];
        assert_eq!(name(&resolver, &lines), Some("KOPI KENANGAN".to_string()));
    }

    #[test]
    fn test_anchor_scan_without_anchor() {
        let resolver = MerchantNameResolver::new();
        assert_eq!(name(&resolver, &["TOKO MAKMUR JAYA", "TOTAL Rp 10.000"]), None);
        assert_eq!(name(&resolver, &[]), None);
    }

    #[test]
    fn test_anchor_scan_without_candidate() {
        let resolver = MerchantNameResolver::new();
        assert_eq!(name(&resolver, &["BCA", "123456789012", "ABC"]), None);
    }

    #[test]
    fn test_configured_anchor_and_exclusions() {
        let resolver = MerchantNameResolver::new()
            .with_anchor("mandiri")
            .with_exclusion_patterns(&["^CABANG".to_string()])
            .unwrap();
        let lines = ["MANDIRI", "CABANG KEMANG", "SATE KHAS SENAYAN"];
        assert_eq!(name(&resolver, &lines), Some("SATE KHAS SENAYAN".to_string()));
    }

    #[test]
    fn test_invalid_exclusion_pattern() {
        let result = MerchantNameResolver::new().with_exclusion_patterns(&["(unclosed".to_string()]);
        assert!(matches!(result, Err(StrukError::InvalidPattern { .. })));
    }

    #[test]
    fn test_first_line_strategy_cleans_line() {
        let resolver = MerchantNameResolver::new().with_strategy(MerchantStrategy::FirstLine);
        let lines = [
            "BCA",
            "GRUPECA EDC",
            "MID : 000885 000123 - TOKO MAKMUR JAYA DATE : 01/01/24",
            "JL. SUDIRMAN NO 1",
        ];
        let candidate = resolver.resolve_lines(&lines).unwrap();
        assert_eq!(candidate.text, "TOKO MAKMUR JAYA");
        assert_eq!(candidate.index, 2);
    }

    #[test]
    fn test_first_line_strategy_takes_first_line() {
        let resolver = MerchantNameResolver::new().with_strategy(MerchantStrategy::FirstLine);
        assert_eq!(
            name(&resolver, &["JL. SUDIRMAN NO 1", "TOKO MAKMUR JAYA"]),
            Some("JL. SUDIRMAN NO 1".to_string())
        );
    }

    #[test]
    fn test_first_line_skips_lines_empty_after_cleanup() {
        let resolver = MerchantNameResolver::new().with_strategy(MerchantStrategy::FirstLine);
        assert_eq!(
            name(&resolver, &["DATE : 01/01/24", "APOTEK SEHAT"]),
            Some("APOTEK SEHAT".to_string())
        );
    }

    #[test]
    fn test_is_mostly_noise() {
        assert!(is_mostly_noise("12:30 PM"));
        assert!(is_mostly_noise("Rp 15.000"));
        assert!(!is_mostly_noise("7-ELEVEN"));
        assert!(!is_mostly_noise("K24 APOTEK"));
    }
}
