//! Line normalization and keyword helpers shared by the extractors.

/// Raw OCR text together with its trimmed, non-empty lines.
///
/// Borrowed from the caller for the duration of one parse call.
#[derive(Debug, Clone)]
pub struct RawDocument<'a> {
    text: &'a str,
    lines: Vec<&'a str>,
}

impl<'a> RawDocument<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            lines: normalize_lines(text),
        }
    }

    /// The text exactly as received.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Trimmed, non-empty lines in reading order.
    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split text into lines, trimming each and dropping blank ones.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Case-insensitive search for `keyword` starting at a word boundary.
///
/// With `whole_word` the match must also end at a word boundary; without it
/// the keyword may be a prefix (`VOID` matches `VOIDED`).
pub fn contains_keyword(haystack: &str, keyword: &str, whole_word: bool) -> bool {
    let keyword = keyword.trim().to_uppercase();
    if keyword.is_empty() {
        return false;
    }
    let haystack = haystack.to_uppercase();

    haystack.match_indices(&keyword).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        let starts_clean = before.is_none_or(|c| !c.is_alphanumeric());
        let ends_clean = !whole_word || after.is_none_or(|c| !c.is_alphanumeric());
        starts_clean && ends_clean
    })
}

/// Case-insensitive phrase search that tolerates any run of whitespace
/// (including line breaks) between the phrase's words.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let phrase = collapse_whitespace(&phrase.to_uppercase());
    if phrase.is_empty() {
        return false;
    }
    collapse_whitespace(&haystack.to_uppercase()).contains(&phrase)
}

/// Join all whitespace runs into single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_lines() {
        let text = "  BCA  \r\n\r\n TOKO MAKMUR JAYA\n\t\nTOTAL Rp 10.000 ";
        assert_eq!(
            normalize_lines(text),
            vec!["BCA", "TOKO MAKMUR JAYA", "TOTAL Rp 10.000"]
        );
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize_lines("").is_empty());
        assert!(RawDocument::new(" \n \n").is_empty());
    }

    #[test]
    fn test_raw_document_keeps_text() {
        let text = "A\n\nB";
        let doc = RawDocument::new(text);
        assert_eq!(doc.text(), text);
        assert_eq!(doc.lines(), &["A", "B"]);
    }

    #[test]
    fn test_contains_keyword() {
        assert!(contains_keyword("SALE VOID", "void", false));
        assert!(contains_keyword("voided sale", "VOID", false));
        assert!(!contains_keyword("AVOID", "VOID", false));
        assert!(contains_keyword("KARTU BCA DEBIT", "BCA", true));
        assert!(!contains_keyword("BCAPAY", "BCA", true));
        assert!(!contains_keyword("anything", "  ", false));
    }

    #[test]
    fn test_contains_phrase_across_lines() {
        let text = "*** SIGNATURE\nNOT   REQUIRED ***";
        assert!(contains_phrase(text, "signature not required"));
        assert!(!contains_phrase(text, "PIN VERIFIED"));
    }
}
