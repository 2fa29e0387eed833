//! DOI extraction from raw document text.
//!
//! Scans the text extracted from a PDF for the first plausible DOI.
//! PDF text extraction is noisy, so the match is cleaned up before use.

use regex::Regex;

/// DOI pattern: `10.` followed by a 4-9 digit registrant prefix and a suffix
const DOI_PATTERN: &str = r"(?i)\b10\.\d{4,9}/[-._;()/:A-Z0-9]+";

/// Placeholder DOI used when the document contains no recognizable DOI.
///
/// The resolver is still run with it; Elsevier and Crossref will miss and
/// the layout heuristic takes over.
pub const FALLBACK_DOI: &str = "10.1016/j.default";

/// Extract the first DOI found in `text`, or `None`.
///
/// The match is case-insensitive. Interior spaces are stripped and the
/// match is truncated at a literal `RESEARCH`, a running-header artifact
/// that PDF extraction occasionally glues onto the DOI suffix.
pub fn extract_doi(text: &str) -> Option<String> {
    let re = Regex::new(DOI_PATTERN).ok()?;
    let m = re.find(text)?;

    let mut doi = m.as_str().trim().replace(' ', "");
    if let Some(pos) = doi.find("RESEARCH") {
        doi.truncate(pos);
    }

    if doi.is_empty() {
        return None;
    }
    Some(doi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_doi_basic() {
        let text = "... DOI: 10.1016/j.cell.2020.01.001 Abstract ...";
        assert_eq!(
            extract_doi(text).as_deref(),
            Some("10.1016/j.cell.2020.01.001")
        );
    }

    #[test]
    fn test_extract_doi_case_insensitive() {
        let text = "doi 10.1234/ab.cd:EF-12";
        assert_eq!(extract_doi(text).as_deref(), Some("10.1234/ab.cd:EF-12"));
    }

    #[test]
    fn test_extract_doi_none() {
        assert_eq!(extract_doi("no identifiers here"), None);
        assert_eq!(extract_doi(""), None);
    }

    #[test]
    fn test_extract_doi_first_match_wins() {
        let text = "10.1000/first and later 10.2000/second";
        assert_eq!(extract_doi(text).as_deref(), Some("10.1000/first"));
    }

    #[test]
    fn test_extract_doi_truncates_header_noise() {
        let text = "see 10.5555/abc123RESEARCHARTICLE for details";
        assert_eq!(extract_doi(text).as_deref(), Some("10.5555/abc123"));
    }

    #[test]
    fn test_extract_doi_prefix_length_bounds() {
        // 3-digit prefix does not qualify
        assert_eq!(extract_doi("10.123/tooShort"), None);
        // 10-digit prefix cannot reach the slash either
        assert_eq!(extract_doi("10.1234567890/x"), None);
    }
}
