//! Shannon entropy over word frequencies.
//!
//! Used as a lexical-diversity diagnostic for generated review text:
//! low entropy means repetitive vocabulary, high entropy varied vocabulary.
//! The score is reported to the caller and never drives control flow.

use std::collections::HashMap;

/// Compute Shannon entropy of the unigram distribution of `text`.
///
/// Tokens are exactly whitespace-delimited substrings: case-sensitive,
/// punctuation-sensitive, no normalization. Empty text yields 0.0.
/// The result is rounded to 4 decimal places.
pub fn lexical_entropy(text: &str) -> f64 {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let total = tokens.len();
    if total == 0 {
        return 0.0;
    }

    let mut frequencies: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        *frequencies.entry(token).or_insert(0) += 1;
    }

    let total = total as f64;
    let entropy: f64 = frequencies
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -(p * p.log2())
        })
        .sum();

    (entropy * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert_eq!(lexical_entropy(""), 0.0);
        assert_eq!(lexical_entropy("   \n\t "), 0.0);
    }

    #[test]
    fn test_single_token_distribution() {
        assert_eq!(lexical_entropy("a a a a"), 0.0);
    }

    #[test]
    fn test_two_equiprobable_tokens() {
        assert_eq!(lexical_entropy("a b"), 1.0);
    }

    #[test]
    fn test_rounded_to_four_decimals() {
        // -(2/3*log2(2/3) + 1/3*log2(1/3)) = 0.91829..., rounds to 0.9183
        assert_eq!(lexical_entropy("a a b"), 0.9183);
    }

    #[test]
    fn test_case_and_punctuation_sensitive() {
        // "Word" and "word" are distinct tokens
        assert_eq!(lexical_entropy("Word word"), 1.0);
        assert_eq!(lexical_entropy("end. end"), 1.0);
    }

    #[test]
    fn test_idempotent() {
        let text = "estudios recientes muestran que otros autores han señalado";
        assert_eq!(lexical_entropy(text), lexical_entropy(text));
    }

    #[test]
    fn test_non_negative() {
        for text in ["x", "x y z", "lorem ipsum dolor sit amet lorem"] {
            assert!(lexical_entropy(text) >= 0.0);
        }
    }
}
