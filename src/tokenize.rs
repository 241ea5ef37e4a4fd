use unicode_segmentation::UnicodeSegmentation;

/// Lower-cased word tokens. Word boundaries follow UAX #29, so punctuation
/// is dropped rather than emitted as its own token.
pub fn word_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .unicode_words()
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_drops_punctuation() {
        let toks = word_tokens("The cat, sat!");
        assert_eq!(toks, ["the", "cat", "sat"]);
    }

    #[test]
    fn handles_unicode_words() {
        let toks = word_tokens("Καλημέρα κόσμε");
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0], "καλημέρα");
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(word_tokens("  ").is_empty());
    }
}
