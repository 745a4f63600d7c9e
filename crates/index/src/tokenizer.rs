//! Basic tokenizer for item descriptions and queries
//!
//! Simple text tokenization shared by indexing and query parsing.
//! Stemming and typo tolerance are left to whatever backend implements
//! the text-index trait — this engine assumes neither.

/// Tokenize text into searchable terms
///
/// - Lowercase
/// - Split on non-alphanumeric characters
/// - Filter tokens shorter than 2 characters
///
/// # Example
///
/// ```
/// use curator_index::tokenizer::tokenize;
///
/// let tokens = tokenize("Hero Knight, animated!");
/// assert_eq!(tokens, vec!["hero", "knight", "animated"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.len() >= 2)
        .map(String::from)
        .collect()
}

/// Tokenize and deduplicate for query processing
///
/// # Example
///
/// ```
/// use curator_index::tokenizer::tokenize_unique;
///
/// let tokens = tokenize_unique("cat CAT dog");
/// assert_eq!(tokens, vec!["cat", "dog"]);
/// ```
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let tokens = tokenize("Red Sprite!");
        assert_eq!(tokens, vec!["red", "sprite"]);
    }

    #[test]
    fn test_tokenize_filters_short() {
        let tokens = tokenize("a 16x16 tile");
        assert_eq!(tokens, vec!["16x16", "tile"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_only_punctuation() {
        assert!(tokenize("...---...").is_empty());
    }

    #[test]
    fn test_tokenize_unique_preserves_order() {
        let tokens = tokenize_unique("knight shield knight sword");
        assert_eq!(tokens, vec!["knight", "shield", "sword"]);
    }
}
