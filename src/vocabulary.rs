//! Token vocabulary with prefix queries.

use std::collections::BTreeSet;
use std::ops::Bound;

/// Ordered set of token strings.
///
/// Used to keep partially consumed units whose consumed prefix is itself a
/// token, and to list tokens consistent with a walker's continuations.
///
/// # Example
///
/// ```rust
/// use trellis::Vocabulary;
///
/// let vocab: Vocabulary = ["a", "ab", "abc", "b"].into_iter().collect();
/// let extensions: Vec<_> = vocab.with_prefix("ab").collect();
/// assert_eq!(extensions, vec!["ab", "abc"]);
/// assert!(vocab.contains("b"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: BTreeSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>) {
        self.tokens.insert(token.into());
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens starting with `prefix`, in lexicographic order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tokens
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |token| token.starts_with(prefix))
            .map(String::as_str)
    }

    /// Tokens that are non-empty prefixes of `text`, shortest first.
    pub fn prefixes_of<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        text.char_indices()
            .map(|(offset, c)| &text[..offset + c.len_utf8()])
            .filter(move |prefix| self.contains(prefix))
    }
}

impl<S: Into<String>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_range_stops_at_first_non_match() {
        let vocab: Vocabulary = ["tr", "true", "truth", "tz", "u"].into_iter().collect();
        let matches: Vec<_> = vocab.with_prefix("tru").collect();
        assert_eq!(matches, vec!["true", "truth"]);
    }

    #[test]
    fn empty_prefix_lists_everything() {
        let vocab: Vocabulary = ["b", "a"].into_iter().collect();
        let matches: Vec<_> = vocab.with_prefix("").collect();
        assert_eq!(matches, vec!["a", "b"]);
    }

    #[test]
    fn prefixes_of_text() {
        let vocab: Vocabulary = ["n", "nu", "null", "x"].into_iter().collect();
        let found: Vec<_> = vocab.prefixes_of("null").collect();
        assert_eq!(found, vec!["n", "nu", "null"]);
    }

    #[test]
    fn insert_and_len() {
        let mut vocab = Vocabulary::new();
        assert!(vocab.is_empty());
        vocab.insert("a");
        vocab.insert("a");
        assert_eq!(vocab.len(), 1);
    }
}
