//! Character class acceptor.

use super::Advance;
use std::collections::BTreeSet;

/// Accepts a run of characters drawn from a fixed set.
///
/// The run must be at least `min_chars` long to be accepting and stops
/// growing at `max_chars`, if set. Consumption is greedy within a unit: the
/// first character outside the set ends the run and the rest of the unit is
/// handed back as remaining input.
///
/// # Example
///
/// ```rust
/// use trellis::acceptor::CharacterAcceptor;
///
/// let hex = CharacterAcceptor::new("0123456789abcdef".chars())
///     .case_insensitive()
///     .min_chars(2)
///     .max_chars(2);
/// assert!(hex.contains('F'));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterAcceptor {
    charset: BTreeSet<char>,
    min_chars: usize,
    max_chars: Option<usize>,
    case_sensitive: bool,
}

impl CharacterAcceptor {
    /// Accept one or more characters from `chars`.
    pub fn new(chars: impl IntoIterator<Item = char>) -> Self {
        Self {
            charset: chars.into_iter().collect(),
            min_chars: 1,
            max_chars: None,
            case_sensitive: true,
        }
    }

    /// ASCII decimal digits.
    pub fn digits() -> Self {
        Self::new('0'..='9')
    }

    /// Optional run of ASCII whitespace.
    pub fn whitespace() -> Self {
        Self::new([' ', '\t', '\n', '\r']).min_chars(0)
    }

    pub fn min_chars(mut self, min: usize) -> Self {
        self.min_chars = min;
        self
    }

    pub fn max_chars(mut self, max: usize) -> Self {
        self.max_chars = Some(max);
        self
    }

    /// Match letters regardless of case.
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self.charset = self.charset.iter().flat_map(|c| c.to_lowercase()).collect();
        self
    }

    pub fn contains(&self, c: char) -> bool {
        if self.case_sensitive {
            self.charset.contains(&c)
        } else {
            c.to_lowercase().all(|lower| self.charset.contains(&lower))
        }
    }

    pub fn charset(&self) -> &BTreeSet<char> {
        &self.charset
    }

    pub(crate) fn is_accepting(&self, count: usize) -> bool {
        count >= self.min_chars
    }

    pub(crate) fn can_accept_more(&self, count: usize) -> bool {
        self.max_chars.map_or(true, |max| count < max)
    }

    pub(crate) fn can_start_with(&self, c: char) -> bool {
        self.can_accept_more(0) && self.contains(c)
    }

    pub(crate) fn advance(&self, value: &str, unit: &str) -> Option<Advance> {
        let mut count = value.chars().count();
        let mut taken = 0;
        for c in unit.chars() {
            if !self.can_accept_more(count) || !self.contains(c) {
                break;
            }
            count += 1;
            taken += c.len_utf8();
        }
        if taken == 0 {
            return None;
        }
        // stopping short of the unit is only valid once the run is complete
        if taken < unit.len() && !self.is_accepting(count) {
            return None;
        }
        Some(Advance::split(value, unit, taken))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_stops_at_foreign_character() {
        let digits = CharacterAcceptor::digits();
        let advance = digits.advance("", "12,3").unwrap();
        assert_eq!(advance.value, "12");
        assert_eq!(advance.remaining.as_deref(), Some(",3"));
    }

    #[test]
    fn run_respects_max_chars() {
        let pair = CharacterAcceptor::digits().max_chars(2);
        let advance = pair.advance("1", "234").unwrap();
        assert_eq!(advance.value, "12");
        assert_eq!(advance.remaining.as_deref(), Some("34"));
        assert!(pair.advance("12", "3").is_none());
    }

    #[test]
    fn short_run_cannot_hand_back_input() {
        let triple = CharacterAcceptor::digits().min_chars(3);
        assert!(triple.advance("", "12x").is_none());
        let advance = triple.advance("", "12").unwrap();
        assert_eq!(advance.value, "12");
        assert!(!triple.is_accepting(2));
    }

    #[test]
    fn no_matching_character_is_rejected() {
        assert!(CharacterAcceptor::digits().advance("", "x1").is_none());
    }

    #[test]
    fn case_insensitive_set() {
        let letters = CharacterAcceptor::new("abc".chars()).case_insensitive();
        assert!(letters.contains('B'));
        assert!(letters.contains('b'));
        assert!(!CharacterAcceptor::new("abc".chars()).contains('B'));
    }

    #[test]
    fn whitespace_accepts_empty_run() {
        let ws = CharacterAcceptor::whitespace();
        assert!(ws.is_accepting(0));
        assert!(ws.advance("", "  x").is_some());
    }
}
