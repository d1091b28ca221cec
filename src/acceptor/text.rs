//! Literal text acceptor.

use super::Advance;

/// Accepts exactly one literal string, character by character.
///
/// Input may arrive in arbitrary pieces: `"ab"` is accepted from the units
/// `"a"`, `"b"` as well as from `"ab"`. A unit that runs past the end of the
/// literal completes it and hands the rest back as remaining input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextAcceptor {
    text: String,
    case_sensitive: bool,
}

impl TextAcceptor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            case_sensitive: true,
        }
    }

    /// Match letters regardless of case.
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub(crate) fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// The part of the literal not yet matched after `matched` characters.
    pub(crate) fn rest(&self, matched: usize) -> &str {
        match self.text.char_indices().nth(matched) {
            Some((offset, _)) => &self.text[offset..],
            None => "",
        }
    }

    pub(crate) fn can_start_with(&self, c: char) -> bool {
        self.text.chars().next().is_some_and(|want| self.same(want, c))
    }

    /// Match `unit` against the literal after `value` has been consumed.
    pub(crate) fn advance(&self, value: &str, unit: &str) -> Option<Advance> {
        let matched = value.chars().count();
        let mut taken = 0;
        for (want, got) in self.text.chars().skip(matched).zip(unit.chars()) {
            if !self.same(want, got) {
                return None;
            }
            taken += got.len_utf8();
        }
        if taken == 0 {
            return None;
        }
        Some(Advance::split(value, unit, taken))
    }

    fn same(&self, want: char, got: char) -> bool {
        if self.case_sensitive {
            want == got
        } else {
            want == got || want.to_lowercase().eq(got.to_lowercase())
        }
    }
}
