// Certainty levels and reported findings

use std::fmt;
use std::ops::Range;

/// How sure the detector is that a finding is a real misspelling.
///
/// Ordered: `Uncertain < Certain`, so `max` picks the stronger verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Certainty {
    /// The spell checker rejected the word and nothing whitelists it.
    #[default]
    Uncertain = 0,
    /// The word is a known misspelling (blacklist entry or phrase rule).
    Certain = 1,
}

impl Certainty {
    /// Numeric level used by the ranking key.
    pub fn level(self) -> i64 {
        self as i64
    }
}

impl fmt::Display for Certainty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Certainty::Uncertain => f.write_str("uncertain"),
            Certainty::Certain => f.write_str("certain"),
        }
    }
}

/// One reported misspelling occurrence.
///
/// `word` and `line` borrow from the scanned line; `position` is the
/// character offset of `word` within `line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finding<'a> {
    pub word: &'a str,
    pub line: &'a str,
    pub position: usize,
    pub certainty: Certainty,
}

impl<'a> Finding<'a> {
    pub fn new(word: &'a str, line: &'a str, position: usize, certainty: Certainty) -> Self {
        Self {
            word,
            line,
            position,
            certainty,
        }
    }

    /// Length of the word in characters.
    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// Character span `[position, position + len)` covered by the word.
    pub fn span(&self) -> Range<usize> {
        self.position..self.position + self.len()
    }
}
