// Occurrence store: findings indexed by word and by line

use std::collections::BTreeMap;
use std::rc::Rc;

use hashbrown::HashMap;

use typoscan_core::finding::{Certainty, Finding};
use typoscan_core::intern::Interner;
use typoscan_core::text::char_to_byte;

/// Positions of one word on one line, with the certainty of each.
pub type Positions = BTreeMap<usize, Certainty>;

/// Every `(word, line)` pair sharing one index key.
#[derive(Debug, Default, Clone)]
pub struct Occurrences {
    entries: BTreeMap<(Rc<str>, Rc<str>), Positions>,
    certainty: Certainty,
}

/// One `(word, line)` pair of an [`Occurrences`] group.
#[derive(Debug, Clone, Copy)]
pub struct Occurrence<'a> {
    pub word: &'a str,
    pub line: &'a str,
    pub positions: &'a Positions,
}

/// A word occurrence split into the text around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context<'a> {
    pub left: &'a str,
    pub word: &'a str,
    pub right: &'a str,
}

impl Occurrences {
    fn insert(&mut self, word: Rc<str>, line: Rc<str>, position: usize, certainty: Certainty) {
        let slot = self
            .entries
            .entry((word, line))
            .or_default()
            .entry(position)
            .or_insert(certainty);
        *slot = (*slot).max(certainty);
        self.certainty = self.certainty.max(certainty);
    }

    /// Highest certainty of any position in the group.
    pub fn certainty(&self) -> Certainty {
        self.certainty
    }

    /// Total number of positions over all pairs.
    pub fn count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Number of distinct `(word, line)` pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in `(word, line)` order.
    pub fn iter(&self) -> impl Iterator<Item = Occurrence<'_>> {
        self.entries.iter().map(|((word, line), positions)| Occurrence {
            word,
            line,
            positions,
        })
    }

    /// Every position as left context, word and right context, ordered
    /// by right context, then left context read backwards, then word.
    ///
    /// Occurrences sharing their surroundings end up next to each other.
    pub fn sorted_context(&self) -> Vec<Context<'_>> {
        let mut contexts: Vec<Context<'_>> = self
            .iter()
            .flat_map(|occ| {
                let word_len = occ.word.chars().count();
                occ.positions.keys().map(move |&pos| {
                    let start = char_to_byte(occ.line, pos);
                    let end = char_to_byte(occ.line, pos + word_len);
                    Context {
                        left: &occ.line[..start],
                        word: occ.word,
                        right: &occ.line[end..],
                    }
                })
            })
            .collect();
        contexts.sort_by_cached_key(|ctx| {
            (ctx.right, ctx.left.chars().rev().collect::<String>(), ctx.word)
        });
        contexts
    }
}

/// All findings of a run, indexed both by word and by line.
///
/// The two indices always hold the same set of findings.
#[derive(Debug, Default)]
pub struct Misspellings {
    interner: Interner,
    words: HashMap<Rc<str>, Occurrences>,
    lines: HashMap<Rc<str>, Occurrences>,
}

impl Misspellings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `word` at `position` in `line`.
    ///
    /// Re-adding a known position keeps the higher certainty.
    pub fn add(&mut self, word: &str, line: &str, position: usize, certainty: Certainty) {
        self.add_positions(word, line, [position], certainty);
    }

    /// Record `word` at several positions in `line`.
    pub fn add_positions<I>(&mut self, word: &str, line: &str, positions: I, certainty: Certainty)
    where
        I: IntoIterator<Item = usize>,
    {
        let word = self.interner.intern(word);
        let line = self.interner.intern(line);
        for position in positions {
            self.insert(&word, &line, position, certainty);
        }
    }

    pub fn add_finding(&mut self, finding: &Finding<'_>) {
        self.add(finding.word, finding.line, finding.position, finding.certainty);
    }

    fn insert(&mut self, word: &Rc<str>, line: &Rc<str>, position: usize, certainty: Certainty) {
        self.words.entry(Rc::clone(word)).or_default().insert(
            Rc::clone(word),
            Rc::clone(line),
            position,
            certainty,
        );
        self.lines.entry(Rc::clone(line)).or_default().insert(
            Rc::clone(word),
            Rc::clone(line),
            position,
            certainty,
        );
    }

    /// Words ranked most certain first, then most frequent, then by text.
    ///
    /// With `reverse` both numeric parts of the ranking are flipped while
    /// ties are still broken by ascending text.
    pub fn sorted_words(&self, reverse: bool) -> Vec<(&str, &Occurrences)> {
        ranked(&self.words, reverse)
    }

    /// Lines ranked the same way as [`Misspellings::sorted_words`].
    pub fn sorted_lines(&self, reverse: bool) -> Vec<(&str, &Occurrences)> {
        ranked(&self.lines, reverse)
    }

    pub fn word(&self, word: &str) -> Option<&Occurrences> {
        self.words.get(word)
    }

    pub fn line(&self, line: &str) -> Option<&Occurrences> {
        self.lines.get(line)
    }

    /// The findings of words that occur in a single `(word, line)` pair.
    pub fn rare(&self) -> Misspellings {
        let mut rare = Misspellings::new();
        for group in self.words.values().filter(|group| group.len() == 1) {
            for ((word, line), positions) in &group.entries {
                for (&position, &certainty) in positions {
                    rare.insert(word, line, position, certainty);
                }
            }
        }
        rare
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn ranked(index: &HashMap<Rc<str>, Occurrences>, reverse: bool) -> Vec<(&str, &Occurrences)> {
    let sign: i64 = if reverse { -1 } else { 1 };
    let mut entries: Vec<(&str, &Occurrences)> =
        index.iter().map(|(key, group)| (&**key, group)).collect();
    entries.sort_by_cached_key(|&(key, group)| {
        (
            sign * -group.certainty().level(),
            sign * -(group.count() as i64),
            key,
        )
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use Certainty::{Certain, Uncertain};

    fn keys<'a>(ranked: &[(&'a str, &Occurrences)]) -> Vec<&'a str> {
        ranked.iter().map(|&(key, _)| key).collect()
    }

    #[test]
    fn repeated_position_keeps_higher_certainty() {
        let mut store = Misspellings::new();
        store.add("upto", "upto now", 0, Certain);
        store.add("upto", "upto now", 0, Uncertain);
        let group = store.word("upto").unwrap();
        assert_eq!(group.count(), 1);
        assert_eq!(group.certainty(), Certain);
        let occ = group.iter().next().unwrap();
        assert_eq!(occ.positions[&0], Certain);

        store.add("wrod", "a wrod", 2, Uncertain);
        store.add("wrod", "a wrod", 2, Certain);
        assert_eq!(store.word("wrod").unwrap().iter().next().unwrap().positions[&2], Certain);
    }

    #[test]
    fn indices_hold_the_same_findings() {
        let mut store = Misspellings::new();
        store.add_positions("teh", "teh cat and teh dog", [0, 12], Certain);
        store.add("wrod", "teh cat and teh dog wrod", 20, Uncertain);
        store.add("teh", "teh end", 0, Certain);

        let by_word: usize = store.sorted_words(false).iter().map(|(_, g)| g.count()).sum();
        let by_line: usize = store.sorted_lines(false).iter().map(|(_, g)| g.count()).sum();
        assert_eq!(by_word, 4);
        assert_eq!(by_line, 4);
        assert_eq!(store.len(), 2);
        assert_eq!(store.word("teh").unwrap().len(), 2);
        assert_eq!(store.line("teh cat and teh dog").unwrap().count(), 2);
    }

    #[test]
    fn words_ranked_by_certainty_then_count_then_text() {
        let mut store = Misspellings::new();
        store.add("zzz", "zzz", 0, Uncertain);
        store.add_positions("bbb", "bbb bbb bbb", [0, 4, 8], Uncertain);
        store.add("yyy", "yyy", 0, Certain);
        store.add("aaa", "aaa", 0, Uncertain);
        store.add_positions("ccc", "ccc ccc", [0, 4], Certain);

        assert_eq!(
            keys(&store.sorted_words(false)),
            vec!["ccc", "yyy", "bbb", "aaa", "zzz"]
        );
        assert_eq!(
            keys(&store.sorted_words(true)),
            vec!["aaa", "zzz", "bbb", "yyy", "ccc"]
        );
    }

    #[test]
    fn lines_ranked_like_words() {
        let mut store = Misspellings::new();
        store.add("a", "line two", 0, Uncertain);
        store.add("b", "line one", 0, Uncertain);
        store.add("c", "line three", 0, Certain);
        assert_eq!(
            keys(&store.sorted_lines(false)),
            vec!["line three", "line one", "line two"]
        );
    }

    #[test]
    fn context_sorted_by_right_then_reversed_left() {
        let mut store = Misspellings::new();
        store.add("teh", "z teh end", 2, Certain);
        store.add("teh", "ya teh end", 3, Certain);
        store.add("teh", "teh beginning", 0, Certain);

        let contexts = store.word("teh").unwrap().sorted_context();
        let rendered: Vec<(&str, &str, &str)> =
            contexts.iter().map(|c| (c.left, c.word, c.right)).collect();
        assert_eq!(
            rendered,
            vec![
                ("", "teh", " beginning"),
                ("ya ", "teh", " end"),
                ("z ", "teh", " end"),
            ]
        );
    }

    #[test]
    fn context_offsets_are_characters() {
        let mut store = Misspellings::new();
        store.add("caf", "\u{00E9}t\u{00E9} caf \u{00E0}", 4, Uncertain);
        let contexts = store.word("caf").unwrap().sorted_context();
        assert_eq!(contexts[0].left, "\u{00E9}t\u{00E9} ");
        assert_eq!(contexts[0].right, " \u{00E0}");
    }

    #[test]
    fn rare_view_keeps_single_pair_words() {
        let mut store = Misspellings::new();
        store.add_positions("once", "once and once", [0, 9], Uncertain);
        store.add("twice", "twice here", 0, Uncertain);
        store.add("twice", "twice there", 0, Uncertain);

        let rare = store.rare();
        assert_eq!(rare.len(), 1);
        assert_eq!(rare.word("once").unwrap().count(), 2);
        assert!(rare.word("twice").is_none());
        assert_eq!(keys(&rare.sorted_lines(false)), vec!["once and once"]);
    }

    #[test]
    fn equal_texts_are_shared() {
        let mut store = Misspellings::new();
        store.add("teh", "teh teh", 0, Certain);
        store.add("teh", &String::from("teh teh"), 4, Certain);
        assert_eq!(store.line("teh teh").unwrap().len(), 1);
        assert_eq!(store.interner.len(), 2);
    }

    #[test]
    fn empty_store() {
        let store = Misspellings::new();
        assert!(store.is_empty());
        assert!(store.sorted_words(false).is_empty());
        assert!(store.rare().is_empty());
    }
}
