// Report layout: rare findings grouped by line, common ones by word

use std::io::{self, Write};
use std::iter;

use unicode_segmentation::UnicodeSegmentation;

use typoscan_check::Misspellings;
use typoscan_core::text::{grapheme_len, ltrim, ltrim_with, rtrim, rtrim_with};

use crate::colors;

/// Default number of context clusters shown on each side of a finding.
pub const DEFAULT_CONTEXT_WIDTH: usize = 30;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Highlight findings with terminal colors instead of carets.
    pub color: bool,
    /// Show common findings first and rank from the other end.
    pub reverse: bool,
    /// Skip groups with more occurrences than this.
    pub limit: Option<usize>,
    pub max_context_width: usize,
    /// Number of spelling suggestions shown per word.
    pub suggest: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: false,
            reverse: false,
            limit: None,
            max_context_width: DEFAULT_CONTEXT_WIDTH,
            suggest: 0,
        }
    }
}

/// Writes the report for a finished [`Misspellings`] store.
///
/// Words found in a single `(word, line)` pair are rare: they are shown
/// by line, with the findings underlined. All other words are common:
/// each is shown once, followed by every context it appeared in.
pub struct Renderer<'a> {
    options: &'a RenderOptions,
    suggest: &'a dyn Fn(&str) -> Vec<String>,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a RenderOptions, suggest: &'a dyn Fn(&str) -> Vec<String>) -> Self {
        Self { options, suggest }
    }

    pub fn render<W: Write>(&self, out: &mut W, store: &Misspellings) -> io::Result<()> {
        let rare = store.rare();
        if self.options.reverse {
            self.render_common(out, store)?;
            self.render_rare(out, &rare)
        } else {
            self.render_rare(out, &rare)?;
            self.render_common(out, store)
        }
    }

    fn render_common<W: Write>(&self, out: &mut W, store: &Misspellings) -> io::Result<()> {
        let width = self.options.max_context_width;
        for (word, group) in store.sorted_words(self.options.reverse) {
            if group.len() == 1 || self.over_limit(group.count()) {
                continue;
            }
            writeln!(out, "{}:", self.label(word))?;
            let rows: Vec<(String, &str, String)> = group
                .sorted_context()
                .into_iter()
                .map(|ctx| (ltrim(ctx.left, width), ctx.word, rtrim(ctx.right, width)))
                .collect();
            let lwidth = rows.iter().map(|(left, _, _)| grapheme_len(left)).max().unwrap_or(0);
            for (left, word, right) in &rows {
                let pad = " ".repeat(lwidth - grapheme_len(left));
                if self.options.color {
                    writeln!(
                        out,
                        "{} {pad}{}{}{}",
                        colors::dim("|"),
                        colors::escape(left),
                        colors::highlight(word),
                        colors::escape(right)
                    )?;
                } else {
                    writeln!(out, "| {pad}{left}{word}{right}")?;
                }
            }
            if !self.options.color {
                writeln!(out, " {} {}", " ".repeat(lwidth), "^".repeat(grapheme_len(word)))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn render_rare<W: Write>(&self, out: &mut W, rare: &Misspellings) -> io::Result<()> {
        for (line, group) in rare.sorted_lines(self.options.reverse) {
            let mut labels = Vec::new();
            let mut underline = vec![' '; line.chars().count()];
            for occ in group.iter() {
                if self.over_limit(occ.positions.len()) {
                    continue;
                }
                labels.push(self.label(occ.word));
                let len = occ.word.chars().count();
                for &pos in occ.positions.keys() {
                    for slot in underline.iter_mut().skip(pos).take(len) {
                        *slot = '^';
                    }
                }
            }
            if labels.is_empty() {
                continue;
            }
            writeln!(out, "{}:", labels.join(", "))?;
            let underline = cluster_underline(line, &underline);
            let (line, underline) = trim_around_marks(line, &underline, self.options.max_context_width);
            if self.options.color {
                let mut marks = underline.chars().map(|c| c != ' ');
                let mask: Vec<bool> = line
                    .graphemes(true)
                    .flat_map(|g| iter::repeat_n(marks.next().unwrap_or(false), g.chars().count()))
                    .collect();
                writeln!(out, "{} {}", colors::dim("|"), colors::highlight_mask(&line, mask))?;
                writeln!(out)?;
            } else {
                writeln!(out, "| {line}")?;
                writeln!(out, "  {}", underline.trim_end())?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn over_limit(&self, count: usize) -> bool {
        self.options.limit.is_some_and(|limit| count > limit)
    }

    /// `word`, followed by its suggestions when they were asked for.
    fn label(&self, word: &str) -> String {
        if self.options.suggest == 0 {
            return word.to_string();
        }
        let mut suggestions = (self.suggest)(word);
        suggestions.truncate(self.options.suggest);
        if suggestions.is_empty() {
            word.to_string()
        } else {
            format!("{word} ({})", suggestions.join(", "))
        }
    }
}

/// One underline column per grapheme cluster of `line`, marked when any
/// character of the cluster is marked in the per-character `marks`.
fn cluster_underline(line: &str, marks: &[char]) -> String {
    let mut marks = marks.iter();
    line.graphemes(true)
        .map(|g| {
            let n = g.chars().count();
            if marks.by_ref().take(n).fold(false, |hit, &c| hit || c == '^') {
                '^'
            } else {
                ' '
            }
        })
        .collect()
}

/// Cut `line` and its per-cluster `underline` so that at most `width`
/// unmarked clusters remain on either side of the marks.
fn trim_around_marks(line: &str, underline: &str, width: usize) -> (String, String) {
    let lwidth = underline.chars().take_while(|&c| c == ' ').count();
    let rwidth = underline.chars().rev().take_while(|&c| c == ' ').count();
    let mut line = line.to_string();
    let mut underline = underline.to_string();
    if lwidth > width {
        let keep = grapheme_len(&line).saturating_sub(lwidth - width);
        line = ltrim(&line, keep);
        underline = ltrim_with(&underline, keep, " ");
    }
    if rwidth > width {
        let keep = grapheme_len(&line).saturating_sub(rwidth - width);
        line = rtrim(&line, keep);
        underline = rtrim_with(&underline, keep, " ");
    }
    (line, underline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use typoscan_core::finding::Certainty::{Certain, Uncertain};

    fn no_suggestions(_word: &str) -> Vec<String> {
        Vec::new()
    }

    fn render(store: &Misspellings, options: &RenderOptions) -> String {
        render_with(store, options, &no_suggestions)
    }

    fn render_with(store: &Misspellings, options: &RenderOptions, suggest: &dyn Fn(&str) -> Vec<String>) -> String {
        let mut out = Vec::new();
        Renderer::new(options, suggest).render(&mut out, store).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample() -> Misspellings {
        let mut store = Misspellings::new();
        store.add("upto", "This word is upto date.", 13, Certain);
        store.add("wrod", "a wrod here", 2, Uncertain);
        store.add("wrod", "wrod again", 0, Uncertain);
        store
    }

    #[test]
    fn rare_then_common() {
        let expected = "\
upto:
| This word is upto date.
               ^^^^

wrod:
|   wrod again
| a wrod here
    ^^^^

";
        assert_eq!(render(&sample(), &RenderOptions::default()), expected);
    }

    #[test]
    fn reverse_puts_common_first() {
        let options = RenderOptions {
            reverse: true,
            ..RenderOptions::default()
        };
        let out = render(&sample(), &options);
        assert!(out.starts_with("wrod:\n"), "{out}");
        assert!(out.contains("\n\nupto:\n"), "{out}");
    }

    #[test]
    fn limit_skips_frequent_groups() {
        let options = RenderOptions {
            limit: Some(1),
            ..RenderOptions::default()
        };
        let out = render(&sample(), &options);
        assert!(out.starts_with("upto:\n"));
        assert!(!out.contains("wrod"));
    }

    #[test]
    fn suggestions_follow_the_word() {
        let options = RenderOptions {
            suggest: 2,
            ..RenderOptions::default()
        };
        let suggest = |word: &str| -> Vec<String> {
            if word == "wrod" {
                vec!["word".into(), "rod".into(), "prod".into()]
            } else {
                Vec::new()
            }
        };
        let out = render_with(&sample(), &options, &suggest);
        assert!(out.contains("wrod (word, rod):\n"), "{out}");
        assert!(out.contains("upto:\n"), "{out}");
    }

    #[test]
    fn rare_line_lists_all_words() {
        let mut store = Misspellings::new();
        store.add("teh", "teh cat and teh dgo", 0, Certain);
        store.add("teh", "teh cat and teh dgo", 12, Certain);
        store.add("dgo", "teh cat and teh dgo", 16, Uncertain);
        let expected = "\
dgo, teh:
| teh cat and teh dgo
  ^^^         ^^^ ^^^

";
        assert_eq!(render(&store, &RenderOptions::default()), expected);
    }

    #[test]
    fn long_rare_line_is_trimmed_around_marks() {
        let mut store = Misspellings::new();
        store.add("teh", "aaaaaaaaaa teh bbbbbbbbbb", 11, Certain);
        let options = RenderOptions {
            max_context_width: 5,
            ..RenderOptions::default()
        };
        let expected = "\
teh:
| \u{2026}aaa teh bbb\u{2026}
       ^^^

";
        assert_eq!(render(&store, &options), expected);
    }

    #[test]
    fn trimmed_underline_stays_under_combining_marks() {
        let line = format!("{}wrod", "e\u{301}".repeat(10));
        let mut store = Misspellings::new();
        store.add("wrod", &line, 20, Uncertain);
        let options = RenderOptions {
            max_context_width: 3,
            ..RenderOptions::default()
        };
        let expected = "\
wrod:
| \u{2026}e\u{301}e\u{301}wrod
     ^^^^

";
        assert_eq!(render(&store, &options), expected);

        let options = RenderOptions {
            color: true,
            ..options
        };
        let plain = colors::strip_ansi(&render(&store, &options));
        assert!(plain.contains("| \u{2026}e\u{301}e\u{301}wrod\n"), "{plain}");
    }

    #[test]
    fn common_contexts_are_trimmed_and_aligned() {
        let mut store = Misspellings::new();
        store.add("teh", "one two three teh end", 14, Certain);
        store.add("teh", "x teh", 2, Certain);
        let options = RenderOptions {
            max_context_width: 5,
            ..RenderOptions::default()
        };
        let expected = "\
teh:
|    x teh
| \u{2026}ree teh end
       ^^^

";
        assert_eq!(render(&store, &options), expected);
    }

    #[test]
    fn color_output_keeps_text() {
        let options = RenderOptions {
            color: true,
            ..RenderOptions::default()
        };
        let out = render(&sample(), &options);
        assert!(out.contains('\x1b'));
        let plain = colors::strip_ansi(&out);
        assert!(plain.contains("| This word is upto date.\n\n\n"), "{plain}");
        assert!(plain.contains("|   wrod again\n"), "{plain}");
        assert!(!plain.contains('^'));
    }

    #[test]
    fn empty_store_renders_nothing() {
        assert_eq!(render(&Misspellings::new(), &RenderOptions::default()), "");
    }
}
