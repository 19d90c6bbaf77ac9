// Word splitting with character offsets

use unicode_segmentation::UnicodeSegmentation;

use typoscan_core::case::is_all_upper;
use typoscan_core::token::Token;

/// Splits a line into words.
pub trait WordSplitter {
    /// Words of `line` in order, with character offsets.
    fn split_words<'a>(&self, line: &'a str) -> Vec<Token<'a>>;
}

/// Words are Unicode word-boundary segments holding at least one letter.
///
/// Digits and punctuation on their own are not words; `don't` and
/// `foo_bar` stay whole.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeWords;

impl WordSplitter for UnicodeWords {
    fn split_words<'a>(&self, line: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        let mut byte_pos = 0;
        for (byte_idx, segment) in line.split_word_bound_indices() {
            pos += line[byte_pos..byte_idx].chars().count();
            byte_pos = byte_idx;
            if segment.chars().any(char::is_alphabetic) {
                tokens.push(Token::new(segment, pos));
            }
        }
        tokens
    }
}

/// Further splits the words of another splitter at camel-case humps.
///
/// `eggAndSpam` becomes `egg`, `And`, `Spam`. All-uppercase words are
/// left alone; a lowercase run followed by capitals is split at every
/// capital, so `spamSPAM` gives `spam`, `S`, `P`, `A`, `M`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CamelCase<T> {
    inner: T,
}

impl<T> CamelCase<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: WordSplitter> WordSplitter for CamelCase<T> {
    fn split_words<'a>(&self, line: &'a str) -> Vec<Token<'a>> {
        let mut out = Vec::new();
        for token in self.inner.split_words(line) {
            if is_all_upper(token.text) {
                out.push(token);
            } else {
                split_humps(token, &mut out);
            }
        }
        out
    }
}

fn split_humps<'a>(token: Token<'a>, out: &mut Vec<Token<'a>>) {
    let text = token.text;
    let mut start = 0;
    let mut pos = token.pos;
    for (i, c) in text.char_indices() {
        if i > 0 && c.is_ascii_uppercase() {
            let piece = Token::new(&text[start..i], pos);
            pos += piece.token_len;
            out.push(piece);
            start = i;
        }
    }
    out.push(Token::new(&text[start..], pos));
}

/// Splitter chosen from the command-line switches.
#[derive(Debug, Clone, Copy)]
pub enum Tokenizer {
    Plain(UnicodeWords),
    CamelCase(CamelCase<UnicodeWords>),
}

impl Tokenizer {
    pub fn new(camel_case: bool) -> Self {
        if camel_case {
            Tokenizer::CamelCase(CamelCase::new(UnicodeWords))
        } else {
            Tokenizer::Plain(UnicodeWords)
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl WordSplitter for Tokenizer {
    fn split_words<'a>(&self, line: &'a str) -> Vec<Token<'a>> {
        match self {
            Tokenizer::Plain(words) => words.split_words(line),
            Tokenizer::CamelCase(words) => words.split_words(line),
        }
    }
}
