// Word tokens produced by the tokenizer

use std::ops::Range;

/// A word found in a line of text.
///
/// The text borrows from the line it was cut from. Positions and lengths
/// are measured in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The text content of this token.
    pub text: &'a str,

    /// Length of the token in characters.
    pub token_len: usize,

    /// Position of this token within the line (character offset).
    pub pos: usize,
}

impl<'a> Token<'a> {
    /// Create a new token.
    pub fn new(text: &'a str, pos: usize) -> Self {
        Self {
            text,
            token_len: text.chars().count(),
            pos,
        }
    }

    /// Character span covered by this token.
    pub fn span(&self) -> Range<usize> {
        self.pos..self.pos + self.token_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_new() {
        let tok = Token::new("upto", 0);
        assert_eq!(tok.text, "upto");
        assert_eq!(tok.token_len, 4);
        assert_eq!(tok.pos, 0);
    }

    #[test]
    fn token_new_with_position() {
        let tok = Token::new("eggs", 10);
        assert_eq!(tok.span(), 10..14);
    }

    #[test]
    fn token_unicode_length() {
        // "äiti" is 4 characters, 5 bytes in UTF-8
        let tok = Token::new("\u{00E4}iti", 0);
        assert_eq!(tok.token_len, 4);
    }

    #[test]
    fn token_empty() {
        let tok = Token::new("", 3);
        assert_eq!(tok.token_len, 0);
        assert!(tok.span().is_empty());
    }
}
