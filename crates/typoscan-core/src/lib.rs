//! Shared types and text helpers used by every typoscan crate.
//!
//! - [`case`] -- letter-case classification and conversion
//! - [`finding`] -- certainty levels and reported findings
//! - [`token`] -- word tokens with character offsets
//! - [`text`] -- grapheme-safe trimming, tab expansion, offset conversion
//! - [`intern`] -- string interner for words and lines

pub mod case;
pub mod finding;
pub mod intern;
pub mod text;
pub mod token;
