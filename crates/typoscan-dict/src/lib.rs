//! Misspelling dictionaries.
//!
//! - [`pattern`] -- per-language regex rules for multi-word misspellings,
//!   with `@define` macros and an exact-word whitelist
//! - [`blacklist`] -- literal known-bad words loaded from correction lists
//!   (`bad||good`, `bad->good`, script `__DATA__` sections, plain lists)

use std::path::PathBuf;

pub mod blacklist;
pub mod pattern;

pub use blacklist::BlacklistDictionary;
pub use pattern::PatternDictionary;

/// Error type for dictionary loading.
///
/// Every variant produced while reading a file names that file, and
/// syntax-level variants also carry the 1-based line number.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}:{line}: syntax error: {reason}", .path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("{}:{line}: duplicate macro {name}", .path.display())]
    DuplicateMacro {
        path: PathBuf,
        line: usize,
        name: String,
    },
    #[error("{}:{line}: invalid pattern: {source}", .path.display())]
    InvalidPattern {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<regex::Error>,
    },
    #[error("{}: cannot compile rules: {source}", .path.display())]
    Compile {
        path: PathBuf,
        #[source]
        source: Box<regex::Error>,
    },
}
