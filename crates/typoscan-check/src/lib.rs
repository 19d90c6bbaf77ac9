//! Misspelling detection.
//!
//! - [`speller`] -- spell checker trait, Hunspell backend, memoizing cache
//! - [`tokenizer`] -- word splitting with character offsets
//! - [`pipeline`] -- per-line detection combining all sources
//! - [`store`] -- occurrence indices and ranked views

use std::path::PathBuf;

pub mod pipeline;
pub mod speller;
pub mod store;
pub mod tokenizer;

pub use pipeline::Detector;
pub use speller::{CachedSpeller, NullSpeller, Speller};
pub use store::{Misspellings, Occurrences};

/// Error type for spell checker setup and line scanning.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The tokenizer produced a word with no characters.
    #[error("internal error: empty token at offset {offset}")]
    EmptyToken { offset: usize },

    /// The tokenizer produced a span that does not fit in the line.
    #[error("internal error: token at offset {offset} with length {len} exceeds line length {line_len}")]
    TokenOutOfRange {
        offset: usize,
        len: usize,
        line_len: usize,
    },

    /// A spell checker dictionary could not be read.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A spell checker dictionary could not be parsed.
    #[error("{}: invalid dictionary: {reason}", .path.display())]
    Backend { path: PathBuf, reason: String },

    /// No spell checker dictionary exists for the language.
    #[error("no dictionary found for language {0:?}")]
    UnknownLanguage(String),

    /// The checker worker pool could not be started.
    #[error("cannot start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
