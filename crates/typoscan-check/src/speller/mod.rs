// Spell checking oracles

pub mod cache;
pub mod hunspell;

pub use cache::CachedSpeller;
pub use hunspell::HunspellSpeller;

/// A spell checker that can accept or reject single words.
///
/// Implementations are shared with worker threads when checks run in
/// parallel, hence the `Send + Sync` bound.
pub trait Speller: Send + Sync {
    /// Whether `word` is spelled correctly.
    fn check(&self, word: &str) -> bool;

    /// Replacement candidates for `word`, best first.
    fn suggest(&self, word: &str) -> Vec<String>;
}

impl<S: Speller + ?Sized> Speller for Box<S> {
    fn check(&self, word: &str) -> bool {
        (**self).check(word)
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        (**self).suggest(word)
    }
}

/// Speller used when no dictionary is loaded.
///
/// Rejects every word: anything not blacklisted or whitelisted is
/// reported as uncertain.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpeller;

impl Speller for NullSpeller {
    fn check(&self, _word: &str) -> bool {
        false
    }

    fn suggest(&self, _word: &str) -> Vec<String> {
        Vec::new()
    }
}
