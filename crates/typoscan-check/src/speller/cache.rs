// Memoizing wrapper around a spell checker, with batched lookups

use std::cell::{Cell, RefCell};

use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::CheckError;
use crate::speller::Speller;

/// Remembers every verdict of the wrapped speller.
///
/// Words can be queued ahead of time; the next lookup checks the whole
/// queue in one batch, in parallel when a worker pool was requested.
/// Each distinct word reaches the backend at most once.
pub struct CachedSpeller<S> {
    backend: S,
    verdicts: RefCell<HashMap<String, bool>>,
    pending: RefCell<HashSet<String>>,
    pool: Option<rayon::ThreadPool>,
    backend_calls: Cell<usize>,
}

impl<S: Speller> CachedSpeller<S> {
    /// Wrap `backend`; checks run on the calling thread.
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            verdicts: RefCell::new(HashMap::new()),
            pending: RefCell::new(HashSet::new()),
            pool: None,
            backend_calls: Cell::new(0),
        }
    }

    /// Wrap `backend`, running batches on `jobs` worker threads.
    ///
    /// `jobs <= 1` is the same as [`CachedSpeller::new`].
    pub fn with_jobs(backend: S, jobs: usize) -> Result<Self, CheckError> {
        let mut speller = Self::new(backend);
        if jobs > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .thread_name(|i| format!("typoscan-check-{i}"))
                .build()?;
            debug!(jobs, "spell checker worker pool started");
            speller.pool = Some(pool);
        }
        Ok(speller)
    }

    /// Schedule `word` for checking by the next batch.
    pub fn queue(&self, word: &str) {
        if self.verdicts.borrow().contains_key(word) {
            return;
        }
        let mut pending = self.pending.borrow_mut();
        if !pending.contains(word) {
            pending.insert(word.to_string());
        }
    }

    /// Whether `word` is spelled correctly, consulting the cache first.
    pub fn check(&self, word: &str) -> bool {
        if let Some(&ok) = self.verdicts.borrow().get(word) {
            return ok;
        }
        self.queue(word);
        self.flush();
        self.verdicts.borrow().get(word).copied().unwrap_or(false)
    }

    /// Check every queued word now.
    pub fn flush(&self) {
        let words: Vec<String> = self.pending.borrow_mut().drain().collect();
        if words.is_empty() {
            return;
        }
        let backend = &self.backend;
        let results: Vec<(String, bool)> = match &self.pool {
            Some(pool) if words.len() > 1 => pool.install(|| {
                words
                    .into_par_iter()
                    .map(|word| {
                        let ok = backend.check(&word);
                        (word, ok)
                    })
                    .collect()
            }),
            _ => words
                .into_iter()
                .map(|word| {
                    let ok = backend.check(&word);
                    (word, ok)
                })
                .collect(),
        };
        trace!(words = results.len(), "checked batch");
        self.backend_calls.set(self.backend_calls.get() + results.len());
        self.verdicts.borrow_mut().extend(results);
    }

    /// Replacement candidates for `word`; not cached.
    pub fn suggest(&self, word: &str) -> Vec<String> {
        self.backend.suggest(word)
    }

    /// Number of words handed to the backend so far.
    pub fn backend_calls(&self) -> usize {
        self.backend_calls.get()
    }

    /// Number of words with a remembered verdict.
    pub fn cached_len(&self) -> usize {
        self.verdicts.borrow().len()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}
