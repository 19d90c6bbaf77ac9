// Per-line detection: blacklist, spell checker, whitelist, then phrase rules

use tracing::trace;

use typoscan_core::finding::{Certainty, Finding};
use typoscan_core::text::{TAB_SIZE, expand_tabs};
use typoscan_dict::{BlacklistDictionary, PatternDictionary};

use crate::CheckError;
use crate::speller::{CachedSpeller, Speller};
use crate::store::Misspellings;
use crate::tokenizer::WordSplitter;

/// Prepare a raw input line for detection: strip surrounding whitespace
/// and expand tabs.
pub fn normalize_line(raw: &str) -> String {
    expand_tabs(raw.trim(), TAB_SIZE)
}

/// Finds misspellings in single lines.
///
/// Every character of a line is explained by at most one finding.
/// Words are decided first, in order:
///
/// 1. a blacklisted word is a certain finding;
/// 2. a word the spell checker accepts is skipped;
/// 3. a whitelisted word is skipped;
/// 4. anything else is an uncertain finding.
///
/// Phrase rule matches come afterwards and are dropped if they touch any
/// character already claimed by a word finding.
pub struct Detector<'a, S> {
    patterns: &'a PatternDictionary,
    blacklist: &'a BlacklistDictionary,
    speller: &'a CachedSpeller<S>,
    splitter: &'a dyn WordSplitter,
}

impl<'a, S: Speller> Detector<'a, S> {
    pub fn new(
        patterns: &'a PatternDictionary,
        blacklist: &'a BlacklistDictionary,
        speller: &'a CachedSpeller<S>,
        splitter: &'a dyn WordSplitter,
    ) -> Self {
        Self {
            patterns,
            blacklist,
            speller,
            splitter,
        }
    }

    /// All findings of one normalized line, word findings first.
    pub fn detect<'l>(&self, line: &'l str) -> Result<Vec<Finding<'l>>, CheckError> {
        let line_len = line.chars().count();
        let mut claimed = vec![false; line_len];
        let tokens = self.splitter.split_words(line);

        for token in &tokens {
            if !self.blacklist.contains(token.text) {
                self.speller.queue(token.text);
            }
        }

        let mut findings = Vec::new();
        for token in tokens {
            if token.token_len == 0 {
                return Err(CheckError::EmptyToken { offset: token.pos });
            }
            let span = token.span();
            if claimed.get(span.clone()).is_none() {
                return Err(CheckError::TokenOutOfRange {
                    offset: token.pos,
                    len: token.token_len,
                    line_len,
                });
            }
            let certainty = if self.blacklist.contains(token.text) {
                Certainty::Certain
            } else if self.speller.check(token.text) || self.patterns.is_whitelisted(token.text) {
                continue;
            } else {
                Certainty::Uncertain
            };
            trace!(word = token.text, position = token.pos, %certainty, "word finding");
            claimed[span].fill(true);
            findings.push(Finding::new(token.text, line, token.pos, certainty));
        }

        for (text, start) in self.patterns.find(line) {
            if text.is_empty() {
                continue;
            }
            let end = start + text.chars().count();
            let Some(slots) = claimed.get_mut(start..end) else {
                continue;
            };
            if slots.iter().any(|&taken| taken) {
                trace!(phrase = text, start, "phrase overlaps a word finding");
                continue;
            }
            slots.fill(true);
            findings.push(Finding::new(text, line, start, Certainty::Certain));
        }
        Ok(findings)
    }

    /// Detect findings in `line` and record them in `store`.
    ///
    /// Returns the number of findings.
    pub fn scan(&self, line: &str, store: &mut Misspellings) -> Result<usize, CheckError> {
        let findings = self.detect(line)?;
        for finding in &findings {
            store.add_finding(finding);
        }
        Ok(findings.len())
    }
}
