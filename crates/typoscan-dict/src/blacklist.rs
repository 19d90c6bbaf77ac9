// Blacklist dictionary: literal words and phrases known to be misspellings.
//
// Accepted file formats, detected per file:
//
// - correction lists, one `bad||good` or `bad->good` pair per line
//   (Lintian and codespell style);
// - scripts whose first line is a `#!...perl` shebang: everything up to a
//   `__DATA__` line is code, after it each line is `BAD  GOOD`
//   (kde-spellcheck style);
// - plain word lists, one bad word per line.
//
// Lines starting with `#` are comments in every format.

use std::fs;
use std::path::Path;

use hashbrown::HashSet;
use tracing::{debug, info, warn};

use typoscan_core::case::{is_all_lower, to_title, to_upper};

use crate::DictError;

/// Separators between a bad word and its correction.
const SEPARATORS: [&str; 2] = ["||", "->"];

/// Marker line that starts the data section of a script file.
const DATA_MARKER: &str = "__DATA__";

/// Layout of a blacklist file, decided from its first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlacklistFormat {
    /// Correction pairs and/or bare words, one entry per line.
    Lines,
    /// Script with a `__DATA__` section.
    ScriptData,
}

impl BlacklistFormat {
    /// Inspect the first line of a file.
    pub fn detect(first_line: &str) -> Self {
        if is_perl_shebang(first_line) {
            BlacklistFormat::ScriptData
        } else {
            BlacklistFormat::Lines
        }
    }
}

fn is_perl_shebang(line: &str) -> bool {
    line.starts_with("#!")
        && line
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .any(|word| word == "perl")
}

/// Set of known-bad words with exact, case-sensitive membership.
#[derive(Debug, Default, Clone)]
pub struct BlacklistDictionary {
    words: HashSet<String>,
}

impl BlacklistDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from several files, in order.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, DictError> {
        let mut dict = Self::new();
        for path in paths {
            dict.read_file(path.as_ref())?;
        }
        if !paths.is_empty() {
            info!(files = paths.len(), words = dict.len(), "loaded blacklist");
        }
        Ok(dict)
    }

    /// Add the entries of one file. The file must be valid UTF-8.
    pub fn read_file(&mut self, path: &Path) -> Result<(), DictError> {
        let text = fs::read_to_string(path).map_err(|source| DictError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let before = self.len();
        let format = self.read_str(&text);
        debug!(
            path = %path.display(),
            ?format,
            added = self.len() - before,
            "read blacklist file"
        );
        Ok(())
    }

    /// Add the entries of one file's contents; returns the detected format.
    pub fn read_str(&mut self, text: &str) -> BlacklistFormat {
        let mut lines = text.lines().peekable();
        let format = lines
            .peek()
            .map_or(BlacklistFormat::Lines, |first| BlacklistFormat::detect(first));
        match format {
            BlacklistFormat::Lines => {
                for line in lines {
                    self.add_correction_line(line);
                }
            }
            BlacklistFormat::ScriptData => {
                let data = lines.skip_while(|line| line.trim() != DATA_MARKER).skip(1);
                for line in data {
                    self.add_data_line(line);
                }
            }
        }
        format
    }

    fn add_correction_line(&mut self, line: &str) {
        if line.starts_with('#') {
            return;
        }
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let (word, correction) = split_correction(line);
        let word = word.trim_end();
        if word.is_empty() {
            warn!(line, "blacklist entry has no word before the separator");
            return;
        }
        self.add_with_variants(word, correction);
    }

    fn add_data_line(&mut self, line: &str) {
        if line.starts_with('#') {
            return;
        }
        let mut fields = line.split_whitespace();
        if let Some(word) = fields.next() {
            self.add_with_variants(word, fields.next());
        }
    }

    fn add_with_variants(&mut self, word: &str, correction: Option<&str>) {
        for variant in case_variants(word, correction) {
            self.words.insert(variant);
        }
    }

    /// Exact membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Split `bad SEP correction` on the first known separator.
fn split_correction(line: &str) -> (&str, Option<&str>) {
    for sep in SEPARATORS {
        if let Some((word, correction)) = line.split_once(sep) {
            return (word, Some(correction));
        }
    }
    (line, None)
}

/// The spellings of `word` that should be blacklisted.
///
/// A word with any uppercase letter is taken literally. An all-lowercase
/// word also yields its title-case and uppercase forms, except where that
/// form equals the same form of the correction: `american||American`
/// blacklists only `american`.
pub fn case_variants(word: &str, correction: Option<&str>) -> Vec<String> {
    let mut variants = vec![word.to_string()];
    if !is_all_lower(word) {
        return variants;
    }
    let correction = correction.unwrap_or("");
    let title = to_title(word);
    if title != to_title(correction) {
        variants.push(title);
    }
    let upper = to_upper(word);
    if upper != to_upper(correction) {
        variants.push(upper);
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(text: &str) -> BlacklistDictionary {
        let mut d = BlacklistDictionary::new();
        d.read_str(text);
        d
    }

    fn assert_bad(d: &BlacklistDictionary, words: &[&str]) {
        for w in words {
            assert!(d.contains(w), "{w:?} should be blacklisted");
        }
    }

    fn assert_good(d: &BlacklistDictionary, words: &[&str]) {
        for w in words {
            assert!(!d.contains(w), "{w:?} should not be blacklisted");
        }
    }

    #[test]
    fn lintian_pairs() {
        let d = dict(
            "# All spelling errors that have been observed \"in the wild\"\n\
             #\n\
             \n\
             abandonned||abandoned\n\
             portugese||Portuguese\n\
             upto||up to\n",
        );
        assert_bad(&d, &["abandonned", "Abandonned", "ABANDONNED"]);
        assert_good(&d, &["abandoned"]);
        assert_bad(&d, &["portugese", "Portugese", "PORTUGESE"]);
        assert_good(&d, &["Portuguese"]);
        assert_bad(&d, &["upto", "Upto", "UPTO"]);
        assert_good(&d, &["up to"]);
    }

    #[test]
    fn lintian_case_sensitive_pairs() {
        let d = dict(
            "# Picky corrections, applied before lowercasing the word.\n\
             american||American\n\
             Debian-Edu||Debian Edu\n\
             SLang||S-Lang\n",
        );
        assert_bad(&d, &["american"]);
        assert_good(&d, &["American", "AMERICAN"]);
        assert_bad(&d, &["Debian-Edu"]);
        assert_good(&d, &["Debian Edu", "debian-edu", "DEBIAN-EDU"]);
        assert_bad(&d, &["SLang"]);
        assert_good(&d, &["S-Lang", "slang", "SLANG"]);
    }

    #[test]
    fn codespell_pairs() {
        let d = dict(
            "abandonned->abandoned\n\
             clas->class, disabled because of name clash in c++\n\
             intented->intended, indented,\n",
        );
        assert_bad(&d, &["abandonned", "Abandonned", "ABANDONNED"]);
        assert_good(&d, &["abandoned"]);
        assert_bad(&d, &["clas", "Clas", "CLAS"]);
        assert_good(&d, &["class"]);
        assert_bad(&d, &["intented", "Intented", "INTENTED"]);
        assert_good(&d, &["intended", "indented"]);
    }

    #[test]
    fn script_data_section() {
        let text = "#! /usr/bin/env perl\n\
                    \n\
                    # CORRECTIONS GO IN THE __DATA__ SECTION AT THE END OF THIS SCRIPT\n\
                    my $x = 1;\n\
                    \n\
                    __DATA__\n\
                    \n\
                    #INCORRECT SPELLING    CORRECTION\n\
                    \n\
                    aasumes                assumes\n\
                    \n\
                    Addtional              Additional\n";
        let mut d = BlacklistDictionary::new();
        assert_eq!(d.read_str(text), BlacklistFormat::ScriptData);
        assert_bad(&d, &["aasumes"]);
        assert_good(&d, &["assumes", "my", "#INCORRECT"]);
        assert_bad(&d, &["Addtional"]);
        assert_good(&d, &["Additional", "addtional"]);
    }

    #[test]
    fn script_without_data_marker_adds_nothing() {
        let d = dict("#!/usr/bin/perl\nbadword\n");
        assert!(d.is_empty());
    }

    #[test]
    fn shebang_must_be_first_line() {
        let mut d = BlacklistDictionary::new();
        let format = d.read_str("wrod\n#!/usr/bin/perl\n__DATA__\nteh the\n");
        assert_eq!(format, BlacklistFormat::Lines);
        assert_bad(&d, &["wrod", "__DATA__", "teh the"]);
    }

    #[test]
    fn detect_only_perl_shebangs() {
        assert_eq!(
            BlacklistFormat::detect("#!/usr/bin/env perl"),
            BlacklistFormat::ScriptData
        );
        assert_eq!(
            BlacklistFormat::detect("#!/usr/bin/perl -w"),
            BlacklistFormat::ScriptData
        );
        assert_eq!(
            BlacklistFormat::detect("#!/usr/bin/env perl5"),
            BlacklistFormat::Lines
        );
        assert_eq!(
            BlacklistFormat::detect("#!/bin/sh"),
            BlacklistFormat::Lines
        );
        assert_eq!(BlacklistFormat::detect("perl"), BlacklistFormat::Lines);
    }

    #[test]
    fn plain_word_list() {
        let d = dict("abandonned\nPortugese\n");
        assert_bad(&d, &["abandonned", "Abandonned", "ABANDONNED"]);
        assert_good(&d, &["abandoned"]);
        assert_bad(&d, &["Portugese"]);
        assert_good(&d, &["portugese", "PORTUGESE"]);
    }

    #[test]
    fn indented_hash_is_not_a_comment() {
        let d = dict("  #hashtag  \n");
        assert_bad(&d, &["#hashtag"]);
    }

    #[test]
    fn variants_of_lowercase_word_without_correction() {
        assert_eq!(case_variants("teh", None), vec!["teh", "Teh", "TEH"]);
    }

    #[test]
    fn variants_of_word_with_uppercase() {
        assert_eq!(case_variants("SLang", Some("S-Lang")), vec!["SLang"]);
        assert_eq!(case_variants("Teh", None), vec!["Teh"]);
    }

    #[test]
    fn variants_skip_collisions_with_correction() {
        assert_eq!(case_variants("american", Some("American")), vec!["american"]);
        assert_eq!(case_variants("iphone", Some("iPhone")), vec!["iphone"]);
        assert_eq!(
            case_variants("portugese", Some("Portuguese")),
            vec!["portugese", "Portugese", "PORTUGESE"]
        );
    }

    #[test]
    fn pair_without_bad_word_is_skipped() {
        let d = dict("||orphan\n->stray\nteh ->the\n");
        assert_bad(&d, &["teh", "Teh", "TEH"]);
        assert_good(&d, &["", "orphan", "stray", "teh "]);
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn empty_input() {
        let mut d = BlacklistDictionary::new();
        assert_eq!(d.read_str(""), BlacklistFormat::Lines);
        assert!(d.is_empty());
    }
}
