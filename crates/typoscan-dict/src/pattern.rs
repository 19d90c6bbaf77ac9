// Pattern dictionary: regex rules for multi-word misspellings, plus a
// whitelist of words the spell checker must not report.
//
// Rule file grammar, one entry per line:
//
//   # comment
//   * WORD                         whitelist WORD, WORD.to_upper(), title(WORD)
//   @define NAME = tok tok ...     named macro, usable in later lines
//   tok tok ...                    rule; tokens match across any whitespace
//
// Loading is two-phase: every line is validated as it is read (so errors
// point at a file and line), then all rules are compiled into a single
// case-insensitive, word-bounded alternation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hashbrown::{HashMap, HashSet};
use regex::{Regex, RegexBuilder};
use tracing::{debug, info};

use typoscan_core::case::{to_title, to_upper};

use crate::DictError;

/// Separator placed between the tokens of a rule or macro body.
const WHITESPACE: &str = r"\s+";

/// Keyword that starts a macro definition line.
const DEFINE: &str = "@define";

/// Upper bound for the compiled rule automaton.
const REGEX_SIZE_LIMIT: usize = 64 << 20;

/// Multi-word misspelling rules and whitelist for one language.
#[derive(Debug, Default)]
pub struct PatternDictionary {
    whitelist: HashSet<String>,
    regex: Option<Regex>,
    rule_count: usize,
    source: Option<PathBuf>,
}

impl PatternDictionary {
    /// A dictionary with no rules and an empty whitelist.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the rule file for `language` from `data_dir`.
    ///
    /// The tag is normalized (lowercase, `_` → `-`) and then shortened one
    /// `-suffix` at a time until a file named after it exists: `en-US`
    /// tries `en-us`, then `en`. Only the first file found is read. If no
    /// file exists at any level the dictionary is empty.
    pub fn load(data_dir: &Path, language: &str) -> Result<Self, DictError> {
        for tag in language_fallbacks(language) {
            let path = data_dir.join(&tag);
            match fs::read_to_string(&path) {
                Ok(text) => {
                    debug!(path = %path.display(), "reading pattern rules");
                    let dict = Self::parse(&text, &path)?;
                    info!(
                        path = %path.display(),
                        rules = dict.rule_count,
                        whitelisted = dict.whitelist.len(),
                        "loaded pattern dictionary"
                    );
                    return Ok(dict);
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(DictError::Io { path, source }),
            }
        }
        debug!(language, dir = %data_dir.display(), "no pattern rules found");
        Ok(Self::empty())
    }

    /// Parse rule file contents. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self, DictError> {
        let mut builder = RuleSetBuilder::new(path);
        for (idx, line) in text.lines().enumerate() {
            builder.add_line(idx + 1, line)?;
        }
        builder.build()
    }

    /// Find every non-overlapping rule match in `line`.
    ///
    /// Returns `(matched_text, start)` pairs, where `start` is a character
    /// offset into `line`.
    pub fn find<'h>(&self, line: &'h str) -> Vec<(&'h str, usize)> {
        let Some(regex) = &self.regex else {
            return Vec::new();
        };
        let mut matches = Vec::new();
        let mut last_byte = 0;
        let mut last_char = 0;
        for m in regex.find_iter(line) {
            last_char += line[last_byte..m.start()].chars().count();
            last_byte = m.start();
            matches.push((m.as_str(), last_char));
        }
        matches
    }

    /// Exact, case-sensitive whitelist lookup.
    pub fn is_whitelisted(&self, word: &str) -> bool {
        self.whitelist.contains(word)
    }

    /// The assembled rule pattern, if any rules were loaded.
    pub fn pattern(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }

    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    pub fn whitelist_len(&self) -> usize {
        self.whitelist.len()
    }

    /// The rule file this dictionary was read from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Candidate file names for a language tag, most specific first.
///
/// `"en_US"` yields `["en-us", "en"]`.
pub fn language_fallbacks(language: &str) -> Vec<String> {
    let mut tag = language.to_lowercase().replace('_', "-");
    let mut tags = Vec::new();
    loop {
        if !tag.is_empty() {
            tags.push(tag.clone());
        }
        match tag.rsplit_once('-') {
            Some((head, _)) => tag = head.to_string(),
            None => break,
        }
    }
    tags
}

/// Collects validated macros, rules and whitelist entries from one file.
struct RuleSetBuilder<'p> {
    path: &'p Path,
    macros: HashMap<String, String>,
    rules: Vec<String>,
    whitelist: HashSet<String>,
}

impl<'p> RuleSetBuilder<'p> {
    fn new(path: &'p Path) -> Self {
        Self {
            path,
            macros: HashMap::new(),
            rules: Vec::new(),
            whitelist: HashSet::new(),
        }
    }

    fn add_line(&mut self, line_no: usize, line: &str) -> Result<(), DictError> {
        if line.starts_with('#') {
            return Ok(());
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [] => Ok(()),
            ["*", word] => {
                self.whitelist.insert(word.to_string());
                self.whitelist.insert(to_upper(word));
                self.whitelist.insert(to_title(word));
                Ok(())
            }
            ["*", ..] => Err(self.syntax(line_no, "whitelist entry must be exactly one word")),
            [DEFINE, rest @ ..] => self.define(line_no, rest),
            _ => self.add_rule(line_no, &tokens),
        }
    }

    fn define(&mut self, line_no: usize, rest: &[&str]) -> Result<(), DictError> {
        let (name, body) = match rest {
            [name, "=", body @ ..] if !body.is_empty() => (*name, body),
            _ => {
                return Err(self.syntax(line_no, "expected `@define NAME = pattern ...`"));
            }
        };
        if !is_macro_name(name) {
            return Err(self.syntax(line_no, &format!("invalid macro name {name:?}")));
        }
        if self.macros.contains_key(name) {
            return Err(DictError::DuplicateMacro {
                path: self.path.to_path_buf(),
                line: line_no,
                name: name.to_string(),
            });
        }
        let expanded = format!("(?:{})", self.expand(&body.join(WHITESPACE)));
        self.validate(line_no, &expanded)?;
        self.macros.insert(name.to_string(), expanded);
        Ok(())
    }

    fn add_rule(&mut self, line_no: usize, tokens: &[&str]) -> Result<(), DictError> {
        let rule = self.expand(&tokens.join(WHITESPACE));
        self.validate(line_no, &rule)?;
        self.rules.push(rule);
        Ok(())
    }

    fn validate(&self, line_no: usize, pattern: &str) -> Result<(), DictError> {
        Regex::new(pattern)
            .map(drop)
            .map_err(|source| DictError::InvalidPattern {
                path: self.path.to_path_buf(),
                line: line_no,
                source: Box::new(source),
            })
    }

    /// Replace every macro name in `text` with its body.
    ///
    /// Names are matched as whole identifier runs. The character after a
    /// backslash belongs to the escape (`\s`, `\b`) and never starts a name.
    fn expand(&self, text: &str) -> String {
        if self.macros.is_empty() {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        let mut escaped = false;
        while let Some(c) = rest.chars().next() {
            if escaped {
                out.push(c);
                rest = &rest[c.len_utf8()..];
                escaped = false;
            } else if is_ident_char(c) {
                let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
                let ident = &rest[..end];
                match self.macros.get(ident) {
                    Some(body) => out.push_str(body),
                    None => out.push_str(ident),
                }
                rest = &rest[end..];
            } else {
                escaped = c == '\\';
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
        out
    }

    fn build(self) -> Result<PatternDictionary, DictError> {
        let regex = if self.rules.is_empty() {
            None
        } else {
            let pattern = format!(r"\b(?i:{})\b", self.rules.join("|"));
            let regex = RegexBuilder::new(&pattern)
                .size_limit(REGEX_SIZE_LIMIT)
                .build()
                .map_err(|source| DictError::Compile {
                    path: self.path.to_path_buf(),
                    source: Box::new(source),
                })?;
            Some(regex)
        };
        Ok(PatternDictionary {
            whitelist: self.whitelist,
            regex,
            rule_count: self.rules.len(),
            source: Some(self.path.to_path_buf()),
        })
    }

    fn syntax(&self, line_no: usize, reason: &str) -> DictError {
        DictError::Syntax {
            path: self.path.to_path_buf(),
            line: line_no,
            reason: reason.to_string(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_macro_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => chars.all(is_ident_char),
        _ => false,
    }
}
