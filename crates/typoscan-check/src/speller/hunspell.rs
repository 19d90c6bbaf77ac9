// Hunspell dictionaries through spellbook, and locating them on disk

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::CheckError;
use crate::speller::Speller;

/// Spell checker backed by a Hunspell `.aff`/`.dic` pair.
pub struct HunspellSpeller {
    dict: spellbook::Dictionary,
    language: String,
}

impl HunspellSpeller {
    /// Parse dictionary sources already in memory.
    ///
    /// `path` only names the source in error messages.
    pub fn from_sources(aff: &str, dic: &str, language: &str, path: &Path) -> Result<Self, CheckError> {
        let dict = spellbook::Dictionary::new(aff, dic).map_err(|e| CheckError::Backend {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            dict,
            language: language.to_string(),
        })
    }

    /// Read and parse the dictionary pair `aff` + `dic`.
    pub fn open(aff: &Path, dic: &Path, language: &str) -> Result<Self, CheckError> {
        let aff_text = read(aff)?;
        let dic_text = read(dic)?;
        let speller = Self::from_sources(&aff_text, &dic_text, language, dic)?;
        info!(language, path = %dic.display(), "loaded spell checker dictionary");
        Ok(speller)
    }

    /// Find the dictionary for `language` in `dirs` and open it.
    pub fn for_language(dirs: &[PathBuf], language: &str) -> Result<Self, CheckError> {
        let found = find_dictionary(dirs, language)
            .ok_or_else(|| CheckError::UnknownLanguage(language.to_string()))?;
        Self::open(&found.aff, &found.dic, &found.tag)
    }

    /// Dictionary tag this speller was opened for, e.g. `en_US`.
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Speller for HunspellSpeller {
    fn check(&self, word: &str) -> bool {
        self.dict.check(word)
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        let mut out = Vec::new();
        self.dict.suggest(word, &mut out);
        out
    }
}

fn read(path: &Path) -> Result<String, CheckError> {
    fs::read_to_string(path).map_err(|source| CheckError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Location of one installed dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryFiles {
    pub tag: String,
    pub aff: PathBuf,
    pub dic: PathBuf,
}

/// Hunspell file stem for a language tag: `en-us` becomes `en_US`.
pub fn dictionary_tag(language: &str) -> String {
    let mut parts = language.split(['-', '_']);
    let mut tag = parts.next().unwrap_or("").to_lowercase();
    for part in parts {
        tag.push('_');
        if part.len() == 2 {
            tag.push_str(&part.to_uppercase());
        } else {
            tag.push_str(part);
        }
    }
    tag
}

/// Look up the dictionary for `language`.
///
/// Tries the full tag, then the tag with trailing subtags removed, in
/// every directory. If only the primary language is left, the first
/// regional variant in sorted order is taken (`en` may find `en_GB`).
pub fn find_dictionary(dirs: &[PathBuf], language: &str) -> Option<DictionaryFiles> {
    let tag = dictionary_tag(language);
    let mut candidates = vec![tag.clone()];
    let mut rest = tag.as_str();
    while let Some(cut) = rest.rfind('_') {
        rest = &rest[..cut];
        candidates.push(rest.to_string());
    }

    for candidate in &candidates {
        for dir in dirs {
            if let Some(found) = pair_in(dir, candidate) {
                debug!(tag = %candidate, dir = %dir.display(), "found dictionary");
                return Some(found);
            }
        }
    }

    let primary = candidates.last()?;
    let prefix = format!("{primary}_");
    for dir in dirs {
        let variant = installed_tags(dir)
            .into_iter()
            .find(|tag| tag.starts_with(&prefix));
        if let Some(variant) = variant {
            debug!(tag = %variant, dir = %dir.display(), "found regional dictionary");
            return pair_in(dir, &variant);
        }
    }
    None
}

/// Every dictionary tag installed in `dirs`, sorted and deduplicated.
pub fn list_languages(dirs: &[PathBuf]) -> Vec<String> {
    let mut tags: Vec<String> = dirs.iter().flat_map(|dir| installed_tags(dir)).collect();
    tags.sort();
    tags.dedup();
    tags
}

fn pair_in(dir: &Path, tag: &str) -> Option<DictionaryFiles> {
    let aff = dir.join(format!("{tag}.aff"));
    let dic = dir.join(format!("{tag}.dic"));
    (aff.is_file() && dic.is_file()).then(|| DictionaryFiles {
        tag: tag.to_string(),
        aff,
        dic,
    })
}

/// Sorted stems of `.aff` files in `dir` that have a matching `.dic`.
fn installed_tags(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "cannot list dictionary directory");
            return Vec::new();
        }
    };
    let mut tags: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension()? != "aff" {
                return None;
            }
            let stem = path.file_stem()?.to_str()?;
            dir.join(format!("{stem}.dic"))
                .is_file()
                .then(|| stem.to_string())
        })
        .collect();
    tags.sort();
    tags
}
