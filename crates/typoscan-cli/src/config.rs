// Where rule files and spell checker dictionaries are looked up

use std::path::{Path, PathBuf};

use anyhow::bail;

/// Language used when none is given.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Placeholder language that runs without a spell checker dictionary.
pub const NO_DICTIONARY: &str = "und";

/// Environment variable naming the rule file directory.
pub const DATA_DIR_ENV: &str = "TYPOSCAN_DATA_DIR";

/// Environment variable with Hunspell dictionary directories.
pub const DICPATH_ENV: &str = "DICPATH";

/// Pick the directory holding per-language rule files.
///
/// An explicit directory (flag or environment) must exist. Otherwise the
/// first existing directory of [`data_search_paths`] is used; `None`
/// means no rules are available.
pub fn resolve_data_dir(explicit: Option<&Path>, home: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(dir) = explicit {
        if !dir.is_dir() {
            bail!("data directory {} does not exist", dir.display());
        }
        return Ok(Some(dir.to_path_buf()));
    }
    let found = data_search_paths(home).into_iter().find(|dir| dir.is_dir());
    match &found {
        Some(dir) => tracing::debug!(dir = %dir.display(), "using rule directory"),
        None => tracing::debug!("no rule directory found"),
    }
    Ok(found)
}

/// Built-in rule directories, most specific first.
///
/// 1. `~/.local/share/typoscan/dict`
/// 2. `/usr/local/share/typoscan/dict`
/// 3. `/usr/share/typoscan/dict`
/// 4. `./dict` (for running from a source checkout)
pub fn data_search_paths(home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = home {
        paths.push(home.join(".local/share/typoscan/dict"));
    }
    paths.push(PathBuf::from("/usr/local/share/typoscan/dict"));
    paths.push(PathBuf::from("/usr/share/typoscan/dict"));
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("dict"));
    }
    paths
}

/// Directories searched for Hunspell `.aff`/`.dic` pairs.
///
/// Explicit directories (flag or `DICPATH`) come first, then the usual
/// system locations.
pub fn hunspell_search_paths(explicit: &[PathBuf], home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = explicit.to_vec();
    if let Some(home) = home {
        paths.push(home.join(".local/share/hunspell"));
    }
    paths.push(PathBuf::from("/usr/share/hunspell"));
    paths.push(PathBuf::from("/usr/share/myspell"));
    paths.push(PathBuf::from("/usr/share/myspell/dicts"));
    paths
}

/// The user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}
