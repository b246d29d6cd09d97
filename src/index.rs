//! Known-file acquisition: the universe of paths that markers may resolve to.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::Error;

/// Walk `root` and return every non-directory entry as a root-relative, `/`-separated path.
/// `.git` directories are skipped and the config's include/exclude prefixes apply.
/// The result is sorted.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if `root` does not exist.
pub fn collect_known_files(root: &Path, config: &Config) -> Result<Vec<String>, Error> {
    if !root.exists() {
        return Err(Error::FileNotFound { path: root.to_path_buf() });
    }

    let mut known: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| return !is_git_dir(e))
        .filter_map(Result::ok)
        .filter(|e| return !e.file_type().is_dir())
        .filter_map(|e| return relative_slash_path(root, e.path()))
        .filter(|p| return config.should_index(p))
        .collect();

    known.sort();
    tracing::debug!(root = %root.display(), count = known.len(), "indexed known files");
    return Ok(known);
}

/// Read a newline-separated file list. Blank lines are skipped, whitespace trimmed.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the list is missing, or `Error::Io` on read failure.
pub fn read_file_list(path: &Path) -> Result<Vec<String>, Error> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::FileNotFound { path: path.to_path_buf() });
        },
        Err(e) => return Err(Error::Io(e)),
    };
    return Ok(parse_file_list(&content));
}

/// One path per line, trimmed; blank lines dropped.
fn parse_file_list(content: &str) -> Vec<String> {
    return content
        .lines()
        .map(str::trim)
        .filter(|l| return !l.is_empty())
        .map(String::from)
        .collect();
}

/// Whether the entry is a `.git` directory, whose contents are never known paths.
fn is_git_dir(entry: &DirEntry) -> bool {
    return entry.file_type().is_dir() && entry.file_name() == ".git";
}

/// `path` relative to `root`, joined with `/` on every platform. `None` for the root itself.
fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| return c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    return Some(parts.join("/"));
}
