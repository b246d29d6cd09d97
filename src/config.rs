use std::path::Path;

use crate::error::Error;
use crate::rewriter::FALLBACK_BRANCH;
use crate::types::RepoInfo;

/// Name of the project config file at the working root.
pub const CONFIG_FILE: &str = ".repolink.toml";

/// Project configuration loaded from `.repolink.toml`.
/// Include/exclude patterns are path prefixes applied when indexing known files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Branch that links point at.
    pub branch: String,
    /// Path prefixes never indexed, checked after `include`.
    exclude: Vec<String>,
    /// Path prefixes to index. Empty means everything.
    include: Vec<String>,
    /// Canonical paths that win ties between equally good matches.
    pub preferred: Vec<String>,
    /// Explicit provider tag, e.g. `github`.
    pub provider: Option<String>,
    /// Base web URL of the repository.
    pub repo_url: Option<String>,
}

/// Raw TOML structure for `.repolink.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RepolinkTomlConfig {
    /// Branch name; blank falls back to `main`.
    #[serde(default)]
    branch: Option<String>,
    /// Prefixes to skip when indexing.
    #[serde(default)]
    exclude: Vec<String>,
    /// Prefixes to index.
    #[serde(default)]
    include: Vec<String>,
    /// Tie-breakers for ambiguous matches.
    #[serde(default)]
    preferred: Vec<String>,
    /// Provider tag.
    #[serde(default)]
    provider: Option<String>,
    /// Base web URL.
    #[serde(default)]
    repo_url: Option<String>,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--branch`
    pub branch: Option<String>,
    /// `--provider`
    pub provider: Option<String>,
    /// `--repo-url`
    pub repo_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            branch: FALLBACK_BRANCH.to_string(),
            exclude: Vec::new(),
            include: Vec::new(),
            preferred: Vec::new(),
            provider: None,
            repo_url: None,
        };
    }
}

impl Config {
    /// Apply command-line overrides on top of file values.
    /// A blank branch override is ignored, like a blank `branch` key.
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(branch) = non_blank(overrides.branch) {
            self.branch = branch;
        }
        if overrides.provider.is_some() {
            self.provider = overrides.provider;
        }
        if overrides.repo_url.is_some() {
            self.repo_url = overrides.repo_url;
        }
        return self;
    }

    /// Load config from `.repolink.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist. A file that exists but is
    /// malformed is an error; it never silently falls back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };
        return Self::parse(&content);
    }

    /// Load config from an explicit path, which must exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigNotFound` if the file is missing,
    /// `Error::Io` for other read failures, or `Error::TomlDe` if malformed.
    pub fn load_file(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
        };
        return Self::parse(&content);
    }

    /// Parse config from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: RepolinkTomlConfig = toml::from_str(content)?;
        let branch = non_blank(raw.branch).unwrap_or_else(|| return FALLBACK_BRANCH.to_string());

        return Ok(Self {
            branch,
            exclude: raw.exclude,
            include: raw.include,
            preferred: raw.preferred,
            provider: raw.provider,
            repo_url: raw.repo_url,
        });
    }

    /// Repository info for link formatting, or `None` when no URL is configured.
    pub fn repo_info(&self) -> Option<RepoInfo> {
        let url = self.repo_url.as_deref()?;
        return Some(RepoInfo::new(url, self.provider.as_deref()));
    }

    /// Check whether a repository-relative file should be indexed as a known path.
    ///
    /// A path is included if no include patterns are set (index everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_index(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}

/// Trimmed value, or `None` when absent or whitespace only.
fn non_blank(value: Option<String>) -> Option<String> {
    return value
        .map(|v| return v.trim().to_string())
        .filter(|v| return !v.is_empty());
}
