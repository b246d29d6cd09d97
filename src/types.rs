/// Core domain types for repolink markers, repositories, and resolutions.
use std::ops::Range;

use serde::Serialize;

/// A placeholder link parsed from documentation text by the scanner.
/// Shape: `[path]()`, `[path:start]()`, or `[path:start-end]()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMarker {
    /// Everything between the brackets, reproduced verbatim as the link label.
    pub label: String,
    /// Line numbers as written. Zero or unrepresentable values are absent.
    pub lines: LineRange,
    /// Path text as authored: case and separators preserved.
    pub raw_path: String,
    /// Byte range of the whole marker (brackets and empty parens) in the source text.
    pub span: Range<usize>,
}

/// An optional 1-based line range attached to a marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineRange {
    /// Last line of the range, when given.
    pub end: Option<u64>,
    /// First line of the range, when given.
    pub start: Option<u64>,
}

impl LineRange {
    /// Build a range, dropping zero values.
    pub fn new(start: Option<u64>, end: Option<u64>) -> Self {
        return Self {
            start: start.filter(|n| return *n > 0),
            end: end.filter(|n| return *n > 0),
        };
    }

    /// Normalize so the end never precedes the start.
    /// With both present the end becomes `max(start, end)`; a lone end is kept as-is.
    pub fn normalized(self) -> Self {
        let start = self.start.filter(|n| return *n > 0);
        let end = match (start, self.end) {
            (Some(s), Some(e)) => Some(s.max(e)),
            (None, Some(e)) => Some(e),
            (_, None) => None,
        };
        return Self { end, start };
    }
}

/// Which cascade stage produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    /// Final path segment matched.
    Basename,
    /// Normalized candidate equals a known path.
    Exact,
    /// Known path ends with `/` + candidate.
    Suffix,
    /// No known paths were supplied, so the candidate passed through.
    Unfiltered,
}

impl MatchTier {
    /// What the tier compared, for messages: "path", "path suffix", or "file name".
    pub fn describe(self) -> &'static str {
        return match self {
            MatchTier::Basename => "file name",
            MatchTier::Exact | MatchTier::Unfiltered => "path",
            MatchTier::Suffix => "path suffix",
        };
    }
}

/// Source-hosting provider families with distinct deep-link syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Provider {
    /// Azure DevOps Services or Server: query-string file links.
    AzureDevOps,
    /// Anything unrecognized: `{base}/{path}`, no line anchor.
    Generic,
    /// `{base}/blob/{branch}/{path}#L1-L2`.
    GitHub,
    /// `{base}/-/blob/{branch}/{path}#L1-2`.
    GitLab,
}

/// Repository metadata needed to build links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoInfo {
    /// Explicit provider tag as configured, e.g. `"github"`. Takes precedence over URL sniffing.
    pub provider_tag: Option<String>,
    /// Base web URL of the repository. Without it nothing can be linked.
    pub repo_url: Option<String>,
}

impl RepoInfo {
    /// Repository info with a base URL and an optional explicit provider tag.
    pub fn new(repo_url: impl Into<String>, provider_tag: Option<&str>) -> Self {
        return Self {
            provider_tag: provider_tag.map(String::from),
            repo_url: Some(repo_url.into()),
        };
    }
}

/// Detailed outcome of resolving one candidate path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// More than one known path matched at `tier` and the preferred set did not narrow it to one.
    Ambiguous {
        /// Sorted, deduplicated matches at the deciding tier.
        candidates: Vec<String>,
        /// Tier that found the matches.
        tier: MatchTier,
    },
    /// The candidate was empty after normalization.
    EmptyCandidate,
    /// No tier found any match.
    NotFound,
    /// Exactly one known path was selected.
    Resolved {
        /// Normalized repository-relative path.
        path: String,
        /// Tier that selected it.
        tier: MatchTier,
    },
}

impl Resolution {
    /// Collapse to the resolved path, or `None` for every failure mode.
    pub fn into_path(self) -> Option<String> {
        return match self {
            Resolution::Resolved { path, .. } => Some(path),
            Resolution::Ambiguous { .. } | Resolution::EmptyCandidate | Resolution::NotFound => None,
        };
    }
}
