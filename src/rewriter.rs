use regex::Captures;

use crate::provider;
use crate::resolver;
use crate::scanner::{MARKER_PATTERN, parse_marker_capture};
use crate::types::{LineRange, RepoInfo};

/// Branch used when the caller passes an empty one.
pub const FALLBACK_BRANCH: &str = "main";

/// Counts from one rewrite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Markers recognized in the input.
    pub found: usize,
    /// Markers replaced with a link.
    pub rewritten: usize,
    /// Markers left as-is: unresolved path or no URL.
    pub untouched: usize,
}

/// Replace every resolvable `[path:start-end]()` marker in `text` with a deep link.
///
/// Empty text or missing repository info returns the input unchanged. A marker
/// whose path does not resolve to exactly one known file, or for which no URL
/// can be built, is left exactly as written.
pub fn rewrite(
    text: &str,
    repo: Option<&RepoInfo>,
    known: &[String],
    default_branch: &str,
    preferred: &[String],
) -> String {
    return rewrite_report(text, repo, known, default_branch, preferred).0;
}

/// [`rewrite`], also returning how many markers were found and replaced.
pub fn rewrite_report(
    text: &str,
    repo: Option<&RepoInfo>,
    known: &[String],
    default_branch: &str,
    preferred: &[String],
) -> (String, RewriteStats) {
    let Some(repo) = repo else {
        return (text.to_string(), RewriteStats::default());
    };

    let branch = effective_branch(default_branch);

    return rewrite_with(text, known, preferred, |path, lines| {
        return provider::format_url(repo, path, lines, branch);
    });
}

/// Rewrite markers using any URL formatter.
///
/// `format` receives the resolved path and the normalized line range and
/// returns the destination URL, or `None` to leave the marker untouched.
/// Replacements are written to a fresh buffer, so substituted text is never rescanned.
pub fn rewrite_with<F>(
    text: &str,
    known: &[String],
    preferred: &[String],
    mut format: F,
) -> (String, RewriteStats)
where
    F: FnMut(&str, LineRange) -> Option<String>,
{
    let mut stats = RewriteStats::default();
    if text.is_empty() {
        return (String::new(), stats);
    }

    let output = MARKER_PATTERN.replace_all(text, |cap: &Captures<'_>| {
        let original = cap.get(0).map(|m| return m.as_str()).unwrap_or_default();
        stats.found = stats.found.saturating_add(1);

        match link_for_marker(cap, known, preferred, &mut format) {
            Some(replacement) => {
                stats.rewritten = stats.rewritten.saturating_add(1);
                return replacement;
            },
            None => {
                stats.untouched = stats.untouched.saturating_add(1);
                return original.to_string();
            },
        }
    });

    return (output.into_owned(), stats);
}

/// The trimmed branch, or [`FALLBACK_BRANCH`] when blank.
pub(crate) fn effective_branch(branch: &str) -> &str {
    let trimmed = branch.trim();
    if trimmed.is_empty() {
        return FALLBACK_BRANCH;
    }
    return trimmed;
}

/// Build `[label](url)` for one marker, or `None` to keep it verbatim.
fn link_for_marker<F>(
    cap: &Captures<'_>,
    known: &[String],
    preferred: &[String],
    format: &mut F,
) -> Option<String>
where
    F: FnMut(&str, LineRange) -> Option<String>,
{
    let marker = parse_marker_capture(cap)?;

    let Some(path) = resolver::resolve(marker.raw_path.trim(), known, preferred) else {
        tracing::debug!(marker = %marker.label, "unresolved path, leaving marker");
        return None;
    };

    let Some(url) = format(&path, marker.lines.normalized()) else {
        tracing::debug!(marker = %marker.label, %path, "no url for resolved path, leaving marker");
        return None;
    };

    return Some(format!("[{}]({url})", marker.label));
}
