//! Hosting-provider detection and deep-link formatting.

use std::fmt::Write as _;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::types::{LineRange, Provider, RepoInfo};

/// Characters left unescaped in Azure DevOps `path=` values: unreserved plus `/`.
pub(crate) const AZURE_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Pick the provider for a repository. An explicit, recognized tag wins;
/// otherwise the base URL's host is sniffed; otherwise `Generic`.
pub fn detect_provider(repo: &RepoInfo) -> Provider {
    if let Some(provider) = repo.provider_tag.as_deref().and_then(provider_from_tag) {
        return provider;
    }

    let url = repo.repo_url.as_deref().unwrap_or_default().to_lowercase();
    if url.contains("github.com") {
        return Provider::GitHub;
    }
    if url.contains("gitlab.com") {
        return Provider::GitLab;
    }
    if crate::azure::is_azure_url(&url) {
        return Provider::AzureDevOps;
    }
    return Provider::Generic;
}

/// Map a configured provider tag to a provider. Unknown tags yield `None`.
pub fn provider_from_tag(tag: &str) -> Option<Provider> {
    return match tag.trim().to_lowercase().as_str() {
        "ado" | "azure" | "azure-devops" | "azuredevops" => Some(Provider::AzureDevOps),
        "github" => Some(Provider::GitHub),
        "gitlab" => Some(Provider::GitLab),
        _ => None,
    };
}

/// Build a deep link to `path` at `branch`, with a line anchor when `lines.start` is set.
///
/// Returns `None` when the repository has no base URL.
pub fn format_url(repo: &RepoInfo, path: &str, lines: LineRange, branch: &str) -> Option<String> {
    let base = repo.repo_url.as_deref()?.trim().trim_end_matches('/');
    if base.is_empty() {
        return None;
    }

    let url = match detect_provider(repo) {
        Provider::AzureDevOps => azure_url(base, path, lines, branch),
        Provider::Generic => format!("{base}/{path}"),
        Provider::GitHub => {
            let mut url = format!("{base}/blob/{branch}/{path}");
            if let Some(start) = lines.start {
                let _ = write!(url, "#L{start}");
                if let Some(end) = lines.end {
                    let _ = write!(url, "-L{end}");
                }
            }
            url
        },
        Provider::GitLab => {
            let mut url = format!("{base}/-/blob/{branch}/{path}");
            if let Some(start) = lines.start {
                let _ = write!(url, "#L{start}");
                if let Some(end) = lines.end {
                    let _ = write!(url, "-{end}");
                }
            }
            url
        },
    };

    return Some(url);
}

/// Azure DevOps has no single-line anchor, so a lone start line becomes a one-line range.
fn azure_url(base: &str, path: &str, lines: LineRange, branch: &str) -> String {
    let mut url = format!("{base}?path={}&version=GB{branch}", encode_absolute_path(path));
    if let Some(start) = lines.start {
        let end = lines.end.unwrap_or(start);
        let _ = write!(url, "&line={start}&lineStartColumn=1&lineEnd={end}&lineEndColumn=1");
    }
    return url;
}

/// Prefix with `/` when missing, then percent-encode keeping `/`.
pub(crate) fn encode_absolute_path(path: &str) -> String {
    let absolute = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    return utf8_percent_encode(&absolute, AZURE_PATH).to_string();
}
