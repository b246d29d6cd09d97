//! Azure DevOps repository URL parsing.
//!
//! Three URL shapes are recognized:
//! - Services: `https://dev.azure.com/{org}/{project}/_git/{repo}`
//! - Services (legacy): `https://{org}.visualstudio.com/{project}/_git/{repo}`
//! - Server/TFS: `https://{host}/{collection}/{project}/_git/{repo}`

use serde::Serialize;
use url::Url;

use crate::provider::encode_absolute_path;

/// Components of an Azure DevOps repository URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AzureRepo {
    /// REST API root: `{scheme}://{host}/{org}/{project}` (or `/{project}` on visualstudio.com).
    pub api_base: String,
    /// The cleaned input URL, without trailing `/` or `.git`.
    pub clone_url: String,
    /// Lowercased host name.
    pub host: String,
    /// True for self-hosted Server/TFS, false for the hosted service.
    pub is_server: bool,
    /// Organization on Services, collection on Server.
    pub organization: String,
    /// Project name.
    pub project: String,
    /// Repository name.
    pub repository: String,
}

impl AzureRepo {
    /// Filesystem-safe identifier for cache directories: `org_project_repo`,
    /// prefixed with the first host label for hosts other than `dev.azure.com`.
    pub fn slug(&self) -> String {
        let parts = format!(
            "{}_{}_{}",
            sanitize(&self.organization),
            sanitize(&self.project),
            sanitize(&self.repository)
        );
        if self.host == "dev.azure.com" {
            return parts;
        }
        let host_label = self.host.split('.').next().unwrap_or_default();
        return format!("{}_{parts}", sanitize(host_label));
    }
}

/// Quick check for Azure DevOps hosting, by domain or by the `/_git/` path marker.
pub fn is_azure_url(url: &str) -> bool {
    let lowered = url.to_lowercase();
    return lowered.contains("dev.azure.com")
        || lowered.contains("visualstudio.com")
        || lowered.contains("/_git/");
}

/// Parse an Azure DevOps repository URL. Returns `None` when the URL is not
/// an Azure repository or lacks the organization, project, or repository.
pub fn parse_repo_url(repo_url: &str) -> Option<AzureRepo> {
    let cleaned = clean_repo_url(repo_url);
    if cleaned.is_empty() {
        return None;
    }

    let parsed = Url::parse(&cleaned).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| return s.filter(|seg| return !seg.is_empty()).collect())
        .unwrap_or_default();

    let is_services = host == "dev.azure.com" || host.contains("visualstudio.com");
    if !is_services && !segments.contains(&"_git") {
        tracing::debug!(url = %cleaned, "not an Azure DevOps URL");
        return None;
    }

    let git_index = segments.iter().position(|seg| return *seg == "_git")?;
    let repository = (*segments.get(git_index.checked_add(1)?)?).to_string();
    let project = (*segments.get(git_index.checked_sub(1)?)?).to_string();

    let scheme = parsed.scheme();
    let (organization, api_base) = if host.contains("visualstudio.com") {
        let org = host.split('.').next().unwrap_or_default().to_string();
        let api_base = format!("{scheme}://{host}/{project}");
        (org, api_base)
    } else {
        // Organization (Services) or collection (Server) precedes the project.
        if git_index < 2 {
            tracing::debug!(url = %cleaned, "missing organization or collection");
            return None;
        }
        let org = (*segments.first()?).to_string();
        let api_base = format!("{scheme}://{host}/{org}/{project}");
        (org, api_base)
    };

    return Some(AzureRepo {
        api_base,
        clone_url: cleaned,
        host,
        is_server: !is_services,
        organization,
        project,
        repository,
    });
}

/// Web URL for viewing a file on the default Azure DevOps UI:
/// `{api_base}/_git/{repo}?path={path}&version=GB{branch}`.
/// Non-Azure URLs return the path unchanged.
pub fn file_url(repo_url: &str, file_path: &str, branch: &str) -> String {
    let Some(info) = parse_repo_url(repo_url) else {
        return file_path.to_string();
    };
    return format!(
        "{}/_git/{}?path={}&version=GB{branch}",
        info.api_base,
        info.repository,
        encode_absolute_path(file_path)
    );
}

/// Trim whitespace, trailing `/`, and a `.git` suffix.
fn clean_repo_url(repo_url: &str) -> String {
    let trimmed = repo_url.trim().trim_end_matches('/');
    return trimmed.strip_suffix(".git").unwrap_or(trimmed).to_string();
}

/// Replace anything outside `[A-Za-z0-9_-]` with `_`.
fn sanitize(component: &str) -> String {
    return component
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                return c;
            }
            return '_';
        })
        .collect();
}
