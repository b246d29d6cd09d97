//! CLI commands for repolink: rewrite, check, resolve, url, chunk, azure.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;

use crate::azure::{self, AzureRepo};
use crate::chunker::LineChunker;
use crate::config::{Config, Overrides};
use crate::error;
use crate::index;
use crate::provider;
use crate::resolver;
use crate::rewriter::{self, RewriteStats};
use crate::scanner;
use crate::types::{LineRange, Resolution};

/// Settings shared by every command: where the checkout lives and how it is configured.
pub struct Context {
    /// Config after command-line overrides.
    pub config: Config,
    /// Newline-separated file list used instead of walking `root`.
    pub file_list: Option<PathBuf>,
    /// Checkout root that known files are indexed from.
    pub root: PathBuf,
}

impl Context {
    /// The known-path universe: the explicit file list when given, else a walk of the root.
    ///
    /// # Errors
    ///
    /// Returns errors from reading the file list or walking the root.
    fn known_files(&self) -> Result<Vec<String>, error::Error> {
        if let Some(list) = &self.file_list {
            return index::read_file_list(list);
        }
        return index::collect_known_files(&self.root, &self.config);
    }

    /// Load configuration from `config_path`, or from `.repolink.toml` under `root`.
    ///
    /// # Errors
    ///
    /// Returns errors from config loading.
    pub fn load(
        root: PathBuf,
        config_path: Option<&Path>,
        file_list: Option<PathBuf>,
        overrides: Overrides,
    ) -> Result<Self, error::Error> {
        let config = match config_path {
            Some(path) => Config::load_file(path)?,
            None => Config::load(&root)?,
        };
        return Ok(Self {
            config: config.apply(overrides),
            file_list,
            root,
        });
    }
}

/// JSON shape for the `azure` command: parsed fields plus the cache slug.
#[derive(Serialize)]
struct AzureSummary<'a> {
    /// Web URL for `--file`, when given.
    #[serde(skip_serializing_if = "Option::is_none")]
    file_url: Option<String>,
    /// Parsed URL components.
    #[serde(flatten)]
    repo: &'a AzureRepo,
    /// Filesystem-safe identifier from [`AzureRepo::slug`].
    slug: String,
}

/// Parse an Azure DevOps repository URL and print its components. With
/// `file`, also print the web URL for viewing that file at `branch`.
///
/// # Errors
///
/// Returns `Error::InvalidRepoUrl` if the URL is not an Azure DevOps repository,
/// or `Error::Json` if JSON output fails.
pub fn azure(url: &str, file: Option<&str>, branch: &str, json: bool) -> Result<(), error::Error> {
    let repo = azure::parse_repo_url(url).ok_or_else(|| {
        return error::Error::InvalidRepoUrl { url: url.to_string() };
    })?;
    let slug = repo.slug();
    let branch = rewriter::effective_branch(branch);
    let file_url = file.map(|path| return azure::file_url(url, &resolver::normalize_path(path), branch));

    if json {
        let summary = AzureSummary { file_url, repo: &repo, slug };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("host:         {}", repo.host);
    println!("organization: {}", repo.organization);
    println!("project:      {}", repo.project);
    println!("repository:   {}", repo.repository);
    println!("api_base:     {}", repo.api_base);
    println!("server:       {}", repo.is_server);
    println!("slug:         {slug}");
    if let Some(link) = file_url {
        println!("file_url:     {link}");
    }
    return Ok(());
}

/// Report every marker that would be left untouched, as `file:line: [label]() reason`.
/// Exits non-zero when any marker fails to resolve.
///
/// # Errors
///
/// Returns errors from indexing or reading documents.
pub fn check(ctx: &Context, files: &[PathBuf]) -> Result<ExitCode, error::Error> {
    let known = ctx.known_files()?;
    let mut total = 0_usize;
    let mut unresolved = 0_usize;

    for file in files {
        let text = read_input(file)?;
        for marker in scanner::find_markers(&text) {
            total = total.saturating_add(1);
            let resolution = resolver::resolve_detailed(marker.raw_path.trim(), &known, &ctx.config.preferred);
            let Some(reason) = unresolved_reason(&resolution) else {
                continue;
            };
            unresolved = unresolved.saturating_add(1);
            println!(
                "{}:{}: [{}]() {reason}",
                file.display(),
                line_of(&text, marker.span.start),
                marker.label
            );
        }
    }

    if unresolved > 0 {
        println!("{unresolved} of {total} markers unresolved");
        return Ok(ExitCode::FAILURE);
    }
    println!("All {total} markers resolve");
    return Ok(ExitCode::SUCCESS);
}

/// Split a file into line-range chunks and print them as JSON.
///
/// # Errors
///
/// Returns `Error::InvalidChunking` for bad sizes, `Error::FileNotFound`
/// if the file is missing, or `Error::Json` on serialization failure.
pub fn chunk(file: &Path, size: usize, overlap: usize) -> Result<(), error::Error> {
    let chunker = LineChunker::new(size, overlap)?;
    let text = read_input(file)?;
    let label = file.to_string_lossy().replace('\\', "/");
    let chunks = chunker.split(&text, Some(&label));
    println!("{}", serde_json::to_string_pretty(&chunks)?);
    return Ok(());
}

/// 1-based line number of a byte offset in `text`.
fn line_of(text: &str, offset: usize) -> usize {
    let before = text.get(..offset).unwrap_or(text);
    return before.matches('\n').count().saturating_add(1);
}

/// Print a summary of a rewrite run to stderr.
fn print_rewrite_summary(files: usize, totals: RewriteStats) {
    eprintln!(
        "Linked {} of {} markers in {files} file(s), {} left unchanged",
        totals.rewritten, totals.found, totals.untouched
    );
    return;
}

/// Read an input document, mapping a missing file to `Error::FileNotFound`.
///
/// # Errors
///
/// Returns `Error::FileNotFound` or `Error::Io`.
fn read_input(path: &Path) -> Result<String, error::Error> {
    return match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(error::Error::FileNotFound { path: path.to_path_buf() })
        },
        Err(e) => Err(error::Error::Io(e)),
    };
}

/// Resolve one candidate path against the known files and print the result.
/// Exits non-zero when the path is ambiguous or unknown.
///
/// # Errors
///
/// Returns `Error::AmbiguousPath` or `Error::PathNotFound` in plain mode,
/// or errors from indexing and JSON output.
pub fn resolve(ctx: &Context, candidate: &str, json: bool) -> Result<ExitCode, error::Error> {
    let known = ctx.known_files()?;
    let resolution = resolver::resolve_detailed(candidate, &known, &ctx.config.preferred);

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        let code = if matches!(resolution, Resolution::Resolved { .. }) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
        return Ok(code);
    }

    return match resolution {
        Resolution::Resolved { path, .. } => {
            println!("{path}");
            Ok(ExitCode::SUCCESS)
        },
        Resolution::Ambiguous { candidates, tier } => Err(error::Error::AmbiguousPath {
            candidates,
            path: candidate.to_string(),
            tier,
        }),
        Resolution::EmptyCandidate | Resolution::NotFound => Err(error::Error::PathNotFound {
            path: candidate.to_string(),
        }),
    };
}

/// Rewrite link markers in each document. Prints results to stdout unless
/// `in_place`, in which case changed files are written back.
///
/// # Errors
///
/// Returns errors from indexing or reading/writing documents.
pub fn rewrite(ctx: &Context, files: &[PathBuf], in_place: bool) -> Result<(), error::Error> {
    let known = ctx.known_files()?;
    let repo = ctx.config.repo_info();
    if repo.is_none() {
        tracing::warn!("no repository url configured, markers will be left as-is");
    }

    let mut totals = RewriteStats::default();
    for file in files {
        let text = read_input(file)?;
        let (output, stats) = rewriter::rewrite_report(
            &text,
            repo.as_ref(),
            &known,
            &ctx.config.branch,
            &ctx.config.preferred,
        );
        tracing::debug!(file = %file.display(), ?stats, "rewrote document");

        totals.found = totals.found.saturating_add(stats.found);
        totals.rewritten = totals.rewritten.saturating_add(stats.rewritten);
        totals.untouched = totals.untouched.saturating_add(stats.untouched);

        if !in_place {
            print!("{output}");
        } else if output != text {
            std::fs::write(file, output)?;
        }
    }

    print_rewrite_summary(files.len(), totals);
    return Ok(());
}

/// Why a resolution leaves its marker untouched, or `None` when it resolved.
fn unresolved_reason(resolution: &Resolution) -> Option<String> {
    return match resolution {
        Resolution::Ambiguous { candidates, tier } => {
            Some(format!("ambiguous by {}: {}", tier.describe(), candidates.join(", ")))
        },
        Resolution::EmptyCandidate => Some("empty path".to_string()),
        Resolution::NotFound => Some("not found".to_string()),
        Resolution::Resolved { .. } => None,
    };
}

/// Print the deep link for an already-resolved repository path.
///
/// # Errors
///
/// Returns `Error::MissingRepoUrl` if no repository URL is configured.
pub fn url(ctx: &Context, path: &str, start: Option<u64>, end: Option<u64>) -> Result<(), error::Error> {
    let repo = ctx.config.repo_info().ok_or(error::Error::MissingRepoUrl)?;
    let lines = LineRange::new(start, end).normalized();
    let normalized = resolver::normalize_path(path);

    let link = provider::format_url(&repo, &normalized, lines, &ctx.config.branch)
        .ok_or(error::Error::MissingRepoUrl)?;
    println!("{link}");
    return Ok(());
}
