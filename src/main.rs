use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use repolink::chunker::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use repolink::commands::{self, Context};
use repolink::config::Overrides;
use repolink::diagnostics;
use repolink::error;
use repolink::rewriter::FALLBACK_BRANCH;

/// Command-line entry point.
#[derive(Parser)]
#[command(name = "repolink", about = "Turn file references in docs into source-hosting deep links", version)]
struct Cli {
    /// Command to run.
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by commands that need repository context.
#[derive(clap::Args)]
struct RepoArgs {
    /// Branch that links point at (overrides config).
    #[arg(long)]
    branch: Option<String>,
    /// Config file (defaults to .repolink.toml in --root).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Newline-separated list of known files, instead of walking --root.
    #[arg(long = "files", value_name = "LIST")]
    file_list: Option<PathBuf>,
    /// Provider tag: github, gitlab, azure (overrides config).
    #[arg(long)]
    provider: Option<String>,
    /// Base repository URL (overrides config).
    #[arg(long)]
    repo_url: Option<String>,
    /// Checkout root to index known files from.
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

/// Subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Parse an Azure DevOps repository URL
    Azure {
        /// Branch for the `--file` link.
        #[arg(long, default_value = FALLBACK_BRANCH)]
        branch: String,
        /// Also print the web URL for this repository path.
        #[arg(long)]
        file: Option<String>,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
        /// Repository URL.
        url: String,
    },
    /// List markers that would be left unchanged, with their line numbers
    Check {
        /// Markdown documents to check.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Where known files come from.
        #[command(flatten)]
        repo: RepoArgs,
    },
    /// Split a file into overlapping line-range chunks (JSON)
    Chunk {
        /// File to split.
        file: PathBuf,
        /// Lines of overlap between consecutive chunks.
        #[arg(long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
        overlap: usize,
        /// Lines per chunk.
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        size: usize,
    },
    /// Resolve a file reference against the known files
    Resolve {
        /// Print the full resolution as JSON.
        #[arg(long)]
        json: bool,
        /// Candidate path, e.g. `app.ts` or `src/app.ts`.
        path: String,
        /// Where known files come from.
        #[command(flatten)]
        repo: RepoArgs,
    },
    /// Replace `[path:start-end]()` markers with deep links
    Rewrite {
        /// Markdown documents to rewrite.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Write changes back instead of printing to stdout.
        #[arg(long)]
        in_place: bool,
        /// Repository and known-file settings.
        #[command(flatten)]
        repo: RepoArgs,
    },
    /// Print the deep link for a repository path
    Url {
        /// Last line of the range.
        #[arg(long)]
        end: Option<u64>,
        /// Repository-relative path.
        path: String,
        /// Repository settings.
        #[command(flatten)]
        repo: RepoArgs,
        /// First line of the range.
        #[arg(long)]
        start: Option<u64>,
    },
}

/// Build the command context from shared repository arguments.
///
/// # Errors
///
/// Returns errors from config loading.
fn context(args: RepoArgs) -> Result<Context, error::Error> {
    let overrides = Overrides {
        branch: args.branch,
        provider: args.provider,
        repo_url: args.repo_url,
    };
    return Context::load(args.root, args.config.as_deref(), args.file_list, overrides);
}

/// Install the stderr log subscriber; `REPOLINK_LOG` sets the filter.
fn init_logging() {
    let filter = EnvFilter::try_from_env("REPOLINK_LOG").unwrap_or_else(|_| return EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run one command; errors are rendered as markdown on stderr.
fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Azure { branch, file, json, url } => {
            commands::azure(&url, file.as_deref(), &branch, json).map(|()| return ExitCode::SUCCESS)
        },
        Commands::Check { files, repo } => context(repo).and_then(|ctx| return commands::check(&ctx, &files)),
        Commands::Chunk { file, overlap, size } => {
            commands::chunk(&file, size, overlap).map(|()| return ExitCode::SUCCESS)
        },
        Commands::Resolve { json, path, repo } => {
            context(repo).and_then(|ctx| return commands::resolve(&ctx, &path, json))
        },
        Commands::Rewrite { files, in_place, repo } => context(repo)
            .and_then(|ctx| return commands::rewrite(&ctx, &files, in_place))
            .map(|()| return ExitCode::SUCCESS),
        Commands::Url { end, path, repo, start } => context(repo)
            .and_then(|ctx| return commands::url(&ctx, &path, start, end))
            .map(|()| return ExitCode::SUCCESS),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}
