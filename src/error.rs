/// Crate-level error types for repolink diagnostics.
use std::path::PathBuf;

use crate::types::MatchTier;

/// Errors surfaced by the CLI and the I/O edges of the library.
/// The core resolver and rewriter never fail; they pass markers through.
/// Each variant names the file, path, or reason for failure.
#[allow(clippy::error_impl_error, reason = "crate-level error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two or more known files matched the path and the preferred set did not settle it.
    #[error("ambiguous path: `{path}` ({tier:?} match), candidates: {}", candidates.join(", "))]
    AmbiguousPath {
        /// Known paths that matched at the deciding tier.
        candidates: Vec<String>,
        /// Candidate path as given.
        path: String,
        /// Tier that produced the matches.
        tier: MatchTier,
    },

    /// A config file named explicitly on the command line does not exist.
    #[error("config not found: {}", path.display())]
    ConfigNotFound {
        /// Path to the missing config file.
        path: PathBuf,
    },

    /// An input file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Chunk size and overlap are inconsistent.
    #[error("invalid chunking: {reason}")]
    InvalidChunking {
        /// Which constraint was violated.
        reason: String,
    },

    /// The repository URL could not be parsed for the requested provider.
    #[error("invalid repository url: `{url}`")]
    InvalidRepoUrl {
        /// URL as given.
        url: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A link was requested but no repository URL is configured.
    #[error("no repository url configured")]
    MissingRepoUrl,

    /// No known file matches the path at any tier.
    #[error("path not found: `{path}`")]
    PathNotFound {
        /// Candidate path as given.
        path: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
