//! Resolve loosely written file references in generated documentation into
//! canonical source-hosting deep links.
//!
//! The core is two pure functions: [`resolver::resolve`] picks exactly one
//! known file for a candidate path (or none), and [`rewriter::rewrite`]
//! replaces `[path:start-end]()` markers with links built by
//! [`provider::format_url`]. Everything else acquires inputs for them.

pub mod azure;
pub mod chunker;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod index;
pub mod provider;
pub mod resolver;
pub mod rewriter;
pub mod scanner;
pub mod types;

pub use resolver::{normalize_path, resolve, resolve_detailed};
pub use rewriter::{rewrite, rewrite_with};
pub use types::{LineRange, LinkMarker, MatchTier, Provider, RepoInfo, Resolution};
