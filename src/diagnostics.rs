use std::fmt::Write as _;

use crate::config::CONFIG_FILE;
use crate::error::Error;
use crate::types::MatchTier;

/// ANSI bold, used for markdown headings on a terminal.
const BOLD: &str = "\x1b[1m";
/// ANSI attribute reset.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where possible, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::AmbiguousPath { path, tier, candidates } => render_ambiguous_path(path, *tier, candidates),
        Error::PathNotFound { path } => render_path_not_found(path),
        Error::MissingRepoUrl => render_missing_repo_url(),
        Error::InvalidChunking { reason } => render_invalid_chunking(reason),
        _ => render_generic(e),
    };
}

/// Remaining variants: a heading, the message, and a fix where one is known.
fn render_generic(e: &Error) -> String {
    return match e {
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::ConfigNotFound { path } => format!("\
# Error: Config Not Found

`{}` does not exist.

## Fix

Check the `--config` path, or drop the flag to use `{CONFIG_FILE}` in the current directory.
", path.display()),

        Error::InvalidRepoUrl { url } => format!("\
# Error: Invalid Repository URL

`{url}` is not a recognized Azure DevOps repository URL.

Expected one of:

    https://dev.azure.com/{{org}}/{{project}}/_git/{{repo}}
    https://{{org}}.visualstudio.com/{{project}}/_git/{{repo}}
    https://{{host}}/{{collection}}/{{project}}/_git/{{repo}}
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::Json(e) => format!("\
# Error: JSON

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}

## Fix

Check `{CONFIG_FILE}`. Recognized keys: `repo_url`, `provider`, `branch`,
`preferred`, `include`, `exclude`.
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    };
}

/// Candidates at the deciding tier, plus a `preferred` entry to settle it.
fn render_ambiguous_path(path: &str, tier: MatchTier, candidates: &[String]) -> String {
    let tier_name = tier.describe();

    let mut out = format!("\
# Error: Ambiguous Path

`{path}` matches more than one file by {tier_name}.

## Candidates

");
    for c in candidates {
        let _ = writeln!(out, "- `{c}`");
    }

    out.push_str("\
\n## Fix

Write more of the path, or mark one candidate as canonical in `");
    out.push_str(CONFIG_FILE);
    out.push_str("`:\n\n");
    if let Some(first) = candidates.first() {
        let _ = writeln!(out, "    preferred = [\"{first}\"]");
    }
    return out;
}

/// Bad `--size`/`--overlap` combination.
fn render_invalid_chunking(reason: &str) -> String {
    return format!("\
# Error: Invalid Chunking

{reason}

## Fix

Use an overlap smaller than the chunk size, for example:

    repolink chunk FILE --size 120 --overlap 30
");
}

/// No base URL from config or flags.
fn render_missing_repo_url() -> String {
    return format!("\
# Error: No Repository URL

Links need a base repository URL.

## Fix

Set it in `{CONFIG_FILE}`:

    repo_url = \"https://github.com/owner/repo\"

Or pass `--repo-url` on the command line.
");
}

/// Nothing matched at any tier.
fn render_path_not_found(path: &str) -> String {
    return format!("\
# Error: Path Not Found

No known file matches `{path}` by full path, path suffix, or file name.
");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_lists_candidates_and_fix() {
        let md = render_error(&Error::AmbiguousPath {
            candidates: vec!["x/foo.cs".to_string(), "y/foo.cs".to_string()],
            path: "foo.cs".to_string(),
            tier: MatchTier::Suffix,
        });
        assert!(md.starts_with("# Error: Ambiguous Path"));
        assert!(md.contains("- `x/foo.cs`\n- `y/foo.cs`"));
        assert!(md.contains("preferred = [\"x/foo.cs\"]"));
    }

    #[test]
    fn not_found_names_path() {
        let md = render_error(&Error::PathNotFound { path: "nope.rs".to_string() });
        assert!(md.contains("`nope.rs`"));
    }
}
