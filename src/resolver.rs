use std::collections::BTreeSet;

use crate::types::{MatchTier, Resolution};

/// Ordered cascade. The first stage that matches anything decides the outcome.
const STAGES: [(MatchTier, Matcher); 3] = [
    (MatchTier::Exact, match_exact),
    (MatchTier::Suffix, match_suffix),
    (MatchTier::Basename, match_basename),
];

/// Result of a single cascade stage.
enum StageMatch {
    /// More than one known path matched and the preferred set did not settle it.
    Ambiguous(Vec<String>),
    /// Nothing matched; the driver moves on to the next stage.
    None,
    /// Exactly one known path survived.
    Unique(String),
}

/// A cascade stage: given the normalized candidate and normalized known paths, collect raw matches.
type Matcher = fn(&str, &BTreeSet<String>) -> BTreeSet<String>;

/// Convert backslashes to forward slashes and strip one leading `/`.
/// Only comparison copies go through here; labels keep their original text.
pub fn normalize_path(path: &str) -> String {
    let forward = path.replace('\\', "/");
    if let Some(rest) = forward.strip_prefix('/') {
        return rest.to_string();
    }
    return forward;
}

/// Resolve a candidate path to exactly one known path, or `None`.
///
/// See [`resolve_detailed`] for the cascade and the reason a candidate failed.
pub fn resolve(candidate: &str, known: &[String], preferred: &[String]) -> Option<String> {
    return resolve_detailed(candidate, known, preferred).into_path();
}

/// Resolve a candidate path and report which tier decided it.
///
/// Tiers run in order: exact, suffix, basename. A tier with a single match
/// resolves. A tier with several matches is narrowed to the preferred set and
/// resolves only if exactly one remains; otherwise the candidate is ambiguous
/// and later tiers are not consulted. Only a tier with zero matches falls
/// through. With no known paths the normalized candidate is returned unchanged.
pub fn resolve_detailed(candidate: &str, known: &[String], preferred: &[String]) -> Resolution {
    let normalized = normalize_path(candidate);
    if normalized.is_empty() {
        return Resolution::EmptyCandidate;
    }

    if known.is_empty() {
        return Resolution::Resolved {
            path: normalized,
            tier: MatchTier::Unfiltered,
        };
    }

    let known_set: BTreeSet<String> = known.iter().map(|p| return normalize_path(p)).collect();
    let preferred_set: BTreeSet<String> = preferred.iter().map(|p| return normalize_path(p)).collect();

    for (tier, matcher) in STAGES {
        let matches = matcher(&normalized, &known_set);
        tracing::trace!(candidate = %normalized, ?tier, count = matches.len(), "resolution stage");

        match narrow_to_single_match(matches, &preferred_set) {
            StageMatch::None => continue,
            StageMatch::Unique(path) => return Resolution::Resolved { path, tier },
            StageMatch::Ambiguous(candidates) => {
                tracing::debug!(candidate = %normalized, ?tier, ?candidates, "ambiguous path");
                return Resolution::Ambiguous { candidates, tier };
            },
        }
    }

    return Resolution::NotFound;
}

/// Reduce a stage's raw matches to the tri-state outcome, using the preferred set as tie-breaker.
/// The preferred set only narrows; it never contributes a path that did not already match.
fn narrow_to_single_match(matches: BTreeSet<String>, preferred: &BTreeSet<String>) -> StageMatch {
    if matches.len() <= 1 {
        return matches.into_iter().next().map_or(StageMatch::None, StageMatch::Unique);
    }

    let mut narrowed = matches.intersection(preferred);
    if let (Some(only), None) = (narrowed.next(), narrowed.next()) {
        return StageMatch::Unique(only.clone());
    }

    return StageMatch::Ambiguous(matches.into_iter().collect());
}

/// Final `/`-delimited segment of a normalized path.
fn basename(path: &str) -> &str {
    return path.rsplit('/').next().unwrap_or(path);
}

/// Known path equal to the candidate.
fn match_exact(candidate: &str, known: &BTreeSet<String>) -> BTreeSet<String> {
    return known.get(candidate).cloned().into_iter().collect();
}

/// Known paths ending in `/` + candidate, on a segment boundary.
fn match_suffix(candidate: &str, known: &BTreeSet<String>) -> BTreeSet<String> {
    let suffix = format!("/{candidate}");
    return known
        .iter()
        .filter(|path| return path.as_str() == candidate || path.ends_with(&suffix))
        .cloned()
        .collect();
}

/// Known paths whose final segment equals the candidate's.
fn match_basename(candidate: &str, known: &BTreeSet<String>) -> BTreeSet<String> {
    let wanted = basename(candidate);
    if wanted.is_empty() {
        return BTreeSet::new();
    }
    return known
        .iter()
        .filter(|path| return basename(path) == wanted)
        .cloned()
        .collect();
}
