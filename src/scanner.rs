use std::sync::LazyLock;

use regex::{Captures, Match, Regex};

use crate::types::{LineRange, LinkMarker};

/// `[path]()`, `[path:start]()`, or `[path:start-end]()`.
/// The path stops at `:`, `]`, or a newline. Line numbers are ASCII digits only.
#[allow(clippy::expect_used, reason = "static pattern, checked by tests")]
pub static MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"\[([^:\]\n]+)(?::([0-9]+)(?:-([0-9]+))?)?\]\(\)").expect("valid regex");
});

/// Find every placeholder link marker in `text`, in source order.
pub fn find_markers(text: &str) -> Vec<LinkMarker> {
    return MARKER_PATTERN
        .captures_iter(text)
        .filter_map(|cap| return parse_marker_capture(&cap))
        .collect();
}

/// Turn one regex capture into a marker. Zero or unrepresentable line numbers become absent.
pub(crate) fn parse_marker_capture(cap: &Captures<'_>) -> Option<LinkMarker> {
    let whole = cap.get(0)?;
    let path = cap.get(1)?;

    let start = cap.get(2).and_then(parse_line_number);
    let end = cap.get(3).and_then(parse_line_number);

    let label = whole.as_str().strip_prefix('[')?.strip_suffix("]()")?.to_string();

    return Some(LinkMarker {
        label,
        lines: LineRange::new(start, end),
        raw_path: path.as_str().to_string(),
        span: whole.range(),
    });
}

/// Digit run to line number; `None` past `u64::MAX`.
fn parse_line_number(digits: Match<'_>) -> Option<u64> {
    let parsed = digits.as_str().parse::<u64>();
    if parsed.is_err() {
        tracing::debug!(digits = digits.as_str(), "line number out of range, treating as absent");
    }
    return parsed.ok();
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_path() {
        let markers = find_markers("See [src/app.ts]() for details.");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].raw_path, "src/app.ts");
        assert_eq!(markers[0].label, "src/app.ts");
        assert_eq!(markers[0].lines, LineRange::default());
        assert_eq!(markers[0].span, 4..18);
    }

    #[test]
    fn parses_line_and_range() {
        let markers = find_markers("[a.rs:12]() and [b\\c.rs:3-9]()");
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].lines, LineRange { end: None, start: Some(12) });
        assert_eq!(markers[1].raw_path, "b\\c.rs");
        assert_eq!(markers[1].label, "b\\c.rs:3-9");
        assert_eq!(markers[1].lines, LineRange { end: Some(9), start: Some(3) });
    }

    #[test]
    fn zero_lines_are_absent() {
        let markers = find_markers("[a.rs:0-0]() [b.rs:00007]()");
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].lines, LineRange::default());
        assert_eq!(markers[0].label, "a.rs:0-0");
        assert_eq!(markers[1].lines, LineRange { end: None, start: Some(7) });
    }

    #[test]
    fn large_line_numbers_are_kept() {
        let markers = find_markers("[a.rs:99999999999-18446744073709551615]()");
        assert_eq!(
            markers[0].lines,
            LineRange { end: Some(u64::MAX), start: Some(99_999_999_999) }
        );
    }

    #[test]
    fn unrepresentable_line_number_is_absent() {
        let markers = find_markers("[a.rs:3-18446744073709551616]()");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].lines, LineRange { end: None, start: Some(3) });
        assert_eq!(markers[0].label, "a.rs:3-18446744073709551616");
    }

    #[test]
    fn non_ascii_digits_are_not_line_numbers() {
        assert!(find_markers("[a.rs:\u{661}\u{662}]()").is_empty());
        assert!(find_markers("[a.rs:1-\u{661}]()").is_empty());
    }

    #[test]
    fn ignores_links_with_destinations() {
        assert!(find_markers("[a.rs](https://example.com)").is_empty());
        assert!(find_markers("[a.rs] ()").is_empty());
    }

    #[test]
    fn rejects_malformed_line_suffix() {
        assert!(find_markers("[a.rs:x]()").is_empty());
        assert!(find_markers("[a.rs:1-]()").is_empty());
    }

    #[test]
    fn path_cannot_span_lines() {
        assert!(find_markers("[src/\napp.ts]()").is_empty());
    }
}
