//! Line-aware chunking into overlapping windows of whole lines.
//!
//! Each chunk carries the 1-based inclusive line range it covers; these ranges
//! are what generated documentation cites as `path:start-end`.

use serde::Serialize;

use crate::error::Error;

/// Bumped whenever chunk boundaries change for the same input.
pub const SPLITTER_VERSION: u32 = 2;

/// Default window size in lines.
pub const DEFAULT_CHUNK_SIZE: usize = 120;

/// Default overlap between consecutive windows, in lines.
pub const DEFAULT_CHUNK_OVERLAP: usize = 30;

/// One window of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Zero-based position of this chunk within its document.
    pub chunk_index: usize,
    /// Last line covered, 1-based inclusive.
    pub end_line: usize,
    /// Source file the text came from, when known.
    pub file_path: Option<String>,
    /// Version of the splitting rules that produced this chunk.
    pub splitter_version: u32,
    /// First line covered, 1-based inclusive.
    pub start_line: usize,
    /// The lines themselves, terminators included.
    pub text: String,
}

/// Splits text into fixed-size line windows.
#[derive(Debug, Clone, Copy)]
pub struct LineChunker {
    /// Lines shared by consecutive windows. Always less than `chunk_size`.
    chunk_overlap: usize,
    /// Lines per window. Never zero.
    chunk_size: usize,
}

impl LineChunker {
    /// Create a chunker. Both values count lines.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidChunking` if `chunk_size` is zero or
    /// `chunk_overlap` is not smaller than `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, Error> {
        if chunk_size == 0 {
            return Err(Error::InvalidChunking {
                reason: "chunk_size must be > 0".to_string(),
            });
        }
        if chunk_overlap >= chunk_size {
            return Err(Error::InvalidChunking {
                reason: format!("chunk_overlap ({chunk_overlap}) must be < chunk_size ({chunk_size})"),
            });
        }
        return Ok(Self { chunk_overlap, chunk_size });
    }

    /// Split `text` into windows. Empty text yields no chunks.
    pub fn split(&self, text: &str, file_path: Option<&str>) -> Vec<Chunk> {
        let lines = split_lines_keep_ends(text);
        // Guaranteed non-zero by `new`.
        let step = self.chunk_size.saturating_sub(self.chunk_overlap).max(1);

        let mut chunks = Vec::new();
        let mut start = 0_usize;
        while start < lines.len() {
            let end = start.saturating_add(self.chunk_size).min(lines.len());
            let text = lines.get(start..end).unwrap_or_default().concat();

            chunks.push(Chunk {
                chunk_index: chunks.len(),
                end_line: end,
                file_path: file_path.map(String::from),
                splitter_version: SPLITTER_VERSION,
                start_line: start.saturating_add(1),
                text,
            });

            start = start.saturating_add(step);
        }

        tracing::debug!(file = ?file_path, lines = lines.len(), chunks = chunks.len(), "split text");
        return chunks;
    }
}

/// Split after each line terminator, keeping it: `\n`, `\r\n`, or a lone `\r`.
/// Other Unicode separators (form feed, `U+2028`, ...) stay inside their line.
fn split_lines_keep_ends(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut line_start = 0_usize;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let ends_line = match c {
            '\n' => true,
            '\r' => chars.peek().is_none_or(|&(_, next)| return next != '\n'),
            _ => false,
        };
        if ends_line {
            let line_end = i.saturating_add(1);
            lines.extend(text.get(line_start..line_end));
            line_start = line_end;
        }
    }

    lines.extend(text.get(line_start..).filter(|rest| return !rest.is_empty()));
    return lines;
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_windows() {
        let text = (1..=10).map(|i| return format!("Line {i}")).collect::<Vec<_>>().join("\n");
        let chunks = LineChunker::new(4, 1).unwrap().split(&text, Some("test.txt"));

        let ranges: Vec<(usize, usize)> = chunks.iter().map(|c| return (c.start_line, c.end_line)).collect();
        assert_eq!(ranges, vec![(1, 4), (4, 7), (7, 10), (10, 10)]);

        assert!(chunks[0].text.contains("Line 1"));
        assert!(chunks[0].text.contains("Line 4"));
        assert!(!chunks[0].text.contains("Line 5"));
        assert!(chunks[1].text.starts_with("Line 4\n"));
        assert_eq!(chunks[3].text, "Line 10");
        assert_eq!(chunks[3].chunk_index, 3);
    }

    #[test]
    fn keeps_file_path_and_version() {
        let chunks = LineChunker::new(2, 0).unwrap().split("L1\nL2", Some("src/main.py"));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].file_path.as_deref(), Some("src/main.py"));
        assert_eq!(chunks[0].splitter_version, 2);
        assert_eq!(chunks[0].text, "L1\nL2");
    }

    #[test]
    fn carriage_returns_end_lines() {
        let chunks = LineChunker::new(1, 0).unwrap().split("a\rb\r\nc\nd", None);
        let texts: Vec<&str> = chunks.iter().map(|c| return c.text.as_str()).collect();
        assert_eq!(texts, vec!["a\r", "b\r\n", "c\n", "d"]);
        assert_eq!(chunks[3].start_line, 4);
    }

    #[test]
    fn trailing_newline_does_not_add_a_line() {
        let chunks = LineChunker::new(10, 0).unwrap().split("x\ny\n", None);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].end_line, 2);
        assert_eq!(chunks[0].text, "x\ny\n");
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(LineChunker::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP).unwrap().split("", None).is_empty());
    }

    #[test]
    fn rejects_invalid_sizes() {
        assert!(LineChunker::new(0, 0).is_err());
        assert!(LineChunker::new(10, 10).is_err());
        assert!(LineChunker::new(10, 9).is_ok());
    }
}
