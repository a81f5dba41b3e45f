//! Position index: byte offset <-> (line, column) translation.
//!
//! All coordinates are 0-based. The column is a **byte** offset within its
//! line, not a count of characters or UTF-16 code units. Callers speaking an
//! editor protocol that wants another encoding convert on their side.

use crate::range::TextRange;
use serde::{Deserialize, Serialize};

/// A position in a source file (0-indexed line and byte column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed byte offset from the start of the line
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// A range in a source file expressed in line/column positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub start: Position,
    pub end: Position,
}

/// Starting offsets of every line of a file.
///
/// The sequence is never empty (the first entry is always 0) and is strictly
/// increasing. Queries are binary searches, so a one-line file needs no
/// special handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl Default for LineMap {
    fn default() -> Self {
        LineMap {
            line_starts: vec![0],
        }
    }
}

impl LineMap {
    /// Build a line map from source text.
    ///
    /// `\n`, `\v` and `\f` terminate a line; a `\r\n` pair is one terminator.
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for i in memchr::memchr3_iter(b'\n', 0x0b, 0x0c, source.as_bytes()) {
            line_starts.push((i + 1) as u32);
        }
        LineMap { line_starts }
    }

    /// Wrap line starts collected elsewhere (e.g. by the scanner).
    pub fn from_line_starts(mut line_starts: Vec<u32>) -> Self {
        if line_starts.first() != Some(&0) {
            line_starts.insert(0, 0);
        }
        debug_assert!(
            line_starts.windows(2).all(|w| w[0] < w[1]),
            "line starts must be strictly increasing"
        );
        LineMap { line_starts }
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Starting offset of a line.
    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.line_starts.get(line as usize).copied()
    }

    /// Line containing `offset`. Offsets past the last line start belong to
    /// the last line.
    pub fn line_of(&self, offset: u32) -> u32 {
        // upper bound: first start strictly greater than offset
        let upper = self.line_starts.partition_point(|&start| start <= offset);
        upper.saturating_sub(1) as u32
    }

    /// Convert a byte offset to a `Position`.
    pub fn translate(&self, offset: u32) -> Position {
        let line = self.line_of(offset);
        let start = self.line_starts[line as usize];
        Position {
            line,
            column: offset - start,
        }
    }

    /// Convert a `Position` back to a byte offset. `None` for a line past the
    /// end of the map.
    pub fn offset_of(&self, position: Position) -> Option<u32> {
        let start = self.line_start(position.line)?;
        start.checked_add(position.column)
    }

    /// Byte range of a line, terminator excluded. The last line is open-ended
    /// (`end == u32::MAX`).
    pub fn range_of(&self, line: u32) -> Option<TextRange> {
        let begin = self.line_start(line)?;
        let end = match self.line_start(line + 1) {
            Some(next) => next - 1,
            None => u32::MAX,
        };
        Some(TextRange::new(begin, end))
    }

    /// Translate both ends of a byte range.
    pub fn location(&self, file: &str, range: TextRange) -> Location {
        Location {
            file: file.to_string(),
            start: self.translate(range.begin),
            end: self.translate(range.end),
        }
    }

    pub fn line_starts(&self) -> &[u32] {
        &self.line_starts
    }
}

#[cfg(test)]
#[path = "tests/position_tests.rs"]
mod position_tests;
