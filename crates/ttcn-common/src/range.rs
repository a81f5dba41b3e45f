//! Byte ranges into source text.

use serde::{Deserialize, Serialize};

/// A `{begin, end}` pair of byte offsets into a source file.
///
/// Point containment is inclusive at both ends, so a cursor placed right after
/// the last byte of a token is still considered to be "on" that token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub begin: u32,
    pub end: u32,
}

impl TextRange {
    pub const fn new(begin: u32, end: u32) -> Self {
        debug_assert!(begin <= end);
        TextRange { begin, end }
    }

    /// Empty range positioned at `pos`.
    pub const fn empty(pos: u32) -> Self {
        TextRange {
            begin: pos,
            end: pos,
        }
    }

    pub const fn len(&self) -> u32 {
        self.end - self.begin
    }

    pub const fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// `begin <= pos <= end`.
    pub const fn contains(&self, pos: u32) -> bool {
        self.begin <= pos && pos <= self.end
    }

    /// Whether `other` lies entirely inside `self`. Reflexive and transitive.
    pub const fn contains_range(&self, other: TextRange) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// Smallest range covering both `self` and `other`.
    pub fn cover(&self, other: TextRange) -> TextRange {
        TextRange {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }

    /// Slice `source` by this range, clamping to the buffer end.
    ///
    /// Returns an empty string when the range does not fall on UTF-8 boundaries.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        let len = source.len();
        let begin = (self.begin as usize).min(len);
        let end = (self.end as usize).clamp(begin, len);
        source.get(begin..end).unwrap_or("")
    }
}

impl From<std::ops::Range<u32>> for TextRange {
    fn from(r: std::ops::Range<u32>) -> Self {
        TextRange::new(r.start, r.end)
    }
}

#[cfg(test)]
#[path = "tests/range_tests.rs"]
mod range_tests;
