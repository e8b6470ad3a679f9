//! Position types for source locations.

/// Byte offset range in a source file.
///
/// Used for text manipulation. Byte offsets are converted to line/column
/// [`LineColumn`]s when presenting to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct OffsetRange {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl OffsetRange {
    /// Create a new offset range.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a zero-width range at a specific offset.
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the length of this range in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if this is a zero-width range.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if the two ranges share at least one byte.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A 1-based line and column, the convention GraphQL tooling uses in error
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineColumn {
    /// Line number (1-based)
    pub line: usize,
    /// Column in bytes from the line start (1-based)
    pub column: usize,
}

impl LineColumn {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for LineColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Line-start table for converting between byte offsets and [`LineColumn`]s.
///
/// Only `\n` terminates a line; a `\r` before it is counted as part of the
/// line's length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Number of lines in the text (a trailing newline opens an empty line).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset of a 1-based line/column.
    ///
    /// This is the sum of the lengths of all prior lines plus one per newline,
    /// plus the 0-based column. Returns `None` when the line does not exist.
    /// Columns past the end of the text are clamped.
    #[must_use]
    pub fn offset(&self, position: LineColumn) -> Option<usize> {
        let line_start = *self.line_starts.get(position.line.checked_sub(1)?)?;
        Some((line_start + position.column.saturating_sub(1)).min(self.len))
    }

    /// 1-based line/column of a byte offset. Offsets past the end are clamped.
    #[must_use]
    pub fn line_column(&self, offset: usize) -> LineColumn {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        LineColumn {
            line: line + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_range() {
        let range = OffsetRange::new(10, 20);
        assert_eq!(range.len(), 10);
        assert!(!range.is_empty());
        assert_eq!(range.to_string(), "10..20");
        assert!(OffsetRange::at(5).is_empty());
    }

    #[test]
    fn test_offset_range_overlaps() {
        let range = OffsetRange::new(10, 20);
        assert!(range.overlaps(&OffsetRange::new(15, 25)));
        assert!(range.overlaps(&OffsetRange::new(0, 11)));
        assert!(!range.overlaps(&OffsetRange::new(20, 30)));
        assert!(!range.overlaps(&OffsetRange::new(0, 10)));
    }

    #[test]
    fn test_line_index_single_line() {
        let index = LineIndex::new("query { a }");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.offset(LineColumn::new(1, 1)), Some(0));
        assert_eq!(index.offset(LineColumn::new(1, 9)), Some(8));
        assert_eq!(index.line_column(8), LineColumn::new(1, 9));
    }

    #[test]
    fn test_line_index_multi_line() {
        let text = "query {\n  films {\n    title\n  }\n}";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 5);

        let title = text.find("title").unwrap();
        let position = index.line_column(title);
        assert_eq!(position, LineColumn::new(3, 5));
        assert_eq!(index.offset(position), Some(title));
    }

    #[test]
    fn test_line_index_missing_line() {
        let index = LineIndex::new("a\nb");
        assert_eq!(index.offset(LineColumn::new(3, 1)), None);
        assert_eq!(index.offset(LineColumn::new(0, 1)), None);
    }

    #[test]
    fn test_line_index_clamps() {
        let index = LineIndex::new("abc");
        assert_eq!(index.offset(LineColumn::new(1, 40)), Some(3));
        assert_eq!(index.line_column(99), LineColumn::new(1, 4));
    }
}
