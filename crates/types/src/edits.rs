//! Text edits and the buffer that applies them to a source file.

use crate::OffsetRange;

/// A text edit representing a change to apply to source code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Byte offset range to replace
    pub offset_range: OffsetRange,
    /// The text to replace the range with (empty string means deletion)
    pub new_text: String,
}

impl TextEdit {
    /// Create a new text edit that replaces a range with new text.
    #[must_use]
    pub fn new(start: usize, end: usize, new_text: impl Into<String>) -> Self {
        Self {
            offset_range: OffsetRange::new(start, end),
            new_text: new_text.into(),
        }
    }
}

/// Returned when an edit would touch bytes already claimed by another edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlappingEdit {
    pub existing: OffsetRange,
    pub rejected: OffsetRange,
}

impl std::fmt::Display for OverlappingEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "edit at {} overlaps an existing edit at {}",
            self.rejected, self.existing
        )
    }
}

impl std::error::Error for OverlappingEdit {}

/// Accumulates non-overlapping edits over one source text.
///
/// Edits are recorded against offsets of the *original* text and applied in
/// one pass by [`EditBuffer::apply`], so the order of `replace` calls does not
/// matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    edits: Vec<TextEdit>,
}

impl EditBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a replacement of `range` with `text`.
    pub fn replace(
        &mut self,
        range: OffsetRange,
        text: impl Into<String>,
    ) -> Result<(), OverlappingEdit> {
        if let Some(existing) = self
            .edits
            .iter()
            .find(|edit| edit.offset_range.overlaps(&range) || edit.offset_range == range)
        {
            return Err(OverlappingEdit {
                existing: existing.offset_range,
                rejected: range,
            });
        }
        self.edits.push(TextEdit {
            offset_range: range,
            new_text: text.into(),
        });
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    #[must_use]
    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    /// Apply every edit to `source`, producing the rewritten text and the
    /// mapping between rewritten and original offsets.
    ///
    /// Edit ranges must lie on `char` boundaries of `source`.
    #[must_use]
    pub fn apply(&self, source: &str) -> EditedSource {
        let mut edits: Vec<&TextEdit> = self.edits.iter().collect();
        edits.sort_by_key(|edit| edit.offset_range.start);

        let mut code = String::with_capacity(source.len());
        let mut segments = Vec::with_capacity(edits.len() * 2 + 1);
        let mut cursor = 0;

        for edit in edits {
            let range = edit.offset_range;
            if range.start > cursor {
                segments.push(Segment::copied(code.len(), cursor, range.start));
                code.push_str(&source[cursor..range.start]);
            }
            segments.push(Segment {
                generated: OffsetRange::new(code.len(), code.len() + edit.new_text.len()),
                original: range,
                edited: true,
            });
            code.push_str(&edit.new_text);
            cursor = range.end;
        }

        if cursor < source.len() {
            segments.push(Segment::copied(code.len(), cursor, source.len()));
            code.push_str(&source[cursor..]);
        }

        EditedSource {
            code,
            mapping: OffsetMapping { segments },
        }
    }
}

/// Rewritten source text with its position mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedSource {
    pub code: String,
    pub mapping: OffsetMapping,
}

/// One contiguous piece of the rewritten text and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Range in the rewritten text
    pub generated: OffsetRange,
    /// Range in the original text
    pub original: OffsetRange,
    /// `true` when the text was produced by an edit rather than copied
    pub edited: bool,
}

impl Segment {
    const fn copied(generated_start: usize, start: usize, end: usize) -> Self {
        Self {
            generated: OffsetRange::new(generated_start, generated_start + (end - start)),
            original: OffsetRange::new(start, end),
            edited: false,
        }
    }
}

/// Maps offsets between a rewritten text and the original it was derived from.
///
/// Copied segments map byte for byte; an offset inside an edited segment maps
/// to the start of the range that edit replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetMapping {
    segments: Vec<Segment>,
}

impl OffsetMapping {
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Original offset for an offset in the rewritten text.
    #[must_use]
    pub fn original_offset(&self, generated: usize) -> usize {
        Self::translate(&self.segments, generated, |s| s.generated, |s| s.original)
    }

    /// Rewritten offset for an offset in the original text.
    #[must_use]
    pub fn generated_offset(&self, original: usize) -> usize {
        Self::translate(&self.segments, original, |s| s.original, |s| s.generated)
    }

    fn translate(
        segments: &[Segment],
        offset: usize,
        from: impl Fn(&Segment) -> OffsetRange,
        to: impl Fn(&Segment) -> OffsetRange,
    ) -> usize {
        let Some(segment) = segments
            .iter()
            .find(|segment| offset < from(segment).end)
            .or_else(|| segments.last())
        else {
            return offset;
        };
        let (source, target) = (from(segment), to(segment));
        if segment.edited {
            target.start
        } else {
            (target.start + offset.saturating_sub(source.start)).min(target.end)
        }
    }
}
