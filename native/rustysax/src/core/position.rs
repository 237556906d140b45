//! Span - character positions into the original input
//!
//! Events report where they came from as 1-based, inclusive character
//! positions. The scanner works in byte offsets; `CharIndex` maps one to
//! the other.

/// An inclusive span of characters in the input document.
///
/// Positions are 1-based. An empty span has `end == start - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Position of the first character covered
    pub start: usize,
    /// Position of the last character covered
    pub end: usize,
}

impl Span {
    /// Create a new span
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of characters covered
    #[inline]
    pub const fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    /// Check if this span is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Extract the covered characters from input
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        if self.is_empty() || self.start == 0 {
            return "";
        }
        let mut offsets = input
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(input.len()));
        let Some(from) = offsets.nth(self.start - 1) else {
            return "";
        };
        let to = offsets.nth(self.len() - 1).unwrap_or(input.len());
        &input[from..to]
    }
}

/// Byte offset to character position conversion.
///
/// Queries are expected to move forward through the document, which keeps
/// the total cost linear in the input length. A query behind the last one
/// recounts from the start.
pub struct CharIndex<'a> {
    input: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharIndex<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            byte: 0,
            chars: 0,
        }
    }

    /// 1-based position of the character starting at byte offset `byte`.
    ///
    /// `byte` must lie on a char boundary; `input.len()` yields the
    /// position one past the last character.
    pub fn position(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        let byte = byte.min(self.input.len());
        self.chars += self
            .input
            .get(self.byte..byte)
            .map_or(0, |s| s.chars().count());
        self.byte = byte;
        self.chars + 1
    }

    /// Span covering bytes `start..end` (exclusive end)
    pub fn span(&mut self, start: usize, end: usize) -> Span {
        let first = self.position(start);
        let past = self.position(end);
        Span::new(first, past - 1)
    }
}
