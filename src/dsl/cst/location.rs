//! Byte spans and their conversion to line/column positions
//!
//! Every CST node carries a byte [`Span`] into the grammar source. Positions are only
//! computed when a diagnostic needs to be shown to a person.

use std::fmt;
use std::ops::Range;

/// Byte range into the grammar source
pub type Span = Range<usize>;

/// A zero-based line/column position. Displays one-based, as editors count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Converts byte offsets within one source text to positions
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|(_, ch)| *ch == '\n')
                .map(|(byte_pos, _)| byte_pos + 1),
        );
        Self { line_starts }
    }

    /// Convert a byte offset to a position; the column counts bytes
    pub fn position(&self, byte_offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&byte_offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        Position::new(line, byte_offset - self.line_starts[line])
    }

    /// Position of the first byte of a span
    pub fn start_of(&self, span: &Span) -> Position {
        self.position(span.start)
    }
}
