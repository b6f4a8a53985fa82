//! Source positions for error reporting.
//!
//! A [`Position`] names a point in the input: the 1-based line and column of
//! a rune plus its byte offset. Diagnostics render as
//! `file:line:col (offset)`, and AST locations anchor at the position of
//! their first rune.
//!
//! Columns count runes, not bytes, so a position inside a line of multibyte
//! text still matches what an editor displays.

/// A point in the source text.
///
/// `Position` is `Copy` and cheap to store; the cursor updates one in place
/// as it reads and snapshots it into savepoints for backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column (in runes) within the line.
    pub col: usize,
    /// Byte offset from the start of the input.
    pub offset: usize,
}

impl Position {
    /// The position before the first rune has been read.
    pub fn start() -> Self {
        Position { line: 1, col: 0, offset: 0 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} ({})", self.line, self.col, self.offset)
    }
}
