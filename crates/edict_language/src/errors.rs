//! Parse diagnostics.
//!
//! Errors carry a filename, a [`Position`], and the display name of the rule
//! in whose context they arose. They render as
//!
//! ```text
//! <filename>:<line>:<col> (<offset>)[: rule <rule-name>]: <message>
//! ```
//!
//! and aggregate into an [`Errors`] list that deduplicates on the rendered
//! line, so a branch retried after backtracking cannot report the same
//! problem twice.

use std::fmt;

use edict_base::Position;

/// A single parse diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// File tag supplied to `parse`.
    pub file: String,
    /// Where the error arose.
    pub pos: Position,
    /// Display name of the innermost rule at the time of the error, if any.
    pub rule: Option<String>,
}

impl ParseError {
    /// Creates an error with no rule context.
    pub fn new(message: impl Into<String>, file: impl Into<String>, pos: Position) -> Self {
        ParseError {
            message: message.into(),
            file: file.into(),
            pos,
            rule: None,
        }
    }

    /// Attaches the rule context this error arose in.
    pub fn in_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.pos)?;
        if let Some(rule) = &self.rule {
            write!(f, ": rule {}", rule)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// An ordered, deduplicated collection of parse errors.
///
/// Errors keep their insertion order; a candidate whose rendered line equals
/// one already present is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors(Vec<ParseError>);

impl Errors {
    /// Creates an empty list.
    pub fn new() -> Self {
        Errors(Vec::new())
    }

    /// Appends `err` unless an identical rendering is already present.
    pub fn push(&mut self, err: ParseError) {
        let rendered = err.to_string();
        if self.0.iter().any(|e| e.to_string() == rendered) {
            return;
        }
        self.0.push(err);
    }

    /// Number of distinct errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no errors have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the errors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.0.iter()
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for Errors {}

impl IntoIterator for Errors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The hard-stop channel of the engine.
///
/// Semantic actions raise this for conditions the grammar treats as
/// unrecoverable (an unparseable statement, an empty rule body, an illegal
/// number). The engine unwinds to the entry point, which either converts it
/// into the final [`Errors`] entry or, with recovery disabled, panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalError {
    /// Description of the hard stop.
    pub message: String,
    /// Where the failing action started matching.
    pub pos: Position,
    /// Rule context captured when the fatal was raised.
    pub rule: Option<String>,
}
