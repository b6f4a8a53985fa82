//! Public parse entry point.
//!
//! [`parse`] wires the shared grammar table, the caller's arena, and the
//! operator registry into an engine run:
//!
//! ```
//! use edict_base::Arena;
//! use edict_language::{parse, InfixOperators, ParseOptions};
//!
//! let arena = Arena::new();
//! let ops = InfixOperators::default();
//! let program = parse(
//!     "example.edict",
//!     b"package example.authz",
//!     &arena,
//!     &ops,
//!     ParseOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(program.statements.len(), 1);
//! ```

use edict_base::Arena;

use crate::ast::Program;
use crate::engine::Parser;
use crate::errors::Errors;
use crate::grammar::table::grammar;
use crate::operators::InfixOperators;

/// Knobs for a single parse.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Trace rule entries and exits through `log::debug!`.
    pub debug: bool,
    /// Enable packrat memoization: linear time on pathological inputs,
    /// more memory on all of them.
    pub memoize: bool,
    /// Convert hard stops raised by semantic actions into diagnostics.
    /// Disable only for development; a hard stop then panics.
    pub recover: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { debug: false, memoize: false, recover: true }
    }
}

/// Parses one module.
///
/// `file` tags every diagnostic and AST location; `input` is the raw
/// module text; `arena` receives decoded string data and must outlive the
/// returned program; `operators` maps infix spellings to canonical builtin
/// names.
///
/// Returns the parsed [`Program`], or every diagnostic the parse produced.
pub fn parse<'a>(
    file: &'a str,
    input: &'a [u8],
    arena: &'a Arena,
    operators: &'a InfixOperators,
    options: ParseOptions,
) -> Result<Program<'a>, Errors> {
    Parser::new(grammar(), file, input, arena, operators, options).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_an_empty_module() {
        let arena = Arena::new();
        let ops = InfixOperators::default();
        let program = parse("empty.edict", b"", &arena, &ops, ParseOptions::default())
            .expect("empty input parses");
        assert!(program.statements.is_empty());
        assert!(program.comments.is_empty());
    }

    #[test]
    fn parse_reports_garbage_input() {
        let arena = Arena::new();
        let ops = InfixOperators::default();
        let errors = parse("bad.edict", b"?", &arena, &ops, ParseOptions::default())
            .expect_err("garbage input fails");
        assert!(errors.to_string().starts_with("bad.edict:"), "{}", errors);
    }
}
