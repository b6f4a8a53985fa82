//! # edict-language
//!
//! The parsing core of the edict policy language: modules of rules in the
//! Datalog tradition, with negation, references, composite values, array
//! comprehensions, infix operators, builtin calls, and per-expression
//! `with` substitutions.
//!
//! ## Quick Start
//!
//! ```rust
//! use edict_base::Arena;
//! use edict_language::{parse, InfixOperators, ParseOptions};
//!
//! let source = br#"
//! package example.authz
//!
//! ## deny by default
//! default allow = false
//!
//! allow = true { input.user = "admin" }
//! "#;
//!
//! let arena = Arena::new();
//! let ops = InfixOperators::default();
//! let program = parse("authz.edict", source, &arena, &ops, ParseOptions::default()).unwrap();
//! // package, the comment (comments are statements too), and two rules
//! assert_eq!(program.statements.len(), 4);
//! assert_eq!(program.comments.len(), 1);
//! ```
//!
//! ## Architecture
//!
//! 1. **Cursor** ([`cursor`]) — a UTF-8 rune stream over the input bytes
//!    with line/column tracking and savepoints for backtracking.
//!
//! 2. **Grammar** ([`grammar`]) — a fixed table of combinator nodes
//!    (literals, classes, sequence, ordered choice, repetition, lookahead,
//!    labels, actions) built once and shared process-wide.
//!
//! 3. **Engine** ([`engine`]) — a backtracking interpreter over the table
//!    with optional packrat memoization and furthest-failure tracking.
//!
//! 4. **AST** ([`ast`]) — located nodes built by the semantic actions,
//!    plus a generic [`ast::visitor`] for static checks.
//!
//! 5. **Diagnostics** ([`errors`]) — deduplicated error lists rendered as
//!    `file:line:col (offset)[: rule name]: message`.
//!
//! ## Error handling
//!
//! `parse` either returns the full [`ast::Program`] or an [`Errors`] list;
//! there is no partial output. Semantic hard stops (an unparseable
//! statement, an empty rule body) terminate the parse and surface as the
//! final diagnostic unless [`ParseOptions::recover`] is switched off for
//! development, in which case they panic.

pub mod ast;
pub mod cursor;
pub mod engine;
pub mod errors;
pub mod grammar;
pub mod operators;
pub mod value;

mod actions;
mod parse;

pub use errors::{Errors, ParseError};
pub use operators::InfixOperators;
pub use parse::{parse, ParseOptions};

// The arena type callers must supply to `parse`.
pub use edict_base::{Arena, Position};
