//! Values flowing through the parser engine.
//!
//! Every grammar node evaluates to a [`Value`]: primitive matchers yield the
//! matched bytes, sequences and repetitions yield lists, and semantic
//! actions replace whatever their child matched with a typed AST value.
//! Predicates yield [`Value::Unit`]; only their matched flag matters.
//!
//! Labeled captures accumulate in a [`Scope`] per rule invocation, which is
//! what semantic actions receive alongside an [`ActionContext`] describing
//! the matched span.

use std::collections::HashMap;

use edict_base::{Arena, Position};

use crate::ast::{Body, Expr, Head, Location, Program, Rule, Statement, Term, With};
use crate::operators::InfixOperators;

/// The result of evaluating one grammar node.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    /// Carries no data: predicates, missing optionals.
    Unit,
    /// The bytes matched by a literal, character class, or any-matcher.
    Text(&'a [u8]),
    /// Sub-values of a sequence or repetition, in grammar order.
    List(Vec<Value<'a>>),
    Term(Term<'a>),
    Expr(Expr<'a>),
    Body(Body<'a>),
    Head(Head<'a>),
    With(With<'a>),
    Statement(Statement<'a>),
    /// A rule group: the primary rule and its duplicates, in source order.
    Rules(Vec<Rule<'a>>),
    /// An `else` clause or duplicate body extending a rule group.
    RuleExt(RuleExt<'a>),
    Program(Program<'a>),
}

impl<'a> Value<'a> {
    /// The sub-values if this is a list, otherwise an empty slice.
    pub fn as_list(&self) -> &[Value<'a>] {
        match self {
            Value::List(items) => items,
            _ => &[],
        }
    }

    /// The matched bytes if this is text, otherwise an empty slice.
    pub fn as_text(&self) -> &'a [u8] {
        match self {
            Value::Text(bytes) => *bytes,
            _ => &[],
        }
    }

    /// The term if this value carries one.
    pub fn as_term(&self) -> Option<&Term<'a>> {
        match self {
            Value::Term(term) => Some(term),
            _ => None,
        }
    }

    /// True for [`Value::Unit`] — a missing optional or predicate result.
    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }
}

/// An extension following a rule's first body: either another body for the
/// same head or an `else` alternative.
#[derive(Debug, Clone)]
pub enum RuleExt<'a> {
    Else {
        loc: Location<'a>,
        value: Option<Term<'a>>,
        body: Body<'a>,
    },
    Dup {
        loc: Location<'a>,
        body: Body<'a>,
    },
}

/// Labeled captures visible to a semantic action.
pub type Scope<'a> = HashMap<&'static str, Value<'a>>;

/// What a semantic action sees about its match: the covered bytes, where
/// they start, and the shared parse-wide collaborators.
pub struct ActionContext<'a> {
    /// Bytes covered by the action's expression.
    pub text: &'a [u8],
    /// Position of the first covered rune.
    pub pos: Position,
    /// File tag supplied to `parse`.
    pub file: &'a str,
    /// Arena for decoded string data.
    pub arena: &'a Arena,
    /// Infix spelling normalization registry.
    pub operators: &'a InfixOperators,
}

impl<'a> ActionContext<'a> {
    /// The location covering this action's match.
    pub fn loc(&self) -> Location<'a> {
        Location::new(self.text, self.file, self.pos)
    }

    /// A location for a node this action synthesizes out of thin air.
    pub fn synthetic_loc(&self) -> Location<'a> {
        Location::synthetic(self.file, self.pos)
    }
}

/// How a semantic action fails.
#[derive(Debug)]
pub enum ActionError<'a> {
    /// A diagnostic is recorded at the action's start position, but the
    /// match stands: the expression's value becomes `value` (or
    /// [`Value::Unit`]).
    Recoverable {
        message: String,
        value: Option<Value<'a>>,
    },
    /// Aborts the parse.
    Fatal(String),
}

impl<'a> ActionError<'a> {
    /// A recoverable error with no replacement value.
    pub fn recoverable(message: impl Into<String>) -> Self {
        ActionError::Recoverable { message: message.into(), value: None }
    }

    /// A recoverable error that still yields a value.
    pub fn recoverable_with(message: impl Into<String>, value: Value<'a>) -> Self {
        ActionError::Recoverable { message: message.into(), value: Some(value) }
    }

    /// A hard stop.
    pub fn fatal(message: impl Into<String>) -> Self {
        ActionError::Fatal(message.into())
    }
}

/// The outcome of a semantic action.
pub type ActionResult<'a> = Result<Value<'a>, ActionError<'a>>;
