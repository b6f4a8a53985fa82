//! Abstract syntax tree for the edict policy language.
//!
//! The parser produces a [`Program`]: an ordered list of [`Statement`]s plus
//! every [`Comment`] in the source. Statements break down into packages,
//! imports, rules, and bare bodies; rule bodies are lists of [`Expr`]s over
//! [`Term`]s.
//!
//! # Locations
//!
//! Every node carries a [`Location`]: the matched byte slice, the position
//! of its first rune, and the file tag the parser was given. Locations are
//! deliberately **not** part of equality — `PartialEq` on AST nodes compares
//! structure only, so `a.b.c` and `a["b"]["c"]` produce equal refs even
//! though they span different text.
//!
//! # Lifetimes
//!
//! The `'a` lifetime ties nodes to the input bytes and to the [`Arena`]
//! (`edict_base::Arena`) that holds decoded string data. Nothing in the tree
//! owns heap strings; cloning a subtree is cheap.
//!
//! [`Arena`]: edict_base::Arena

pub mod visitor;

use edict_base::Position;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Reserved words. An identifier spelling one of these never parses as a
/// variable.
pub const KEYWORDS: &[&str] = &[
    "package", "import", "as", "default", "not", "with", "else", "true", "false", "null", "set",
];

/// True if `name` is a reserved word.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// The implicit root document every package path is re-rooted under.
pub const DEFAULT_ROOT_DOCUMENT: &str = "data";

/// The root document naming the caller-supplied input value.
pub const INPUT_ROOT_DOCUMENT: &str = "input";

/// True if `name` is a valid root for import paths and `with` targets.
pub fn is_root_document(name: &str) -> bool {
    name == DEFAULT_ROOT_DOCUMENT || name == INPUT_ROOT_DOCUMENT
}

/// Source location of an AST node: the matched bytes, where they start, and
/// which file they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    /// The matched byte slice. Empty for synthesized nodes (defaulted
    /// values, the implicit root document).
    pub text: &'a [u8],
    /// File tag supplied to `parse`.
    pub file: &'a str,
    /// Position of the first matched rune.
    pub pos: Position,
}

impl<'a> Location<'a> {
    /// A location covering matched text.
    pub fn new(text: &'a [u8], file: &'a str, pos: Position) -> Self {
        Location { text, file, pos }
    }

    /// A location for a node with no source spelling, anchored at the
    /// production that synthesized it.
    pub fn synthetic(file: &'a str, pos: Position) -> Self {
        Location { text: &[], file, pos }
    }
}

impl Serialize for Location<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Location", 5)?;
        s.serialize_field("file", self.file)?;
        s.serialize_field("line", &self.pos.line)?;
        s.serialize_field("col", &self.pos.col)?;
        s.serialize_field("offset", &self.pos.offset)?;
        s.serialize_field("text", &String::from_utf8_lossy(self.text))?;
        s.end()
    }
}

/// A parsed module: top-level statements in source order plus every comment
/// in the file, ordered by offset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Program<'a> {
    pub statements: Vec<Statement<'a>>,
    pub comments: Vec<Comment<'a>>,
}

/// One top-level statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Statement<'a> {
    Package(Package<'a>),
    Import(Import<'a>),
    Rule(Rule<'a>),
    Body(Body<'a>),
    Comment(Comment<'a>),
}

/// A `package` declaration.
///
/// `path` is the elements of a reference rooted at the default root
/// document: `path[0]` is the root variable and every following element is
/// a ground string. `package a.b` stores `[data, "a", "b"]`.
#[derive(Debug, Clone, Serialize)]
pub struct Package<'a> {
    pub loc: Location<'a>,
    pub path: Vec<Term<'a>>,
}

impl PartialEq for Package<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Package<'_> {}

/// An `import` declaration with an optional alias.
#[derive(Debug, Clone, Serialize)]
pub struct Import<'a> {
    pub loc: Location<'a>,
    /// A var or ref term rooted at a valid root document.
    pub path: Term<'a>,
    pub alias: Option<&'a str>,
}

impl PartialEq for Import<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.alias == other.alias
    }
}

impl Eq for Import<'_> {}

/// A rule: head, body, and an optional chain of `else` alternatives.
#[derive(Debug, Clone, Serialize)]
pub struct Rule<'a> {
    pub loc: Location<'a>,
    /// True for `default` rules, whose body is the synthesized `true`.
    pub default: bool,
    pub head: Head<'a>,
    pub body: Body<'a>,
    /// The next alternative tried when this rule's body is undefined.
    pub else_rule: Option<Box<Rule<'a>>>,
}

impl PartialEq for Rule<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.default == other.default
            && self.head == other.head
            && self.body == other.body
            && self.else_rule == other.else_rule
    }
}

impl Eq for Rule<'_> {}

/// A rule head: name plus optional argument list, key, and value.
///
/// A head with neither key nor value gets the value `true`. A head with a
/// key and no value defines a partial set; a head with arguments defines a
/// function.
#[derive(Debug, Clone, Serialize)]
pub struct Head<'a> {
    pub loc: Location<'a>,
    /// The rule name, always a var term.
    pub name: Term<'a>,
    pub args: Vec<Term<'a>>,
    pub key: Option<Term<'a>>,
    pub value: Option<Term<'a>>,
}

impl Head<'_> {
    /// True for heads that produce a single complete document: no key, no
    /// arguments. Only such heads may carry `else` alternatives.
    pub fn is_complete(&self) -> bool {
        self.key.is_none() && self.args.is_empty()
    }
}

impl PartialEq for Head<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.args == other.args
            && self.key == other.key
            && self.value == other.value
    }
}

impl Eq for Head<'_> {}

/// A non-empty ordered sequence of expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Body<'a> {
    pub exprs: Vec<Expr<'a>>,
}

impl<'a> Body<'a> {
    /// A body holding the given expressions.
    pub fn new(exprs: Vec<Expr<'a>>) -> Self {
        Body { exprs }
    }
}

/// A single literal in a rule body.
#[derive(Debug, Clone, Serialize)]
pub struct Expr<'a> {
    pub loc: Location<'a>,
    /// True when the literal is prefixed with `not`.
    pub negated: bool,
    pub terms: ExprTerms<'a>,
    /// `with X as Y` modifiers, in source order.
    pub with: Vec<With<'a>>,
}

impl PartialEq for Expr<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.negated == other.negated && self.terms == other.terms && self.with == other.with
    }
}

impl Eq for Expr<'_> {}

/// The payload of an expression: either a bare term or an operator
/// application `[op, operand...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExprTerms<'a> {
    /// Shorthand form: the expression is a single term.
    Term(Term<'a>),
    /// Operator form: the first term names the operator, the rest are its
    /// operands (`[op, left, right]` for comparisons, `[op, left, right,
    /// output]` for arithmetic).
    Call(Vec<Term<'a>>),
}

/// A `with <target> as <value>` modifier.
#[derive(Debug, Clone, Serialize)]
pub struct With<'a> {
    pub loc: Location<'a>,
    pub target: Term<'a>,
    pub value: Term<'a>,
}

impl PartialEq for With<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target && self.value == other.value
    }
}

impl Eq for With<'_> {}

/// A term: a scalar, variable, reference, collection, or comprehension,
/// together with where it was parsed.
#[derive(Debug, Clone, Serialize)]
pub struct Term<'a> {
    pub loc: Location<'a>,
    pub value: TermValue<'a>,
}

impl<'a> Term<'a> {
    /// A term with the given value and location.
    pub fn new(value: TermValue<'a>, loc: Location<'a>) -> Self {
        Term { loc, value }
    }

    /// The variable name, if this term is a var.
    pub fn as_var(&self) -> Option<&'a str> {
        match self.value {
            TermValue::Var(name) => Some(name),
            _ => None,
        }
    }

    /// The string value, if this term is a string scalar.
    pub fn as_string(&self) -> Option<&'a str> {
        match self.value {
            TermValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Term<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Term<'_> {}

/// The value of a [`Term`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TermValue<'a> {
    Null,
    Bool(bool),
    /// An arbitrary-precision decimal, kept as its canonical decimal text.
    Number(&'a str),
    /// A string literal after JSON unescaping.
    String(&'a str),
    /// A variable. Never spells a keyword.
    Var(&'a str),
    /// A reference path: the head var followed by its tail elements. Dotted
    /// access stores string elements, so `a.b` and `a["b"]` are equal.
    Ref(Vec<Term<'a>>),
    Array(Vec<Term<'a>>),
    /// Key/value pairs in source order. Keys are scalars, refs, or vars.
    Object(Vec<(Term<'a>, Term<'a>)>),
    Set(Vec<Term<'a>>),
    ArrayComprehension(Box<ArrayComprehension<'a>>),
}

/// An array comprehension `[term | body]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrayComprehension<'a> {
    pub term: Term<'a>,
    pub body: Body<'a>,
}

/// A comment, stored without its leading `#`.
#[derive(Debug, Clone)]
pub struct Comment<'a> {
    pub loc: Location<'a>,
    pub text: &'a [u8],
}

impl PartialEq for Comment<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Comment<'_> {}

impl Serialize for Comment<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Comment", 2)?;
        s.serialize_field("loc", &self.loc)?;
        s.serialize_field("text", &String::from_utf8_lossy(self.text))?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(text: &'static str, offset: usize) -> Location<'static> {
        Location::new(
            text.as_bytes(),
            "test.edict",
            Position { line: 1, col: offset + 1, offset },
        )
    }

    fn var(name: &'static str, offset: usize) -> Term<'static> {
        Term::new(TermValue::Var(name), loc(name, offset))
    }

    #[test]
    fn keywords_are_reserved() {
        assert!(is_keyword("package"));
        assert!(is_keyword("else"));
        assert!(is_keyword("set"));
        assert!(!is_keyword("packages"));
        assert!(!is_keyword("x"));
    }

    #[test]
    fn root_documents() {
        assert!(is_root_document("data"));
        assert!(is_root_document("input"));
        assert!(!is_root_document("local"));
    }

    #[test]
    fn term_equality_ignores_location() {
        let a = var("x", 0);
        let b = var("x", 10);
        assert_eq!(a, b);
        assert_ne!(var("x", 0), var("y", 0));
    }

    #[test]
    fn ref_equality_is_structural() {
        let dotted = Term::new(
            TermValue::Ref(vec![
                var("a", 0),
                Term::new(TermValue::String("b"), loc("b", 2)),
            ]),
            loc("a.b", 0),
        );
        let bracketed = Term::new(
            TermValue::Ref(vec![
                var("a", 10),
                Term::new(TermValue::String("b"), loc("\"b\"", 12)),
            ]),
            loc("a[\"b\"]", 10),
        );
        assert_eq!(dotted, bracketed);
    }

    #[test]
    fn head_completeness() {
        let mut head = Head {
            loc: loc("p", 0),
            name: var("p", 0),
            args: Vec::new(),
            key: None,
            value: None,
        };
        assert!(head.is_complete());
        head.key = Some(var("x", 2));
        assert!(!head.is_complete());
        head.key = None;
        head.args.push(var("x", 2));
        assert!(!head.is_complete());
    }

    #[test]
    fn synthetic_location_has_empty_text() {
        let l = Location::synthetic("f.edict", Position::start());
        assert!(l.text.is_empty());
    }

    #[test]
    fn comment_equality_uses_text() {
        let a = Comment { loc: loc("# hi", 0), text: b" hi" };
        let b = Comment { loc: loc("# hi", 40), text: b" hi" };
        assert_eq!(a, b);
    }
}
