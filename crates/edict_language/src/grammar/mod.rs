//! The combinator grammar model.
//!
//! A [`Grammar`] is a flat table: every combinator node lives in one `Vec`
//! and children are referenced by [`NodeId`]. The id doubles as the node's
//! stable identity, so the packrat memo key is simply
//! `(byte offset, NodeId)`.
//!
//! Grammars are immutable once built and carry no per-parse state, so a
//! single table (see [`table::grammar`]) is shared by every parser in the
//! process.

pub mod table;

use std::collections::HashMap;

use crate::value::{ActionContext, ActionResult, Scope};

/// A semantic action: builds a value from the matched span and the labeled
/// captures in scope.
pub type ActionFn = for<'a> fn(&ActionContext<'a>, &Scope<'a>) -> ActionResult<'a>;

/// A code predicate: inspects the captures in scope without consuming
/// input.
pub type PredFn = for<'a> fn(&Scope<'a>) -> bool;

/// Index of a node in its grammar's table. Stable for the grammar's
/// lifetime; used as the memoization key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The node's position in the table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a named rule in its grammar's rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(u32);

impl RuleId {
    /// The rule's position in the rule list.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A Unicode category usable in a character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharCategory {
    Letter,
    Digit,
    Whitespace,
}

impl CharCategory {
    /// True if `c` belongs to this category.
    pub fn matches(self, c: char) -> bool {
        match self {
            CharCategory::Letter => c.is_alphabetic(),
            CharCategory::Digit => c.is_numeric(),
            CharCategory::Whitespace => c.is_whitespace(),
        }
    }
}

/// A character-class matcher: explicit chars, inclusive ranges, and
/// category tests, with optional inversion and case folding.
#[derive(Debug, Clone, Copy)]
pub struct ClassSpec {
    /// How the class renders in "expected ..." diagnostics.
    pub want: &'static str,
    pub chars: &'static [char],
    pub ranges: &'static [(char, char)],
    pub categories: &'static [CharCategory],
    pub inverted: bool,
    pub ignore_case: bool,
}

impl ClassSpec {
    /// A class matching nothing; build real classes with struct update
    /// syntax from this.
    pub const EMPTY: ClassSpec = ClassSpec {
        want: "",
        chars: &[],
        ranges: &[],
        categories: &[],
        inverted: false,
        ignore_case: false,
    };
}

/// One combinator node. The set is closed; the engine matches on it
/// exhaustively.
#[derive(Debug)]
pub enum Node {
    /// Matches `text` rune by rune. With `ignore_case`, `text` is stored
    /// lowercased and input runes are folded before comparison.
    Lit {
        text: &'static str,
        ignore_case: bool,
        want: String,
    },
    /// Matches one rune against a character class.
    Class(ClassSpec),
    /// Matches any single rune.
    Any,
    /// All children must match, in order.
    Seq(Vec<NodeId>),
    /// The first matching alternative wins.
    Choice(Vec<NodeId>),
    /// Binds the child's value under `name` in the enclosing scope.
    Label { name: &'static str, expr: NodeId },
    /// Runs `run` over the child's match, replacing its value.
    Action { run: ActionFn, expr: NodeId },
    /// Matches the child zero or one time; always succeeds.
    Opt(NodeId),
    /// Matches the child any number of times; always succeeds.
    Star(NodeId),
    /// Matches the child one or more times.
    Plus(NodeId),
    /// Succeeds if the child matches, consuming nothing.
    And(NodeId),
    /// Succeeds if the child does not match, consuming nothing.
    Not(NodeId),
    /// Succeeds if the predicate holds; consumes nothing.
    AndCode(PredFn),
    /// Succeeds if the predicate does not hold; consumes nothing.
    NotCode(PredFn),
    /// Delegates to the named rule.
    RuleRef(&'static str),
}

/// A named production.
#[derive(Debug)]
pub struct GrammarRule {
    pub name: &'static str,
    /// Optional human-facing name used in diagnostics.
    pub display_name: Option<&'static str>,
    pub expr: NodeId,
}

impl GrammarRule {
    /// The name diagnostics should use for this rule.
    pub fn label(&self) -> &'static str {
        self.display_name.unwrap_or(self.name)
    }
}

/// An immutable combinator grammar: the node table, the named rules, and
/// the entry rule.
#[derive(Debug)]
pub struct Grammar {
    nodes: Vec<Node>,
    rules: Vec<GrammarRule>,
    index: HashMap<&'static str, RuleId>,
    entry: RuleId,
}

impl Grammar {
    /// Starts building a grammar.
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    /// The node behind an id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The rule behind an id.
    pub fn rule(&self, id: RuleId) -> &GrammarRule {
        &self.rules[id.index()]
    }

    /// Looks a rule up by name.
    pub fn lookup(&self, name: &str) -> Option<RuleId> {
        self.index.get(name).copied()
    }

    /// The rule evaluation starts from.
    pub fn entry(&self) -> RuleId {
        self.entry
    }

    /// Number of nodes in the table.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of named rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// Accumulates nodes and rules, then validates every rule reference.
#[derive(Default)]
pub struct GrammarBuilder {
    nodes: Vec<Node>,
    rules: Vec<GrammarRule>,
    index: HashMap<&'static str, RuleId>,
}

impl GrammarBuilder {
    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// A case-sensitive literal.
    pub fn lit(&mut self, text: &'static str) -> NodeId {
        self.push(Node::Lit { text, ignore_case: false, want: format!("{:?}", text) })
    }

    /// A case-insensitive literal. `text` must already be lowercase.
    pub fn lit_ic(&mut self, text: &'static str) -> NodeId {
        self.push(Node::Lit { text, ignore_case: true, want: format!("{:?}i", text) })
    }

    /// A character class.
    pub fn class(&mut self, spec: ClassSpec) -> NodeId {
        self.push(Node::Class(spec))
    }

    /// The any-rune matcher.
    pub fn any(&mut self) -> NodeId {
        self.push(Node::Any)
    }

    /// A sequence of children.
    pub fn seq(&mut self, children: Vec<NodeId>) -> NodeId {
        self.push(Node::Seq(children))
    }

    /// An ordered choice.
    pub fn choice(&mut self, alternatives: Vec<NodeId>) -> NodeId {
        self.push(Node::Choice(alternatives))
    }

    /// A labeled capture.
    pub fn label(&mut self, name: &'static str, expr: NodeId) -> NodeId {
        self.push(Node::Label { name, expr })
    }

    /// A semantic action over `expr`.
    pub fn action(&mut self, run: ActionFn, expr: NodeId) -> NodeId {
        self.push(Node::Action { run, expr })
    }

    /// Zero-or-one repetition.
    pub fn opt(&mut self, expr: NodeId) -> NodeId {
        self.push(Node::Opt(expr))
    }

    /// Zero-or-more repetition.
    pub fn star(&mut self, expr: NodeId) -> NodeId {
        self.push(Node::Star(expr))
    }

    /// One-or-more repetition.
    pub fn plus(&mut self, expr: NodeId) -> NodeId {
        self.push(Node::Plus(expr))
    }

    /// Positive syntactic lookahead.
    pub fn and_pred(&mut self, expr: NodeId) -> NodeId {
        self.push(Node::And(expr))
    }

    /// Negative syntactic lookahead.
    pub fn not_pred(&mut self, expr: NodeId) -> NodeId {
        self.push(Node::Not(expr))
    }

    /// Positive code predicate.
    pub fn and_code(&mut self, pred: PredFn) -> NodeId {
        self.push(Node::AndCode(pred))
    }

    /// Negative code predicate.
    pub fn not_code(&mut self, pred: PredFn) -> NodeId {
        self.push(Node::NotCode(pred))
    }

    /// A reference to the rule called `name`. The rule may be registered
    /// later; `finish` validates all references.
    pub fn r(&mut self, name: &'static str) -> NodeId {
        self.push(Node::RuleRef(name))
    }

    /// Registers a named rule.
    ///
    /// # Panics
    /// Panics if `name` was already registered; the table is built by hand
    /// and a duplicate is a bug in it.
    pub fn rule(&mut self, name: &'static str, display_name: Option<&'static str>, expr: NodeId) {
        let id = RuleId(self.rules.len() as u32);
        if self.index.insert(name, id).is_some() {
            panic!("duplicate rule: {}", name);
        }
        self.rules.push(GrammarRule { name, display_name, expr });
    }

    /// Validates every rule reference and returns the finished grammar.
    ///
    /// # Panics
    /// Panics on a reference to an unregistered rule or an unknown entry
    /// rule; both are bugs in the table.
    pub fn finish(self, entry: &'static str) -> Grammar {
        for node in &self.nodes {
            if let Node::RuleRef(name) = node {
                if !self.index.contains_key(name) {
                    panic!("reference to undefined rule: {}", name);
                }
            }
        }
        let entry = match self.index.get(entry) {
            Some(&id) => id,
            None => panic!("undefined entry rule: {}", entry),
        };
        Grammar { nodes: self.nodes, rules: self.rules, index: self.index, entry }
    }
}
