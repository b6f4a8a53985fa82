//! The backtracking packrat interpreter.
//!
//! [`Parser`] walks grammar nodes against the cursor. Evaluation returns
//! `Ok(Some(value))` on a match, `Ok(None)` on a clean mismatch (the caller
//! backtracks), and `Err(FatalError)` when a semantic action pulls the
//! plug — the typed replacement for the hard panics grammars of this style
//! traditionally use.
//!
//! # Backtracking
//!
//! Sequences snapshot the cursor before their first child and restore it on
//! any failure. Label scopes are pushed per rule invocation, per choice
//! alternative, and per repetition iteration, so captures never leak across
//! alternatives.
//!
//! # Furthest failure
//!
//! Every primitive matcher reports what it wanted at the position it
//! failed; the engine keeps only the reports at the deepest offset reached.
//! Negative lookahead flips the `invert` flag so that failures *inside* a
//! `not` — which are successes from the caller's point of view — do not
//! leak into user-facing expectations.
//!
//! # Memoization
//!
//! Off by default. When enabled, results are cached per
//! `(byte offset, node id)` and a hit restores the cached end state. This
//! bounds pathological backtracking to linear time at the cost of memory;
//! it never changes the outcome.

use std::collections::{BTreeMap, HashMap};

use edict_base::{Arena, Position};

use crate::ast::{Comment, Program, Statement};
use crate::cursor::{Cursor, Savepoint};
use crate::errors::{Errors, FatalError, ParseError};
use crate::grammar::{ClassSpec, Grammar, Node, NodeId, RuleId};
use crate::operators::InfixOperators;
use crate::parse::ParseOptions;
use crate::value::{ActionContext, ActionError, Scope, Value};

type EvalResult<'a> = Result<Option<Value<'a>>, FatalError>;

#[derive(Clone)]
struct MemoEntry<'a> {
    value: Option<Value<'a>>,
    end: Savepoint,
}

/// One parse in flight: the cursor, the capture and rule stacks, the error
/// list, and the optional memo table. The grammar itself is shared and
/// immutable.
pub struct Parser<'a, 'g> {
    grammar: &'g Grammar,
    cursor: Cursor<'a>,
    arena: &'a Arena,
    file: &'a str,
    operators: &'a InfixOperators,
    options: ParseOptions,
    scopes: Vec<Scope<'a>>,
    rule_stack: Vec<RuleId>,
    errors: Errors,
    comments: BTreeMap<usize, Comment<'a>>,
    memo: HashMap<(usize, NodeId), MemoEntry<'a>>,
    max_fail_pos: Position,
    max_fail_expected: Vec<String>,
    max_fail_invert: bool,
    depth: usize,
}

impl<'a, 'g> Parser<'a, 'g> {
    /// Creates a parser over `input`, tagged with `file` in diagnostics.
    pub fn new(
        grammar: &'g Grammar,
        file: &'a str,
        input: &'a [u8],
        arena: &'a Arena,
        operators: &'a InfixOperators,
        options: ParseOptions,
    ) -> Self {
        Parser {
            grammar,
            cursor: Cursor::new(input),
            arena,
            file,
            operators,
            options,
            scopes: Vec::new(),
            rule_stack: Vec::new(),
            errors: Errors::new(),
            comments: BTreeMap::new(),
            memo: HashMap::new(),
            max_fail_pos: Position::start(),
            max_fail_expected: Vec::new(),
            max_fail_invert: false,
            depth: 0,
        }
    }

    /// Runs the grammar's entry rule to completion.
    ///
    /// # Panics
    /// With `options.recover` disabled, a fatal action error panics instead
    /// of becoming the final diagnostic.
    pub fn run(&mut self) -> Result<Program<'a>, Errors> {
        let outcome = self.eval_rule(self.grammar.entry());
        let program = match outcome {
            Err(fatal) => {
                if !self.options.recover {
                    panic!("{}", fatal.message);
                }
                let mut err = ParseError::new(fatal.message, self.file, fatal.pos);
                err.rule = fatal.rule;
                self.errors.push(err);
                None
            }
            Ok(Some(Value::Program(mut program))) => {
                program.comments = self.comments.values().cloned().collect();
                Some(program)
            }
            Ok(_) => None,
        };

        let encoding: Vec<Position> = self.cursor.encoding_errors().collect();
        for pos in encoding {
            self.errors.push(ParseError::new("invalid encoding", self.file, pos));
        }
        if program.is_none() && self.errors.is_empty() {
            let err = self.max_failure_error();
            self.errors.push(err);
        }

        match program {
            Some(program) if self.errors.is_empty() => Ok(program),
            _ => Err(std::mem::take(&mut self.errors)),
        }
    }

    // ── evaluation ─────────────────────────────────────────────────────

    fn eval(&mut self, id: NodeId) -> EvalResult<'a> {
        if !self.options.memoize {
            return self.eval_node(id);
        }
        let key = (self.cursor.offset(), id);
        if let Some(entry) = self.memo.get(&key) {
            let entry = entry.clone();
            self.cursor.restore(&entry.end);
            return Ok(entry.value);
        }
        let result = self.eval_node(id)?;
        let end = self.cursor.save();
        self.memo.insert(key, MemoEntry { value: result.clone(), end });
        Ok(result)
    }

    fn eval_node(&mut self, id: NodeId) -> EvalResult<'a> {
        let grammar = self.grammar;
        match grammar.node(id) {
            Node::Lit { text, ignore_case, want } => self.eval_lit(text, *ignore_case, want),
            Node::Class(spec) => self.eval_class(spec),
            Node::Any => self.eval_any(),
            Node::Seq(children) => self.eval_seq(children),
            Node::Choice(alternatives) => self.eval_choice(alternatives),
            Node::Label { name, expr } => self.eval_label(*name, *expr),
            Node::Action { run, expr } => self.eval_action(*run, *expr),
            Node::Opt(expr) => {
                self.push_scope();
                let result = self.eval(*expr);
                self.pop_scope();
                Ok(Some(result?.unwrap_or(Value::Unit)))
            }
            Node::Star(expr) => self.eval_repeat(*expr, false),
            Node::Plus(expr) => self.eval_repeat(*expr, true),
            Node::And(expr) => {
                let start = self.cursor.save();
                self.push_scope();
                let result = self.eval(*expr);
                self.pop_scope();
                self.cursor.restore(&start);
                Ok(result?.map(|_| Value::Unit))
            }
            Node::Not(expr) => {
                let start = self.cursor.save();
                self.max_fail_invert = !self.max_fail_invert;
                self.push_scope();
                let result = self.eval(*expr);
                self.pop_scope();
                self.max_fail_invert = !self.max_fail_invert;
                self.cursor.restore(&start);
                match result? {
                    Some(_) => Ok(None),
                    None => Ok(Some(Value::Unit)),
                }
            }
            Node::AndCode(pred) => {
                let holds = self.run_pred(*pred);
                Ok(if holds { Some(Value::Unit) } else { None })
            }
            Node::NotCode(pred) => {
                let holds = self.run_pred(*pred);
                Ok(if holds { None } else { Some(Value::Unit) })
            }
            Node::RuleRef(name) => match grammar.lookup(name) {
                Some(rule_id) => self.eval_rule(rule_id),
                None => Err(self.fatal(format!("undefined rule: {}", name), self.cursor.position())),
            },
        }
    }

    fn eval_rule(&mut self, id: RuleId) -> EvalResult<'a> {
        let rule = self.grammar.rule(id);
        if self.options.debug {
            log::debug!(
                "{:indent$}enter {} at {}",
                "",
                rule.name,
                self.cursor.position(),
                indent = self.depth * 2
            );
        }
        self.depth += 1;
        self.rule_stack.push(id);
        self.push_scope();
        let result = self.eval(rule.expr);
        self.pop_scope();
        self.rule_stack.pop();
        self.depth -= 1;
        if self.options.debug {
            let outcome = match &result {
                Ok(Some(_)) => "match",
                Ok(None) => "no match",
                Err(_) => "fatal",
            };
            log::debug!("{:indent$}exit {} ({})", "", rule.name, outcome, indent = self.depth * 2);
        }
        result
    }

    fn eval_lit(&mut self, text: &str, ignore_case: bool, want: &str) -> EvalResult<'a> {
        let start = self.cursor.save();
        for expected in text.chars() {
            let (mut current, _) = self.cursor.peek();
            if ignore_case {
                current = current.to_lowercase().next().unwrap_or(current);
            }
            if current != expected {
                self.fail_at(true, start.position(), want);
                self.cursor.restore(&start);
                return Ok(None);
            }
            self.cursor.advance();
        }
        Ok(Some(Value::Text(self.cursor.slice_from(&start))))
    }

    fn eval_class(&mut self, spec: &ClassSpec) -> EvalResult<'a> {
        let start = self.cursor.save();
        if self.cursor.at_eof() {
            self.fail_at(true, start.position(), spec.want);
            return Ok(None);
        }
        let (mut current, _) = self.cursor.peek();
        if spec.ignore_case {
            current = current.to_lowercase().next().unwrap_or(current);
        }
        let mut matched = spec.chars.contains(&current)
            || spec.ranges.iter().any(|&(lo, hi)| current >= lo && current <= hi)
            || spec.categories.iter().any(|cat| cat.matches(current));
        if spec.inverted {
            matched = !matched;
        }
        if matched {
            self.cursor.advance();
            Ok(Some(Value::Text(self.cursor.slice_from(&start))))
        } else {
            self.fail_at(true, start.position(), spec.want);
            Ok(None)
        }
    }

    fn eval_any(&mut self) -> EvalResult<'a> {
        if self.cursor.at_eof() {
            self.fail_at(true, self.cursor.position(), "any character");
            return Ok(None);
        }
        let start = self.cursor.save();
        self.cursor.advance();
        // A success report: visible only inside `not`, where it becomes
        // the "!any character" expectation for EOF.
        self.fail_at(false, start.position(), "any character");
        Ok(Some(Value::Text(self.cursor.slice_from(&start))))
    }

    fn eval_seq(&mut self, children: &[NodeId]) -> EvalResult<'a> {
        let start = self.cursor.save();
        let mut values = Vec::with_capacity(children.len());
        for &child in children {
            match self.eval(child)? {
                Some(value) => values.push(value),
                None => {
                    self.cursor.restore(&start);
                    return Ok(None);
                }
            }
        }
        Ok(Some(Value::List(values)))
    }

    fn eval_choice(&mut self, alternatives: &[NodeId]) -> EvalResult<'a> {
        for &alternative in alternatives {
            self.push_scope();
            let result = self.eval(alternative);
            self.pop_scope();
            if let Some(value) = result? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn eval_label(&mut self, name: &'static str, expr: NodeId) -> EvalResult<'a> {
        self.push_scope();
        let result = self.eval(expr);
        self.pop_scope();
        match result? {
            Some(value) => {
                if let Some(scope) = self.scopes.last_mut() {
                    scope.insert(name, value.clone());
                }
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn eval_repeat(&mut self, expr: NodeId, at_least_one: bool) -> EvalResult<'a> {
        let mut values = Vec::new();
        loop {
            self.push_scope();
            let result = self.eval(expr);
            self.pop_scope();
            match result? {
                Some(value) => values.push(value),
                None => break,
            }
        }
        if at_least_one && values.is_empty() {
            return Ok(None);
        }
        Ok(Some(Value::List(values)))
    }

    fn eval_action(&mut self, run: crate::grammar::ActionFn, expr: NodeId) -> EvalResult<'a> {
        let start = self.cursor.save();
        match self.eval(expr)? {
            None => Ok(None),
            Some(_) => {
                let scope = self.scopes.last().cloned().unwrap_or_default();
                let cx = ActionContext {
                    text: self.cursor.slice_from(&start),
                    pos: start.position(),
                    file: self.file,
                    arena: self.arena,
                    operators: self.operators,
                };
                let value = match run(&cx, &scope) {
                    Ok(value) => value,
                    Err(ActionError::Recoverable { message, value }) => {
                        self.record_error(message, start.position());
                        value.unwrap_or(Value::Unit)
                    }
                    Err(ActionError::Fatal(message)) => {
                        return Err(self.fatal(message, start.position()))
                    }
                };
                if let Value::Statement(Statement::Comment(comment)) = &value {
                    self.comments
                        .entry(comment.loc.pos.offset)
                        .or_insert_with(|| comment.clone());
                }
                Ok(Some(value))
            }
        }
    }

    fn run_pred(&self, pred: crate::grammar::PredFn) -> bool {
        match self.scopes.last() {
            Some(scope) => pred(scope),
            None => pred(&Scope::new()),
        }
    }

    // ── bookkeeping ────────────────────────────────────────────────────

    fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Tracks what the deepest-reaching matcher wanted. `failed` is the
    /// matcher's own outcome; under the invert flag the roles swap, so a
    /// success inside `not` is the reportable event.
    fn fail_at(&mut self, failed: bool, pos: Position, want: &str) {
        if failed == self.max_fail_invert {
            return;
        }
        if pos.offset < self.max_fail_pos.offset {
            return;
        }
        if pos.offset > self.max_fail_pos.offset {
            self.max_fail_pos = pos;
            self.max_fail_expected.clear();
        }
        if self.max_fail_invert {
            self.max_fail_expected.push(format!("!{}", want));
        } else {
            self.max_fail_expected.push(want.to_string());
        }
    }

    fn max_failure_error(&self) -> ParseError {
        let mut wants: Vec<&str> = self.max_fail_expected.iter().map(String::as_str).collect();
        wants.sort_unstable();
        wants.dedup();
        let list = match wants.len() {
            0 => String::new(),
            1 => wants[0].to_string(),
            n => format!("{} or {}", wants[..n - 1].join(", "), wants[n - 1]),
        };
        ParseError::new(
            format!("no match found, expected: {}", list),
            self.file,
            self.max_fail_pos,
        )
    }

    fn current_rule_label(&self) -> Option<String> {
        self.rule_stack
            .last()
            .map(|&id| self.grammar.rule(id).label().to_string())
    }

    fn record_error(&mut self, message: String, pos: Position) {
        let mut err = ParseError::new(message, self.file, pos);
        err.rule = self.current_rule_label();
        self.errors.push(err);
    }

    fn fatal(&self, message: String, pos: Position) -> FatalError {
        FatalError { message, pos, rule: self.current_rule_label() }
    }
}
