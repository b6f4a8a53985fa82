//! Generic AST traversal.
//!
//! [`Visitor`] callbacks return `true` to descend into a node's children and
//! `false` to skip them, which is how checks scope themselves: the
//! default-rule purity check, for example, stops at comprehensions so that
//! variables inside closures are not rejected.

use super::{Expr, ExprTerms, Head, Program, Rule, Statement, Term, TermValue};

/// Callbacks for a pre-order walk. Every method defaults to "keep going".
pub trait Visitor<'a> {
    fn visit_statement(&mut self, _stmt: &Statement<'a>) -> bool {
        true
    }

    fn visit_rule(&mut self, _rule: &Rule<'a>) -> bool {
        true
    }

    fn visit_expr(&mut self, _expr: &Expr<'a>) -> bool {
        true
    }

    fn visit_term(&mut self, _term: &Term<'a>) -> bool {
        true
    }
}

/// Walks every statement of a program.
pub fn walk_program<'a, V: Visitor<'a>>(v: &mut V, program: &Program<'a>) {
    for stmt in &program.statements {
        walk_statement(v, stmt);
    }
}

/// Walks one statement and its children.
pub fn walk_statement<'a, V: Visitor<'a>>(v: &mut V, stmt: &Statement<'a>) {
    if !v.visit_statement(stmt) {
        return;
    }
    match stmt {
        Statement::Package(pkg) => {
            for term in &pkg.path {
                walk_term(v, term);
            }
        }
        Statement::Import(imp) => walk_term(v, &imp.path),
        Statement::Rule(rule) => walk_rule(v, rule),
        Statement::Body(body) => {
            for expr in &body.exprs {
                walk_expr(v, expr);
            }
        }
        Statement::Comment(_) => {}
    }
}

/// Walks a rule's head terms, body, and `else` chain.
pub fn walk_rule<'a, V: Visitor<'a>>(v: &mut V, rule: &Rule<'a>) {
    if !v.visit_rule(rule) {
        return;
    }
    walk_head(v, &rule.head);
    for expr in &rule.body.exprs {
        walk_expr(v, expr);
    }
    if let Some(next) = &rule.else_rule {
        walk_rule(v, next);
    }
}

fn walk_head<'a, V: Visitor<'a>>(v: &mut V, head: &Head<'a>) {
    walk_term(v, &head.name);
    for arg in &head.args {
        walk_term(v, arg);
    }
    if let Some(key) = &head.key {
        walk_term(v, key);
    }
    if let Some(value) = &head.value {
        walk_term(v, value);
    }
}

/// Walks an expression's terms and `with` modifiers.
pub fn walk_expr<'a, V: Visitor<'a>>(v: &mut V, expr: &Expr<'a>) {
    if !v.visit_expr(expr) {
        return;
    }
    match &expr.terms {
        ExprTerms::Term(term) => walk_term(v, term),
        ExprTerms::Call(terms) => {
            for term in terms {
                walk_term(v, term);
            }
        }
    }
    for with in &expr.with {
        walk_term(v, &with.target);
        walk_term(v, &with.value);
    }
}

/// Walks a term and, unless the visitor declines, its children.
pub fn walk_term<'a, V: Visitor<'a>>(v: &mut V, term: &Term<'a>) {
    if !v.visit_term(term) {
        return;
    }
    match &term.value {
        TermValue::Null
        | TermValue::Bool(_)
        | TermValue::Number(_)
        | TermValue::String(_)
        | TermValue::Var(_) => {}
        TermValue::Ref(elems) | TermValue::Array(elems) | TermValue::Set(elems) => {
            for elem in elems {
                walk_term(v, elem);
            }
        }
        TermValue::Object(pairs) => {
            for (key, value) in pairs {
                walk_term(v, key);
                walk_term(v, value);
            }
        }
        TermValue::ArrayComprehension(ac) => {
            walk_term(v, &ac.term);
            for expr in &ac.body.exprs {
                walk_expr(v, expr);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArrayComprehension, Body, Location};
    use edict_base::Position;

    fn loc() -> Location<'static> {
        Location::synthetic("test.edict", Position::start())
    }

    fn var(name: &'static str) -> Term<'static> {
        Term::new(TermValue::Var(name), loc())
    }

    struct VarCollector(Vec<String>);

    impl<'a> Visitor<'a> for VarCollector {
        fn visit_term(&mut self, term: &Term<'a>) -> bool {
            if let TermValue::Var(name) = term.value {
                self.0.push(name.to_string());
            }
            true
        }
    }

    struct ShallowCollector(Vec<String>);

    impl<'a> Visitor<'a> for ShallowCollector {
        fn visit_term(&mut self, term: &Term<'a>) -> bool {
            match term.value {
                TermValue::Var(name) => {
                    self.0.push(name.to_string());
                    true
                }
                TermValue::ArrayComprehension(_) => false,
                _ => true,
            }
        }
    }

    #[test]
    fn walk_term_reaches_nested_vars() {
        let term = Term::new(
            TermValue::Array(vec![
                var("x"),
                Term::new(TermValue::Object(vec![(var("k"), var("v"))]), loc()),
            ]),
            loc(),
        );
        let mut collector = VarCollector(Vec::new());
        walk_term(&mut collector, &term);
        assert_eq!(collector.0, vec!["x", "k", "v"]);
    }

    #[test]
    fn declining_a_node_skips_its_children() {
        let comprehension = Term::new(
            TermValue::ArrayComprehension(Box::new(ArrayComprehension {
                term: var("inner"),
                body: Body::default(),
            })),
            loc(),
        );
        let term = Term::new(TermValue::Array(vec![var("outer"), comprehension]), loc());
        let mut collector = ShallowCollector(Vec::new());
        walk_term(&mut collector, &term);
        assert_eq!(collector.0, vec!["outer"]);
    }
}
