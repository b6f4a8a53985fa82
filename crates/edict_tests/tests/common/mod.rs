//! Shared helpers for the integration tests: parsing shorthands and
//! location-free AST constructors for structural comparison (AST equality
//! ignores locations, so a synthetic location is good enough everywhere).
#![allow(dead_code)] // each test binary uses its own subset

use edict_base::{Arena, Position};
use edict_language::ast::{
    ArrayComprehension, Body, Expr, ExprTerms, Head, Location, Program, Rule, Statement, Term,
    TermValue,
};
use edict_language::{parse, Errors, InfixOperators, ParseOptions};

pub fn parse_module<'a>(
    arena: &'a Arena,
    ops: &'a InfixOperators,
    source: &'a str,
) -> Result<Program<'a>, Errors> {
    parse("test.edict", source.as_bytes(), arena, ops, ParseOptions::default())
}

pub fn module<'a>(arena: &'a Arena, ops: &'a InfixOperators, source: &'a str) -> Program<'a> {
    match parse_module(arena, ops, source) {
        Ok(program) => program,
        Err(errors) => panic!("module should parse, got:\n{}\nsource:\n{}", errors, source),
    }
}

pub fn parse_errors(arena: &Arena, ops: &InfixOperators, source: &str) -> Errors {
    match parse("test.edict", source.as_bytes(), arena, ops, ParseOptions::default()) {
        Ok(program) => panic!("expected errors, parsed: {:?}", program),
        Err(errors) => errors,
    }
}

pub fn loc() -> Location<'static> {
    Location::synthetic("test.edict", Position::start())
}

pub fn var(name: &'static str) -> Term<'static> {
    Term::new(TermValue::Var(name), loc())
}

pub fn string(value: &'static str) -> Term<'static> {
    Term::new(TermValue::String(value), loc())
}

pub fn number(text: &'static str) -> Term<'static> {
    Term::new(TermValue::Number(text), loc())
}

pub fn boolean(value: bool) -> Term<'static> {
    Term::new(TermValue::Bool(value), loc())
}

pub fn null() -> Term<'static> {
    Term::new(TermValue::Null, loc())
}

pub fn ref_of(elems: Vec<Term<'static>>) -> Term<'static> {
    Term::new(TermValue::Ref(elems), loc())
}

pub fn array(elems: Vec<Term<'static>>) -> Term<'static> {
    Term::new(TermValue::Array(elems), loc())
}

pub fn object(pairs: Vec<(Term<'static>, Term<'static>)>) -> Term<'static> {
    Term::new(TermValue::Object(pairs), loc())
}

pub fn set(elems: Vec<Term<'static>>) -> Term<'static> {
    Term::new(TermValue::Set(elems), loc())
}

pub fn comprehension(term: Term<'static>, body: Body<'static>) -> Term<'static> {
    Term::new(
        TermValue::ArrayComprehension(Box::new(ArrayComprehension { term, body })),
        loc(),
    )
}

pub fn term_expr(term: Term<'static>) -> Expr<'static> {
    Expr { loc: loc(), negated: false, terms: ExprTerms::Term(term), with: Vec::new() }
}

pub fn call_expr(terms: Vec<Term<'static>>) -> Expr<'static> {
    Expr { loc: loc(), negated: false, terms: ExprTerms::Call(terms), with: Vec::new() }
}

pub fn body_of(exprs: Vec<Expr<'static>>) -> Body<'static> {
    Body::new(exprs)
}

/// A complete-doc head: name plus value.
pub fn head_with_value(name: &'static str, value: Term<'static>) -> Head<'static> {
    Head { loc: loc(), name: var(name), args: Vec::new(), key: None, value: Some(value) }
}

/// A partial head: name plus key, no value.
pub fn head_with_key(name: &'static str, key: Term<'static>) -> Head<'static> {
    Head { loc: loc(), name: var(name), args: Vec::new(), key: Some(key), value: None }
}

pub fn rule(head: Head<'static>, body: Body<'static>) -> Rule<'static> {
    Rule { loc: loc(), default: false, head, body, else_rule: None }
}

/// The statements of a program minus its comments, which tests about rule
/// structure usually want to skip.
pub fn non_comment_statements<'p, 'a>(program: &'p Program<'a>) -> Vec<&'p Statement<'a>> {
    program
        .statements
        .iter()
        .filter(|stmt| !matches!(stmt, Statement::Comment(_)))
        .collect()
}
