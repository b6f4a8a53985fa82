//! Terms: scalars, references, collections, and comprehensions.

mod common;

use common::*;
use edict_base::Arena;
use edict_language::ast::{ExprTerms, Statement, Term, TermValue};
use edict_language::InfixOperators;

/// Parses `x = <term>` and hands back the right-hand term.
fn term_of<'a>(arena: &'a Arena, ops: &'a InfixOperators, source: &'a str) -> Term<'a> {
    let program = module(arena, ops, source);
    match &program.statements[..] {
        [Statement::Body(body)] => match &body.exprs[0].terms {
            ExprTerms::Call(terms) => terms[2].clone(),
            other => panic!("expected a call, got {:?}", other),
        },
        other => panic!("expected one body, got {:?}", other),
    }
}

#[test]
fn scalar_terms() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    assert_eq!(term_of(&arena, &ops, "x = 1"), number("1"));
    assert_eq!(term_of(&arena, &ops, "x = -0.5"), number("-0.5"));
    assert_eq!(term_of(&arena, &ops, "x = 2e10"), number("2e10"));
    assert_eq!(term_of(&arena, &ops, "x = 3.5E-2"), number("3.5E-2"));
    assert_eq!(term_of(&arena, &ops, "x = \"hi\""), string("hi"));
    assert_eq!(term_of(&arena, &ops, "x = true"), boolean(true));
    assert_eq!(term_of(&arena, &ops, "x = false"), boolean(false));
    assert_eq!(term_of(&arena, &ops, "x = null"), null());
}

#[test]
fn string_escapes_are_json_decoded() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    assert_eq!(
        term_of(&arena, &ops, r#"x = "a\tb\n\"c\"""#),
        string("a\tb\n\"c\"")
    );
    assert_eq!(term_of(&arena, &ops, r#"x = "é""#), string("é"));
    assert_eq!(term_of(&arena, &ops, r#"x = "\\""#), string("\\"));
}

#[test]
fn unicode_passes_through_strings() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    assert_eq!(term_of(&arena, &ops, "x = \"héllo π\""), string("héllo π"));
}

#[test]
fn dotted_and_bracketed_refs_are_equivalent() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let dotted = term_of(&arena, &ops, "x = a.b.c");
    let bracketed = term_of(&arena, &ops, "x = a[\"b\"][\"c\"]");
    assert_eq!(dotted, bracketed);
    assert_eq!(
        dotted,
        ref_of(vec![var("a"), string("b"), string("c")])
    );
}

#[test]
fn ref_brackets_take_vars_numbers_and_refs() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    assert_eq!(
        term_of(&arena, &ops, "x = a[i]"),
        ref_of(vec![var("a"), var("i")])
    );
    assert_eq!(
        term_of(&arena, &ops, "x = a[0]"),
        ref_of(vec![var("a"), number("0")])
    );
    assert_eq!(
        term_of(&arena, &ops, "x = a[b.c]"),
        ref_of(vec![var("a"), ref_of(vec![var("b"), string("c")])])
    );
}

#[test]
fn arrays_preserve_order() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    assert_eq!(
        term_of(&arena, &ops, "x = [3, 1, 2]"),
        array(vec![number("3"), number("1"), number("2")])
    );
    assert_eq!(term_of(&arena, &ops, "x = []"), array(vec![]));
}

#[test]
fn arrays_accept_trailing_commas() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    assert_eq!(
        term_of(&arena, &ops, "x = [1, 2,]"),
        array(vec![number("1"), number("2")])
    );
}

#[test]
fn nested_composites() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    assert_eq!(
        term_of(&arena, &ops, "x = [[1], [2, 3]]"),
        array(vec![
            array(vec![number("1")]),
            array(vec![number("2"), number("3")]),
        ])
    );
}

#[test]
fn objects_preserve_insertion_order() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    assert_eq!(
        term_of(&arena, &ops, "x = {\"b\": 2, \"a\": 1}"),
        object(vec![
            (string("b"), number("2")),
            (string("a"), number("1")),
        ])
    );
}

#[test]
fn empty_braces_denote_the_empty_object() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    assert_eq!(term_of(&arena, &ops, "x = {}"), object(vec![]));
}

#[test]
fn object_keys_may_be_vars_and_refs() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    assert_eq!(
        term_of(&arena, &ops, "x = {k: 1}"),
        object(vec![(var("k"), number("1"))])
    );
    assert_eq!(
        term_of(&arena, &ops, "x = {a.b: 1}"),
        object(vec![(ref_of(vec![var("a"), string("b")]), number("1"))])
    );
}

#[test]
fn object_trailing_comma() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    assert_eq!(
        term_of(&arena, &ops, "x = {\"a\": 1,}"),
        object(vec![(string("a"), number("1"))])
    );
}

#[test]
fn non_empty_set_uses_braces() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    assert_eq!(
        term_of(&arena, &ops, "x = {1, 2, 3}"),
        set(vec![number("1"), number("2"), number("3")])
    );
}

#[test]
fn empty_set_is_spelled_set_parens() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let program = module(&arena, &ops, "p { x = set() }");
    match &program.statements[..] {
        [Statement::Rule(r)] => match &r.body.exprs[0].terms {
            ExprTerms::Call(terms) => assert_eq!(terms[2], set(vec![])),
            other => panic!("expected a call, got {:?}", other),
        },
        other => panic!("expected one rule, got {:?}", other),
    }
}

#[test]
fn array_comprehension_carries_term_and_body() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let expected_body = body_of(vec![call_expr(vec![var("eq"), var("y"), number("1")])]);
    assert_eq!(
        term_of(&arena, &ops, "x = [y | y = 1]"),
        comprehension(var("y"), expected_body)
    );
}

#[test]
fn comprehension_bodies_may_chain_literals() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let expected_body = body_of(vec![
        call_expr(vec![var("eq"), var("y"), ref_of(vec![var("data"), string("xs")])]),
        call_expr(vec![var("gt"), var("y"), number("0")]),
    ]);
    assert_eq!(
        term_of(&arena, &ops, "x = [y | y = data.xs; y > 0]"),
        comprehension(var("y"), expected_body)
    );
}

#[test]
fn numbers_keep_their_source_spelling() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    match term_of(&arena, &ops, "x = 1.50").value {
        TermValue::Number(text) => assert_eq!(text, "1.50"),
        other => panic!("expected a number, got {:?}", other),
    }
}
