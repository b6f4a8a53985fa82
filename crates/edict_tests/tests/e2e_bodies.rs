//! Rule bodies, literal separators, and comment collection.

mod common;

use common::*;
use edict_base::Arena;
use edict_language::ast::{Statement, TermValue};
use edict_language::InfixOperators;

#[test]
fn newline_separated_literals() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let program = module(&arena, &ops, "p {\n  x = 1\n  y = 2\n}");
    match &program.statements[..] {
        [Statement::Rule(r)] => {
            assert_eq!(
                r.body,
                body_of(vec![
                    call_expr(vec![var("eq"), var("x"), number("1")]),
                    call_expr(vec![var("eq"), var("y"), number("2")]),
                ])
            );
        }
        other => panic!("expected one rule, got {:?}", other),
    }
}

#[test]
fn semicolon_separated_literals() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let program = module(&arena, &ops, "p { x = 1; y = 2 }");
    match &program.statements[..] {
        [Statement::Rule(r)] => assert_eq!(r.body.exprs.len(), 2),
        other => panic!("expected one rule, got {:?}", other),
    }
}

#[test]
fn windows_line_endings_separate_literals() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let program = module(&arena, &ops, "p {\r\n  x = 1\r\n  y = 2\r\n}");
    match &program.statements[..] {
        [Statement::Rule(r)] => assert_eq!(r.body.exprs.len(), 2),
        other => panic!("expected one rule, got {:?}", other),
    }
}

#[test]
fn empty_brace_statement_is_an_empty_object_body() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let program = module(&arena, &ops, "{}");
    match &program.statements[..] {
        [Statement::Body(body)] => {
            assert_eq!(body.exprs.len(), 1);
            assert_eq!(body.exprs[0], term_expr(object(vec![])));
        }
        other => panic!("expected one body, got {:?}", other),
    }
}

#[test]
fn semicolon_chained_top_level_body() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let program = module(&arena, &ops, "x = 1; y = 2");
    match &program.statements[..] {
        [Statement::Body(body)] => assert_eq!(body.exprs.len(), 2),
        other => panic!("expected one body, got {:?}", other),
    }
}

#[test]
fn comments_are_collected_and_kept_as_statements() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let source = "# leading\npackage demo\n\n# about p\np { x = 1 }\n";
    let program = module(&arena, &ops, source);
    let texts: Vec<&str> = program
        .comments
        .iter()
        .map(|c| std::str::from_utf8(c.text).unwrap())
        .collect();
    assert_eq!(texts, vec![" leading", " about p"]);

    let comment_statements = program
        .statements
        .iter()
        .filter(|stmt| matches!(stmt, Statement::Comment(_)))
        .count();
    // The leading comment is swallowed by interstitial whitespace before
    // the first statement; the one between statements is a statement of
    // its own. Both land in the program-level list.
    assert_eq!(comment_statements, 1);
}

#[test]
fn comment_after_semicolon_inside_body() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let program = module(&arena, &ops, "p {\n  x = 1 ;# checked\n  y = 2\n}");
    match &program.statements[..] {
        [Statement::Rule(r)] => assert_eq!(r.body.exprs.len(), 2),
        other => panic!("expected one rule, got {:?}", other),
    }
    assert_eq!(program.comments.len(), 1);
}

#[test]
fn comment_text_excludes_the_hash() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let program = module(&arena, &ops, "#no space\n");
    assert_eq!(program.comments.len(), 1);
    assert_eq!(program.comments[0].text, b"no space");
}

#[test]
fn comments_deduplicate_across_backtracking() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    // The comment sits where several alternatives probe before the rule
    // wins; it must still be collected exactly once.
    let program = module(&arena, &ops, "p {\n  # inner\n  x = 1\n}");
    assert_eq!(program.comments.len(), 1);
    match &program.statements[..] {
        [Statement::Rule(r)] => assert_eq!(r.body.exprs.len(), 1),
        other => panic!("expected one rule, got {:?}", other),
    }
}

#[test]
fn comment_locations_anchor_at_the_hash() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let source = "   # indented\n";
    let program = module(&arena, &ops, source);
    assert_eq!(program.comments.len(), 1);
    let comment = &program.comments[0];
    assert_eq!(comment.loc.pos.offset, 3);
    assert_eq!(source.as_bytes()[comment.loc.pos.offset], b'#');
}

#[test]
fn deeply_nested_composite_in_a_body() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let program = module(
        &arena,
        &ops,
        "p { conf = {\"limits\": [1, 2, {\"hard\": true}]} }",
    );
    match &program.statements[..] {
        [Statement::Rule(r)] => {
            let expected = object(vec![(
                string("limits"),
                array(vec![
                    number("1"),
                    number("2"),
                    object(vec![(string("hard"), boolean(true))]),
                ]),
            )]);
            assert_eq!(
                r.body.exprs[0],
                call_expr(vec![var("eq"), var("conf"), expected])
            );
        }
        other => panic!("expected one rule, got {:?}", other),
    }
}

#[test]
fn number_text_is_preserved_in_bodies() {
    let arena = Arena::new();
    let ops = InfixOperators::default();
    let program = module(&arena, &ops, "p { x = 10.00 }");
    match &program.statements[..] {
        [Statement::Rule(r)] => match &r.body.exprs[0].terms {
            edict_language::ast::ExprTerms::Call(terms) => {
                assert_eq!(terms[2].value, TermValue::Number("10.00"));
            }
            other => panic!("expected call, got {:?}", other),
        },
        other => panic!("expected one rule, got {:?}", other),
    }
}
