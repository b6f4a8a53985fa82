//! Semantic actions for the edict grammar.
//!
//! Each function here is attached to one grammar production and fires when
//! that production matches. Actions read their labeled captures from the
//! [`Scope`], dig positionally into list values the way the grammar laid
//! them out, and build AST nodes located at the matched span.
//!
//! Failure conventions (see `Value::ActionError`): a recoverable error
//! records a diagnostic and leaves the match standing, a fatal error aborts
//! the whole parse.

use crate::ast::{
    is_keyword, is_root_document, ArrayComprehension, Body, Comment, Expr, ExprTerms, Head,
    Import, Location, Package, Program, Rule, Statement, Term, TermValue, With,
    DEFAULT_ROOT_DOCUMENT, INPUT_ROOT_DOCUMENT,
};
use crate::ast::visitor::{walk_term, Visitor};
use crate::value::{ActionContext, ActionError, ActionResult, RuleExt, Scope, Value};

// ── capture helpers ────────────────────────────────────────────────────

static MISSING: Value<'static> = Value::Unit;

/// The value bound under `name`, or unit if the label never matched.
fn label<'s, 'a>(scope: &'s Scope<'a>, name: &str) -> &'s Value<'a> {
    scope.get(name).unwrap_or(&MISSING)
}

/// The `i`-th element of a list value, or unit.
fn at<'s, 'a>(list: &'s [Value<'a>], i: usize) -> &'s Value<'a> {
    list.get(i).unwrap_or(&MISSING)
}

/// A mismatch between the grammar and its actions. Unreachable when the
/// table is consistent; fatal when it is not.
fn malformed<'a>() -> ActionError<'a> {
    ActionError::fatal("grammar produced an unexpected value")
}

fn take_term<'a>(v: &Value<'a>) -> Result<Term<'a>, ActionError<'a>> {
    v.as_term().cloned().ok_or_else(malformed)
}

fn take_body<'a>(v: &Value<'a>) -> Result<Body<'a>, ActionError<'a>> {
    match v {
        Value::Body(body) => Ok(body.clone()),
        _ => Err(malformed()),
    }
}

/// Extracts the term at `i` inside an optional group, if the group matched.
fn opt_term_at<'a>(v: &Value<'a>, i: usize) -> Option<Term<'a>> {
    at(v.as_list(), i).as_term().cloned()
}

/// The matched text as UTF-8. Only called for productions restricted to
/// ASCII, so the fallback never fires in practice.
fn utf8<'a>(bytes: &'a [u8]) -> &'a str {
    std::str::from_utf8(bytes).unwrap_or("")
}

fn bool_term<'a>(value: bool, loc: Location<'a>) -> Term<'a> {
    Term::new(TermValue::Bool(value), loc)
}

/// The synthesized `true` body every default rule carries.
fn true_body<'a>(loc: Location<'a>) -> Body<'a> {
    Body::new(vec![Expr {
        loc,
        negated: false,
        terms: ExprTerms::Term(bool_term(true, loc)),
        with: Vec::new(),
    }])
}

// ── program and statements ─────────────────────────────────────────────

/// `Program`: flattens the head statement and every `(separator, Stmt)`
/// pair into one ordered statement list. Comments are attached by the
/// engine once the parse completes.
pub(crate) fn program<'a>(_cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let mut statements = Vec::new();
    let vals = label(scope, "vals").as_list();
    if !vals.is_empty() {
        push_statement(&mut statements, at(vals, 0));
        for pair in at(vals, 1).as_list() {
            push_statement(&mut statements, at(pair.as_list(), 1));
        }
    }
    Ok(Value::Program(Program { statements, comments: Vec::new() }))
}

fn push_statement<'a>(out: &mut Vec<Statement<'a>>, v: &Value<'a>) {
    match v {
        Value::Statement(stmt) => out.push(stmt.clone()),
        Value::Rules(rules) => out.extend(rules.iter().cloned().map(Statement::Rule)),
        Value::Body(body) => out.push(Statement::Body(body.clone())),
        // Failed actions leave unit placeholders behind; skip them.
        _ => {}
    }
}

/// `Package`: re-roots the path under the default root document and turns
/// the head identifier into a string key.
pub(crate) fn package<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let val = take_term(label(scope, "val"))?;
    let root = Term::new(TermValue::Var(DEFAULT_ROOT_DOCUMENT), cx.synthetic_loc());
    let mut path = Vec::new();
    path.push(root);
    match &val.value {
        TermValue::Var(name) => {
            path.push(Term::new(TermValue::String(*name), val.loc));
        }
        TermValue::Ref(elems) => {
            for (i, elem) in elems.iter().enumerate() {
                if i == 0 {
                    match elem.value {
                        TermValue::Var(name) => {
                            path.push(Term::new(TermValue::String(name), elem.loc));
                        }
                        _ => return Err(malformed()),
                    }
                } else {
                    match elem.value {
                        TermValue::String(_) => path.push(elem.clone()),
                        _ => {
                            return Err(ActionError::recoverable(
                                "package path must contain only ground strings",
                            ))
                        }
                    }
                }
            }
        }
        _ => return Err(malformed()),
    }
    Ok(Value::Statement(Statement::Package(Package { loc: cx.loc(), path })))
}

/// `Import`: validates the path root and tail, attaches the alias.
pub(crate) fn import<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let path = take_term(label(scope, "path"))?;
    validate_target_path(&path, "import path")?;
    let alias = at(label(scope, "alias").as_list(), 3).as_term().and_then(Term::as_var);
    Ok(Value::Statement(Statement::Import(Import { loc: cx.loc(), path, alias })))
}

/// Checks that `term` is a var or ref rooted at a valid root document with
/// an all-string tail. Shared by imports and `with` targets.
fn validate_target_path<'a>(term: &Term<'a>, what: &str) -> Result<(), ActionError<'a>> {
    let root_hint = || {
        format!(
            "{} must begin with one of: {}, {}",
            what, DEFAULT_ROOT_DOCUMENT, INPUT_ROOT_DOCUMENT
        )
    };
    match &term.value {
        TermValue::Var(name) => {
            if !is_root_document(name) {
                return Err(ActionError::recoverable(root_hint()));
            }
        }
        TermValue::Ref(elems) => {
            match elems.first().map(|t| &t.value) {
                Some(TermValue::Var(name)) if is_root_document(name) => {}
                Some(TermValue::Var(_)) => return Err(ActionError::recoverable(root_hint())),
                _ => return Err(malformed()),
            }
            for elem in &elems[1..] {
                if !matches!(elem.value, TermValue::String(_)) {
                    return Err(ActionError::recoverable(format!(
                        "{} must contain only strings",
                        what
                    )));
                }
            }
        }
        _ => return Err(malformed()),
    }
    Ok(())
}

// ── rules ──────────────────────────────────────────────────────────────

/// `DefaultRules`: checks the value is free of vars and refs (closures
/// excepted) and produces a single-rule group with the synthesized `true`
/// body.
pub(crate) fn default_rules<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let name = take_term(label(scope, "name"))?;
    let value = take_term(label(scope, "value"))?;

    let mut check = DefaultValueCheck { problem: None };
    walk_term(&mut check, &value);
    if let Some(problem) = check.problem {
        return Err(ActionError::recoverable(problem));
    }

    let head = Head {
        loc: name.loc,
        name,
        args: Vec::new(),
        key: None,
        value: Some(value),
    };
    let rule = Rule {
        loc: cx.loc(),
        default: true,
        head,
        body: true_body(cx.synthetic_loc()),
        else_rule: None,
    };
    Ok(Value::Rules(vec![rule]))
}

/// Rejects vars and refs in a default rule value. Comprehensions are
/// closures over their own bodies, so the walk does not descend into them.
struct DefaultValueCheck {
    problem: Option<&'static str>,
}

impl<'a> Visitor<'a> for DefaultValueCheck {
    fn visit_term(&mut self, term: &Term<'a>) -> bool {
        if self.problem.is_some() {
            return false;
        }
        match &term.value {
            TermValue::Var(_) => {
                self.problem = Some("default rule value cannot contain variables");
                false
            }
            TermValue::Ref(_) => {
                self.problem = Some("default rule value cannot contain references");
                false
            }
            TermValue::ArrayComprehension(_) => false,
            _ => true,
        }
    }
}

/// `NormalRules`: the primary rule plus its extensions. Duplicate bodies
/// widen the group; `else` clauses chain under the group's last rule.
pub(crate) fn normal_rules<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let head = match label(scope, "head") {
        Value::Head(head) => head.clone(),
        _ => return Err(malformed()),
    };
    let body = take_body(label(scope, "b"))?;
    let mut rules = vec![Rule {
        loc: cx.loc(),
        default: false,
        head: head.clone(),
        body,
        else_rule: None,
    }];
    let mut has_else = false;

    for item in label(scope, "rest").as_list() {
        match at(item.as_list(), 1) {
            Value::RuleExt(RuleExt::Dup { loc, body }) => {
                if has_else {
                    return Err(ActionError::recoverable("expected else keyword"));
                }
                rules.push(Rule {
                    loc: *loc,
                    default: false,
                    head: head.clone(),
                    body: body.clone(),
                    else_rule: None,
                });
            }
            Value::RuleExt(RuleExt::Else { loc, value, body }) => {
                if !head.is_complete() {
                    return Err(ActionError::recoverable(
                        "else keyword cannot be used on rules with a key or arguments",
                    ));
                }
                has_else = true;
                let else_value = value
                    .clone()
                    .unwrap_or_else(|| bool_term(true, Location::synthetic(cx.file, loc.pos)));
                let next = Rule {
                    loc: *loc,
                    default: false,
                    head: Head {
                        loc: head.loc,
                        name: head.name.clone(),
                        args: Vec::new(),
                        key: None,
                        value: Some(else_value),
                    },
                    body: body.clone(),
                    else_rule: None,
                };
                if let Some(last) = rules.last_mut() {
                    chain_else(last, next);
                }
            }
            _ => return Err(malformed()),
        }
    }
    Ok(Value::Rules(rules))
}

/// Appends `next` at the end of `rule`'s else chain.
fn chain_else<'a>(rule: &mut Rule<'a>, next: Rule<'a>) {
    match rule.else_rule {
        Some(ref mut tail) => chain_else(tail, next),
        None => rule.else_rule = Some(Box::new(next)),
    }
}

/// `RuleHead`: name plus optional arguments, key, and value, with the
/// defaulting and key-kind checks.
pub(crate) fn rule_head<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let name = take_term(label(scope, "name"))?;

    let args_group = label(scope, "args").as_list();
    let mut args = Vec::new();
    if !args_group.is_empty() {
        if let Some(first) = at(args_group, 3).as_term() {
            args.push(first.clone());
        }
        for item in at(args_group, 4).as_list() {
            args.push(take_term(at(item.as_list(), 3))?);
        }
    }

    let key = opt_term_at(label(scope, "key"), 3);
    let mut value = opt_term_at(label(scope, "value"), 3);

    if !args.is_empty() && key.is_some() {
        return Err(ActionError::recoverable(
            "rule head cannot have both arguments and a key",
        ));
    }
    if key.is_some() && value.is_some() {
        let valid = matches!(
            key.as_ref().map(|k| &k.value),
            Some(TermValue::Var(_)) | Some(TermValue::String(_)) | Some(TermValue::Ref(_))
        );
        if !valid {
            return Err(ActionError::recoverable(
                "object key must be one of: string, var, ref",
            ));
        }
    }
    if key.is_none() && value.is_none() {
        value = Some(bool_term(true, cx.synthetic_loc()));
    }

    Ok(Value::Head(Head { loc: cx.loc(), name, args, key, value }))
}

/// `Else`: an else clause with its optional value.
pub(crate) fn rule_else<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let value = opt_term_at(label(scope, "value"), 3);
    let body = take_body(label(scope, "b"))?;
    Ok(Value::RuleExt(RuleExt::Else { loc: cx.loc(), value, body }))
}

/// `RuleDup`: another body for the same head.
pub(crate) fn rule_dup<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let body = take_body(label(scope, "b"))?;
    Ok(Value::RuleExt(RuleExt::Dup { loc: cx.loc(), body }))
}

// ── bodies and literals ────────────────────────────────────────────────

/// `NonEmptyBraceEnclosedBody`: an empty inside is a hard stop.
pub(crate) fn non_empty_brace_body<'a>(
    _cx: &ActionContext<'a>,
    scope: &Scope<'a>,
) -> ActionResult<'a> {
    match label(scope, "val") {
        Value::Body(body) => Ok(Value::Body(body.clone())),
        _ => Err(ActionError::fatal("body must be non-empty")),
    }
}

/// `BraceEnclosedBody`: an empty `{}` denotes the body holding one empty
/// object literal.
pub(crate) fn brace_body<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    match label(scope, "val") {
        Value::Body(body) => Ok(Value::Body(body.clone())),
        _ => {
            let loc = cx.loc();
            let empty_object = Term::new(TermValue::Object(Vec::new()), loc);
            Ok(Value::Body(Body::new(vec![Expr {
                loc,
                negated: false,
                terms: ExprTerms::Term(empty_object),
                with: Vec::new(),
            }])))
        }
    }
}

/// `WhitespaceBody` and `NonWhitespaceBody`: the head literal plus every
/// literal after a separator. The separator group puts its literal at
/// index 3 in both productions.
pub(crate) fn body<'a>(_cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let mut exprs = vec![take_expr(label(scope, "head"))?];
    for item in label(scope, "tail").as_list() {
        exprs.push(take_expr(at(item.as_list(), 3))?);
    }
    Ok(Value::Body(Body::new(exprs)))
}

fn take_expr<'a>(v: &Value<'a>) -> Result<Expr<'a>, ActionError<'a>> {
    match v {
        Value::Expr(expr) => Ok(expr.clone()),
        _ => Err(malformed()),
    }
}

/// `Literal`: negation flag, the expression (wrapping a bare term if
/// needed), and the `with` modifiers.
pub(crate) fn literal<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let mut expr = match label(scope, "val") {
        Value::Expr(expr) => expr.clone(),
        Value::Term(term) => Expr {
            loc: cx.loc(),
            negated: false,
            terms: ExprTerms::Term(term.clone()),
            with: Vec::new(),
        },
        _ => return Err(malformed()),
    };
    expr.loc = cx.loc();
    expr.negated = !label(scope, "neg").is_unit();

    let with_group = label(scope, "with").as_list();
    if !with_group.is_empty() {
        let mut with = Vec::new();
        if let Value::With(w) = at(with_group, 1) {
            with.push(w.clone());
        }
        for item in at(with_group, 2).as_list() {
            if let Value::With(w) = at(item.as_list(), 1) {
                with.push(w.clone());
            }
        }
        expr.with = with;
    }
    Ok(Value::Expr(expr))
}

/// `With`: target must look like an import path.
pub(crate) fn with_modifier<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let target = take_term(label(scope, "target"))?;
    validate_target_path(&target, "with target")?;
    let value = take_term(label(scope, "value"))?;
    Ok(Value::With(With { loc: cx.loc(), target, value }))
}

// ── expressions ────────────────────────────────────────────────────────

fn call_expr<'a>(loc: Location<'a>, terms: Vec<Term<'a>>) -> Value<'a> {
    Value::Expr(Expr { loc, negated: false, terms: ExprTerms::Call(terms), with: Vec::new() })
}

/// `InfixArithExpr`: `output = left OP right`, emitted as
/// `[op, left, right, output]`.
pub(crate) fn infix_arith_expr<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let terms = vec![
        take_term(label(scope, "op"))?,
        take_term(label(scope, "left"))?,
        take_term(label(scope, "right"))?,
        take_term(label(scope, "output"))?,
    ];
    Ok(call_expr(cx.loc(), terms))
}

/// `InfixArithExprReverse`: `left OP right = output`, same emitted shape
/// as the forward form.
pub(crate) fn infix_arith_expr_reverse<'a>(
    cx: &ActionContext<'a>,
    scope: &Scope<'a>,
) -> ActionResult<'a> {
    infix_arith_expr(cx, scope)
}

/// `InfixExpr`: a three-term comparison `[op, left, right]`.
pub(crate) fn infix_expr<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let terms = vec![
        take_term(label(scope, "op"))?,
        take_term(label(scope, "left"))?,
        take_term(label(scope, "right"))?,
    ];
    Ok(call_expr(cx.loc(), terms))
}

/// `ArithInfixOp` and `InfixOp`: normalizes the spelling through the
/// operators registry, falling back to the spelling itself.
pub(crate) fn infix_operator<'a>(cx: &ActionContext<'a>, _scope: &Scope<'a>) -> ActionResult<'a> {
    let spelling = utf8(cx.text);
    let name = cx.operators.canonical(spelling).unwrap_or(spelling);
    Ok(Value::Term(Term::new(TermValue::Var(name), cx.loc())))
}

/// `Builtin`: `[name, arg...]`.
pub(crate) fn builtin_call<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let mut terms = vec![take_term(label(scope, "name"))?];
    if let Some(first) = label(scope, "head").as_term() {
        terms.push(first.clone());
    }
    for item in label(scope, "tail").as_list() {
        terms.push(take_term(at(item.as_list(), 3))?);
    }
    Ok(call_expr(cx.loc(), terms))
}

/// `BuiltinName`: joins the dotted identifier chain into one string-valued
/// operator term, so `a.b.c(x)` applies the operator `"a.b.c"`.
pub(crate) fn builtin_name<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let head = take_term(label(scope, "head"))?;
    let head_name = head.as_var().ok_or_else(malformed)?;
    let tail = label(scope, "tail").as_list();
    let name = if tail.is_empty() {
        head_name
    } else {
        let mut joined = String::from(head_name);
        for item in tail {
            let segment = take_term(at(item.as_list(), 1))?;
            joined.push('.');
            joined.push_str(segment.as_var().ok_or_else(malformed)?);
        }
        cx.arena.alloc_str(&joined)
    };
    Ok(Value::Term(Term::new(TermValue::String(name), cx.loc())))
}

// ── terms ──────────────────────────────────────────────────────────────

/// `ArrayComprehension`: `[term | body]`.
pub(crate) fn array_comprehension<'a>(
    cx: &ActionContext<'a>,
    scope: &Scope<'a>,
) -> ActionResult<'a> {
    let term = take_term(label(scope, "term"))?;
    let body = take_body(label(scope, "body"))?;
    Ok(Value::Term(Term::new(
        TermValue::ArrayComprehension(Box::new(ArrayComprehension { term, body })),
        cx.loc(),
    )))
}

/// `Object`: key/value pairs in source order, trailing comma allowed.
pub(crate) fn object<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let mut pairs = Vec::new();
    let vals = label(scope, "vals").as_list();
    if !vals.is_empty() {
        pairs.push((take_term(at(vals, 0))?, take_term(at(vals, 4))?));
        for item in at(vals, 5).as_list() {
            let item = item.as_list();
            pairs.push((take_term(at(item, 3))?, take_term(at(item, 7))?));
        }
    }
    Ok(Value::Term(Term::new(TermValue::Object(pairs), cx.loc())))
}

/// `Array`: elements in source order, trailing comma allowed.
pub(crate) fn array<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let mut elems = Vec::new();
    if let Some(first) = label(scope, "head").as_term() {
        elems.push(first.clone());
    }
    for item in label(scope, "tail").as_list() {
        elems.push(take_term(at(item.as_list(), 3))?);
    }
    Ok(Value::Term(Term::new(TermValue::Array(elems), cx.loc())))
}

/// `SetEmpty`: `set()` is the only spelling of the empty set, since `{}`
/// already denotes the empty object.
pub(crate) fn set_empty<'a>(cx: &ActionContext<'a>, _scope: &Scope<'a>) -> ActionResult<'a> {
    Ok(Value::Term(Term::new(TermValue::Set(Vec::new()), cx.loc())))
}

/// `SetNonEmpty`: elements in source order, trailing comma allowed.
pub(crate) fn set_nonempty<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let mut elems = vec![take_term(label(scope, "head"))?];
    for item in label(scope, "tail").as_list() {
        elems.push(take_term(at(item.as_list(), 3))?);
    }
    Ok(Value::Term(Term::new(TermValue::Set(elems), cx.loc())))
}

/// `Ref`: the head var followed by its tail elements.
pub(crate) fn ref_term<'a>(cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let mut elems = vec![take_term(label(scope, "head"))?];
    for item in label(scope, "tail").as_list() {
        elems.push(take_term(item)?);
    }
    Ok(Value::Term(Term::new(TermValue::Ref(elems), cx.loc())))
}

/// `RefDot`: `a.b` stores `"b"`, making dotted and bracketed access
/// structurally identical.
pub(crate) fn ref_dot<'a>(_cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    let var = take_term(label(scope, "val"))?;
    let name = var.as_var().ok_or_else(malformed)?;
    Ok(Value::Term(Term::new(TermValue::String(name), var.loc)))
}

/// `RefBracket`: passes the bracketed term through.
pub(crate) fn ref_bracket<'a>(_cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    Ok(Value::Term(take_term(label(scope, "val"))?))
}

/// `VarUnchecked`: any identifier-shaped spelling.
pub(crate) fn var_unchecked<'a>(cx: &ActionContext<'a>, _scope: &Scope<'a>) -> ActionResult<'a> {
    Ok(Value::Term(Term::new(TermValue::Var(utf8(cx.text)), cx.loc())))
}

/// `VarChecked`: the identifier, once the keyword predicate has let it
/// through.
pub(crate) fn var_checked<'a>(_cx: &ActionContext<'a>, scope: &Scope<'a>) -> ActionResult<'a> {
    Ok(Value::Term(take_term(label(scope, "val"))?))
}

/// Code predicate behind `VarChecked`: true when the captured identifier
/// spells a reserved word.
pub(crate) fn captured_var_is_keyword(scope: &Scope<'_>) -> bool {
    label(scope, "val")
        .as_term()
        .and_then(Term::as_var)
        .map(is_keyword)
        .unwrap_or(false)
}

// ── scalars ────────────────────────────────────────────────────────────

/// `Number`: the matched text is the canonical decimal string. A spelling
/// the grammar accepted but a float parser rejects means the number rules
/// are broken; that is a hard stop.
pub(crate) fn number<'a>(cx: &ActionContext<'a>, _scope: &Scope<'a>) -> ActionResult<'a> {
    let text = utf8(cx.text);
    if text.parse::<f64>().is_err() {
        return Err(ActionError::fatal(format!("illegal number: {}", text)));
    }
    Ok(Value::Term(Term::new(TermValue::Number(text), cx.loc())))
}

/// `String`: JSON-decodes the quoted literal, escapes and `\uXXXX`
/// included. A bad escape keeps the match with an empty string value and
/// records the decode error.
pub(crate) fn string<'a>(cx: &ActionContext<'a>, _scope: &Scope<'a>) -> ActionResult<'a> {
    let raw = String::from_utf8_lossy(cx.text);
    match serde_json::from_str::<String>(&raw) {
        Ok(decoded) => Ok(Value::Term(Term::new(
            TermValue::String(cx.arena.alloc_str(&decoded)),
            cx.loc(),
        ))),
        Err(err) => Err(ActionError::recoverable_with(
            format!("invalid string literal: {}", err),
            Value::Term(Term::new(TermValue::String(""), cx.loc())),
        )),
    }
}

pub(crate) fn bool_true<'a>(cx: &ActionContext<'a>, _scope: &Scope<'a>) -> ActionResult<'a> {
    Ok(Value::Term(bool_term(true, cx.loc())))
}

pub(crate) fn bool_false<'a>(cx: &ActionContext<'a>, _scope: &Scope<'a>) -> ActionResult<'a> {
    Ok(Value::Term(bool_term(false, cx.loc())))
}

pub(crate) fn null<'a>(cx: &ActionContext<'a>, _scope: &Scope<'a>) -> ActionResult<'a> {
    Ok(Value::Term(Term::new(TermValue::Null, cx.loc())))
}

// ── comments and errors ────────────────────────────────────────────────

/// `Comment`: the text after `#`, located at the `#` itself so leading
/// blanks don't shift the anchor.
pub(crate) fn comment<'a>(cx: &ActionContext<'a>, _scope: &Scope<'a>) -> ActionResult<'a> {
    let hash = match cx.text.iter().position(|&b| b == b'#') {
        Some(i) => i,
        None => return Err(malformed()),
    };
    let mut pos = cx.pos;
    pos.col += hash; // leading blanks are single-column runes
    pos.offset += hash;
    let loc = Location::new(&cx.text[hash..], cx.file, pos);
    let comment = Comment { loc, text: &cx.text[hash + 1..] };
    Ok(Value::Statement(Statement::Comment(comment)))
}

/// `ParseError`: anything this rule consumes is by definition unparseable.
pub(crate) fn parse_error<'a>(cx: &ActionContext<'a>, _scope: &Scope<'a>) -> ActionResult<'a> {
    Err(ActionError::fatal(format!(
        "no match found, unexpected '{}'",
        String::from_utf8_lossy(cx.text)
    )))
}
