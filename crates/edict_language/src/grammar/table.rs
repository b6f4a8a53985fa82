//! The edict grammar.
//!
//! One fixed table, built on first use and shared by every parser in the
//! process. Rules are registered under the names diagnostics use; ordering
//! of choice alternatives is part of the language definition (first match
//! wins), so the order below is load-bearing throughout.

use std::sync::OnceLock;

use crate::actions;
use crate::grammar::{ClassSpec, Grammar};

static GRAMMAR: OnceLock<Grammar> = OnceLock::new();

/// The process-wide grammar table.
pub fn grammar() -> &'static Grammar {
    GRAMMAR.get_or_init(build)
}

const fn chars_class(want: &'static str, chars: &'static [char]) -> ClassSpec {
    ClassSpec {
        want,
        chars,
        ranges: &[],
        categories: &[],
        inverted: false,
        ignore_case: false,
    }
}

const fn ranged_class(
    want: &'static str,
    chars: &'static [char],
    ranges: &'static [(char, char)],
) -> ClassSpec {
    ClassSpec {
        want,
        chars,
        ranges,
        categories: &[],
        inverted: false,
        ignore_case: false,
    }
}

const SPACE_TAB: ClassSpec = chars_class("[ \\t]", &[' ', '\t']);
const WHITESPACE: ClassSpec = chars_class("[ \\t\\r\\n]", &[' ', '\t', '\r', '\n']);
const LINE_BREAK: ClassSpec = chars_class("[\\r\\n]", &['\r', '\n']);
const NOT_LINE_BREAK: ClassSpec = ClassSpec {
    want: "[^\\r\\n]",
    chars: &['\r', '\n'],
    ranges: &[],
    categories: &[],
    inverted: true,
    ignore_case: false,
};
const ASCII_LETTER: ClassSpec = ranged_class("[A-Za-z_]", &['_'], &[('A', 'Z'), ('a', 'z')]);
const DECIMAL_DIGIT: ClassSpec = ranged_class("[0-9]", &[], &[('0', '9')]);
const NON_ZERO_DECIMAL_DIGIT: ClassSpec = ranged_class("[1-9]", &[], &[('1', '9')]);
const HEX_DIGIT: ClassSpec =
    ranged_class("[0-9a-fA-F]", &[], &[('0', '9'), ('a', 'f'), ('A', 'F')]);
const SIGN: ClassSpec = chars_class("[+-]", &['+', '-']);
const STRING_ESCAPED: ClassSpec =
    ranged_class("[\\x00-\\x1f\"\\\\]", &['"', '\\'], &[('\u{0000}', '\u{001f}')]);
const SINGLE_CHAR_ESCAPE: ClassSpec =
    chars_class("[\"\\\\/bfnrt]", &['"', '\\', '/', 'b', 'f', 'n', 'r', 't']);

fn build() -> Grammar {
    let mut g = Grammar::builder();

    // Shared rule references. A reference node can be reused by any number
    // of parents; sharing keeps the memo table denser.
    let under = g.r("_");
    let ws = g.r("ws");
    let term = g.r("Term");
    let var = g.r("Var");
    let literal = g.r("Literal");
    let comment = g.r("Comment");
    let whitespace_body = g.r("WhitespaceBody");
    let non_empty_body = g.r("NonEmptyBraceEnclosedBody");
    let comma = g.lit(",");
    let eq = g.lit("=");
    let open_brace = g.lit("{");
    let close_brace = g.lit("}");
    let open_bracket = g.lit("[");
    let close_bracket = g.lit("]");

    // Program "program" := _ ( Stmt ( (ws | ParseError) Stmt )* )? _ EOF
    {
        let stmt = g.r("Stmt");
        let parse_error = g.r("ParseError");
        let sep = g.choice(vec![ws, parse_error]);
        let tail_item = g.seq(vec![sep, stmt]);
        let tail = g.star(tail_item);
        let stmts = g.seq(vec![stmt, tail]);
        let stmts_opt = g.opt(stmts);
        let vals = g.label("vals", stmts_opt);
        let eof = g.r("EOF");
        let body = g.seq(vec![under, vals, under, eof]);
        let expr = g.action(actions::program, body);
        g.rule("Program", Some("program"), expr);
    }

    // Stmt := Package | Import | Rules | Body | Comment | ParseError
    {
        let package = g.r("Package");
        let import = g.r("Import");
        let rules = g.r("Rules");
        let body = g.r("Body");
        let parse_error = g.r("ParseError");
        let expr = g.choice(vec![package, import, rules, body, comment, parse_error]);
        g.rule("Stmt", None, expr);
    }

    // Package := "package" ws (Ref | Var)
    {
        let keyword = g.lit("package");
        let reference = g.r("Ref");
        let path = g.choice(vec![reference, var]);
        let val = g.label("val", path);
        let body = g.seq(vec![keyword, ws, val]);
        let expr = g.action(actions::package, body);
        g.rule("Package", None, expr);
    }

    // Import := "import" ws (Ref | Var) ( ws "as" ws Var )?
    {
        let keyword = g.lit("import");
        let reference = g.r("Ref");
        let path_choice = g.choice(vec![reference, var]);
        let path = g.label("path", path_choice);
        let as_kw = g.lit("as");
        let alias_group = g.seq(vec![ws, as_kw, ws, var]);
        let alias_opt = g.opt(alias_group);
        let alias = g.label("alias", alias_opt);
        let body = g.seq(vec![keyword, ws, path, alias]);
        let expr = g.action(actions::import, body);
        g.rule("Import", None, expr);
    }

    // Rules := DefaultRules | NormalRules
    {
        let default_rules = g.r("DefaultRules");
        let normal_rules = g.r("NormalRules");
        let expr = g.choice(vec![default_rules, normal_rules]);
        g.rule("Rules", None, expr);
    }

    // DefaultRules := "default" ws Var _ "=" _ Term
    {
        let keyword = g.lit("default");
        let name = g.label("name", var);
        let value = g.label("value", term);
        let body = g.seq(vec![keyword, ws, name, under, eq, under, value]);
        let expr = g.action(actions::default_rules, body);
        g.rule("DefaultRules", None, expr);
    }

    // NormalRules := RuleHead _ NonEmptyBraceEnclosedBody ( _ RuleExt )*
    {
        let rule_head = g.r("RuleHead");
        let head = g.label("head", rule_head);
        let b = g.label("b", non_empty_body);
        let rule_ext = g.r("RuleExt");
        let ext_item = g.seq(vec![under, rule_ext]);
        let ext_star = g.star(ext_item);
        let rest = g.label("rest", ext_star);
        let body = g.seq(vec![head, under, b, rest]);
        let expr = g.action(actions::normal_rules, body);
        g.rule("NormalRules", None, expr);
    }

    // RuleHead := Var ( _ "(" _ Term? ( _ "," _ Term )* _ ")" )?
    //                 ( _ "[" _ Term _ "]" _ )? ( _ "=" _ Term )?
    {
        let name = g.label("name", var);
        let open_paren = g.lit("(");
        let close_paren = g.lit(")");
        let first_arg = g.opt(term);
        let arg_item = g.seq(vec![under, comma, under, term]);
        let arg_star = g.star(arg_item);
        let args_group = g.seq(vec![under, open_paren, under, first_arg, arg_star, under, close_paren]);
        let args_opt = g.opt(args_group);
        let args = g.label("args", args_opt);
        let key_group = g.seq(vec![under, open_bracket, under, term, under, close_bracket, under]);
        let key_opt = g.opt(key_group);
        let key = g.label("key", key_opt);
        let value_group = g.seq(vec![under, eq, under, term]);
        let value_opt = g.opt(value_group);
        let value = g.label("value", value_opt);
        let body = g.seq(vec![name, args, key, value]);
        let expr = g.action(actions::rule_head, body);
        g.rule("RuleHead", None, expr);
    }

    // RuleExt := Else | RuleDup
    {
        let rule_else = g.r("Else");
        let rule_dup = g.r("RuleDup");
        let expr = g.choice(vec![rule_else, rule_dup]);
        g.rule("RuleExt", None, expr);
    }

    // Else := "else" ( _ "=" _ Term )? _ NonEmptyBraceEnclosedBody
    {
        let keyword = g.lit("else");
        let value_group = g.seq(vec![under, eq, under, term]);
        let value_opt = g.opt(value_group);
        let value = g.label("value", value_opt);
        let b = g.label("b", non_empty_body);
        let body = g.seq(vec![keyword, value, under, b]);
        let expr = g.action(actions::rule_else, body);
        g.rule("Else", None, expr);
    }

    // RuleDup := NonEmptyBraceEnclosedBody
    {
        let b = g.label("b", non_empty_body);
        let expr = g.action(actions::rule_dup, b);
        g.rule("RuleDup", None, expr);
    }

    // Body := BraceEnclosedBody | NonWhitespaceBody
    {
        let brace = g.r("BraceEnclosedBody");
        let bare = g.r("NonWhitespaceBody");
        let expr = g.choice(vec![brace, bare]);
        g.rule("Body", None, expr);
    }

    // NonEmptyBraceEnclosedBody := "{" _ WhitespaceBody? _ "}", which must
    // have matched something between the braces.
    {
        let inner = g.opt(whitespace_body);
        let val = g.label("val", inner);
        let body = g.seq(vec![open_brace, under, val, under, close_brace]);
        let expr = g.action(actions::non_empty_brace_body, body);
        g.rule("NonEmptyBraceEnclosedBody", None, expr);
    }

    // BraceEnclosedBody := "{" _ WhitespaceBody? _ "}"
    {
        let inner = g.opt(whitespace_body);
        let val = g.label("val", inner);
        let body = g.seq(vec![open_brace, under, val, under, close_brace]);
        let expr = g.action(actions::brace_body, body);
        g.rule("BraceEnclosedBody", None, expr);
    }

    // WhitespaceBody := Literal ( [ \t]* ( ";" Comment? | Comment? [\r\n] ) _ Literal )*
    {
        let head = g.label("head", literal);
        let blanks = g.class(SPACE_TAB);
        let blanks_star = g.star(blanks);
        let semicolon = g.lit(";");
        let opt_comment_a = g.opt(comment);
        let semi_sep = g.seq(vec![semicolon, opt_comment_a]);
        let opt_comment_b = g.opt(comment);
        let line_break = g.class(LINE_BREAK);
        let line_sep = g.seq(vec![opt_comment_b, line_break]);
        let sep = g.choice(vec![semi_sep, line_sep]);
        let tail_item = g.seq(vec![blanks_star, sep, under, literal]);
        let tail_star = g.star(tail_item);
        let tail = g.label("tail", tail_star);
        let body = g.seq(vec![head, tail]);
        let expr = g.action(actions::body, body);
        g.rule("WhitespaceBody", None, expr);
    }

    // NonWhitespaceBody := Literal ( _ ";" _ (Literal | ParseError) )*
    {
        let head = g.label("head", literal);
        let semicolon = g.lit(";");
        let parse_error = g.r("ParseError");
        let item = g.choice(vec![literal, parse_error]);
        let tail_item = g.seq(vec![under, semicolon, under, item]);
        let tail_star = g.star(tail_item);
        let tail = g.label("tail", tail_star);
        let body = g.seq(vec![head, tail]);
        let expr = g.action(actions::body, body);
        g.rule("NonWhitespaceBody", None, expr);
    }

    // Literal := ( "not" ws )? Expr ( ws With ( ws With )* )?
    {
        let not_kw = g.lit("not");
        let neg_group = g.seq(vec![not_kw, ws]);
        let neg_opt = g.opt(neg_group);
        let neg = g.label("neg", neg_opt);
        let expr_rule = g.r("Expr");
        let val = g.label("val", expr_rule);
        let with_rule = g.r("With");
        let with_more = g.seq(vec![ws, with_rule]);
        let with_more_star = g.star(with_more);
        let with_group = g.seq(vec![ws, with_rule, with_more_star]);
        let with_opt = g.opt(with_group);
        let with = g.label("with", with_opt);
        let body = g.seq(vec![neg, val, with]);
        let expr = g.action(actions::literal, body);
        g.rule("Literal", None, expr);
    }

    // With := "with" ws Term ws "as" ws Term
    {
        let with_kw = g.lit("with");
        let as_kw = g.lit("as");
        let target = g.label("target", term);
        let value = g.label("value", term);
        let body = g.seq(vec![with_kw, ws, target, ws, as_kw, ws, value]);
        let expr = g.action(actions::with_modifier, body);
        g.rule("With", None, expr);
    }

    // Expr := InfixArithExpr | InfixArithExprReverse | InfixExpr
    //       | PrefixExpr | Term
    {
        let arith = g.r("InfixArithExpr");
        let arith_rev = g.r("InfixArithExprReverse");
        let infix = g.r("InfixExpr");
        let prefix = g.r("PrefixExpr");
        let expr = g.choice(vec![arith, arith_rev, infix, prefix, term]);
        g.rule("Expr", None, expr);
    }

    // InfixArithExpr := Term _ "=" _ Term _ ArithInfixOp _ Term
    // The leftmost term is the output; `x = 1 + 2` assigns into x.
    {
        let op_rule = g.r("ArithInfixOp");
        let output = g.label("output", term);
        let left = g.label("left", term);
        let op = g.label("op", op_rule);
        let right = g.label("right", term);
        let body = g.seq(vec![output, under, eq, under, left, under, op, under, right]);
        let expr = g.action(actions::infix_arith_expr, body);
        g.rule("InfixArithExpr", None, expr);
    }

    // InfixArithExprReverse := Term _ ArithInfixOp _ Term _ "=" _ Term
    {
        let op_rule = g.r("ArithInfixOp");
        let left = g.label("left", term);
        let op = g.label("op", op_rule);
        let right = g.label("right", term);
        let output = g.label("output", term);
        let body = g.seq(vec![left, under, op, under, right, under, eq, under, output]);
        let expr = g.action(actions::infix_arith_expr_reverse, body);
        g.rule("InfixArithExprReverse", None, expr);
    }

    // ArithInfixOp := "+" | "-" | "*" | "/" | "&" | "|" | "-"
    // The second "-" is inert under ordered choice but kept: removing it
    // would change the table's alternative numbering.
    {
        let plus = g.lit("+");
        let minus = g.lit("-");
        let mul = g.lit("*");
        let div = g.lit("/");
        let amp = g.lit("&");
        let pipe = g.lit("|");
        let minus_again = g.lit("-");
        let spelling = g.choice(vec![plus, minus, mul, div, amp, pipe, minus_again]);
        let expr = g.action(actions::infix_operator, spelling);
        g.rule("ArithInfixOp", None, expr);
    }

    // InfixExpr := Term _ InfixOp _ Term
    {
        let op_rule = g.r("InfixOp");
        let left = g.label("left", term);
        let op = g.label("op", op_rule);
        let right = g.label("right", term);
        let body = g.seq(vec![left, under, op, under, right]);
        let expr = g.action(actions::infix_expr, body);
        g.rule("InfixExpr", None, expr);
    }

    // InfixOp := "=" | "!=" | "<=" | ">=" | "<" | ">"
    {
        let equal = g.lit("=");
        let not_equal = g.lit("!=");
        let lte = g.lit("<=");
        let gte = g.lit(">=");
        let lt = g.lit("<");
        let gt = g.lit(">");
        let spelling = g.choice(vec![equal, not_equal, lte, gte, lt, gt]);
        let expr = g.action(actions::infix_operator, spelling);
        g.rule("InfixOp", None, expr);
    }

    // PrefixExpr := SetEmpty | Builtin
    {
        let set_empty = g.r("SetEmpty");
        let builtin = g.r("Builtin");
        let expr = g.choice(vec![set_empty, builtin]);
        g.rule("PrefixExpr", None, expr);
    }

    // Builtin := BuiltinName "(" _ Term? ( _ "," _ Term )* _ ")"
    {
        let name_rule = g.r("BuiltinName");
        let name = g.label("name", name_rule);
        let open_paren = g.lit("(");
        let close_paren = g.lit(")");
        let first = g.opt(term);
        let head = g.label("head", first);
        let tail_item = g.seq(vec![under, comma, under, term]);
        let tail_star = g.star(tail_item);
        let tail = g.label("tail", tail_star);
        let body = g.seq(vec![name, open_paren, under, head, tail, under, close_paren]);
        let expr = g.action(actions::builtin_call, body);
        g.rule("Builtin", None, expr);
    }

    // BuiltinName := Var ( "." Var )*
    {
        let head = g.label("head", var);
        let dot = g.lit(".");
        let tail_item = g.seq(vec![dot, var]);
        let tail_star = g.star(tail_item);
        let tail = g.label("tail", tail_star);
        let body = g.seq(vec![head, tail]);
        let expr = g.action(actions::builtin_name, body);
        g.rule("BuiltinName", None, expr);
    }

    // Term := Comprehension | Composite | Scalar | Ref | Var
    {
        let comprehension = g.r("Comprehension");
        let composite = g.r("Composite");
        let scalar = g.r("Scalar");
        let reference = g.r("Ref");
        let expr = g.choice(vec![comprehension, composite, scalar, reference, var]);
        g.rule("Term", None, expr);
    }

    // Comprehension := ArrayComprehension
    {
        let expr = g.r("ArrayComprehension");
        g.rule("Comprehension", None, expr);
    }

    // ArrayComprehension := "[" _ Term _ "|" _ WhitespaceBody _ "]"
    {
        let pipe = g.lit("|");
        let head = g.label("term", term);
        let comp_body = g.label("body", whitespace_body);
        let body = g.seq(vec![
            open_bracket,
            under,
            head,
            under,
            pipe,
            under,
            comp_body,
            under,
            close_bracket,
        ]);
        let expr = g.action(actions::array_comprehension, body);
        g.rule("ArrayComprehension", None, expr);
    }

    // Composite := Object | Array | Set
    {
        let object = g.r("Object");
        let array = g.r("Array");
        let set = g.r("Set");
        let expr = g.choice(vec![object, array, set]);
        g.rule("Composite", None, expr);
    }

    // Scalar := Number | String | Bool | Null
    {
        let number = g.r("Number");
        let string = g.r("String");
        let boolean = g.r("Bool");
        let null = g.r("Null");
        let expr = g.choice(vec![number, string, boolean, null]);
        g.rule("Scalar", None, expr);
    }

    // Key := Scalar | Ref | Var
    {
        let scalar = g.r("Scalar");
        let reference = g.r("Ref");
        let expr = g.choice(vec![scalar, reference, var]);
        g.rule("Key", None, expr);
    }

    // Object := "{" _ ( Key _ ":" _ Term ( _ "," _ Key _ ":" _ Term )* )? _ ","? _ "}"
    {
        let key = g.r("Key");
        let colon = g.lit(":");
        let pair_tail = g.seq(vec![under, comma, under, key, under, colon, under, term]);
        let pair_tail_star = g.star(pair_tail);
        let pairs = g.seq(vec![key, under, colon, under, term, pair_tail_star]);
        let pairs_opt = g.opt(pairs);
        let vals = g.label("vals", pairs_opt);
        let trailing = g.opt(comma);
        let body = g.seq(vec![open_brace, under, vals, under, trailing, under, close_brace]);
        let expr = g.action(actions::object, body);
        g.rule("Object", None, expr);
    }

    // Array := "[" _ Term? ( _ "," _ Term )* _ ","? _ "]"
    {
        let first = g.opt(term);
        let head = g.label("head", first);
        let tail_item = g.seq(vec![under, comma, under, term]);
        let tail_star = g.star(tail_item);
        let tail = g.label("tail", tail_star);
        let trailing = g.opt(comma);
        let body = g.seq(vec![open_bracket, under, head, tail, under, trailing, under, close_bracket]);
        let expr = g.action(actions::array, body);
        g.rule("Array", None, expr);
    }

    // Set := SetEmpty | SetNonEmpty
    {
        let set_empty = g.r("SetEmpty");
        let set_non_empty = g.r("SetNonEmpty");
        let expr = g.choice(vec![set_empty, set_non_empty]);
        g.rule("Set", None, expr);
    }

    // SetEmpty := "set(" _ ")"
    {
        let open = g.lit("set(");
        let close = g.lit(")");
        let body = g.seq(vec![open, under, close]);
        let expr = g.action(actions::set_empty, body);
        g.rule("SetEmpty", None, expr);
    }

    // SetNonEmpty := "{" _ Term ( _ "," _ Term )* _ ","? _ "}"
    {
        let head = g.label("head", term);
        let tail_item = g.seq(vec![under, comma, under, term]);
        let tail_star = g.star(tail_item);
        let tail = g.label("tail", tail_star);
        let trailing = g.opt(comma);
        let body = g.seq(vec![open_brace, under, head, tail, under, trailing, under, close_brace]);
        let expr = g.action(actions::set_nonempty, body);
        g.rule("SetNonEmpty", None, expr);
    }

    // Ref := Var ( RefDot | RefBracket )+
    {
        let head = g.label("head", var);
        let ref_dot = g.r("RefDot");
        let ref_bracket = g.r("RefBracket");
        let elem = g.choice(vec![ref_dot, ref_bracket]);
        let elems = g.plus(elem);
        let tail = g.label("tail", elems);
        let body = g.seq(vec![head, tail]);
        let expr = g.action(actions::ref_term, body);
        g.rule("Ref", None, expr);
    }

    // RefDot := "." Var
    {
        let dot = g.lit(".");
        let val = g.label("val", var);
        let body = g.seq(vec![dot, val]);
        let expr = g.action(actions::ref_dot, body);
        g.rule("RefDot", None, expr);
    }

    // RefBracket := "[" (Ref | Scalar | Var) "]"
    {
        let reference = g.r("Ref");
        let scalar = g.r("Scalar");
        let inner = g.choice(vec![reference, scalar, var]);
        let val = g.label("val", inner);
        let body = g.seq(vec![open_bracket, val, close_bracket]);
        let expr = g.action(actions::ref_bracket, body);
        g.rule("RefBracket", None, expr);
    }

    // Var "var" := VarChecked
    {
        let expr = g.r("VarChecked");
        g.rule("Var", Some("var"), expr);
    }

    // VarChecked := VarUnchecked, rejected if it spells a keyword
    {
        let unchecked = g.r("VarUnchecked");
        let val = g.label("val", unchecked);
        let keyword_guard = g.not_code(actions::captured_var_is_keyword);
        let body = g.seq(vec![val, keyword_guard]);
        let expr = g.action(actions::var_checked, body);
        g.rule("VarChecked", None, expr);
    }

    // VarUnchecked := AsciiLetter ( AsciiLetter | DecimalDigit )*
    {
        let first = g.r("AsciiLetter");
        let letter = g.r("AsciiLetter");
        let digit = g.r("DecimalDigit");
        let rest = g.choice(vec![letter, digit]);
        let rest_star = g.star(rest);
        let body = g.seq(vec![first, rest_star]);
        let expr = g.action(actions::var_unchecked, body);
        g.rule("VarUnchecked", None, expr);
    }

    // Number "number" := "-"? ( Float | Integer )
    {
        let minus = g.lit("-");
        let sign = g.opt(minus);
        let float = g.r("Float");
        let integer = g.r("Integer");
        let magnitude = g.choice(vec![float, integer]);
        let body = g.seq(vec![sign, magnitude]);
        let expr = g.action(actions::number, body);
        g.rule("Number", Some("number"), expr);
    }

    // Float := ExponentFloat | PointFloat
    {
        let exponent_float = g.r("ExponentFloat");
        let point_float = g.r("PointFloat");
        let expr = g.choice(vec![exponent_float, point_float]);
        g.rule("Float", None, expr);
    }

    // ExponentFloat := ( PointFloat | Integer ) Exponent
    {
        let point_float = g.r("PointFloat");
        let integer = g.r("Integer");
        let mantissa = g.choice(vec![point_float, integer]);
        let exponent = g.r("Exponent");
        let expr = g.seq(vec![mantissa, exponent]);
        g.rule("ExponentFloat", None, expr);
    }

    // PointFloat := Integer? Fraction
    {
        let integer = g.r("Integer");
        let whole = g.opt(integer);
        let fraction = g.r("Fraction");
        let expr = g.seq(vec![whole, fraction]);
        g.rule("PointFloat", None, expr);
    }

    // Fraction := "." DecimalDigit+
    {
        let dot = g.lit(".");
        let digit = g.r("DecimalDigit");
        let digits = g.plus(digit);
        let expr = g.seq(vec![dot, digits]);
        g.rule("Fraction", None, expr);
    }

    // Exponent := "e"i [+-]? DecimalDigit+
    {
        let e = g.lit_ic("e");
        let sign_class = g.class(SIGN);
        let sign = g.opt(sign_class);
        let digit = g.r("DecimalDigit");
        let digits = g.plus(digit);
        let expr = g.seq(vec![e, sign, digits]);
        g.rule("Exponent", None, expr);
    }

    // Integer := "0" | NonZeroDecimalDigit DecimalDigit*
    {
        let zero = g.lit("0");
        let non_zero = g.r("NonZeroDecimalDigit");
        let digit = g.r("DecimalDigit");
        let digit_star = g.star(digit);
        let multi = g.seq(vec![non_zero, digit_star]);
        let expr = g.choice(vec![zero, multi]);
        g.rule("Integer", None, expr);
    }

    // String "string" := '"' Char* '"'
    {
        let quote_open = g.lit("\"");
        let quote_close = g.lit("\"");
        let ch = g.r("Char");
        let chars = g.star(ch);
        let body = g.seq(vec![quote_open, chars, quote_close]);
        let expr = g.action(actions::string, body);
        g.rule("String", Some("string"), expr);
    }

    // Char := !EscapedChar . | "\" EscapeSequence
    {
        let escaped = g.r("EscapedChar");
        let not_escaped = g.not_pred(escaped);
        let any = g.any();
        let plain = g.seq(vec![not_escaped, any]);
        let backslash = g.lit("\\");
        let sequence = g.r("EscapeSequence");
        let escape = g.seq(vec![backslash, sequence]);
        let expr = g.choice(vec![plain, escape]);
        g.rule("Char", None, expr);
    }

    // EscapedChar := [\x00-\x1f"\]
    {
        let expr = g.class(STRING_ESCAPED);
        g.rule("EscapedChar", None, expr);
    }

    // EscapeSequence := SingleCharEscape | UnicodeEscape
    {
        let single = g.r("SingleCharEscape");
        let unicode = g.r("UnicodeEscape");
        let expr = g.choice(vec![single, unicode]);
        g.rule("EscapeSequence", None, expr);
    }

    // SingleCharEscape := ["\/bfnrt]
    {
        let expr = g.class(SINGLE_CHAR_ESCAPE);
        g.rule("SingleCharEscape", None, expr);
    }

    // UnicodeEscape := "u" HexDigit HexDigit HexDigit HexDigit
    {
        let u = g.lit("u");
        let h1 = g.r("HexDigit");
        let h2 = g.r("HexDigit");
        let h3 = g.r("HexDigit");
        let h4 = g.r("HexDigit");
        let expr = g.seq(vec![u, h1, h2, h3, h4]);
        g.rule("UnicodeEscape", None, expr);
    }

    // Bool "bool" := "true" | "false"
    {
        let true_lit = g.lit("true");
        let true_term = g.action(actions::bool_true, true_lit);
        let false_lit = g.lit("false");
        let false_term = g.action(actions::bool_false, false_lit);
        let expr = g.choice(vec![true_term, false_term]);
        g.rule("Bool", Some("bool"), expr);
    }

    // Null "null" := "null"
    {
        let null_lit = g.lit("null");
        let expr = g.action(actions::null, null_lit);
        g.rule("Null", Some("null"), expr);
    }

    // AsciiLetter := [A-Za-z_]
    {
        let expr = g.class(ASCII_LETTER);
        g.rule("AsciiLetter", None, expr);
    }

    // DecimalDigit := [0-9]
    {
        let expr = g.class(DECIMAL_DIGIT);
        g.rule("DecimalDigit", None, expr);
    }

    // NonZeroDecimalDigit := [1-9]
    {
        let expr = g.class(NON_ZERO_DECIMAL_DIGIT);
        g.rule("NonZeroDecimalDigit", None, expr);
    }

    // HexDigit := [0-9a-fA-F]
    {
        let expr = g.class(HEX_DIGIT);
        g.rule("HexDigit", None, expr);
    }

    // ws "whitespace" := [ \t\r\n]+
    {
        let space = g.class(WHITESPACE);
        let expr = g.plus(space);
        g.rule("ws", Some("whitespace"), expr);
    }

    // _ := ( [ \t\r\n] | Comment )*
    {
        let space = g.class(WHITESPACE);
        let alt = g.choice(vec![space, comment]);
        let expr = g.star(alt);
        g.rule("_", None, expr);
    }

    // Comment "comment" := [ \t]* "#" [^\r\n]*
    {
        let blanks = g.class(SPACE_TAB);
        let blanks_star = g.star(blanks);
        let hash = g.lit("#");
        let rest = g.class(NOT_LINE_BREAK);
        let rest_star = g.star(rest);
        let body = g.seq(vec![blanks_star, hash, rest_star]);
        let expr = g.action(actions::comment, body);
        g.rule("Comment", Some("comment"), expr);
    }

    // EOF := !.
    {
        let any = g.any();
        let expr = g.not_pred(any);
        g.rule("EOF", None, expr);
    }

    // ParseError := . — consuming anything here aborts the parse.
    {
        let any = g.any();
        let expr = g.action(actions::parse_error, any);
        g.rule("ParseError", None, expr);
    }

    g.finish("Program")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Node;

    #[test]
    fn grammar_builds_once() {
        let a = grammar();
        let b = grammar();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn entry_rule_is_program() {
        let g = grammar();
        assert_eq!(g.rule(g.entry()).name, "Program");
    }

    #[test]
    fn all_productions_are_registered() {
        let g = grammar();
        for name in [
            "Program", "Stmt", "Package", "Import", "Rules", "DefaultRules", "NormalRules",
            "RuleHead", "RuleExt", "Else", "RuleDup", "Body", "NonEmptyBraceEnclosedBody",
            "BraceEnclosedBody", "WhitespaceBody", "NonWhitespaceBody", "Literal", "With",
            "Expr", "InfixArithExpr", "InfixArithExprReverse", "ArithInfixOp", "InfixExpr",
            "InfixOp", "PrefixExpr", "Builtin", "BuiltinName", "Term", "Comprehension",
            "ArrayComprehension", "Composite", "Scalar", "Key", "Object", "Array", "Set",
            "SetEmpty", "SetNonEmpty", "Ref", "RefDot", "RefBracket", "Var", "VarChecked",
            "VarUnchecked", "Number", "Float", "ExponentFloat", "PointFloat", "Fraction",
            "Exponent", "Integer", "String", "Char", "EscapedChar", "EscapeSequence",
            "SingleCharEscape", "UnicodeEscape", "Bool", "Null", "AsciiLetter",
            "DecimalDigit", "NonZeroDecimalDigit", "HexDigit", "ws", "_", "Comment", "EOF",
            "ParseError",
        ] {
            assert!(g.lookup(name).is_some(), "rule {} missing", name);
        }
    }

    #[test]
    fn arith_op_keeps_duplicate_minus_alternative() {
        let g = grammar();
        let id = g.lookup("ArithInfixOp").expect("ArithInfixOp");
        let expr = g.rule(id).expr;
        let spelling = match g.node(expr) {
            Node::Action { expr, .. } => *expr,
            other => panic!("expected action, got {:?}", other),
        };
        match g.node(spelling) {
            Node::Choice(alts) => {
                let minus_count = alts
                    .iter()
                    .filter(|&&alt| matches!(g.node(alt), Node::Lit { text: "-", .. }))
                    .count();
                assert_eq!(alts.len(), 7);
                assert_eq!(minus_count, 2);
            }
            other => panic!("expected choice, got {:?}", other),
        }
    }

    #[test]
    fn display_names_cover_token_rules() {
        let g = grammar();
        for (name, display) in [
            ("Program", "program"),
            ("Var", "var"),
            ("Number", "number"),
            ("String", "string"),
            ("ws", "whitespace"),
            ("Comment", "comment"),
        ] {
            let id = g.lookup(name).expect(name);
            assert_eq!(g.rule(id).display_name, Some(display));
        }
    }
}
