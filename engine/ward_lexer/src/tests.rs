use pretty_assertions::assert_eq;

use ward_ir::{ExprError, Op, Value};

use crate::{lex, Symbol};

fn lex_ok(source: &str) -> Vec<Symbol> {
    match lex(source) {
        Ok(symbols) => symbols,
        Err(e) => panic!("lex('{source}') failed: {e}"),
    }
}

#[test]
fn test_lex_literals() {
    assert_eq!(
        lex_ok("true false 'one' \"two\" -42 7"),
        vec![
            Symbol::Operand(Value::Bool(true)),
            Symbol::Operand(Value::Bool(false)),
            Symbol::Operand(Value::Str("one".into())),
            Symbol::Operand(Value::Str("two".into())),
            Symbol::Operand(Value::Int(-42)),
            Symbol::Operand(Value::Int(7)),
        ]
    );
}

#[test]
fn test_lex_array() {
    assert_eq!(
        lex_ok("['a','b', 'c d']"),
        vec![Symbol::Operand(Value::List(vec![
            "a".into(),
            "b".into(),
            "c d".into()
        ]))]
    );
    assert_eq!(lex_ok("[]"), vec![Symbol::Operand(Value::List(Vec::new()))]);
}

#[test]
fn test_lex_array_elements_may_contain_commas() {
    assert_eq!(
        lex_ok("['a,b','c']"),
        vec![Symbol::Operand(Value::List(vec!["a,b".into(), "c".into()]))]
    );
}

#[test]
fn test_lex_malformed_array() {
    assert!(matches!(lex("['a' 'b']"), Err(ExprError::Format(_))));
    assert!(matches!(lex("[a]"), Err(ExprError::Format(_))));
}

#[test]
fn test_lex_variables() {
    assert_eq!(
        lex_ok("${flavor} ${~security.ssl}"),
        vec![
            Symbol::Var("flavor".into()),
            Symbol::Var("~security.ssl".into()),
        ]
    );
}

#[test]
fn test_lex_operators_both_spellings() {
    assert_eq!(
        lex_ok("|| OR && AND == != < <= > >= contains"),
        vec![
            Symbol::Binary(Op::Or),
            Symbol::Binary(Op::Or),
            Symbol::Binary(Op::And),
            Symbol::Binary(Op::And),
            Symbol::Binary(Op::Equal),
            Symbol::Binary(Op::NotEqual),
            Symbol::Binary(Op::LowerThan),
            Symbol::Binary(Op::LowerOrEqual),
            Symbol::Binary(Op::GreaterThan),
            Symbol::Binary(Op::GreaterOrEqual),
            Symbol::Binary(Op::Contains),
        ]
    );
}

#[test]
fn test_lex_unary_and_parens() {
    assert_eq!(
        lex_ok("! NOT (int) (string) (list) sizeof ( )"),
        vec![
            Symbol::Unary(Op::Not),
            Symbol::Unary(Op::Not),
            Symbol::Unary(Op::AsInt),
            Symbol::Unary(Op::AsString),
            Symbol::Unary(Op::AsList),
            Symbol::Unary(Op::Sizeof),
            Symbol::LParen,
            Symbol::RParen,
        ]
    );
}

#[test]
fn test_lex_comment_to_end_of_line() {
    assert_eq!(
        lex_ok("true # the rest is ignored != (\n&& false"),
        vec![
            Symbol::Operand(Value::Bool(true)),
            Symbol::Binary(Op::And),
            Symbol::Operand(Value::Bool(false)),
        ]
    );
}

#[test]
fn test_lex_unrecognized_input_carries_remaining_text() {
    match lex("${a} == @oops trailing") {
        Err(ExprError::Format(msg)) => assert!(msg.contains("@oops trailing"), "{msg}"),
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn test_lex_empty_variable_is_rejected() {
    assert!(lex("${}").is_err());
}

#[test]
fn test_lex_longest_match_wins() {
    // `(int)` is a cast, a lone `(` is a parenthesis; `<=` is not `<` `=`.
    assert_eq!(
        lex_ok("(int)${a} <= 2"),
        vec![
            Symbol::Unary(Op::AsInt),
            Symbol::Var("a".into()),
            Symbol::Binary(Op::LowerOrEqual),
            Symbol::Operand(Value::Int(2)),
        ]
    );
}
