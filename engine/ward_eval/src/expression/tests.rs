use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;

use ward_ir::{ExprError, Value};

use super::Expression;

fn create(source: &str) -> Expression {
    match Expression::create(source) {
        Ok(expr) => expr,
        Err(e) => panic!("create('{source}') failed: {e}"),
    }
}

fn reduce(expr: &Expression) -> Expression {
    match expr.reduce() {
        Ok(reduced) => reduced,
        Err(e) => panic!("reduce('{expr}') failed: {e}"),
    }
}

fn sub(lhs: &Expression, rhs: &Expression) -> Expression {
    match lhs.sub(rhs) {
        Ok(result) => result,
        Err(e) => panic!("sub failed: {e}"),
    }
}

fn context(entries: &[(&str, Value)]) -> FxHashMap<String, Value> {
    entries
        .iter()
        .map(|(name, value)| ((*name).to_owned(), value.clone()))
        .collect()
}

#[test]
fn test_create_is_cached() {
    let first = create("${a} && ${b}");
    let second = create("${a} && ${b}");
    assert_eq!(first, second);
    // Same interned instance, not merely an equal one.
    assert!(std::sync::Arc::ptr_eq(&first.inner, &second.inner));
}

#[test]
fn test_create_rejects_garbage() {
    assert!(matches!(Expression::create(""), Err(ExprError::Format(_))));
    assert!(matches!(Expression::create("("), Err(ExprError::Format(_))));
    assert!(matches!(Expression::create("1 =="), Err(ExprError::Format(_))));
}

#[test]
fn test_constants_are_interned() {
    assert_eq!(create("true"), Expression::truth());
    assert_eq!(create("false"), Expression::falsehood());
    assert!(Expression::truth().is_reduced());
    assert!(std::sync::Arc::ptr_eq(
        &create("true").inner,
        &Expression::truth().inner
    ));
}

#[test]
fn test_combinator_constant_folding() {
    let e = create("${a} == 'x'");
    assert_eq!(e.and(&Expression::truth()), e);
    assert_eq!(e.or(&Expression::falsehood()), e);
    assert_eq!(e.and(&Expression::falsehood()), Expression::falsehood());
    assert_eq!(e.or(&Expression::truth()), Expression::truth());
    assert_eq!(Expression::truth().negate(), Expression::falsehood());
}

#[test]
fn test_combinators_concatenate_tokens() {
    let a = create("${a}");
    let b = create("${b}");
    assert_eq!(a.and(&b).literal(), "${a} && ${b}");
    assert_eq!(a.or(&b).literal(), "${a} || ${b}");
    assert_eq!(a.negate().literal(), "!${a}");
    assert!(!a.and(&b).is_reduced());
}

#[test]
fn test_double_negation_reduces_away() {
    let e = create("${a}");
    assert_eq!(reduce(&e.negate().negate()), reduce(&e));
}

#[test]
fn test_eval_list_guard() {
    let ctx = context(&[
        ("a", Value::Str("foo".into())),
        ("b", Value::List(vec!["x".into(), "y".into()])),
    ]);
    let e = create("${b} contains 'x' && sizeof ${b} == 2");
    assert_eq!(e.eval_with(&ctx), Ok(true));
}

#[test]
fn test_eval_without_resolver_needs_closed_expression() {
    assert_eq!(create("true || false").eval(), Ok(true));
    assert_eq!(
        create("${a}").eval(),
        Err(ExprError::UnresolvedVariable("a".into()))
    );
}

#[test]
fn test_reduce_ignores_missing_variables() {
    // Reduction treats variables as free; only eval needs a resolver.
    let e = create("${missing} || !${missing}");
    assert_eq!(reduce(&e), Expression::truth());
}

#[test]
fn test_variables_in_first_occurrence_order() {
    let e = create("${b} == 'x' && ${a} && ${b} != 'y'");
    assert_eq!(e.variables(), ["b".to_owned(), "a".to_owned()]);
}

#[test]
fn test_sub_removes_the_known_factor() {
    // Removing the factor the divisor already guarantees leaves b.
    let e1 = create("${a} && ${b}");
    let e2 = create("${a}");
    let quotient = sub(&e1, &e2);
    assert_eq!(reduce(&quotient).literal(), "${b}");
}

#[test]
fn test_relativize_against_known_factor() {
    let e1 = create("${a} && ${b}");
    let e2 = create("${a}");
    let relative = match e1.relativize(&e2) {
        Ok(result) => result,
        Err(e) => panic!("relativize failed: {e}"),
    };
    assert_eq!(reduce(&relative), reduce(&create("${b}")));
}

#[test]
fn test_relativize_self_is_true() {
    let e = create("${a} == 'x' && ${b}");
    let relative = match e.relativize(&e) {
        Ok(result) => result,
        Err(e) => panic!("relativize failed: {e}"),
    };
    assert_eq!(relative, Expression::truth());
}

#[test]
fn test_sub_with_disjoint_variables_is_identity() {
    let e1 = create("${a}");
    let e2 = create("${b}");
    assert_eq!(sub(&e1, &e2), e1);
}

#[test]
fn test_sub_of_equal_expressions_is_true() {
    let e = create("${a} == 'x'");
    assert_eq!(sub(&e, &e), Expression::truth());
}

#[test]
fn test_sub_of_contradictory_expressions_is_identity() {
    let e1 = create("${a} == 'x'");
    let e2 = create("${a} == 'y'");
    // The sides can never hold together; rhs cannot constrain lhs.
    assert_eq!(sub(&e1, &e2), e1);
}

#[test]
fn test_sub_when_rhs_implies_lhs_is_true() {
    // Given a, (a || b) imposes nothing.
    let e1 = create("${a} || ${b}");
    let e2 = create("${a}");
    assert_eq!(sub(&e1, &e2), Expression::truth());
}

#[test]
fn test_sub_flip_when_lhs_covers_most_rows() {
    // lhs is true on three of four rows, so the complement is minimised
    // and the result comes back negated.
    let e1 = create("${a} || ${b}");
    let e2 = create("${a} || !${b}");
    let quotient = sub(&e1, &e2);
    assert_eq!(quotient.literal(), "!(!${a})");
    // The quotient agrees with lhs wherever rhs holds.
    assert_eq!(reduce(&quotient.and(&e2)), reduce(&e1.and(&e2)));
}

#[test]
fn test_inline_substitutes_present_values() {
    let e = create("${a} == 'x' && ${b}");
    let ctx = context(&[("a", Value::Str("x".into()))]);
    let inlined = match e.inline(&ctx) {
        Ok(result) => result,
        Err(err) => panic!("inline failed: {err}"),
    };
    assert_eq!(inlined.literal(), "${b}");

    let ctx = context(&[("a", Value::Str("z".into()))]);
    let inlined = match e.inline(&ctx) {
        Ok(result) => result,
        Err(err) => panic!("inline failed: {err}"),
    };
    assert_eq!(inlined, Expression::falsehood());
}

#[test]
fn test_inline_leaves_absent_variables_in_place() {
    let e = create("${a} && ${b}");
    let ctx = context(&[("a", Value::Bool(true)), ("b", Value::Absent)]);
    let inlined = match e.inline(&ctx) {
        Ok(result) => result,
        Err(err) => panic!("inline failed: {err}"),
    };
    assert_eq!(inlined.literal(), "${b}");
}

#[test]
fn test_literal_round_trips() {
    let sources = [
        "${a} && (${b} || ${c})",
        "!(${a} == ${b})",
        "sizeof ${b} == 2",
        "['x','y'] contains ${a}",
    ];
    for source in sources {
        let e = create(source);
        assert_eq!(create(e.literal()).tokens(), e.tokens(), "{source}");
    }
}

#[test]
fn test_ordering_and_equality() {
    let a = create("${a}");
    let b = create("${b}");
    assert!(a < b);
    assert_eq!(a, create("${a}"));
    // Operators rank above operands, operands above variables.
    assert!(create("!${a}") > create("${a}"));
    assert!(create("true") > create("${zzz}"));
}

#[test]
fn test_semantic_preservation_on_fixed_cases() {
    let sources = [
        "${a} && (${b} || !${b})",
        "${a} == 'x' || ${a} == 'y'",
        "${a} != 'x' && ${b}",
        "!(${a} && ${b}) || ${a}",
    ];
    let assignments: &[(&str, &[(&str, Value)])] = &[
        ("bools", &[("a", Value::Bool(true)), ("b", Value::Bool(false))]),
        ("strings", &[("a", Value::Str("x".into())), ("b", Value::Bool(true))]),
        ("other", &[("a", Value::Str("y".into())), ("b", Value::Bool(true))]),
    ];
    for source in sources {
        let e = create(source);
        let r = reduce(&e);
        for (label, entries) in assignments {
            let ctx = context(entries);
            assert_eq!(
                e.eval_with(&ctx),
                r.eval_with(&ctx),
                "{source} under {label}"
            );
        }
    }
}
