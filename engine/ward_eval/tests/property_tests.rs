//! Property-based tests for the ward expression engine.
//!
//! Random expressions over a small variable alphabet verify the engine's
//! quantified invariants:
//! 1. The canonical literal re-parses to the identical token list.
//! 2. Reduction is idempotent.
//! 3. Reduction preserves semantics under every total resolver.
//! 4. Double negation vanishes under reduction.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use rustc_hash::FxHashMap;
use ward_eval::{Expression, Value};

const BOOL_VARS: [&str; 2] = ["flag", "debug"];
const STR_VARS: [&str; 2] = ["flavor", "arch"];
const LITERALS: [&str; 2] = ["x", "y"];

/// Atoms: constants, boolean variables, and string equalities (both
/// spellings). String variables only appear inside equalities and boolean
/// variables only as bare atoms, so every generated expression is
/// well-typed under every context from `contexts()`.
fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("true".to_owned()),
        Just("false".to_owned()),
        (0..BOOL_VARS.len()).prop_map(|i| format!("${{{}}}", BOOL_VARS[i])),
        (0..STR_VARS.len(), 0..LITERALS.len())
            .prop_map(|(v, l)| format!("${{{}}} == '{}'", STR_VARS[v], LITERALS[l])),
        (0..STR_VARS.len(), 0..LITERALS.len())
            .prop_map(|(v, l)| format!("${{{}}} != '{}'", STR_VARS[v], LITERALS[l])),
    ]
}

fn expr_strategy() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| format!("!({e})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}) && ({b})")),
            (inner.clone(), inner).prop_map(|(a, b)| format!("({a}) || ({b})")),
        ]
    })
}

/// Every total assignment of the generated variables: booleans for the
/// bare atoms, strings (including one matching no literal) for the
/// equality operands.
fn contexts() -> Vec<FxHashMap<String, Value>> {
    let mut result = Vec::new();
    for flag in [false, true] {
        for debug in [false, true] {
            for flavor in ["x", "y", "z"] {
                for arch in ["x", "y", "z"] {
                    let mut ctx = FxHashMap::default();
                    ctx.insert("flag".to_owned(), Value::Bool(flag));
                    ctx.insert("debug".to_owned(), Value::Bool(debug));
                    ctx.insert("flavor".to_owned(), Value::Str(flavor.to_owned()));
                    ctx.insert("arch".to_owned(), Value::Str(arch.to_owned()));
                    result.push(ctx);
                }
            }
        }
    }
    result
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_literal_roundtrip(source in expr_strategy()) {
        let e = Expression::create(&source).unwrap();
        let reparsed = Expression::create(e.literal()).unwrap();
        prop_assert_eq!(reparsed.tokens(), e.tokens());
    }

    #[test]
    fn prop_reduce_is_idempotent(source in expr_strategy()) {
        let e = Expression::create(&source).unwrap();
        let once = e.reduce().unwrap();
        let twice = once.reduce().unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.is_reduced());
    }

    #[test]
    fn prop_reduce_preserves_semantics(source in expr_strategy()) {
        let e = Expression::create(&source).unwrap();
        let reduced = e.reduce().unwrap();
        for ctx in contexts() {
            prop_assert_eq!(
                e.eval_with(&ctx).unwrap(),
                reduced.eval_with(&ctx).unwrap(),
                "source: {}, reduced: {}",
                &source,
                reduced.literal()
            );
        }
    }

    #[test]
    fn prop_double_negation_vanishes(source in expr_strategy()) {
        let e = Expression::create(&source).unwrap();
        prop_assert_eq!(
            e.negate().negate().reduce().unwrap(),
            e.reduce().unwrap()
        );
    }
}
