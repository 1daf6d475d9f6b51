//! Truth-table construction, symbolic reduction and expression quotients.
//!
//! Reduction rewrites an expression over synthetic boolean atoms, builds
//! the `2^n` truth table, minimises the satisfying rows with
//! Quine-McCluskey, and prints the cover back as a canonical expression.
//!
//! Rows in which two true equality atoms pin one variable to two different
//! literals cannot occur at runtime; they are passed to QMC as don't-cares.
//! That is what collapses `${a} == 'x' && ${a} == 'y'` to `false` while
//! still letting `${a} == 'x' || ${a} == 'y'` keep its natural shape.

use rustc_hash::FxHashMap;
use tracing::debug;

use ward_ir::{ExprError, ExprResult, Op, Token, Value};

use crate::bitset::Bitset;
use crate::expression::Expression;
use crate::interp::eval_tokens;
use crate::qmc::{self, CoverTerm};
use crate::resolver::Absent;
use crate::synth::{rewrite, SynthTable};

/// The truth-table encoding is a u64 per implicant, and variable `i` of
/// `n` occupies bit `n - 1 - i` (most-significant first).
const MAX_ATOMS: usize = 63;

/// Unique variable names of `tokens` in first-occurrence order.
pub(crate) fn variable_names(tokens: &[Token]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in tokens {
        if let Token::Var(name) = token {
            if !names.iter().any(|seen| seen == name) {
                names.push(name.clone());
            }
        }
    }
    names
}

/// Value of variable `index` under assignment `row`.
fn assignment_bit(row: usize, index: usize, n: usize) -> bool {
    (row >> (n - 1 - index)) & 1 == 1
}

/// Rows whose true atoms bind one variable to two different literals.
///
/// A bare boolean atom contributes its own name bound to `"true"`: an
/// original variable used as a boolean can only be true as the boolean
/// `true`, whose rendered form is `"true"`.
fn infeasible_rows(table: &SynthTable, vars: &[String]) -> Bitset {
    let n = vars.len();
    let rows = 1usize << n;
    let bindings: Vec<Option<(&str, &str)>> = vars
        .iter()
        .map(|name| match table.binding(name) {
            Some((var, literal)) => Some((var.as_str(), literal.as_str())),
            None if table.get(name).is_none() => Some((name.as_str(), "true")),
            None => None,
        })
        .collect();

    let mut infeasible = Bitset::new(rows);
    if bindings.iter().flatten().count() < 2 {
        return infeasible;
    }
    let mut forced: FxHashMap<&str, &str> = FxHashMap::default();
    for row in 0..rows {
        forced.clear();
        let mut conflict = false;
        for (index, binding) in bindings.iter().enumerate() {
            let Some((var, literal)) = *binding else {
                continue;
            };
            if !assignment_bit(row, index, n) {
                continue;
            }
            if let Some(previous) = forced.insert(var, literal) {
                if previous != literal {
                    conflict = true;
                    break;
                }
            }
        }
        if conflict {
            infeasible.set(row);
        }
    }
    infeasible
}

/// Rows outside `skip` where `skeleton` evaluates to true.
fn satisfying_rows(skeleton: &[Token], vars: &[String], skip: &Bitset) -> ExprResult<Bitset> {
    let n = vars.len();
    let rows = 1usize << n;
    let index: FxHashMap<&str, usize> = vars
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut minterms = Bitset::new(rows);
    for row in 0..rows {
        if skip.get(row) {
            continue;
        }
        let resolver = |name: &str| -> Option<Value> {
            index.get(name).map(|i| Value::Bool(assignment_bit(row, *i, n)))
        };
        if eval_tokens(skeleton, &resolver)? {
            minterms.set(row);
        }
    }
    Ok(minterms)
}

fn check_width(n: usize) -> ExprResult<()> {
    if n > MAX_ATOMS {
        return Err(ExprError::InvalidState(format!(
            "expression has {n} synthetic variables, more than the truth-table limit of {MAX_ATOMS}"
        )));
    }
    Ok(())
}

/// Reduce `tokens` to an equivalent canonical expression.
pub(crate) fn reduce_tokens(tokens: &[Token]) -> ExprResult<Expression> {
    let rw = rewrite(tokens)?;
    let vars = variable_names(&rw.skeleton);
    debug!(atoms = vars.len(), "reducing expression");

    if vars.is_empty() {
        let value = eval_tokens(&rw.skeleton, &Absent)?;
        return Ok(Expression::constant(value));
    }
    let n = vars.len();
    check_width(n)?;

    let dont_cares = infeasible_rows(&rw.table, &vars);
    let minterms = satisfying_rows(&rw.skeleton, &vars, &dont_cares)?;

    if minterms.is_empty() {
        return Ok(Expression::constant(false));
    }
    if minterms.count() + dont_cares.count() == 1usize << n {
        return Ok(Expression::constant(true));
    }

    let cover = qmc::minimize(n, &minterms, &dont_cares);
    Expression::reduced_from(emit_cover(&cover, &vars, &rw.table))
}

/// Quotient of `lhs` by `rhs`: the residual condition `lhs` still imposes
/// once `rhs` is known to hold.
///
/// Both sides are rewritten over the union of their synthetic variables,
/// `rhs`'s first. Rows where `rhs` is false become don't-cares, so the
/// minimised cover agrees with `lhs` exactly where `rhs` holds.
pub(crate) fn subtract(lhs: &Expression, rhs: &Expression) -> ExprResult<Expression> {
    let rw1 = rewrite(lhs.tokens())?;
    let rw2 = rewrite(rhs.tokens())?;

    let mut vars = variable_names(&rw2.skeleton);
    for name in variable_names(&rw1.skeleton) {
        if !vars.iter().any(|seen| *seen == name) {
            vars.push(name);
        }
    }
    let mut table = rw2.table;
    table.merge(rw1.table);

    if vars.is_empty() {
        let b1 = eval_tokens(&rw1.skeleton, &Absent)?;
        let b2 = eval_tokens(&rw2.skeleton, &Absent)?;
        return Ok(if b1 == b2 {
            Expression::constant(true)
        } else {
            lhs.clone()
        });
    }
    let n = vars.len();
    check_width(n)?;

    let infeasible = infeasible_rows(&table, &vars);
    let m1 = satisfying_rows(&rw1.skeleton, &vars, &infeasible)?;
    let m2 = satisfying_rows(&rw2.skeleton, &vars, &infeasible)?;
    debug!(atoms = n, m1 = m1.count(), m2 = m2.count(), "subtracting expressions");

    let required = m1.intersection(&m2);
    if required.is_empty() {
        // The sides contradict; rhs cannot constrain lhs.
        return Ok(lhs.clone());
    }
    if m1 == m2 || required == m2 {
        return Ok(Expression::constant(true));
    }

    let dont_cares = m2.complement();

    // Work on the smaller half: when lhs covers most of the truth table,
    // minimise its complement within rhs and negate the result.
    let flip = m1.count() * 2 > 1usize << n;
    let cover_required = if flip { m2.and_not(&m1) } else { required };
    let cover = qmc::minimize(n, &cover_required, &dont_cares);

    let mut tokens = emit_cover(&cover, &vars, &table);
    if flip {
        tokens.push(Token::Op(Op::Not));
    }
    Expression::reduced_from(tokens)
}

/// Print a QMC cover back to postfix tokens: per term, every unmasked
/// variable expands to its leaves (negated for a 0 bit), literals joined
/// with `&&` and terms with `||`.
fn emit_cover(cover: &[CoverTerm], vars: &[String], table: &SynthTable) -> Vec<Token> {
    let n = vars.len();
    let mut terms: Vec<Vec<Token>> = Vec::new();
    for term in cover {
        let mut literals: Vec<Vec<Token>> = Vec::new();
        for (index, name) in vars.iter().enumerate() {
            let bit = 1u64 << (n - 1 - index);
            if term.mask & bit != 0 {
                continue;
            }
            let mut literal = table.expand_to_leaves(name);
            if term.bits & bit == 0 {
                literal.push(Token::Op(Op::Not));
            }
            literals.push(literal);
        }
        if literals.is_empty() {
            // A fully masked term covers every assignment.
            return vec![Token::operand(true)];
        }
        terms.push(join(literals, Op::And));
    }
    if terms.is_empty() {
        return vec![Token::operand(false)];
    }
    join(terms, Op::Or)
}

/// Left-fold token sequences with a binary operator.
fn join(parts: Vec<Vec<Token>>, op: Op) -> Vec<Token> {
    let mut iter = parts.into_iter();
    let mut acc = iter.next().unwrap_or_default();
    for part in iter {
        acc.extend(part);
        acc.push(Token::Op(op));
    }
    acc
}
