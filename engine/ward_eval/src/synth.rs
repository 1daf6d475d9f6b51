//! Synthetic rewriting: atomise non-logical sub-terms.
//!
//! The truth-table core only understands boolean variables, so every
//! relational or cast sub-term involving a variable is replaced by a fresh
//! boolean "synthetic" variable whose name is the human-readable rendering
//! of the sub-term (`"a == 'x'"`, `"sizeof b"`). The names are a contract:
//! two independently rewritten expressions produce the same name for the
//! same sub-term, which is what lets `sub` and `relativize` align their
//! atoms.
//!
//! `!=` is normalised to the `==` synthetic plus a negation so that
//! `a == b` and `a != b` share a single atom. Sub-terms with no variables
//! are constant-folded through the evaluator instead of atomised.

use rustc_hash::FxHashMap;

use ward_ir::{ExprError, ExprResult, Op, Token, Value};

use crate::interp::eval_to_value;
use crate::printer::name_form;
use crate::resolver::Absent;

/// One synthetic variable: its expansion in original tokens (which may
/// reference earlier synthetics) and, for equalities pinning a variable to
/// a literal, the binding used by the feasibility filter.
pub(crate) struct Synthetic {
    pub expansion: Vec<Token>,
    pub binding: Option<(String, String)>,
}

/// Creation-ordered table of synthetic variables.
#[derive(Default)]
pub(crate) struct SynthTable {
    entries: Vec<(String, Synthetic)>,
    index: FxHashMap<String, usize>,
}

impl SynthTable {
    fn insert_if_absent(&mut self, name: &str, make: impl FnOnce() -> Synthetic) {
        if !self.index.contains_key(name) {
            self.index.insert(name.to_owned(), self.entries.len());
            self.entries.push((name.to_owned(), make()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Synthetic> {
        self.index.get(name).map(|i| &self.entries[*i].1)
    }

    /// The `(variable, literal)` pair forced true by `name`, if any.
    pub fn binding(&self, name: &str) -> Option<&(String, String)> {
        self.get(name).and_then(|s| s.binding.as_ref())
    }

    /// Fold `other`'s entries into `self` (used for joint truth tables).
    /// Identical sub-terms produce identical names, so colliding entries
    /// are interchangeable.
    pub fn merge(&mut self, other: SynthTable) {
        for (name, synthetic) in other.entries {
            self.insert_if_absent(&name, || synthetic);
        }
    }

    /// The expansion of `name` with nested synthetic references inlined to
    /// their leaves. Unknown names are original variables and expand to
    /// themselves.
    pub fn expand_to_leaves(&self, name: &str) -> Vec<Token> {
        match self.get(name) {
            None => vec![Token::var(name)],
            Some(synthetic) => synthetic
                .expansion
                .iter()
                .flat_map(|token| match token {
                    Token::Var(inner) => self.expand_to_leaves(inner),
                    other => vec![other.clone()],
                })
                .collect(),
        }
    }
}

/// A rewritten expression: a purely boolean skeleton whose atoms are
/// constants, original boolean variables and synthetic variables, plus the
/// synthetic table.
pub(crate) struct Rewrite {
    pub skeleton: Vec<Token>,
    pub table: SynthTable,
}

/// Rewrite `tokens` per the rules above.
pub(crate) fn rewrite(tokens: &[Token]) -> ExprResult<Rewrite> {
    let mut table = SynthTable::default();
    let mut stack: Vec<Vec<Token>> = Vec::new();

    for token in tokens {
        match token {
            Token::Operand(_) | Token::Var(_) => stack.push(vec![token.clone()]),
            Token::Op(op) if op.is_unary() => {
                let seq = pop(&mut stack, *op)?;
                stack.push(rewrite_unary(*op, seq, &mut table)?);
            }
            Token::Op(op) => {
                let right = pop(&mut stack, *op)?;
                let left = pop(&mut stack, *op)?;
                stack.push(rewrite_binary(*op, left, right, &mut table)?);
            }
        }
    }

    if stack.len() == 1 {
        Ok(Rewrite {
            skeleton: stack.remove(0),
            table,
        })
    } else {
        Err(ExprError::InvalidState(format!(
            "rewriting left {} sequences on the stack",
            stack.len()
        )))
    }
}

fn pop(stack: &mut Vec<Vec<Token>>, op: Op) -> ExprResult<Vec<Token>> {
    stack.pop().ok_or_else(|| {
        ExprError::InvalidState(format!("operator '{}' is missing an operand", op.as_symbol()))
    })
}

fn has_variables(seq: &[Token]) -> bool {
    seq.iter().any(|token| matches!(token, Token::Var(_)))
}

fn lone_var(seq: &[Token]) -> Option<&str> {
    match seq {
        [Token::Var(name)] => Some(name),
        _ => None,
    }
}

fn lone_operand(seq: &[Token]) -> Option<&Value> {
    match seq {
        [Token::Operand(value)] => Some(value),
        _ => None,
    }
}

/// Evaluate a variable-free token program down to a single operand.
fn fold(tokens: Vec<Token>) -> ExprResult<Vec<Token>> {
    let value = eval_to_value(&tokens, &Absent)?;
    Ok(vec![Token::Operand(value)])
}

fn rewrite_unary(op: Op, mut seq: Vec<Token>, table: &mut SynthTable) -> ExprResult<Vec<Token>> {
    if !has_variables(&seq) {
        seq.push(Token::Op(op));
        return fold(seq);
    }
    if op == Op::Not {
        seq.push(Token::Op(Op::Not));
        return Ok(seq);
    }
    // Casts and sizeof: the parser only accepts these over variables.
    let Some(name) = lone_var(&seq) else {
        return Err(ExprError::InvalidState(format!(
            "operator '{}' applied to a compound operand",
            op.as_symbol()
        )));
    };
    let synthetic = format!("{} {name}", op.as_symbol());
    let expansion = vec![Token::var(name), Token::Op(op)];
    table.insert_if_absent(&synthetic, || Synthetic {
        expansion,
        binding: None,
    });
    Ok(vec![Token::var(synthetic)])
}

fn rewrite_binary(
    op: Op,
    left: Vec<Token>,
    right: Vec<Token>,
    table: &mut SynthTable,
) -> ExprResult<Vec<Token>> {
    if !has_variables(&left) && !has_variables(&right) {
        let mut seq = left;
        seq.extend(right);
        seq.push(Token::Op(op));
        return fold(seq);
    }

    if matches!(op, Op::And | Op::Or) {
        let mut seq = left;
        seq.extend(right);
        seq.push(Token::Op(op));
        return Ok(seq);
    }

    // A boolean literal against a lone variable collapses to the variable
    // itself (negated for `false` / `!=`), without a synthetic.
    if matches!(op, Op::Equal | Op::NotEqual) {
        let collapse = match (lone_operand(&left), lone_var(&left), lone_operand(&right), lone_var(&right)) {
            (Some(Value::Bool(b)), _, _, Some(name)) | (_, Some(name), Some(Value::Bool(b)), _) => {
                Some((name.to_owned(), *b))
            }
            _ => None,
        };
        if let Some((name, literal)) = collapse {
            let negated = if op == Op::Equal { !literal } else { literal };
            let mut seq = vec![Token::var(name)];
            if negated {
                seq.push(Token::Op(Op::Not));
            }
            return Ok(seq);
        }
    }

    // `a != b` shares the `a == b` synthetic, negated.
    let (base, negated) = if op == Op::NotEqual {
        (Op::Equal, true)
    } else {
        (op, false)
    };

    let left_name = name_form(&left)?;
    let right_name = name_form(&right)?;
    let synthetic = format!("{left_name} {} {right_name}", base.as_symbol());

    let binding = if base == Op::Equal {
        match (lone_var(&left), lone_operand(&right), lone_operand(&left), lone_var(&right)) {
            (Some(var), Some(value), _, _) | (_, _, Some(value), Some(var)) => {
                Some((var.to_owned(), value.render()))
            }
            _ => None,
        }
    } else {
        None
    };

    table.insert_if_absent(&synthetic, || {
        let mut expansion = left;
        expansion.extend(right);
        expansion.push(Token::Op(base));
        Synthetic { expansion, binding }
    });

    let mut seq = vec![Token::var(synthetic)];
    if negated {
        seq.push(Token::Op(Op::Not));
    }
    Ok(seq)
}
