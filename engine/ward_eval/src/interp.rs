//! Stack-machine evaluation of postfix token sequences.
//!
//! The type set is fixed, so operator dispatch is a plain match; the value
//! stack is per-call and local. Logical operators coerce non-boolean
//! operands through the lenient `as_bool`, defaulting to `false`; order
//! comparisons coerce both sides to integers; `contains` dispatches on the
//! operand types.

use smallvec::SmallVec;

use ward_ir::{ExprError, ExprResult, Op, Token, Value};

use crate::Resolver;

type ValueStack = SmallVec<[Value; 8]>;

/// Evaluate `tokens` to the final boolean.
///
/// Fails with `UnresolvedVariable` when the resolver has no present value
/// for a variable, and with `InvalidState` when the final value is not a
/// boolean.
pub fn eval_tokens(tokens: &[Token], resolver: &dyn Resolver) -> ExprResult<bool> {
    let value = eval_to_value(tokens, resolver)?;
    value.as_bool().ok_or_else(|| {
        ExprError::InvalidState(format!(
            "expression evaluated to a {} value, not a boolean",
            value.type_name()
        ))
    })
}

/// Evaluate `tokens` to whatever value the program leaves on the stack.
///
/// Used by the reducer to constant-fold variable-free sub-terms, where the
/// result may legitimately be non-boolean.
pub(crate) fn eval_to_value(tokens: &[Token], resolver: &dyn Resolver) -> ExprResult<Value> {
    let mut stack = ValueStack::new();
    for token in tokens {
        match token {
            Token::Operand(value) => stack.push(value.clone()),
            Token::Var(name) => match resolver.resolve(name) {
                Some(value) if value.is_present() => stack.push(value),
                _ => return Err(ExprError::UnresolvedVariable(name.clone())),
            },
            Token::Op(op) => apply(*op, &mut stack)?,
        }
    }
    if stack.len() == 1 {
        Ok(stack.remove(0))
    } else {
        Err(ExprError::InvalidState(format!(
            "evaluation left {} values on the stack",
            stack.len()
        )))
    }
}

fn pop(stack: &mut ValueStack, op: Op) -> ExprResult<Value> {
    stack.pop().ok_or_else(|| {
        ExprError::InvalidState(format!("operator '{}' is missing an operand", op.as_symbol()))
    })
}

fn apply(op: Op, stack: &mut ValueStack) -> ExprResult<()> {
    let result = if op.is_unary() {
        let op1 = pop(stack, op)?;
        match op {
            Op::Not => Value::Bool(!op1.as_bool().unwrap_or(false)),
            Op::Sizeof => Value::Int(op1.size()),
            Op::AsInt => Value::Int(op1.to_int()?),
            Op::AsString => Value::Str(op1.render()),
            Op::AsList => Value::List(op1.to_list()?),
            _ => {
                return Err(ExprError::InvalidState(format!(
                    "'{}' is not a unary operator",
                    op.as_symbol()
                )))
            }
        }
    } else {
        // Right operand is on top of the stack.
        let op1 = pop(stack, op)?;
        let op2 = pop(stack, op)?;
        match op {
            Op::Or => Value::Bool(op2.as_bool().unwrap_or(false) || op1.as_bool().unwrap_or(false)),
            Op::And => {
                Value::Bool(op2.as_bool().unwrap_or(false) && op1.as_bool().unwrap_or(false))
            }
            Op::Equal => Value::Bool(Value::eq_values(&op2, &op1)),
            Op::NotEqual => Value::Bool(!Value::eq_values(&op2, &op1)),
            Op::GreaterThan => Value::Bool(op2.to_int()? > op1.to_int()?),
            Op::GreaterOrEqual => Value::Bool(op2.to_int()? >= op1.to_int()?),
            Op::LowerThan => Value::Bool(op2.to_int()? < op1.to_int()?),
            Op::LowerOrEqual => Value::Bool(op2.to_int()? <= op1.to_int()?),
            Op::Contains => Value::Bool(contains(&op2, &op1)),
            _ => {
                return Err(ExprError::InvalidState(format!(
                    "'{}' is not a binary operator",
                    op.as_symbol()
                )))
            }
        }
    };
    stack.push(result);
    Ok(())
}

/// `op2 contains op1`: set containment for two lists, membership of the
/// rendered needle for a list haystack, substring search otherwise.
fn contains(op2: &Value, op1: &Value) -> bool {
    match (op2, op1) {
        (Value::List(haystack), Value::List(needles)) => {
            needles.iter().all(|needle| haystack.contains(needle))
        }
        (Value::List(haystack), needle) => haystack.contains(&needle.render()),
        (haystack, needle) => haystack.render().contains(&needle.render()),
    }
}
