//! Canonical infix printing of postfix token sequences.
//!
//! Operators render with their canonical symbol and the minimal set of
//! parentheses: a binary operator parenthesises its left operand when that
//! operand's precedence is strictly lower, and its right operand when it is
//! lower or equal (all operators are left-associative); a unary operator
//! parenthesises its operand when the operand's precedence is lower or
//! equal. The printed form re-parses to the identical token list.

use ward_ir::{ExprError, ExprResult, Op, Token, Value};

/// How variables are spelled.
#[derive(Copy, Clone, PartialEq, Eq)]
enum VarStyle {
    /// `${name}` - the surface syntax.
    Wrapped,
    /// `name` - used for synthetic variable names.
    Bare,
}

/// Render `tokens` as canonical infix surface syntax.
pub fn infix(tokens: &[Token]) -> ExprResult<String> {
    render(tokens, VarStyle::Wrapped)
}

/// Render `tokens` with bare variable names, producing the human-readable
/// synthetic names that align atoms across expressions (`"a == 'x'"`,
/// `"sizeof b"`).
pub(crate) fn name_form(tokens: &[Token]) -> ExprResult<String> {
    render(tokens, VarStyle::Bare)
}

/// A rendered fragment and the precedence of its top-level operator
/// (`None` for atoms, which never need parentheses).
struct Frag {
    text: String,
    precedence: Option<u8>,
}

fn render(tokens: &[Token], style: VarStyle) -> ExprResult<String> {
    let mut stack: Vec<Frag> = Vec::new();
    for token in tokens {
        match token {
            Token::Operand(value) => stack.push(Frag {
                text: canonical_operand(value),
                precedence: None,
            }),
            Token::Var(name) => stack.push(Frag {
                text: match style {
                    VarStyle::Wrapped => format!("${{{name}}}"),
                    VarStyle::Bare => name.clone(),
                },
                precedence: None,
            }),
            Token::Op(op) if op.is_unary() => {
                let operand = pop(&mut stack, *op)?;
                let wrap = operand.precedence.is_some_and(|p| p <= op.precedence());
                let body = if wrap {
                    format!("({})", operand.text)
                } else {
                    operand.text
                };
                let text = if *op == Op::Not {
                    format!("!{body}")
                } else {
                    format!("{} {body}", op.as_symbol())
                };
                stack.push(Frag {
                    text,
                    precedence: Some(op.precedence()),
                });
            }
            Token::Op(op) => {
                let right = pop(&mut stack, *op)?;
                let left = pop(&mut stack, *op)?;
                let left_text = if left.precedence.is_some_and(|p| p < op.precedence()) {
                    format!("({})", left.text)
                } else {
                    left.text
                };
                let right_text = if right.precedence.is_some_and(|p| p <= op.precedence()) {
                    format!("({})", right.text)
                } else {
                    right.text
                };
                stack.push(Frag {
                    text: format!("{left_text} {} {right_text}", op.as_symbol()),
                    precedence: Some(op.precedence()),
                });
            }
        }
    }
    if stack.len() == 1 {
        Ok(stack.remove(0).text)
    } else {
        Err(ExprError::InvalidState(format!(
            "printing left {} fragments on the stack",
            stack.len()
        )))
    }
}

fn pop(stack: &mut Vec<Frag>, op: Op) -> ExprResult<Frag> {
    stack.pop().ok_or_else(|| {
        ExprError::InvalidState(format!("operator '{}' is missing an operand", op.as_symbol()))
    })
}

/// The canonical source spelling of a literal: single-quoted strings,
/// bracketed single-quoted lists, bare booleans and integers.
fn canonical_operand(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("'{s}'"),
        other => other.render(),
    }
}
