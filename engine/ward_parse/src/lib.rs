//! Shunting-yard parser: infix symbols to a validated postfix token list.
//!
//! The parser maintains an operator stack and emits tokens to the output in
//! reverse-Polish order. All binary operators are left-associative; an
//! incoming binary operator first pops every stacked operator of greater or
//! equal precedence. Prefix unary operators bind rightward and are pushed
//! without popping, so chains like `!!${a}` nest correctly.
//!
//! Validation happens during emission: the running stack size never goes
//! negative and must end at exactly one, `!` rejects an immediately
//! preceding non-boolean literal, and the cast operators require an
//! immediately preceding variable.

use smallvec::SmallVec;
use tracing::trace;

use ward_ir::{ExprError, ExprResult, Op, Token};
use ward_lexer::Symbol;

/// Parse `source` into a postfix token list.
pub fn parse(source: &str) -> ExprResult<Vec<Token>> {
    trace!(source, "parsing expression");
    let symbols = ward_lexer::lex(source)?;
    ShuntingYard::default().run(symbols)
}

/// One slot of the operator stack.
enum Slot {
    Op(Op),
    Paren,
}

/// What the previous significant symbol was, for dangling-operator checks.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Prev {
    Start,
    LParen,
    Other,
}

#[derive(Default)]
struct ShuntingYard {
    output: Vec<Token>,
    stack: SmallVec<[Slot; 8]>,
    /// Running operand-stack size of the emitted program.
    size: i32,
}

impl ShuntingYard {
    fn run(mut self, symbols: Vec<Symbol>) -> ExprResult<Vec<Token>> {
        let mut prev = Prev::Start;
        for symbol in symbols {
            let next_prev = match symbol {
                Symbol::LParen => Prev::LParen,
                _ => Prev::Other,
            };
            match symbol {
                Symbol::Operand(value) => {
                    self.output.push(Token::Operand(value));
                    self.size += 1;
                }
                Symbol::Var(name) => {
                    self.output.push(Token::Var(name));
                    self.size += 1;
                }
                Symbol::Binary(op) => {
                    if prev != Prev::Other {
                        return Err(ExprError::Format(format!(
                            "operator '{}' has no left operand",
                            op.as_symbol()
                        )));
                    }
                    while let Some(Slot::Op(top)) = self.stack.last() {
                        if top.precedence() >= op.precedence() {
                            let top = *top;
                            self.stack.pop();
                            self.emit(top)?;
                        } else {
                            break;
                        }
                    }
                    self.stack.push(Slot::Op(op));
                }
                Symbol::Unary(op) => {
                    // Prefix operators wait for their operand; popping here
                    // would break `!!${a}`.
                    self.stack.push(Slot::Op(op));
                }
                Symbol::LParen => self.stack.push(Slot::Paren),
                Symbol::RParen => loop {
                    match self.stack.pop() {
                        Some(Slot::Op(top)) => self.emit(top)?,
                        Some(Slot::Paren) => break,
                        None => {
                            return Err(ExprError::Format("unmatched ')'".to_owned()));
                        }
                    }
                },
            }
            prev = next_prev;
        }

        while let Some(slot) = self.stack.pop() {
            match slot {
                Slot::Op(op) => self.emit(op)?,
                Slot::Paren => return Err(ExprError::Format("unmatched '('".to_owned())),
            }
        }

        if self.output.is_empty() {
            return Err(ExprError::Format("empty expression".to_owned()));
        }
        if self.size != 1 {
            return Err(ExprError::Format(format!(
                "expression leaves {} values on the stack",
                self.size
            )));
        }
        trace!(tokens = self.output.len(), "parsed expression");
        Ok(self.output)
    }

    /// Emit one operator token, enforcing arity and operand-type rules.
    fn emit(&mut self, op: Op) -> ExprResult<()> {
        let needed = i32::from(op.arity());
        if self.size < needed {
            return Err(ExprError::Format(format!(
                "operator '{}' is missing an operand",
                op.as_symbol()
            )));
        }
        match op {
            Op::Not => {
                if let Some(Token::Operand(value)) = self.output.last() {
                    if value.as_bool().is_none() {
                        return Err(ExprError::Format(format!(
                            "operator '!' cannot negate {} '{}'",
                            value.type_name(),
                            value.render()
                        )));
                    }
                }
            }
            _ if op.is_cast() => {
                if !matches!(self.output.last(), Some(Token::Var(_))) {
                    return Err(ExprError::Format(format!(
                        "operator '{}' applies only to variables",
                        op.as_symbol()
                    )));
                }
            }
            _ => {}
        }
        self.output.push(Token::Op(op));
        self.size += 1 - needed;
        Ok(())
    }
}
