//! The `Expression` value and its public operations.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use ward_ir::{validate_postfix, ExprError, ExprResult, Op, Token, Value};

use crate::cache;
use crate::interp;
use crate::printer;
use crate::reduce;
use crate::resolver::{Absent, Resolver};

/// An immutable boolean expression in postfix form.
///
/// Expressions are cheap to clone and safe to share across threads. The
/// canonical literal, the variable list and the reduced form are memoised
/// on first use; the two process-wide caches make `create` and `reduce`
/// amortise across call sites.
#[derive(Clone)]
pub struct Expression {
    inner: Arc<Inner>,
}

struct Inner {
    /// The postfix token sequence; the single source of truth.
    tokens: Vec<Token>,
    /// When set, `reduce` is a no-op.
    reduced: bool,
    literal: OnceLock<String>,
    variables: OnceLock<Vec<String>>,
    reduced_form: OnceLock<Expression>,
}

impl Expression {
    /// Parse `source`, consulting the process-wide source cache.
    pub fn create(source: &str) -> ExprResult<Expression> {
        if let Some(hit) = cache::by_string().get(source) {
            return Ok(hit.clone());
        }
        let expr = Expression::from_tokens(ward_parse::parse(source)?)?;
        cache::by_string().insert(source.to_owned(), expr.clone());
        Ok(expr)
    }

    /// Expression over an existing postfix token list.
    pub fn from_tokens(tokens: Vec<Token>) -> ExprResult<Expression> {
        validate_postfix(&tokens).map_err(ExprError::Format)?;
        if let [Token::Operand(Value::Bool(value))] = tokens.as_slice() {
            return Ok(Expression::constant(*value));
        }
        Ok(Expression::with_flag(tokens, false))
    }

    /// The interned `true` constant.
    pub fn truth() -> Expression {
        cache::truth().clone()
    }

    /// The interned `false` constant.
    pub fn falsehood() -> Expression {
        cache::falsehood().clone()
    }

    /// One of the two interned constants.
    pub(crate) fn constant(value: bool) -> Expression {
        if value {
            Expression::truth()
        } else {
            Expression::falsehood()
        }
    }

    /// Backing constructor for the two singletons; everything else goes
    /// through [`Expression::constant`].
    pub(crate) fn interned(value: bool) -> Expression {
        Expression::with_flag(vec![Token::operand(value)], true)
    }

    /// Expression emitted by the reducer; the tokens are already canonical.
    pub(crate) fn reduced_from(tokens: Vec<Token>) -> ExprResult<Expression> {
        validate_postfix(&tokens).map_err(ExprError::InvalidState)?;
        if let [Token::Operand(Value::Bool(value))] = tokens.as_slice() {
            return Ok(Expression::constant(*value));
        }
        Ok(Expression::with_flag(tokens, true))
    }

    fn with_flag(tokens: Vec<Token>, reduced: bool) -> Expression {
        Expression {
            inner: Arc::new(Inner {
                tokens,
                reduced,
                literal: OnceLock::new(),
                variables: OnceLock::new(),
                reduced_form: OnceLock::new(),
            }),
        }
    }

    /// The postfix token sequence.
    pub fn tokens(&self) -> &[Token] {
        &self.inner.tokens
    }

    /// Whether `reduce` is known to be a no-op.
    pub fn is_reduced(&self) -> bool {
        self.inner.reduced
    }

    fn is_constant(&self, value: bool) -> bool {
        matches!(&self.inner.tokens[..], [Token::Operand(Value::Bool(b))] if *b == value)
    }

    /// Variable names in first-occurrence order. Callers bounding
    /// reduction cost can refuse to reduce when this grows too large.
    pub fn variables(&self) -> &[String] {
        self.inner
            .variables
            .get_or_init(|| reduce::variable_names(&self.inner.tokens))
    }

    /// Canonical infix form; parsing it back yields the same tokens.
    pub fn literal(&self) -> &str {
        self.inner
            .literal
            // Tokens are validated at construction; printing cannot fail.
            .get_or_init(|| printer::infix(&self.inner.tokens).unwrap_or_default())
    }

    /// Conjunction, constant-folded against the `true`/`false` singletons.
    /// The result is not marked reduced.
    pub fn and(&self, other: &Expression) -> Expression {
        if self.is_constant(false) || other.is_constant(false) {
            return Expression::falsehood();
        }
        if self.is_constant(true) {
            return other.clone();
        }
        if other.is_constant(true) {
            return self.clone();
        }
        self.combine(other, Op::And)
    }

    /// Disjunction, constant-folded against the `true`/`false` singletons.
    /// The result is not marked reduced.
    pub fn or(&self, other: &Expression) -> Expression {
        if self.is_constant(true) || other.is_constant(true) {
            return Expression::truth();
        }
        if self.is_constant(false) {
            return other.clone();
        }
        if other.is_constant(false) {
            return self.clone();
        }
        self.combine(other, Op::Or)
    }

    /// Negation, constant-folded against the `true`/`false` singletons.
    /// The result is not marked reduced.
    pub fn negate(&self) -> Expression {
        if self.is_constant(true) {
            return Expression::falsehood();
        }
        if self.is_constant(false) {
            return Expression::truth();
        }
        let mut tokens = self.inner.tokens.clone();
        tokens.push(Token::Op(Op::Not));
        Expression::with_flag(tokens, false)
    }

    fn combine(&self, other: &Expression, op: Op) -> Expression {
        let mut tokens = self.inner.tokens.clone();
        tokens.extend_from_slice(&other.inner.tokens);
        tokens.push(Token::Op(op));
        Expression::with_flag(tokens, false)
    }

    /// Evaluate against `resolver`.
    pub fn eval_with<R: Resolver>(&self, resolver: &R) -> ExprResult<bool> {
        interp::eval_tokens(&self.inner.tokens, resolver)
    }

    /// Evaluate with an always-absent resolver; any variable fails with
    /// `UnresolvedVariable`.
    pub fn eval(&self) -> ExprResult<bool> {
        self.eval_with(&Absent)
    }

    /// The canonical reduced form. Memoised per expression and cached
    /// process-wide by token list; missing variables are treated as free.
    pub fn reduce(&self) -> ExprResult<Expression> {
        if self.inner.reduced {
            return Ok(self.clone());
        }
        if let Some(memo) = self.inner.reduced_form.get() {
            return Ok(memo.clone());
        }
        // The lookup guard must drop before the insert below locks the
        // same shard.
        let cached = cache::by_tokens()
            .get(&self.inner.tokens)
            .map(|hit| hit.value().clone());
        let reduced = match cached {
            Some(hit) => hit,
            None => {
                let computed = reduce::reduce_tokens(&self.inner.tokens)?;
                cache::by_tokens().insert(self.inner.tokens.clone(), computed.clone());
                computed
            }
        };
        let _ = self.inner.reduced_form.set(reduced.clone());
        Ok(reduced)
    }

    /// Substitute every variable the resolver has a present value for,
    /// then reduce. Absent variables stay in place.
    pub fn inline<R: Resolver>(&self, resolver: &R) -> ExprResult<Expression> {
        let tokens = self
            .inner
            .tokens
            .iter()
            .map(|token| match token {
                Token::Var(name) => match resolver.resolve(name) {
                    Some(value) if value.is_present() => Token::Operand(value),
                    _ => token.clone(),
                },
                other => other.clone(),
            })
            .collect();
        Expression::from_tokens(tokens)?.reduce()
    }

    /// Quotient: the residual condition `self` still imposes once `other`
    /// is known to hold. Disjoint sides return `self`; equal sides return
    /// `true`.
    pub fn sub(&self, other: &Expression) -> ExprResult<Expression> {
        reduce::subtract(self, other)
    }

    /// How `other` constrains `self`, relative to `other`:
    /// `self.and(other).reduce().sub(other)`.
    pub fn relativize(&self, other: &Expression) -> ExprResult<Expression> {
        self.and(other).reduce()?.sub(other)
    }
}

/// Structural equality over tokens.
impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.inner.tokens == other.inner.tokens
    }
}

impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.tokens.hash(state);
    }
}

/// Lexicographic ordering over tokens.
impl Ord for Expression {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.tokens.cmp(&other.inner.tokens)
    }
}

impl PartialOrd for Expression {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expression({})", self.literal())
    }
}

impl FromStr for Expression {
    type Err = ExprError;

    fn from_str(source: &str) -> ExprResult<Expression> {
        Expression::create(source)
    }
}

#[cfg(test)]
mod tests;
