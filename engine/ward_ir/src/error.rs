//! Error type for the ward engine.
//!
//! All failures are flat values with no nested causes. The caller chooses
//! the policy: interactive callers typically catch `UnresolvedVariable` and
//! prompt for the missing value, batch callers treat `Format` as a hard
//! configuration error, and `InvalidState` denotes a bug in the engine
//! itself and must abort the operation.

use thiserror::Error;

/// Result alias used across the engine.
pub type ExprResult<T> = Result<T, ExprError>;

/// Failure raised by the tokenizer, parser or evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// A resolver returned no value for a variable the evaluator needed.
    /// Carries the variable name.
    #[error("unresolved variable: {0}")]
    UnresolvedVariable(String),

    /// Unrecognised input, unmatched parentheses, operand or arity
    /// mismatches, empty expressions, or a malformed token sequence.
    #[error("invalid expression: {0}")]
    Format(String),

    /// Internal consistency violation. Reaching this is a bug in the engine.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl ExprError {
    /// Format error for input that no recognizer matched, carrying the
    /// remaining text from the failure position.
    pub fn unparsed(rest: &str) -> Self {
        ExprError::Format(format!("unparseable input: {rest}"))
    }
}
