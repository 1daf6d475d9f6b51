//! Ward IR - core data model for the ward expression engine.
//!
//! This crate contains the types shared by every layer of the engine:
//! - [`Value`] - the runtime datum carried by operands and resolvers
//! - [`Op`] - the closed operator set with its static metadata table
//! - [`Token`] - one element of a postfix token sequence
//! - [`ExprError`] - the flat error type surfaced to callers
//!
//! # Design Philosophy
//!
//! - **Tagged unions over hierarchies**: operators, values and tokens are
//!   plain enums; operator metadata lives in a `const` table indexed by the
//!   variant.
//! - **The postfix token list is the single source of truth**: there is no
//!   AST. Parsers produce token lists, evaluators and printers consume them.
//! - **Errors are values**: every failure is an [`ExprError`]; the engine
//!   never unwinds for control flow.

mod error;
mod op;
mod token;
mod value;

pub use error::{ExprError, ExprResult};
pub use op::Op;
pub use token::{validate_postfix, Token};
pub use value::Value;
