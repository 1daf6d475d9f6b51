//! Variable resolution.
//!
//! A resolver maps variable names to optional values. Returning `None`
//! (or a non-present sentinel) makes [`eval`](crate::Expression::eval_with)
//! fail with `UnresolvedVariable`; for
//! [`inline`](crate::Expression::inline) it means "leave the variable in
//! place".

use rustc_hash::FxHashMap;
use ward_ir::Value;

/// Maps a variable name to an optional value.
pub trait Resolver {
    /// The value bound to `name`, if any.
    fn resolve(&self, name: &str) -> Option<Value>;
}

/// Resolver with no bindings; every lookup is absent.
pub struct Absent;

impl Resolver for Absent {
    fn resolve(&self, _name: &str) -> Option<Value> {
        None
    }
}

impl<F> Resolver for F
where
    F: Fn(&str) -> Option<Value>,
{
    fn resolve(&self, name: &str) -> Option<Value> {
        self(name)
    }
}

impl Resolver for FxHashMap<String, Value> {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}
