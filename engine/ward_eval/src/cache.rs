//! Process-wide caches and interned constants.
//!
//! Both caches grow monotonically and are never invalidated; entries are
//! immutable expressions, so concurrent lookups share them freely.

use std::sync::OnceLock;

use dashmap::DashMap;
use ward_ir::Token;

use crate::expression::Expression;

/// Raw source string to its parsed expression.
pub(crate) fn by_string() -> &'static DashMap<String, Expression> {
    static CACHE: OnceLock<DashMap<String, Expression>> = OnceLock::new();
    CACHE.get_or_init(DashMap::new)
}

/// Postfix token list to its reduced expression.
pub(crate) fn by_tokens() -> &'static DashMap<Vec<Token>, Expression> {
    static CACHE: OnceLock<DashMap<Vec<Token>, Expression>> = OnceLock::new();
    CACHE.get_or_init(DashMap::new)
}

/// The interned `true` constant.
pub(crate) fn truth() -> &'static Expression {
    static TRUE: OnceLock<Expression> = OnceLock::new();
    TRUE.get_or_init(|| Expression::interned(true))
}

/// The interned `false` constant.
pub(crate) fn falsehood() -> &'static Expression {
    static FALSE: OnceLock<Expression> = OnceLock::new();
    FALSE.get_or_init(|| Expression::interned(false))
}
