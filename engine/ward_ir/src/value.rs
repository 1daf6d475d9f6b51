//! Runtime values.
//!
//! `Value` is the sole datum carried by operand tokens and returned by
//! variable resolvers. Cross-type equality compares the rendered forms of
//! both sides, which is what makes `${a} == 'true'` hold for a boolean
//! `a = true` and `${n} == '2'` hold for an integer `n = 2`.

use std::cmp::Ordering;
use std::fmt;

use crate::{ExprError, ExprResult};

/// A typed runtime value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Signed decimal integer.
    Int(i64),
    /// String value; surrounding quotes are stripped at parse time.
    Str(String),
    /// List of strings.
    List(Vec<String>),
    /// Sentinel a resolver may return for a declared-but-valueless list
    /// input. [`Value::is_present`] is `false` only for this variant.
    Absent,
}

impl Value {
    /// Short type tag for error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Absent => "absent",
        }
    }

    // --- Strict accessors (mismatch is a caller bug) ---

    /// The boolean payload, or `InvalidState` for any other variant.
    pub fn bool_value(&self) -> ExprResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(type_mismatch("boolean", other)),
        }
    }

    /// The integer payload, or `InvalidState` for any other variant.
    pub fn int_value(&self) -> ExprResult<i64> {
        match self {
            Value::Int(v) => Ok(*v),
            other => Err(type_mismatch("int", other)),
        }
    }

    /// The string payload, or `InvalidState` for any other variant.
    pub fn str_value(&self) -> ExprResult<&str> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(type_mismatch("string", other)),
        }
    }

    /// The list payload, or `InvalidState` for any other variant.
    pub fn list_value(&self) -> ExprResult<&[String]> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(type_mismatch("list", other)),
        }
    }

    // --- Lenient views and coercions ---

    /// `Some` for `Bool`, `None` otherwise. Logical operators treat `None`
    /// as `false`.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// `false` only for the absent-list sentinel.
    pub const fn is_present(&self) -> bool {
        !matches!(self, Value::Absent)
    }

    /// Coerce to an integer: identity for `Int`, decimal parse for `Str`.
    pub fn to_int(&self) -> ExprResult<i64> {
        match self {
            Value::Int(v) => Ok(*v),
            Value::Str(s) => s.parse::<i64>().map_err(|_| {
                ExprError::InvalidState(format!("cannot read '{s}' as an integer"))
            }),
            other => Err(type_mismatch("int", other)),
        }
    }

    /// Coerce to a list: identity for `List`, a singleton of the rendered
    /// form otherwise.
    pub fn to_list(&self) -> ExprResult<Vec<String>> {
        match self {
            Value::List(items) => Ok(items.clone()),
            Value::Absent => Err(type_mismatch("list", self)),
            other => Ok(vec![other.render()]),
        }
    }

    /// The rendered form used for cross-type comparison: `true`/`false`,
    /// decimal digits, the raw string text, or the canonical bracketed list.
    pub fn render(&self) -> String {
        match self {
            Value::Bool(b) => b.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Str(s) => s.clone(),
            Value::List(items) => {
                let quoted: Vec<String> = items.iter().map(|e| format!("'{e}'")).collect();
                format!("[{}]", quoted.join(","))
            }
            Value::Absent => String::new(),
        }
    }

    /// Length: element count for lists, character count of the rendered
    /// form otherwise.
    pub fn size(&self) -> i64 {
        match self {
            Value::List(items) => items.len() as i64,
            other => other.render().chars().count() as i64,
        }
    }

    /// Cross-type equality: element-wise string equality for two lists,
    /// `false` for a list against a primitive, rendered-form equality
    /// otherwise.
    pub fn eq_values(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::List(x), Value::List(y)) => x == y,
            (Value::List(_), _) | (_, Value::List(_)) => false,
            _ => a.render() == b.render(),
        }
    }

    const fn tag_rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) => 1,
            Value::Str(_) => 2,
            Value::List(_) => 3,
            Value::Absent => 4,
        }
    }
}

fn type_mismatch(wanted: &str, got: &Value) -> ExprError {
    ExprError::InvalidState(format!("expected a {wanted} value, got {}", got.type_name()))
}

/// Cross-type ordering: by rendered form, then by type tag, then
/// structurally (so that `Ord` agrees with the derived `Eq`).
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        self.render()
            .cmp(&other.render())
            .then_with(|| self.tag_rank().cmp(&other.tag_rank()))
            .then_with(|| match (self, other) {
                (Value::List(x), Value::List(y)) => x.cmp(y),
                _ => Ordering::Equal,
            })
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}
