// File: src/interpreter/value.rs
//
// Runtime value types for the Yat evaluator.

use crate::ast::Function;
use crate::errors::{YatError, YatResult};
use std::fmt;
use std::rc::Rc;

/// Result of evaluating a node
#[derive(Clone)]
pub enum Value {
    /// 64-bit signed integer
    Number(i64),
    /// First-class function, shared with the definition that produced it
    Function(Rc<Function>),
    /// Absent value: empty sequences, `print` and `read`
    None,
}

impl Value {
    /// Name of the value kind, used in type errors
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Function(_) => "function",
            Value::None => "nothing",
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract a Number or fail with `TypeMismatch` naming the context
    pub fn expect_number(&self, context: &str) -> YatResult<i64> {
        self.as_number().ok_or_else(|| {
            Box::new(YatError::type_mismatch(format!(
                "{} expects a number, got {}",
                context,
                self.kind_name()
            )))
        })
    }

    /// Truthiness of a condition: nonzero numbers are true
    pub fn is_truthy(&self) -> YatResult<bool> {
        Ok(self.expect_number("condition")? != 0)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Number(i64::from(b))
    }
}

// Numbers compare by value, functions by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::None, Value::None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({})", n),
            Value::Function(function) => {
                write!(f, "Function({:?}, {} stmts)", function.params, function.body.len())
            }
            Value::None => write!(f, "None"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Function(function) => write!(f, "<function({})>", function.params.join(", ")),
            Value::None => write!(f, "None"),
        }
    }
}
