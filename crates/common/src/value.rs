//! Runtime value representation for the jstep interpreter.
//!
//! Values are what live on operand stacks and in local slots. They are
//! immutable; every operation produces a new value.

use crate::method::ClassName;
use crate::types::JvmType;
use std::fmt;

/// Payload of a reference-typed value.
///
/// Object layout is not modeled. The interpreter only needs to tell apart
/// null, emulated strings, the assertion-error marker, and "some other
/// object", so each gets its own variant instead of being inferred from a
/// class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// The null reference.
    Null,
    /// An emulated `java.lang.String`.
    Text(String),
    /// A freshly allocated `java.lang.AssertionError`.
    AssertionError,
    /// Any other allocated object: its class and heap handle.
    Object { class: ClassName, handle: usize },
}

/// Runtime value: declared type plus payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// 32-bit signed integer.
    Int(i32),
    /// Boolean value.
    Boolean(bool),
    /// Character value.
    Char(char),
    /// Reference to an object, a string, or null.
    Reference(Reference),
}

impl Value {
    /// The null reference.
    pub fn null() -> Self {
        Value::Reference(Reference::Null)
    }

    /// An emulated string value.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Reference(Reference::Text(s.into()))
    }

    /// Returns the declared type of this value.
    pub fn ty(&self) -> JvmType {
        match self {
            Value::Int(_) => JvmType::Int,
            Value::Boolean(_) => JvmType::Boolean,
            Value::Char(_) => JvmType::Char,
            Value::Reference(_) => JvmType::Reference,
        }
    }

    /// True only for the null reference.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Reference(Reference::Null))
    }

    /// The string payload, if this is an emulated string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Reference(Reference::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integer view used by conditional branches.
    ///
    /// Booleans compare as 0/1 and characters by code point. References
    /// have no integer view.
    pub fn as_comparable(&self) -> Option<i32> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Boolean(b) => Some(i32::from(*b)),
            Value::Char(c) => Some(*c as i32),
            Value::Reference(_) => None,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Null => f.write_str("null"),
            Reference::Text(s) => write!(f, "{s:?}"),
            Reference::AssertionError => write!(f, "<{}>", ClassName::ASSERTION_ERROR),
            Reference::Object { class, handle } => write!(f, "<{class}@{handle}>"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::Reference(r) => write!(f, "{r}"),
        }
    }
}
