//! Declared types of values in the supported JVM subset.

use crate::error::ParseError;
use crate::value::{Reference, Value};
use std::fmt;
use std::str::FromStr;

/// The declared type of a value, local slot, or instruction operand.
///
/// Only the types the interpreter models are listed. Narrow integral
/// types (`byte`, `short`) are widened to `Int` the way the JVM operand
/// stack does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JvmType {
    /// 32-bit signed integer.
    Int,
    /// Boolean.
    Boolean,
    /// UTF-16 character, modeled as a Unicode scalar.
    Char,
    /// Any object or array reference.
    Reference,
}

/// All types, in definition order.
pub const ALL_TYPES: [JvmType; 4] = [
    JvmType::Int,
    JvmType::Boolean,
    JvmType::Char,
    JvmType::Reference,
];

impl JvmType {
    /// Listing keyword for this type.
    pub fn name(self) -> &'static str {
        match self {
            JvmType::Int => "int",
            JvmType::Boolean => "boolean",
            JvmType::Char => "char",
            JvmType::Reference => "ref",
        }
    }

    /// The value an unwritten local slot of this type holds.
    pub fn default_value(self) -> Value {
        match self {
            JvmType::Int => Value::Int(0),
            JvmType::Boolean => Value::Boolean(false),
            JvmType::Char => Value::Char('\0'),
            JvmType::Reference => Value::Reference(Reference::Null),
        }
    }

    /// Parse one field descriptor from the front of `desc`.
    ///
    /// Returns the type (or `None` for `V`) and the number of bytes consumed.
    pub fn parse_descriptor(desc: &str) -> Result<(Option<JvmType>, usize), ParseError> {
        let first = desc
            .chars()
            .next()
            .ok_or_else(|| ParseError::InvalidDescriptor(desc.to_string()))?;

        match first {
            'I' | 'S' | 'B' => Ok((Some(JvmType::Int), 1)),
            'Z' => Ok((Some(JvmType::Boolean), 1)),
            'C' => Ok((Some(JvmType::Char), 1)),
            'V' => Ok((None, 1)),
            'L' => {
                let end = desc
                    .find(';')
                    .ok_or_else(|| ParseError::InvalidDescriptor(desc.to_string()))?;
                Ok((Some(JvmType::Reference), end + 1))
            }
            '[' => {
                let (element, len) = Self::parse_descriptor(&desc[1..])?;
                if element.is_none() {
                    return Err(ParseError::InvalidDescriptor(desc.to_string()));
                }
                Ok((Some(JvmType::Reference), len + 1))
            }
            'J' | 'F' | 'D' => Err(ParseError::UnsupportedDescriptor(first)),
            _ => Err(ParseError::InvalidDescriptor(desc.to_string())),
        }
    }
}

impl FromStr for JvmType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(JvmType::Int),
            "boolean" | "bool" => Ok(JvmType::Boolean),
            "char" => Ok(JvmType::Char),
            "ref" | "reference" => Ok(JvmType::Reference),
            _ => Err(ParseError::UnknownType(s.to_string())),
        }
    }
}

impl fmt::Display for JvmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
