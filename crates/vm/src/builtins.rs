//! Emulation of library methods that have no code in the store.
//!
//! The table is keyed by method name and argument count. Entries are only
//! consulted for `java.lang.String` receivers holding emulated text, plus
//! the `java.lang.AssertionError` constructor. Anything else reports
//! [`Emulated::NotHandled`] and the caller decides what to do.

use crate::outcome::Fault;
use jstep_common::{MethodId, Reference, Value};

/// Result of asking the emulation layer to perform a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emulated {
    /// The call produced a value.
    Value(Value),
    /// The call completed with no result.
    Unit,
    /// No emulation exists for this call.
    NotHandled,
}

type StringMethod = fn(&str, &[Value]) -> Result<Emulated, Fault>;

const STRING_METHODS: &[(&str, usize, StringMethod)] = &[
    ("length", 0, length),
    ("isEmpty", 0, is_empty),
    ("charAt", 1, char_at),
    ("equals", 1, equals),
    ("substring", 1, substring_from),
    ("substring", 2, substring_range),
    ("indexOf", 1, index_of),
    ("concat", 1, concat),
];

/// Emulate `method` on `receiver` with `args`.
///
/// A null receiver faults before the method is looked up.
pub fn call(
    method: &MethodId,
    receiver: Option<&Value>,
    args: &[Value],
) -> Result<Emulated, Fault> {
    if receiver.is_some_and(Value::is_null) {
        return Err(Fault::NullPointer);
    }
    if method.class.is_assertion_error() && method.is_constructor() {
        return Ok(Emulated::Unit);
    }
    if !method.class.is_string() {
        return Ok(Emulated::NotHandled);
    }
    let Some(text) = receiver.and_then(Value::as_text) else {
        return Ok(Emulated::NotHandled);
    };
    match STRING_METHODS
        .iter()
        .find(|(name, arity, _)| *name == method.name && *arity == args.len())
    {
        Some((_, _, f)) => f(text, args),
        None => Ok(Emulated::NotHandled),
    }
}

fn int(value: i32) -> Result<Emulated, Fault> {
    Ok(Emulated::Value(Value::Int(value)))
}

fn length_of(text: &str) -> i32 {
    i32::try_from(text.chars().count()).unwrap_or(i32::MAX)
}

/// Character index for `i`, or `OutOfBounds` when `i` is outside `0..=limit`.
fn index(i: i32, limit: usize) -> Result<usize, Fault> {
    usize::try_from(i)
        .ok()
        .filter(|&i| i <= limit)
        .ok_or(Fault::OutOfBounds)
}

fn length(text: &str, _: &[Value]) -> Result<Emulated, Fault> {
    int(length_of(text))
}

fn is_empty(text: &str, _: &[Value]) -> Result<Emulated, Fault> {
    Ok(Emulated::Value(Value::Boolean(text.is_empty())))
}

fn char_at(text: &str, args: &[Value]) -> Result<Emulated, Fault> {
    let Some(i) = args[0].as_int() else {
        return Ok(Emulated::NotHandled);
    };
    let chars: Vec<char> = text.chars().collect();
    let c = usize::try_from(i)
        .ok()
        .and_then(|i| chars.get(i))
        .ok_or(Fault::OutOfBounds)?;
    Ok(Emulated::Value(Value::Char(*c)))
}

fn equals(text: &str, args: &[Value]) -> Result<Emulated, Fault> {
    let same = args[0].as_text() == Some(text);
    Ok(Emulated::Value(Value::Boolean(same)))
}

fn substring_from(text: &str, args: &[Value]) -> Result<Emulated, Fault> {
    let Some(start) = args[0].as_int() else {
        return Ok(Emulated::NotHandled);
    };
    let chars: Vec<char> = text.chars().collect();
    let start = index(start, chars.len())?;
    Ok(Emulated::Value(Value::text(
        chars[start..].iter().collect::<String>(),
    )))
}

fn substring_range(text: &str, args: &[Value]) -> Result<Emulated, Fault> {
    let (Some(start), Some(end)) = (args[0].as_int(), args[1].as_int()) else {
        return Ok(Emulated::NotHandled);
    };
    let chars: Vec<char> = text.chars().collect();
    let end = index(end, chars.len())?;
    let start = index(start, end)?;
    Ok(Emulated::Value(Value::text(
        chars[start..end].iter().collect::<String>(),
    )))
}

fn index_of(text: &str, args: &[Value]) -> Result<Emulated, Fault> {
    let found = match &args[0] {
        Value::Reference(Reference::Null) => return Err(Fault::NullPointer),
        Value::Reference(Reference::Text(needle)) => text
            .find(needle.as_str())
            .map(|byte| text[..byte].chars().count()),
        Value::Char(c) => text.chars().position(|t| t == *c),
        Value::Int(code) => match u32::try_from(*code).ok().and_then(char::from_u32) {
            Some(c) => text.chars().position(|t| t == c),
            None => None,
        },
        _ => return Ok(Emulated::NotHandled),
    };
    int(found.map_or(-1, |i| i32::try_from(i).unwrap_or(i32::MAX)))
}

fn concat(text: &str, args: &[Value]) -> Result<Emulated, Fault> {
    match &args[0] {
        Value::Reference(Reference::Null) => Err(Fault::NullPointer),
        Value::Reference(Reference::Text(other)) => {
            Ok(Emulated::Value(Value::text(format!("{text}{other}"))))
        }
        _ => Ok(Emulated::NotHandled),
    }
}
