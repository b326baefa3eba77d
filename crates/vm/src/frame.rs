//! Program counters and activation records.

use crate::error::InternalError;
use jstep_common::{JvmType, MethodId, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign};

/// Points at the next instruction: a method and an offset inside it.
///
/// Arithmetic only moves the offset; crossing into another method
/// happens through call and return.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramCounter {
    pub method: MethodId,
    pub offset: usize,
}

impl ProgramCounter {
    pub fn new(method: MethodId, offset: usize) -> Self {
        Self { method, offset }
    }

    /// Same method, different offset (branch target).
    pub fn jump(&self, target: usize) -> Self {
        Self::new(self.method.clone(), target)
    }
}

impl Add<usize> for ProgramCounter {
    type Output = ProgramCounter;

    fn add(self, delta: usize) -> ProgramCounter {
        ProgramCounter::new(self.method, self.offset + delta)
    }
}

impl AddAssign<usize> for ProgramCounter {
    fn add_assign(&mut self, delta: usize) {
        self.offset += delta;
    }
}

impl fmt::Display for ProgramCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.method, self.offset)
    }
}

/// One method activation: local slots, operand stack, program counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Written local slots. Unwritten slots read as the type default.
    pub locals: BTreeMap<usize, Value>,
    /// Operand stack, top is the last element.
    pub stack: Vec<Value>,
    pub pc: ProgramCounter,
}

impl Frame {
    /// Fresh frame at offset 0 of `method`.
    pub fn new(method: MethodId) -> Self {
        Self {
            locals: BTreeMap::new(),
            stack: Vec::new(),
            pc: ProgramCounter::new(method, 0),
        }
    }

    /// Fresh frame with `args` written to slots `0..args.len()`.
    pub fn with_locals(method: MethodId, args: impl IntoIterator<Item = Value>) -> Self {
        let mut frame = Self::new(method);
        frame.locals.extend(args.into_iter().enumerate());
        frame
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Result<Value, InternalError> {
        self.stack.pop().ok_or_else(|| InternalError::StackUnderflow {
            at: self.pc.clone(),
        })
    }

    /// Pop `count` values, returned in push order.
    pub fn pop_n(&mut self, count: usize) -> Result<Vec<Value>, InternalError> {
        if self.stack.len() < count {
            return Err(InternalError::StackUnderflow { at: self.pc.clone() });
        }
        Ok(self.stack.split_off(self.stack.len() - count))
    }

    /// Pop a value that must be an `Int`.
    pub fn pop_int(&mut self) -> Result<i32, InternalError> {
        let value = self.pop()?;
        value.as_int().ok_or_else(|| InternalError::TypeMismatch {
            at: self.pc.clone(),
            expected: JvmType::Int,
            found: value.ty(),
        })
    }

    pub fn peek(&self) -> Option<&Value> {
        self.stack.last()
    }

    /// Slot value, or the default for `ty` if the slot was never written.
    pub fn load(&self, ty: JvmType, index: usize) -> Value {
        self.locals
            .get(&index)
            .cloned()
            .unwrap_or_else(|| ty.default_value())
    }

    pub fn store(&mut self, index: usize, value: Value) {
        self.locals.insert(index, value);
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<{")?;
        for (i, (slot, value)) in self.locals.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{slot}:{value}")?;
        }
        f.write_str("}, [")?;
        for (i, value) in self.stack.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "], {}>", self.pc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method() -> MethodId {
        "jpamb.cases.Simple.f:(II)I".parse().unwrap()
    }

    #[test]
    fn pc_arithmetic_stays_in_method() {
        let mut pc = ProgramCounter::new(method(), 3);
        pc += 1;
        assert_eq!(pc.offset, 4);
        let next = pc.clone() + 2;
        assert_eq!(next.offset, 6);
        assert_eq!(next.method, method());
        assert_eq!(pc.jump(0).offset, 0);
    }

    #[test]
    fn pc_display() {
        let pc = ProgramCounter::new(method(), 5);
        assert_eq!(pc.to_string(), "jpamb.cases.Simple.f:(II)I:5");
    }

    #[test]
    fn locals_seeded_in_order() {
        let frame = Frame::with_locals(method(), vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(frame.load(JvmType::Int, 0), Value::Int(1));
        assert_eq!(frame.load(JvmType::Int, 1), Value::Int(2));
        assert_eq!(frame.pc.offset, 0);
    }

    #[test]
    fn unset_slots_read_defaults() {
        let frame = Frame::new(method());
        assert_eq!(frame.load(JvmType::Int, 9), Value::Int(0));
        assert_eq!(frame.load(JvmType::Boolean, 9), Value::Boolean(false));
        assert_eq!(frame.load(JvmType::Reference, 9), Value::null());
    }

    #[test]
    fn store_replaces_value_and_type() {
        let mut frame = Frame::new(method());
        frame.store(0, Value::Int(1));
        frame.store(0, Value::text("x"));
        assert_eq!(frame.load(JvmType::Int, 0), Value::text("x"));
    }

    #[test]
    fn pop_n_keeps_push_order() {
        let mut frame = Frame::new(method());
        frame.push(Value::Int(1));
        frame.push(Value::Int(2));
        frame.push(Value::Int(3));
        assert_eq!(frame.pop_n(2).unwrap(), vec![Value::Int(2), Value::Int(3)]);
        assert_eq!(frame.stack, vec![Value::Int(1)]);
        assert!(frame.pop_n(2).is_err());
    }

    #[test]
    fn pop_on_empty_stack() {
        let mut frame = Frame::new(method());
        assert_eq!(
            frame.pop(),
            Err(InternalError::StackUnderflow {
                at: ProgramCounter::new(method(), 0)
            })
        );
    }

    #[test]
    fn pop_int_checks_type() {
        let mut frame = Frame::new(method());
        frame.push(Value::Boolean(true));
        assert!(matches!(
            frame.pop_int(),
            Err(InternalError::TypeMismatch { expected: JvmType::Int, found: JvmType::Boolean, .. })
        ));
    }

    #[test]
    fn display() {
        let mut frame = Frame::with_locals(method(), vec![Value::Int(1)]);
        frame.push(Value::Char('a'));
        frame.push(Value::null());
        assert_eq!(
            frame.to_string(),
            "<{0:1}, ['a' null], jpamb.cases.Simple.f:(II)I:0>"
        );
    }
}
