//! Decoded instructions of the supported JVM subset.
//!
//! Class-file decoding happens elsewhere; this is the form the
//! interpreter consumes. `Display` renders the canonical listing syntax
//! understood by `jstep-assembler`.

use crate::method::{ClassName, FieldRef, MethodId};
use crate::types::JvmType;
use crate::value::Value;
use std::fmt;

/// Integer arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// Truncating division. Zero divisor is a fault.
    Div,
    /// Remainder with the sign of the dividend. Zero divisor is a fault.
    Rem,
}

/// All binary operators, in definition order.
pub const ALL_BINARY_OPS: [BinaryOp; 5] = [
    BinaryOp::Add,
    BinaryOp::Sub,
    BinaryOp::Mul,
    BinaryOp::Div,
    BinaryOp::Rem,
];

impl BinaryOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
            BinaryOp::Rem => "rem",
        }
    }

    /// True for the operators that fault on a zero right operand.
    pub fn traps_on_zero(self) -> bool {
        matches!(self, BinaryOp::Div | BinaryOp::Rem)
    }

    /// Apply the operator with 32-bit wrap-around.
    ///
    /// Returns `None` for a zero divisor of `Div`/`Rem`.
    pub fn apply(self, a: i32, b: i32) -> Option<i32> {
        match self {
            BinaryOp::Add => Some(a.wrapping_add(b)),
            BinaryOp::Sub => Some(a.wrapping_sub(b)),
            BinaryOp::Mul => Some(a.wrapping_mul(b)),
            _ if b == 0 && self.traps_on_zero() => None,
            BinaryOp::Div => Some(a.wrapping_div(b)),
            BinaryOp::Rem => Some(a.wrapping_rem(b)),
        }
    }
}

/// Branch conditions shared by `ifz` and `if`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// All conditions, in definition order.
pub const ALL_CONDITIONS: [Condition; 6] = [
    Condition::Eq,
    Condition::Ne,
    Condition::Lt,
    Condition::Le,
    Condition::Gt,
    Condition::Ge,
];

impl Condition {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Condition::Eq => "eq",
            Condition::Ne => "ne",
            Condition::Lt => "lt",
            Condition::Le => "le",
            Condition::Gt => "gt",
            Condition::Ge => "ge",
        }
    }

    /// Evaluate `left <cond> right`.
    pub fn holds(self, left: i32, right: i32) -> bool {
        match self {
            Condition::Eq => left == right,
            Condition::Ne => left != right,
            Condition::Lt => left < right,
            Condition::Le => left <= right,
            Condition::Gt => left > right,
            Condition::Ge => left >= right,
        }
    }

    /// True for the two relations defined on references.
    pub fn is_equality(self) -> bool {
        matches!(self, Condition::Eq | Condition::Ne)
    }
}

/// Dispatch flavour of a method invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvokeKind {
    /// Instance call resolved on the receiver.
    Virtual,
    /// Class call, no receiver.
    Static,
    /// Constructor or private instance call.
    Special,
}

impl InvokeKind {
    pub fn mnemonic(self) -> &'static str {
        match self {
            InvokeKind::Virtual => "virtual",
            InvokeKind::Static => "static",
            InvokeKind::Special => "special",
        }
    }

    /// True when a receiver is popped below the arguments.
    pub fn has_receiver(self) -> bool {
        !matches!(self, InvokeKind::Static)
    }
}

/// A single decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Push a constant.
    Push(Value),
    /// Push local slot `index`, or the default of `ty` if unset.
    Load { ty: JvmType, index: usize },
    /// Pop into local slot `index`.
    Store { ty: JvmType, index: usize },
    /// Pop two operands, push `left op right`.
    Binary { ty: JvmType, op: BinaryOp },
    /// Pop one value, branch if `value <cond> 0`.
    Ifz { cond: Condition, target: usize },
    /// Pop two values, branch if `left <cond> right`.
    If { cond: Condition, target: usize },
    /// Unconditional jump.
    Goto { target: usize },
    /// Allocate an uninitialized object.
    New { class: ClassName },
    /// Duplicate the top `words` stack slots.
    Dup { words: usize },
    /// Read a static or instance field.
    Get { is_static: bool, field: FieldRef },
    /// Throw the reference on top of the stack.
    Throw,
    /// Call a method.
    Invoke { kind: InvokeKind, method: MethodId },
    /// Return from the current method, with a value when `ty` is set.
    Return { ty: Option<JvmType> },
}

impl Instruction {
    /// The listing keyword of this instruction.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Push(_) => "push",
            Instruction::Load { .. } => "load",
            Instruction::Store { .. } => "store",
            Instruction::Binary { .. } => "binary",
            Instruction::Ifz { .. } => "ifz",
            Instruction::If { .. } => "if",
            Instruction::Goto { .. } => "goto",
            Instruction::New { .. } => "new",
            Instruction::Dup { .. } => "dup",
            Instruction::Get { .. } => "get",
            Instruction::Throw => "throw",
            Instruction::Invoke { .. } => "invoke",
            Instruction::Return { .. } => "return",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.mnemonic();
        match self {
            Instruction::Push(value) => write!(f, "{m} {value}"),
            Instruction::Load { ty, index } | Instruction::Store { ty, index } => {
                write!(f, "{m} {ty} {index}")
            }
            Instruction::Binary { ty, op } => write!(f, "{m} {ty} {}", op.mnemonic()),
            Instruction::Ifz { cond, target } | Instruction::If { cond, target } => {
                write!(f, "{m} {} {target}", cond.mnemonic())
            }
            Instruction::Goto { target } => write!(f, "{m} {target}"),
            Instruction::New { class } => write!(f, "{m} {class}"),
            Instruction::Dup { words } => write!(f, "{m} {words}"),
            Instruction::Get { is_static, field } => {
                let scope = if *is_static { "static" } else { "field" };
                write!(f, "{m} {scope} {field}")
            }
            Instruction::Throw => f.write_str(m),
            Instruction::Invoke { kind, method } => {
                write!(f, "{m} {} {method}", kind.mnemonic())
            }
            Instruction::Return { ty: Some(ty) } => write!(f, "{m} {ty}"),
            Instruction::Return { ty: None } => f.write_str(m),
        }
    }
}
