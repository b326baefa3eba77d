//! Internal errors for the jstep interpreter.
//!
//! These are not modeled program faults. They mean the executed code
//! stepped outside the supported instruction subset (or a collaborator
//! handed over inconsistent code), and they abort the run. Every variant
//! that happens while executing carries the program counter (`at`).

use crate::frame::ProgramCounter;
use jstep_common::{FieldRef, Instruction, JvmType, MethodId};
use thiserror::Error;

/// Errors that abort a run instead of producing an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    /// The code store has no code for this method.
    #[error("unknown method {method}")]
    UnknownMethod { method: MethodId },

    /// The program counter points past the end of its method.
    #[error("unknown program counter {at}")]
    UnknownProgramCounter { at: ProgramCounter },

    /// The instruction is decodable but its operands are outside the subset.
    #[error("unsupported instruction '{instruction}' at {at}")]
    UnsupportedInstruction {
        at: ProgramCounter,
        instruction: Instruction,
    },

    /// Neither the built-in emulation nor the code store handles the call.
    #[error("unsupported call to {method} at {at}")]
    UnsupportedCall { at: ProgramCounter, method: MethodId },

    /// Field storage is not modeled.
    #[error("unsupported field access {field} at {at}")]
    UnsupportedField { at: ProgramCounter, field: FieldRef },

    /// `dup` on an empty operand stack.
    #[error("dup on empty stack at {at}")]
    EmptyStackDup { at: ProgramCounter },

    /// Pop on an empty operand stack.
    #[error("stack underflow at {at}")]
    StackUnderflow { at: ProgramCounter },

    /// An operand had the wrong declared type.
    #[error("type mismatch at {at}: expected {expected}, found {found}")]
    TypeMismatch {
        at: ProgramCounter,
        expected: JvmType,
        found: JvmType,
    },

    /// Ordering comparison between references.
    #[error("cannot order references with '{condition}' at {at}")]
    ReferenceOrdering {
        at: ProgramCounter,
        condition: &'static str,
    },

    /// The entry method was given the wrong number of arguments.
    #[error("{method} expects {expected} argument(s), got {found}")]
    ArgumentCount {
        method: MethodId,
        expected: usize,
        found: usize,
    },

    /// The call stack was empty while a step was requested.
    #[error("no frame to execute")]
    EmptyCallStack,
}
