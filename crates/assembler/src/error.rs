//! Error types for the jstep listing assembler.

use jstep_common::ParseError;
use thiserror::Error;

/// Errors produced while assembling a listing. Every variant carries the
/// 1-based line it was found on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An unrecognized instruction mnemonic.
    #[error("line {line}: unknown mnemonic '{token}'")]
    UnknownMnemonic { line: usize, token: String },

    /// An unrecognized operand type name.
    #[error("line {line}: unknown type '{token}'")]
    UnknownType { line: usize, token: String },

    /// An unrecognized branch condition.
    #[error("line {line}: unknown condition '{token}'")]
    UnknownCondition { line: usize, token: String },

    /// An unrecognized arithmetic operator.
    #[error("line {line}: unknown operator '{token}'")]
    UnknownOperator { line: usize, token: String },

    /// An instruction did not have enough operands.
    #[error("line {line}: {mnemonic} expects {expected} operand(s)")]
    MissingArgument {
        line: usize,
        mnemonic: &'static str,
        expected: usize,
    },

    /// A numeric operand could not be parsed or is negative.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    /// A literal, method id or field reference was malformed.
    #[error("line {line}: {source}")]
    Syntax {
        line: usize,
        #[source]
        source: ParseError,
    },

    /// An instruction appeared outside a `method` block.
    #[error("line {line}: instruction outside of a method")]
    InstructionOutsideMethod { line: usize },

    /// `method` inside another `method` block.
    #[error("line {line}: method blocks cannot nest")]
    NestedMethod { line: usize },

    /// `end` without an open `method` block.
    #[error("line {line}: 'end' without 'method'")]
    UnmatchedEnd { line: usize },

    /// A `method` block was still open at end of input.
    #[error("line {line}: method {method} is missing 'end'")]
    UnterminatedMethod { line: usize, method: String },

    /// The same method id was declared twice.
    #[error("line {line}: method {method} is already defined")]
    DuplicateMethod { line: usize, method: String },

    /// A branch points past the end of its method.
    #[error("line {line}: branch target {target} is outside the method ({len} instructions)")]
    TargetOutOfRange {
        line: usize,
        target: usize,
        len: usize,
    },
}

impl AsmError {
    /// The line the error was reported on.
    pub fn line(&self) -> usize {
        match self {
            AsmError::UnknownMnemonic { line, .. }
            | AsmError::UnknownType { line, .. }
            | AsmError::UnknownCondition { line, .. }
            | AsmError::UnknownOperator { line, .. }
            | AsmError::MissingArgument { line, .. }
            | AsmError::InvalidNumber { line, .. }
            | AsmError::UnexpectedToken { line, .. }
            | AsmError::Syntax { line, .. }
            | AsmError::InstructionOutsideMethod { line }
            | AsmError::NestedMethod { line }
            | AsmError::UnmatchedEnd { line }
            | AsmError::UnterminatedMethod { line, .. }
            | AsmError::DuplicateMethod { line, .. }
            | AsmError::TargetOutOfRange { line, .. } => *line,
        }
    }
}
