//! jstep common types: values, identifiers, and decoded instructions.
//!
//! This crate provides the data model shared by the interpreter, the
//! listing assembler, and the CLI:
//!
//! - [`JvmType`]: declared types of the supported JVM subset
//! - [`Value`] / [`Reference`]: immutable runtime values
//! - [`MethodId`], [`FieldRef`], [`ClassName`]: member identifiers
//! - [`Instruction`]: the closed set of decoded instructions
//! - [`Listing`]: named method bodies
//! - [`literal`]: value literal and argument tuple parsing
//! - [`ParseError`]: errors from the textual forms above

pub mod error;
pub mod instruction;
pub mod literal;
pub mod method;
pub mod program;
pub mod types;
pub mod value;

// Re-export commonly used types at the crate root.
pub use error::ParseError;
pub use instruction::{BinaryOp, Condition, Instruction, InvokeKind};
pub use literal::{parse_inputs, parse_value};
pub use method::{ClassName, FieldRef, MethodId};
pub use program::{Listing, MethodCode};
pub use types::JvmType;
pub use value::{Reference, Value};
