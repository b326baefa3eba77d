//! jstep virtual machine: steps decoded JVM-subset bytecode.
//!
//! The interpreter works one instruction at a time over:
//! - A call stack of frames, each with local slots, an operand stack and a
//!   program counter
//! - An append-only heap of allocated object records
//! - A code store that asks a [`MethodSource`] for method code on demand
//! - A small emulation layer for `java.lang.String` and
//!   `java.lang.AssertionError`
//!
//! A run ends with exactly one [`Outcome`]: `ok`, a modeled fault, or `*`
//! when the step bound is exhausted. Leaving the supported subset is an
//! [`InternalError`], never an outcome.
//!
//! # Usage
//!
//! ```
//! use jstep_common::{Instruction, MethodId, Value, BinaryOp, JvmType};
//! use jstep_vm::{run, Outcome};
//! use std::collections::HashMap;
//!
//! let entry: MethodId = "demo.Math.half:(I)I".parse().unwrap();
//! let mut code = HashMap::new();
//! code.insert(entry.clone(), vec![
//!     Instruction::Load { ty: JvmType::Int, index: 0 },
//!     Instruction::Push(Value::Int(2)),
//!     Instruction::Binary { ty: JvmType::Int, op: BinaryOp::Div },
//!     Instruction::Return { ty: Some(JvmType::Int) },
//! ]);
//!
//! assert_eq!(run(code, &entry, vec![Value::Int(8)]).unwrap(), Outcome::Ok);
//! ```

pub mod builtins;
pub mod code_store;
pub mod driver;
pub mod error;
pub mod execute;
pub mod frame;
pub mod machine;
pub mod outcome;

pub use code_store::{CodeStore, MethodSource};
pub use driver::{Config, Driver, Execution, DEFAULT_MAX_STEPS};
pub use error::InternalError;
pub use execute::Transition;
pub use frame::{Frame, ProgramCounter};
pub use machine::{Heap, State};
pub use outcome::{Fault, Outcome};

use jstep_common::{MethodId, Value};

/// Run `entry` with `args` under the default configuration.
///
/// # Errors
///
/// Returns [`InternalError`] if the run leaves the supported subset or the
/// argument count does not match the entry descriptor.
pub fn run<S: MethodSource>(
    source: S,
    entry: &MethodId,
    args: Vec<Value>,
) -> Result<Outcome, InternalError> {
    Driver::new(source)
        .run(entry, args)
        .map(|execution| execution.outcome)
}
