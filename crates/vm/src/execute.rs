//! Single-step dispatch for the jstep interpreter.

use crate::builtins::{self, Emulated};
use crate::code_store::{CodeStore, MethodSource};
use crate::error::InternalError;
use crate::frame::{Frame, ProgramCounter};
use crate::machine::State;
use crate::outcome::{Fault, Outcome};
use jstep_common::{
    BinaryOp, ClassName, Condition, FieldRef, Instruction, InvokeKind, JvmType, MethodId,
    Reference, Value,
};

/// Result of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Execution continues with the updated state.
    Continue,
    /// The run is over.
    Halt(Outcome),
}

impl From<Fault> for Transition {
    fn from(fault: Fault) -> Self {
        Transition::Halt(Outcome::Fault(fault))
    }
}

impl State {
    /// Execute the instruction under the top frame's program counter.
    pub fn step<S: MethodSource>(
        &mut self,
        code: &mut CodeStore<S>,
    ) -> Result<Transition, InternalError> {
        let pc = self.frame()?.pc.clone();
        let instruction = code.instruction_at(&pc)?;
        tracing::trace!(%pc, %instruction, state = %self, "step");

        match instruction {
            Instruction::Push(value) => self.advance_with(value),
            Instruction::Load { ty, index } => {
                let frame = self.frame_mut()?;
                let value = frame.load(ty, index);
                frame.push(value);
                frame.pc += 1;
                Ok(Transition::Continue)
            }
            Instruction::Store { index, .. } => {
                let frame = self.frame_mut()?;
                let value = frame.pop()?;
                frame.store(index, value);
                frame.pc += 1;
                Ok(Transition::Continue)
            }
            Instruction::Binary { ty, op } => self.exec_binary(&pc, ty, op, &instruction),
            Instruction::Ifz { cond, target } => self.exec_ifz(&pc, cond, target),
            Instruction::If { cond, target } => self.exec_if(&pc, cond, target),
            Instruction::Goto { target } => {
                self.frame_mut()?.pc = pc.jump(target);
                Ok(Transition::Continue)
            }
            Instruction::New { class } => self.exec_new(class),
            Instruction::Dup { words } => self.exec_dup(&pc, words, &instruction),
            Instruction::Get { is_static, field } => self.exec_get(&pc, is_static, field),
            Instruction::Throw => self.exec_throw(&pc),
            Instruction::Invoke { kind, method } => self.exec_invoke(code, &pc, kind, method),
            Instruction::Return { ty } => self.exec_return(ty),
        }
    }

    /// Push `value` on the top frame and move to the next instruction.
    fn advance_with(&mut self, value: Value) -> Result<Transition, InternalError> {
        let frame = self.frame_mut()?;
        frame.push(value);
        frame.pc += 1;
        Ok(Transition::Continue)
    }

    fn exec_binary(
        &mut self,
        pc: &ProgramCounter,
        ty: JvmType,
        op: BinaryOp,
        instruction: &Instruction,
    ) -> Result<Transition, InternalError> {
        if ty != JvmType::Int {
            return Err(InternalError::UnsupportedInstruction {
                at: pc.clone(),
                instruction: instruction.clone(),
            });
        }
        let frame = self.frame_mut()?;
        let right = frame.pop_int()?;
        let left = frame.pop_int()?;
        match op.apply(left, right) {
            Some(result) => self.advance_with(Value::Int(result)),
            None => Ok(Fault::DivideByZero.into()),
        }
    }

    fn exec_ifz(
        &mut self,
        pc: &ProgramCounter,
        cond: Condition,
        target: usize,
    ) -> Result<Transition, InternalError> {
        let frame = self.frame_mut()?;
        let value = frame.pop()?;
        let taken = match value.as_comparable() {
            Some(v) => cond.holds(v, 0),
            // Against zero a reference means null-ness.
            None if cond.is_equality() => (cond == Condition::Eq) == value.is_null(),
            None => {
                return Err(InternalError::ReferenceOrdering {
                    at: pc.clone(),
                    condition: cond.mnemonic(),
                })
            }
        };
        branch(frame, pc, taken, target)
    }

    fn exec_if(
        &mut self,
        pc: &ProgramCounter,
        cond: Condition,
        target: usize,
    ) -> Result<Transition, InternalError> {
        let frame = self.frame_mut()?;
        let right = frame.pop()?;
        let left = frame.pop()?;
        let taken = match (left.as_comparable(), right.as_comparable()) {
            (Some(l), Some(r)) => cond.holds(l, r),
            (None, None) if cond.is_equality() => (cond == Condition::Eq) == (left == right),
            (None, None) => {
                return Err(InternalError::ReferenceOrdering {
                    at: pc.clone(),
                    condition: cond.mnemonic(),
                })
            }
            (Some(_), None) => return Err(mismatch(pc, left.ty(), right.ty())),
            (None, Some(_)) => return Err(mismatch(pc, right.ty(), left.ty())),
        };
        branch(frame, pc, taken, target)
    }

    fn exec_new(&mut self, class: ClassName) -> Result<Transition, InternalError> {
        let reference = if class.is_assertion_error() {
            Reference::AssertionError
        } else {
            let handle = self.heap.allocate(class.clone());
            Reference::Object { class, handle }
        };
        self.advance_with(Value::Reference(reference))
    }

    fn exec_dup(
        &mut self,
        pc: &ProgramCounter,
        words: usize,
        instruction: &Instruction,
    ) -> Result<Transition, InternalError> {
        if words != 1 {
            return Err(InternalError::UnsupportedInstruction {
                at: pc.clone(),
                instruction: instruction.clone(),
            });
        }
        let top = self
            .frame()?
            .peek()
            .cloned()
            .ok_or_else(|| InternalError::EmptyStackDup { at: pc.clone() })?;
        self.advance_with(top)
    }

    fn exec_get(
        &mut self,
        pc: &ProgramCounter,
        is_static: bool,
        field: FieldRef,
    ) -> Result<Transition, InternalError> {
        if is_static {
            if field.is_assertions_disabled() {
                return self.advance_with(Value::Boolean(false));
            }
        } else if self.frame_mut()?.pop()?.is_null() {
            return Ok(Fault::NullPointer.into());
        }
        Err(InternalError::UnsupportedField { at: pc.clone(), field })
    }

    fn exec_throw(&mut self, pc: &ProgramCounter) -> Result<Transition, InternalError> {
        match self.frame_mut()?.pop()? {
            Value::Reference(Reference::Null) => Ok(Fault::NullPointer.into()),
            Value::Reference(_) => Ok(Fault::AssertionError.into()),
            other => Err(mismatch(pc, JvmType::Reference, other.ty())),
        }
    }

    fn exec_invoke<S: MethodSource>(
        &mut self,
        code: &mut CodeStore<S>,
        pc: &ProgramCounter,
        kind: InvokeKind,
        method: MethodId,
    ) -> Result<Transition, InternalError> {
        let frame = self.frame_mut()?;
        let args = frame.pop_n(method.param_count())?;
        let receiver = if kind.has_receiver() {
            let receiver = frame.pop()?;
            if receiver.is_null() {
                return Ok(Fault::NullPointer.into());
            }
            Some(receiver)
        } else {
            None
        };
        let constructor = kind == InvokeKind::Special && method.is_constructor();

        let emulated = match builtins::call(&method, receiver.as_ref(), &args) {
            Ok(emulated) => emulated,
            Err(fault) => return Ok(fault.into()),
        };
        let result = match (emulated, constructor) {
            (_, true) => receiver,
            (Emulated::Value(value), false) => Some(value),
            (Emulated::Unit, false) => None,
            (Emulated::NotHandled, false) => {
                if !code.contains(&method) {
                    return Err(InternalError::UnsupportedCall {
                        at: pc.clone(),
                        method,
                    });
                }
                tracing::trace!(%method, depth = self.depth() + 1, "enter");
                let locals = receiver.into_iter().chain(args);
                self.frames.push(Frame::with_locals(method, locals));
                return Ok(Transition::Continue);
            }
        };

        let frame = self.frame_mut()?;
        if let Some(value) = result {
            frame.push(value);
        }
        frame.pc += 1;
        Ok(Transition::Continue)
    }

    fn exec_return(&mut self, ty: Option<JvmType>) -> Result<Transition, InternalError> {
        let mut callee = self.frames.pop().ok_or(InternalError::EmptyCallStack)?;
        let value = match ty {
            Some(_) => Some(callee.pop()?),
            None => None,
        };
        let Some(caller) = self.frames.last_mut() else {
            return Ok(Transition::Halt(Outcome::Ok));
        };
        tracing::trace!(method = %callee.pc.method, "leave");
        if let Some(value) = value {
            caller.push(value);
        }
        caller.pc += 1;
        Ok(Transition::Continue)
    }
}

fn branch(
    frame: &mut Frame,
    pc: &ProgramCounter,
    taken: bool,
    target: usize,
) -> Result<Transition, InternalError> {
    frame.pc = if taken { pc.jump(target) } else { pc.clone() + 1 };
    Ok(Transition::Continue)
}

fn mismatch(pc: &ProgramCounter, expected: JvmType, found: JvmType) -> InternalError {
    InternalError::TypeMismatch {
        at: pc.clone(),
        expected,
        found,
    }
}
