//! Per-run cache of decoded method code.

use crate::error::InternalError;
use crate::frame::ProgramCounter;
use jstep_common::{Instruction, MethodId};
use std::collections::HashMap;
use std::rc::Rc;

/// Supplies decoded instructions for a method.
///
/// Implemented by whatever loads classes. `None` means the method has no
/// code available (for example a library method).
pub trait MethodSource {
    fn method_code(&mut self, method: &MethodId) -> Option<Vec<Instruction>>;
}

impl MethodSource for HashMap<MethodId, Vec<Instruction>> {
    fn method_code(&mut self, method: &MethodId) -> Option<Vec<Instruction>> {
        self.get(method).cloned()
    }
}

impl<F> MethodSource for F
where
    F: FnMut(&MethodId) -> Option<Vec<Instruction>>,
{
    fn method_code(&mut self, method: &MethodId) -> Option<Vec<Instruction>> {
        self(method)
    }
}

/// Memoizing front for a [`MethodSource`].
///
/// The source is asked at most once per method; misses are cached too.
pub struct CodeStore<S> {
    source: S,
    methods: HashMap<MethodId, Option<Rc<[Instruction]>>>,
}

impl<S: MethodSource> CodeStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            methods: HashMap::new(),
        }
    }

    fn code(&mut self, method: &MethodId) -> Option<Rc<[Instruction]>> {
        if let Some(cached) = self.methods.get(method) {
            return cached.clone();
        }
        tracing::debug!(%method, "loading method code");
        let code: Option<Rc<[Instruction]>> = self.source.method_code(method).map(Rc::from);
        self.methods.insert(method.clone(), code.clone());
        code
    }

    /// True when the source has code for `method`.
    pub fn contains(&mut self, method: &MethodId) -> bool {
        self.code(method).is_some()
    }

    /// The instruction `pc` points at.
    pub fn instruction_at(&mut self, pc: &ProgramCounter) -> Result<Instruction, InternalError> {
        let code = self
            .code(&pc.method)
            .ok_or_else(|| InternalError::UnknownMethod {
                method: pc.method.clone(),
            })?;
        code.get(pc.offset)
            .cloned()
            .ok_or_else(|| InternalError::UnknownProgramCounter { at: pc.clone() })
    }

    /// Number of methods looked up so far, hits and misses.
    pub fn cached(&self) -> usize {
        self.methods.len()
    }
}
