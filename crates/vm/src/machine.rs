//! Machine state: call stack and heap.

use crate::error::InternalError;
use crate::frame::Frame;
use jstep_common::{ClassName, MethodId, Value};
use std::fmt;

/// A heap record for an allocated object. Fields are not modeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapObject {
    pub class: ClassName,
}

/// Append-only object heap. Handles are indices and are never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Heap {
    objects: Vec<HeapObject>,
}

impl Heap {
    /// Record a new object and return its handle.
    pub fn allocate(&mut self, class: ClassName) -> usize {
        self.objects.push(HeapObject { class });
        self.objects.len() - 1
    }

    pub fn get(&self, handle: usize) -> Option<&HeapObject> {
        self.objects.get(handle)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Everything a run mutates: the call stack and the heap.
///
/// While execution proceeds the call stack is non-empty; popping the
/// last frame ends the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Call stack, innermost frame last.
    pub frames: Vec<Frame>,
    pub heap: Heap,
}

impl State {
    /// Initial state: one frame for `entry` with `args` in slots `0..k`.
    pub fn new(entry: MethodId, args: Vec<Value>) -> Self {
        Self {
            frames: vec![Frame::with_locals(entry, args)],
            heap: Heap::default(),
        }
    }

    /// The executing frame.
    pub fn frame(&self) -> Result<&Frame, InternalError> {
        self.frames.last().ok_or(InternalError::EmptyCallStack)
    }

    /// The executing frame, mutably.
    pub fn frame_mut(&mut self) -> Result<&mut Frame, InternalError> {
        self.frames.last_mut().ok_or(InternalError::EmptyCallStack)
    }

    /// Number of active frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "heap={} frames=[", self.heap.len())?;
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{frame}")?;
        }
        f.write_str("]")
    }
}
