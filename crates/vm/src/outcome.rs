//! Terminal outcomes of a run.

use std::fmt;

/// A modeled runtime fault. Halts the run immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    DivideByZero,
    NullPointer,
    OutOfBounds,
    AssertionError,
}

/// How a run ended. Exactly one is produced per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The entry method returned.
    Ok,
    /// A modeled fault was raised.
    Fault(Fault),
    /// The step bound was exhausted.
    Diverged,
}

impl Fault {
    pub fn as_str(self) -> &'static str {
        match self {
            Fault::DivideByZero => "divide by zero",
            Fault::NullPointer => "null pointer",
            Fault::OutOfBounds => "out of bounds",
            Fault::AssertionError => "assertion error",
        }
    }
}

impl Outcome {
    /// The outcome's name in the fixed reporting vocabulary.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Fault(fault) => fault.as_str(),
            Outcome::Diverged => "*",
        }
    }
}

impl From<Fault> for Outcome {
    fn from(fault: Fault) -> Self {
        Outcome::Fault(fault)
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
