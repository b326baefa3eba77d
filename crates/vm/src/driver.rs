//! Bounded run loop.

use crate::code_store::{CodeStore, MethodSource};
use crate::error::InternalError;
use crate::execute::Transition;
use crate::machine::State;
use crate::outcome::Outcome;
use jstep_common::{MethodId, Value};

/// Default number of steps before a run is reported as diverging.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Steps executed before giving up with [`Outcome::Diverged`].
    pub max_steps: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// A finished run.
#[derive(Debug, Clone)]
pub struct Execution {
    pub outcome: Outcome,
    /// Steps taken, including the one that halted.
    pub steps: usize,
    /// State after the last step.
    pub state: State,
}

/// Runs entry methods against a code store.
///
/// The store is kept across runs, so methods are loaded once per driver.
pub struct Driver<S> {
    code: CodeStore<S>,
    config: Config,
}

impl<S: MethodSource> Driver<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, Config::default())
    }

    pub fn with_config(source: S, config: Config) -> Self {
        Self {
            code: CodeStore::new(source),
            config,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// Run `entry` with `args` until it halts or the step bound is hit.
    ///
    /// # Errors
    ///
    /// Returns [`InternalError`] when the argument count does not match
    /// the entry descriptor, or when execution leaves the supported subset.
    pub fn run(&mut self, entry: &MethodId, args: Vec<Value>) -> Result<Execution, InternalError> {
        if args.len() != entry.param_count() {
            return Err(InternalError::ArgumentCount {
                method: entry.clone(),
                expected: entry.param_count(),
                found: args.len(),
            });
        }
        tracing::debug!(method = %entry, args = args.len(), max_steps = self.config.max_steps, "run");

        let mut state = State::new(entry.clone(), args);
        let mut outcome = Outcome::Diverged;
        let mut steps = 0;
        while steps < self.config.max_steps {
            steps += 1;
            if let Transition::Halt(halt) = state.step(&mut self.code)? {
                outcome = halt;
                break;
            }
        }

        if outcome == Outcome::Diverged {
            tracing::debug!(max_steps = self.config.max_steps, "step bound reached");
        }
        tracing::debug!(method = %entry, %outcome, steps, "finished");
        Ok(Execution {
            outcome,
            steps,
            state,
        })
    }
}
