//! Opaque runnable suite contract shared by the catalog and the engine.

use std::fmt;

use anyhow::Result;

/// A runnable test suite.
///
/// Implementations decide what "running" means (spawning a command, calling
/// into a library). The orchestrator only schedules suites and records their
/// outcomes.
pub trait Suite {
    fn run(&self, verbosity: u8) -> Result<SuiteOutcome>;
}

/// Result of running a single suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuiteOutcome {
    Passed,
    Failed { detail: String },
}

/// Owned handle to a suite, stored on catalog leaves.
pub struct SuiteHandle(Box<dyn Suite>);

impl SuiteHandle {
    pub fn new(suite: impl Suite + 'static) -> Self {
        Self(Box::new(suite))
    }

    pub fn run(&self, verbosity: u8) -> Result<SuiteOutcome> {
        self.0.run(verbosity)
    }
}

impl fmt::Debug for SuiteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SuiteHandle")
    }
}

/// Zero-argument suite constructor supplied by a declaration unit.
pub type SuiteFactory = Box<dyn Fn() -> SuiteHandle>;
