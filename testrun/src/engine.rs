//! Execution engine contract and the sequential console engine.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use crate::suite::{SuiteHandle, SuiteOutcome};

/// One runnable entry of an assembled plan.
pub struct PlanEntry<'a> {
    pub path: &'a str,
    pub suite: &'a SuiteHandle,
}

/// Aggregate result of an engine run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    /// Paths of the suites that failed, in plan order.
    pub failed: Vec<String>,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Anything that can run an ordered plan of opaque suites.
pub trait Engine {
    fn run(&mut self, plan: &[PlanEntry<'_>], verbosity: u8) -> Result<RunSummary>;
}

/// Sequential engine printing one status line per suite.
///
/// A suite that cannot be run at all (spawn failure) counts as failed; the
/// run always continues to the end of the plan.
#[derive(Debug, Default)]
pub struct ConsoleEngine;

impl Engine for ConsoleEngine {
    fn run(&mut self, plan: &[PlanEntry<'_>], verbosity: u8) -> Result<RunSummary> {
        let mut summary = RunSummary {
            total: plan.len(),
            passed: 0,
            failed: Vec::new(),
        };
        for entry in plan {
            let outcome = match entry.suite.run(verbosity) {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(path = entry.path, err = %err, "suite could not be run");
                    SuiteOutcome::Failed {
                        detail: format!("{err:#}"),
                    }
                }
            };
            match outcome {
                SuiteOutcome::Passed => {
                    summary.passed += 1;
                    println!("ok    {}", entry.path);
                }
                SuiteOutcome::Failed { detail } => {
                    summary.failed.push(entry.path.to_string());
                    if verbosity >= 1 {
                        println!("FAIL  {} ({detail})", entry.path);
                    } else {
                        println!("FAIL  {}", entry.path);
                    }
                }
            }
        }
        println!(
            "{} passed, {} failed, {} total",
            summary.passed,
            summary.failed.len(),
            summary.total
        );
        Ok(summary)
    }
}

/// Write the machine-readable run summary (pretty JSON, trailing newline).
pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let mut payload = serde_json::to_string_pretty(summary).context("serialize run summary")?;
    payload.push('\n');
    fs::write(path, payload).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{failing_leaf, leaf};

    #[test]
    fn summary_counts_passes_and_failures_in_plan_order() {
        let passing = leaf("good");
        let failing = failing_leaf("bad");
        let plan = vec![
            PlanEntry {
                path: "good",
                suite: passing.suite.as_ref().expect("suite"),
            },
            PlanEntry {
                path: "bad",
                suite: failing.suite.as_ref().expect("suite"),
            },
        ];

        let summary = ConsoleEngine.run(&plan, 0).expect("run");
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, vec!["bad"]);
        assert!(!summary.all_passed());
    }

    #[test]
    fn empty_plan_yields_an_empty_summary() {
        let summary = ConsoleEngine.run(&[], 0).expect("run");
        assert_eq!(summary.total, 0);
        assert!(summary.all_passed());
    }

    #[test]
    fn write_summary_emits_pretty_json_with_trailing_newline() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("summary.json");
        let summary = RunSummary {
            total: 1,
            passed: 1,
            failed: Vec::new(),
        };
        write_summary(&path, &summary).expect("write");
        let contents = std::fs::read_to_string(&path).expect("read");
        assert!(contents.ends_with("}\n"));
        assert!(contents.contains("\"passed\": 1"));
    }
}
