//! Test-suite discovery and selection orchestrator.
//!
//! Builds a hierarchical catalog of declared test suites from per-directory
//! declaration files, resolves include/exclude directives into a flat
//! execution plan, and hands the plan to an execution engine. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: pure, deterministic logic (path algebra, expansion,
//!   selection, invariants). No I/O, fully testable in isolation.
//! - **[`io`]**: side-effecting operations (declaration loading, catalog
//!   construction, configuration, results directories).
//!
//! [`catalog`] holds the immutable data model shared by both; [`render`]
//! and [`engine`] turn a resolved selection into executed suites.

pub mod catalog;
pub mod core;
pub mod engine;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod render;
pub mod suite;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
