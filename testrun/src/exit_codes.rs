//! Stable exit codes for the `testrun` CLI.

/// Run completed with every suite passing, the catalog was listed, or the
/// selection resolved to nothing.
pub const OK: i32 = 0;
/// Configuration or catalog error: malformed declaration unit, unreadable
/// test root, invalid config file.
pub const INVALID: i32 = 1;
/// At least one suite failed.
pub const FAILED: i32 = 2;
