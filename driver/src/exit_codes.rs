//! Stable exit codes for driver CLI commands.
//!
//! A failing build or transform step propagates its own exit code instead
//! (see [`crate::core::error::BatchError::exit_code`]).

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid config, corpus root, I/O, or a child killed by a signal.
pub const FAILURE: i32 = 1;
