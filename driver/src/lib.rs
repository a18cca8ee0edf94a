//! Build-once, apply-many batch driver for the GNU CIDE dictionary sources.
//!
//! The driver builds an external transform tool exactly once, then runs it on
//! every `CIDE.*` file of a corpus directory in lexical order, halting at the
//! first failure. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure rules (corpus membership and ordering, outcome types,
//!   the [`core::error::BatchError`] taxonomy). No I/O.
//! - **[`io`]**: Side-effecting adapters (build command, tool invocation,
//!   directory listing, working-directory guard, config file). The build and
//!   transform steps sit behind traits so tests can script them.
//!
//! [`batch`] coordinates the two to implement `driver run`.

pub mod batch;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
