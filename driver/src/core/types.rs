//! Shared deterministic types for batch orchestration.
//!
//! These types are the contract between the batch driver and its collaborators
//! (build command, transform tool). They carry no I/O.

use std::path::PathBuf;
use std::process::ExitStatus;

/// How a child process (build or transform tool) finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Exit status 0.
    Success,
    /// Non-zero exit. `code` is `None` when the child was killed by a signal.
    Failed { code: Option<i32> },
}

impl Exit {
    pub fn is_success(self) -> bool {
        matches!(self, Exit::Success)
    }
}

impl From<ExitStatus> for Exit {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            Exit::Success
        } else {
            Exit::Failed {
                code: status.code(),
            }
        }
    }
}

/// Result of the build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The build command succeeded; `artifact` is where the tool should now live.
    Built { artifact: PathBuf },
    /// The build command exited unsuccessfully.
    Failed { code: Option<i32> },
}

/// Summary of a completed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Canonical corpus root the batch ran against.
    pub corpus_root: PathBuf,
    /// Artifact used for every invocation.
    pub artifact: PathBuf,
    /// Files handed to the tool, in invocation order.
    pub processed: Vec<PathBuf>,
}
