//! Error taxonomy for a batch run.
//!
//! Every variant is fatal to the run. The CLI maps variants to process exit
//! codes through [`BatchError::exit_code`].

use std::path::PathBuf;

use thiserror::Error;

use crate::exit_codes;

#[derive(Debug, Error)]
pub enum BatchError {
    /// The corpus root could not be resolved to an existing directory.
    #[error("corpus root {}: {reason}", path.display())]
    CorpusRoot { path: PathBuf, reason: String },

    /// The transform tool could not be built. No file was touched.
    #[error("build failed ({})", describe_code(*code))]
    BuildFailed { code: Option<i32> },

    /// The build reported success but left no artifact behind.
    #[error("build succeeded but artifact {} is missing", path.display())]
    ArtifactMissing { path: PathBuf },

    /// The tool exited unsuccessfully on `path`. Earlier files stay transformed.
    #[error("transform failed on {} ({})", path.display(), describe_code(*code))]
    TransformFailed { path: PathBuf, code: Option<i32> },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BatchError {
    /// Process exit code for this error: the failing child's code when there is one.
    pub fn exit_code(&self) -> i32 {
        match self {
            BatchError::BuildFailed { code: Some(code) }
            | BatchError::TransformFailed {
                code: Some(code), ..
            } if *code != exit_codes::OK => *code,
            _ => exit_codes::FAILURE,
        }
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
