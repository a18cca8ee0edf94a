//! Build adapter for the transform tool.
//!
//! The batch driver only needs "build, then tell me where the artifact is".
//! [`ToolBuilder`] keeps that seam narrow so tests can script build outcomes.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Result, anyhow};
use tracing::{error, info, instrument};

use crate::core::types::{BuildOutcome, Exit};
use crate::io::config::BuildConfig;
use crate::io::process::run_command;

/// Abstraction over the build collaborator.
pub trait ToolBuilder {
    /// Build the transform tool once.
    ///
    /// `Err` means the build could not be attempted at all (e.g. spawn failure).
    fn build(&self) -> Result<BuildOutcome>;
}

/// Builder that runs a configured command (by default `cargo build`) in a project directory.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    /// `argv` of the build command; the first element is the program.
    pub command: Vec<String>,
    /// Directory the build command runs in.
    pub workdir: PathBuf,
    /// Artifact location, absolute or relative to `workdir`.
    pub artifact: PathBuf,
    pub output_limit_bytes: usize,
}

impl CommandBuilder {
    pub fn from_config(project_root: &Path, build: &BuildConfig, output_limit_bytes: usize) -> Self {
        Self {
            command: build.command.clone(),
            workdir: project_root.to_path_buf(),
            artifact: build.artifact.clone(),
            output_limit_bytes,
        }
    }

    /// Absolute artifact path the tool will be invoked from.
    pub fn artifact_path(&self) -> PathBuf {
        self.workdir.join(&self.artifact)
    }
}

impl ToolBuilder for CommandBuilder {
    #[instrument(skip_all, fields(workdir = %self.workdir.display()))]
    fn build(&self) -> Result<BuildOutcome> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| anyhow!("build command is empty"))?;
        info!(command = ?self.command, "building transform tool");

        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(&self.workdir);
        let output = run_command(cmd, self.output_limit_bytes)?;

        match Exit::from(output.status) {
            Exit::Success => Ok(BuildOutcome::Built {
                artifact: self.artifact_path(),
            }),
            Exit::Failed { code } => {
                error!(exit_code = ?code, stderr = %output.stderr_text(), "build failed");
                Ok(BuildOutcome::Failed { code })
            }
        }
    }
}
