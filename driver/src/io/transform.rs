//! Transform tool invocation.
//!
//! The tool is opaque: it receives one file path, rewrites that file in place,
//! and signals the result through its exit status.

use std::path::Path;
use std::process::Command;

use anyhow::Result;
use tracing::{debug, error, instrument, warn};

use crate::core::types::Exit;
use crate::io::process::run_command;

/// Abstraction over the per-file transform step.
pub trait TransformTool {
    /// Run `artifact` on `file` and wait for it to finish.
    ///
    /// `Err` means the tool could not be run at all; a tool that ran and failed
    /// is `Ok(Exit::Failed { .. })`.
    fn invoke(&self, artifact: &Path, file: &Path) -> Result<Exit>;
}

/// Spawns the built artifact as a child process, one file per invocation.
#[derive(Debug, Clone)]
pub struct ProcessTransform {
    pub output_limit_bytes: usize,
}

impl TransformTool for ProcessTransform {
    #[instrument(skip_all, fields(file = %file.display()))]
    fn invoke(&self, artifact: &Path, file: &Path) -> Result<Exit> {
        let mut cmd = Command::new(artifact);
        cmd.arg(file);
        let output = run_command(cmd, self.output_limit_bytes)?;

        if !output.stdout.is_empty() {
            debug!(stdout = %String::from_utf8_lossy(&output.stdout).trim(), "tool output");
        }
        let exit = Exit::from(output.status);
        if !exit.is_success() {
            error!(exit = ?exit, stderr = %output.stderr_text(), "transform tool failed");
        } else if !output.stderr.is_empty() {
            warn!(stderr = %output.stderr_text(), "transform tool reported warnings");
        }
        Ok(exit)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn successful_tool_is_success() {
        let tool = ProcessTransform {
            output_limit_bytes: 1024,
        };
        let exit = tool
            .invoke(Path::new("true"), Path::new("CIDE.A"))
            .expect("invoke");
        assert_eq!(exit, Exit::Success);
    }

    #[test]
    fn failing_tool_reports_code() {
        let tool = ProcessTransform {
            output_limit_bytes: 1024,
        };
        let exit = tool
            .invoke(Path::new("false"), Path::new("CIDE.A"))
            .expect("invoke");
        assert_eq!(exit, Exit::Failed { code: Some(1) });
    }

    #[test]
    fn tool_receives_path_as_sole_argument() {
        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join("CIDE.A");
        // `sh FILE` runs FILE as a script, so the exit code shows which path the tool got.
        std::fs::write(&file, "exit 7\n").expect("write script");
        let tool = ProcessTransform {
            output_limit_bytes: 1024,
        };
        let exit = tool.invoke(Path::new("sh"), &file).expect("invoke");
        assert_eq!(exit, Exit::Failed { code: Some(7) });
    }

    #[test]
    fn stderr_of_successful_tool_is_logged_as_warning() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl Write for Captured {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().expect("log buffer").extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let temp = tempfile::tempdir().expect("tempdir");
        let file = temp.path().join("CIDE.A");
        std::fs::write(&file, "echo 'unknown entity <xyz/' >&2\nexit 0\n").expect("write script");

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let tool = ProcessTransform {
            output_limit_bytes: 1024,
        };
        let exit = tracing::subscriber::with_default(subscriber, || {
            tool.invoke(Path::new("sh"), &file).expect("invoke")
        });

        assert_eq!(exit, Exit::Success);
        let logs = String::from_utf8(captured.0.lock().expect("log buffer").clone())
            .expect("utf-8 logs");
        assert!(logs.contains("WARN"), "logs: {logs}");
        assert!(logs.contains("unknown entity <xyz/"), "logs: {logs}");
    }

    #[test]
    fn missing_artifact_is_an_error() {
        let tool = ProcessTransform {
            output_limit_bytes: 1024,
        };
        assert!(
            tool.invoke(Path::new("/nonexistent/identity"), Path::new("CIDE.A"))
                .is_err()
        );
    }
}
