//! Scoped change of the process working directory.
//!
//! The working directory is process-global, so guards are serialized through a
//! static lock that each guard holds until it is dropped.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use tracing::{debug, warn};

static WORKDIR_LOCK: Mutex<()> = Mutex::new(());

/// Switches the working directory on creation and restores the previous one on drop.
///
/// Restoration runs on every exit path, including early `?` returns and panics
/// that unwind through the owner.
#[derive(Debug)]
pub struct WorkdirGuard {
    previous: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl WorkdirGuard {
    /// Enter `dir`, remembering the current working directory.
    pub fn enter(dir: &Path) -> Result<Self> {
        // A panic while another guard was held leaves the lock poisoned; the
        // directory was still restored by that guard's drop.
        let lock = WORKDIR_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = env::current_dir().context("read current directory")?;
        env::set_current_dir(dir).with_context(|| format!("enter {}", dir.display()))?;
        debug!(from = %previous.display(), to = %dir.display(), "entered directory");
        Ok(Self {
            previous,
            _lock: lock,
        })
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if let Err(err) = env::set_current_dir(&self.previous) {
            warn!(err = %err, dir = %self.previous.display(), "failed to restore working directory");
        } else {
            debug!(dir = %self.previous.display(), "restored directory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    fn enter_then_fail(dir: &Path) -> Result<()> {
        let _guard = WorkdirGuard::enter(dir)?;
        bail!("failure while inside {}", dir.display());
    }

    #[test]
    fn restores_previous_directory_on_drop() {
        let temp = tempfile::tempdir().expect("tempdir");
        let target = temp.path().canonicalize().expect("canonicalize");

        let before = {
            let guard = WorkdirGuard::enter(&target).expect("enter");
            let inside = env::current_dir().expect("cwd");
            assert_eq!(inside.canonicalize().expect("canonicalize"), target);
            guard.previous.clone()
        };

        let _lock = WORKDIR_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        assert_eq!(env::current_dir().expect("cwd"), before);
    }

    #[test]
    fn restores_previous_directory_on_error_exit() {
        let temp = tempfile::tempdir().expect("tempdir");
        let target = temp.path().canonicalize().expect("canonicalize");
        let before = {
            let _lock = WORKDIR_LOCK
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            env::current_dir().expect("cwd")
        };

        assert!(enter_then_fail(&target).is_err());

        let _lock = WORKDIR_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        assert_eq!(env::current_dir().expect("cwd"), before);
    }

    #[test]
    fn entering_missing_directory_fails_without_moving() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("missing");
        assert!(WorkdirGuard::enter(&missing).is_err());
    }
}
