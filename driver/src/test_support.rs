//! Test-only collaborators: scripted builds, a recording transform tool, and
//! scratch corpora.

use std::cell::{Cell, RefCell};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tempfile::TempDir;

use crate::core::types::{BuildOutcome, Exit};
use crate::io::build::ToolBuilder;
use crate::io::transform::TransformTool;

/// Builder that returns a fixed outcome and counts how often it was asked.
pub struct ScriptedBuilder {
    outcome: BuildOutcome,
    calls: Cell<u32>,
}

impl ScriptedBuilder {
    pub fn succeeding(artifact: impl Into<PathBuf>) -> Self {
        Self {
            outcome: BuildOutcome::Built {
                artifact: artifact.into(),
            },
            calls: Cell::new(0),
        }
    }

    pub fn failing(code: Option<i32>) -> Self {
        Self {
            outcome: BuildOutcome::Failed { code },
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl ToolBuilder for ScriptedBuilder {
    fn build(&self) -> Result<BuildOutcome> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.outcome.clone())
    }
}

/// Transform tool that records every invocation and appends
/// [`RecordingTool::MARK`] to files it "transforms".
#[derive(Default)]
pub struct RecordingTool {
    fail_on: Option<(String, Option<i32>)>,
    error_on: Option<String>,
    invoked: RefCell<Vec<PathBuf>>,
}

impl RecordingTool {
    pub const MARK: &'static str = "transformed\n";

    pub fn new() -> Self {
        Self::default()
    }

    /// Exit unsuccessfully with `code` when invoked on a file named `name`.
    pub fn failing_on(mut self, name: &str, code: Option<i32>) -> Self {
        self.fail_on = Some((name.to_string(), code));
        self
    }

    /// Return an invocation error (as if the tool could not be spawned) on `name`.
    pub fn erroring_on(mut self, name: &str) -> Self {
        self.error_on = Some(name.to_string());
        self
    }

    pub fn invocations(&self) -> Vec<PathBuf> {
        self.invoked.borrow().clone()
    }

    pub fn invoked_names(&self) -> Vec<String> {
        self.invoked
            .borrow()
            .iter()
            .map(|path| file_name(path))
            .collect()
    }
}

impl TransformTool for RecordingTool {
    fn invoke(&self, _artifact: &Path, file: &Path) -> Result<Exit> {
        self.invoked.borrow_mut().push(file.to_path_buf());
        let name = file_name(file);

        if self.error_on.as_deref() == Some(name.as_str()) {
            bail!("spawn transform tool for {}", file.display());
        }
        if let Some((fail_name, code)) = &self.fail_on
            && *fail_name == name
        {
            return Ok(Exit::Failed { code: *code });
        }

        let mut handle = OpenOptions::new()
            .append(true)
            .open(file)
            .with_context(|| format!("open {}", file.display()))?;
        handle
            .write_all(Self::MARK.as_bytes())
            .with_context(|| format!("append {}", file.display()))?;
        Ok(Exit::Success)
    }
}

/// Scratch project: a `corpus/` directory of seeded files plus a placeholder artifact.
pub struct TestCorpus {
    temp: TempDir,
    corpus_dir: PathBuf,
}

impl TestCorpus {
    /// Initial contents of every seeded file.
    pub const ORIGINAL: &'static str = "original\n";

    pub fn new(names: &[&str]) -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        let corpus_dir = temp.path().join("corpus");
        fs::create_dir_all(&corpus_dir)
            .with_context(|| format!("create {}", corpus_dir.display()))?;
        for name in names {
            fs::write(corpus_dir.join(name), Self::ORIGINAL)
                .with_context(|| format!("seed {name}"))?;
        }
        let artifact = temp.path().join("identity");
        fs::write(&artifact, "").with_context(|| format!("write {}", artifact.display()))?;
        Ok(Self { temp, corpus_dir })
    }

    /// Corpus directory.
    pub fn path(&self) -> &Path {
        &self.corpus_dir
    }

    /// Placeholder artifact path (exists on disk).
    pub fn artifact(&self) -> PathBuf {
        self.temp.path().join("identity")
    }

    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.corpus_dir.join(name);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    /// Number of times the recording tool transformed `name`.
    pub fn transform_count(&self, name: &str) -> Result<usize> {
        Ok(self.read(name)?.matches(RecordingTool::MARK).count())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
