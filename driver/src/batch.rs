//! Orchestration for `driver run`: build the transform tool once, then apply it
//! to every corpus file in order, stopping at the first failure.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info, instrument};

use crate::core::error::BatchError;
use crate::core::types::{BatchOutcome, BuildOutcome, Exit};
use crate::io::build::{CommandBuilder, ToolBuilder};
use crate::io::config::DriverConfig;
use crate::io::corpus::discover_corpus;
use crate::io::transform::{ProcessTransform, TransformTool};
use crate::io::workdir::WorkdirGuard;

/// Options for a single batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// File name prefix selecting corpus files.
    pub corpus_prefix: String,
}

impl From<&DriverConfig> for BatchOptions {
    fn from(cfg: &DriverConfig) -> Self {
        Self {
            corpus_prefix: cfg.corpus_prefix.clone(),
        }
    }
}

/// Build the tool with `cfg.build` inside `project_root`, then transform every
/// corpus file under `corpus_root`.
pub fn run(
    corpus_root: &Path,
    project_root: &Path,
    cfg: &DriverConfig,
) -> Result<BatchOutcome, BatchError> {
    cfg.validate()?;
    let project_root = std::path::absolute(project_root)
        .with_context(|| format!("resolve project root {}", project_root.display()))?;
    let builder = CommandBuilder::from_config(&project_root, &cfg.build, cfg.output_limit_bytes);
    let tool = ProcessTransform {
        output_limit_bytes: cfg.output_limit_bytes,
    };
    run_batch(corpus_root, &builder, &tool, &BatchOptions::from(cfg))
}

/// Run one batch with the given collaborators.
///
/// Steps, each gating the next:
/// 1. resolve `corpus_root` to a canonical directory,
/// 2. build the tool (no file is touched if this fails),
/// 3. list the corpus in lexical order,
/// 4. invoke the tool once per file, halting on the first non-zero exit.
///
/// Files transformed before a failure stay transformed. Nothing is skipped on
/// re-runs: every call invokes the tool once per file.
#[instrument(skip_all, fields(corpus_root = %corpus_root.display()))]
pub fn run_batch<B: ToolBuilder, T: TransformTool>(
    corpus_root: &Path,
    builder: &B,
    tool: &T,
    options: &BatchOptions,
) -> Result<BatchOutcome, BatchError> {
    let corpus_root = resolve_corpus_root(corpus_root)?;

    let artifact = match builder.build()? {
        BuildOutcome::Built { artifact } => artifact,
        BuildOutcome::Failed { code } => return Err(BatchError::BuildFailed { code }),
    };
    if !artifact.is_file() {
        return Err(BatchError::ArtifactMissing { path: artifact });
    }
    let artifact = artifact
        .canonicalize()
        .with_context(|| format!("resolve artifact {}", artifact.display()))?;
    info!(artifact = %artifact.display(), "transform tool built");

    let files = discover_corpus(&corpus_root, &options.corpus_prefix)?;
    if files.is_empty() {
        info!(prefix = %options.corpus_prefix, "corpus is empty, nothing to transform");
        return Ok(BatchOutcome {
            corpus_root,
            artifact,
            processed: Vec::new(),
        });
    }

    let _workdir = WorkdirGuard::enter(&corpus_root)?;
    let total = files.len();
    let mut processed = Vec::with_capacity(total);
    for (index, file) in files.into_iter().enumerate() {
        debug!(file = %file.display(), index, total, "invoking transform tool");
        match tool.invoke(&artifact, &file)? {
            Exit::Success => {
                info!(file = %file.display(), "transformed");
                processed.push(file);
            }
            Exit::Failed { code } => {
                return Err(BatchError::TransformFailed { path: file, code });
            }
        }
    }

    Ok(BatchOutcome {
        corpus_root,
        artifact,
        processed,
    })
}

/// Resolve `corpus_root` against the current directory and require a directory.
pub fn resolve_corpus_root(corpus_root: &Path) -> Result<PathBuf, BatchError> {
    let resolved = corpus_root
        .canonicalize()
        .map_err(|err| BatchError::CorpusRoot {
            path: corpus_root.to_path_buf(),
            reason: err.to_string(),
        })?;
    if !resolved.is_dir() {
        return Err(BatchError::CorpusRoot {
            path: corpus_root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingTool, ScriptedBuilder, TestCorpus};

    fn options() -> BatchOptions {
        BatchOptions {
            corpus_prefix: "CIDE.".to_string(),
        }
    }

    #[test]
    fn missing_corpus_root_fails_before_build() {
        let corpus = TestCorpus::new(&[]).expect("corpus");
        let builder = ScriptedBuilder::succeeding(corpus.artifact());
        let tool = RecordingTool::new();

        let err = run_batch(
            &corpus.path().join("missing"),
            &builder,
            &tool,
            &options(),
        )
        .expect_err("missing root");
        assert!(matches!(err, BatchError::CorpusRoot { .. }));
        assert_eq!(builder.calls(), 0);
        assert!(tool.invocations().is_empty());
    }

    #[test]
    fn file_as_corpus_root_is_rejected() {
        let corpus = TestCorpus::new(&["CIDE.A"]).expect("corpus");
        let err = resolve_corpus_root(&corpus.path().join("CIDE.A")).expect_err("file root");
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn missing_artifact_after_successful_build_touches_nothing() {
        let corpus = TestCorpus::new(&["CIDE.A"]).expect("corpus");
        let builder = ScriptedBuilder::succeeding(corpus.path().join("no-such-tool"));
        let tool = RecordingTool::new();

        let err = run_batch(corpus.path(), &builder, &tool, &options()).expect_err("missing");
        assert!(matches!(err, BatchError::ArtifactMissing { .. }));
        assert!(tool.invocations().is_empty());
        assert_eq!(corpus.read("CIDE.A").expect("read"), TestCorpus::ORIGINAL);
    }

    #[test]
    fn tool_spawn_error_stops_batch() {
        let corpus = TestCorpus::new(&["CIDE.A", "CIDE.B"]).expect("corpus");
        let builder = ScriptedBuilder::succeeding(corpus.artifact());
        let tool = RecordingTool::new().erroring_on("CIDE.A");

        let err = run_batch(corpus.path(), &builder, &tool, &options()).expect_err("spawn");
        assert!(matches!(err, BatchError::Other(_)));
        assert_eq!(tool.invoked_names(), vec!["CIDE.A"]);
    }

    #[test]
    fn custom_prefix_selects_other_files() {
        let corpus = TestCorpus::new(&["CIDE.A", "GCIDE.A"]).expect("corpus");
        let builder = ScriptedBuilder::succeeding(corpus.artifact());
        let tool = RecordingTool::new();

        let outcome = run_batch(
            corpus.path(),
            &builder,
            &tool,
            &BatchOptions {
                corpus_prefix: "GCIDE.".to_string(),
            },
        )
        .expect("run");
        assert_eq!(outcome.processed.len(), 1);
        assert_eq!(tool.invoked_names(), vec!["GCIDE.A"]);
    }
}
