//! Corpus discovery on disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::corpus::{is_corpus_name, order_corpus};

/// List regular files directly under `root` whose names match `prefix`, in lexical order.
///
/// Subdirectories are not searched.
pub fn discover_corpus(root: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("read {}", root.display()))? {
        let entry = entry.with_context(|| format!("read entry in {}", root.display()))?;
        if !is_corpus_name(&entry.file_name(), prefix) {
            continue;
        }
        let path = entry.path();
        // Follows symlinks: a link to a corpus file counts, a dangling link is skipped.
        if !path.is_file() {
            debug!(path = %path.display(), "skipping non-file corpus entry");
            continue;
        }
        files.push(path);
    }
    order_corpus(&mut files);
    debug!(root = %root.display(), count = files.len(), "corpus discovered");
    Ok(files)
}
