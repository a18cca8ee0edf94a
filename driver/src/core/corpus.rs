//! Corpus membership and ordering rules.

use std::ffi::OsStr;
use std::path::PathBuf;

/// Default file name prefix of the dictionary sources (`CIDE.A` .. `CIDE.Z`).
pub const DEFAULT_PREFIX: &str = "CIDE.";

/// `true` if `name` is `prefix` followed by a non-empty suffix.
///
/// Compares raw bytes, so the suffix need not be valid UTF-8.
pub fn is_corpus_name(name: &OsStr, prefix: &str) -> bool {
    let name = name.as_encoded_bytes();
    name.len() > prefix.len() && name.starts_with(prefix.as_bytes())
}

/// Sort corpus paths lexically by file name, then by full path.
///
/// Directory listings come back in filesystem order, which is not stable
/// across platforms.
pub fn order_corpus(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| {
        a.file_name()
            .cmp(&b.file_name())
            .then_with(|| a.as_os_str().cmp(b.as_os_str()))
    });
}
