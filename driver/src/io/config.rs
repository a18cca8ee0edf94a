//! Driver configuration stored in `driver.toml` at the project root.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::corpus::DEFAULT_PREFIX;

/// Default config file name, relative to the project root.
pub const CONFIG_FILE_NAME: &str = "driver.toml";

/// Driver configuration (TOML).
///
/// Missing fields default to building the `identity` tool with cargo and
/// running it over `CIDE.*`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DriverConfig {
    /// File name prefix that selects corpus files (`CIDE.` matches `CIDE.A`).
    pub corpus_prefix: String,

    /// Bytes of child stdout/stderr kept in memory for diagnostics.
    pub output_limit_bytes: usize,

    pub build: BuildConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuildConfig {
    /// Command that builds the transform tool (e.g. `["cargo","build","--release"]`).
    pub command: Vec<String>,

    /// Where the build leaves the tool, relative to the project root unless absolute.
    pub artifact: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: [
                "cargo",
                "build",
                "--release",
                "--features",
                "binaries",
                "--bin",
                "identity",
            ]
            .iter()
            .map(|arg| arg.to_string())
            .collect(),
            artifact: PathBuf::from("target")
                .join("release")
                .join(format!("identity{}", std::env::consts::EXE_SUFFIX)),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            corpus_prefix: DEFAULT_PREFIX.to_string(),
            output_limit_bytes: 100_000,
            build: BuildConfig::default(),
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.corpus_prefix.is_empty() {
            return Err(anyhow!("corpus_prefix must be non-empty"));
        }
        if self.corpus_prefix.contains(['/', '\\']) {
            return Err(anyhow!("corpus_prefix must be a file name prefix, not a path"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        if self.build.command.is_empty() || self.build.command[0].trim().is_empty() {
            return Err(anyhow!("build.command must be a non-empty array"));
        }
        if self.build.artifact.as_os_str().is_empty() {
            return Err(anyhow!("build.artifact must be non-empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `DriverConfig::default()`.
pub fn load_config(path: &Path) -> Result<DriverConfig> {
    if !path.exists() {
        let cfg = DriverConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: DriverConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid {}", path.display()))?;
    Ok(cfg)
}

/// Load config from a TOML file the user named explicitly.
///
/// Unlike [`load_config`], a missing file is an error rather than defaults.
pub fn load_required_config(path: &Path) -> Result<DriverConfig> {
    if !path.is_file() {
        return Err(anyhow!("config file {} not found", path.display()));
    }
    load_config(path)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &DriverConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
