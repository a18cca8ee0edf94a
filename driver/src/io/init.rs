//! `driver init`: write a default `driver.toml` into a project root.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use super::config::{CONFIG_FILE_NAME, DriverConfig, write_config};

/// Canonical driver-owned paths for a project root.
#[derive(Debug, Clone)]
pub struct DriverPaths {
    pub root: PathBuf,
    pub config_path: PathBuf,
}

impl DriverPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_path: root.join(CONFIG_FILE_NAME),
            root,
        }
    }
}

/// Options for `init_driver`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite an existing config file.
    pub force: bool,
}

/// Write the default config to `<root>/driver.toml`.
///
/// Fails if the file already exists unless `options.force` is set.
pub fn init_driver(root: &Path, options: &InitOptions) -> Result<DriverPaths> {
    let paths = DriverPaths::new(root);
    if paths.config_path.exists() && !options.force {
        return Err(anyhow!(
            "driver init: {} already exists (use --force to overwrite)",
            paths.config_path.display()
        ));
    }
    if paths.config_path.is_dir() {
        return Err(anyhow!(
            "driver init: {} exists but is a directory",
            paths.config_path.display()
        ));
    }
    write_config(&paths.config_path, &DriverConfig::default())?;
    Ok(paths)
}
