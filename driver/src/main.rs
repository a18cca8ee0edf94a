//! Batch driver CLI.
//!
//! Builds the transform tool once and applies it to every `CIDE.*` file of a
//! corpus directory, stopping at the first failure.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use driver::batch::{resolve_corpus_root, run};
use driver::core::error::BatchError;
use driver::exit_codes;
use driver::io::config::{CONFIG_FILE_NAME, DriverConfig, load_config, load_required_config};
use driver::io::corpus::discover_corpus;
use driver::io::init::{InitOptions, init_driver};
use driver::logging;

#[derive(Parser)]
#[command(
    name = "driver",
    version,
    about = "Build the CIDE transform tool once and apply it to every corpus file"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the tool, then transform every corpus file in order (stops at the first failure).
    Run {
        /// Directory holding the `CIDE.*` files.
        corpus_root: PathBuf,
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Print the corpus files `run` would transform, in order, without building.
    List {
        /// Directory holding the `CIDE.*` files.
        corpus_root: PathBuf,
        #[command(flatten)]
        project: ProjectArgs,
    },
    /// Write a default `driver.toml` into the project directory.
    Init {
        /// Project directory (defaults to the current directory).
        #[arg(long)]
        project: Option<PathBuf>,
        /// Overwrite an existing config.
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(clap::Args)]
struct ProjectArgs {
    /// Project directory the build command runs in (defaults to the current directory).
    #[arg(long)]
    project: Option<PathBuf>,
    /// Config file (defaults to `<project>/driver.toml`).
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ProjectArgs {
    fn project_root(&self) -> Result<PathBuf> {
        project_root(self.project.as_deref())
    }

    fn load(&self) -> Result<(PathBuf, DriverConfig)> {
        let root = self.project_root()?;
        let cfg = match &self.config {
            Some(path) => {
                debug!(config = %path.display(), "loading explicit config");
                load_required_config(path)?
            }
            None => {
                let path = root.join(CONFIG_FILE_NAME);
                debug!(config = %path.display(), "loading project config");
                load_config(&path)?
            }
        };
        Ok((root, cfg))
    }
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let code = match cli.command {
        Command::Run {
            corpus_root,
            project,
        } => cmd_run(&corpus_root, &project),
        Command::List {
            corpus_root,
            project,
        } => report(cmd_list(&corpus_root, &project)),
        Command::Init { project, force } => report(cmd_init(project.as_deref(), force)),
    };
    std::process::exit(code);
}

fn report(result: Result<()>) -> i32 {
    match result {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::FAILURE
        }
    }
}

fn cmd_run(corpus_root: &Path, project: &ProjectArgs) -> i32 {
    let (root, cfg) = match project.load() {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("{:#}", err);
            return exit_codes::FAILURE;
        }
    };
    match run(corpus_root, &root, &cfg) {
        Ok(outcome) => {
            println!(
                "run: files={} corpus={} artifact={}",
                outcome.processed.len(),
                outcome.corpus_root.display(),
                outcome.artifact.display()
            );
            exit_codes::OK
        }
        Err(err) => {
            print_batch_error(&err);
            err.exit_code()
        }
    }
}

fn print_batch_error(err: &BatchError) {
    match err {
        BatchError::Other(inner) => eprintln!("{:#}", inner),
        other => eprintln!("{}", other),
    }
}

fn cmd_list(corpus_root: &Path, project: &ProjectArgs) -> Result<()> {
    let (_, cfg) = project.load()?;
    let root = resolve_corpus_root(corpus_root)?;
    for file in discover_corpus(&root, &cfg.corpus_prefix)? {
        println!("{}", file.display());
    }
    Ok(())
}

fn cmd_init(project: Option<&Path>, force: bool) -> Result<()> {
    let root = project_root(project)?;
    let paths = init_driver(&root, &InitOptions { force })?;
    println!("init: config={}", paths.config_path.display());
    Ok(())
}

fn project_root(project: Option<&Path>) -> Result<PathBuf> {
    match project {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().context("read current directory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run() {
        let cli = Cli::parse_from(["driver", "run", "dict"]);
        match cli.command {
            Command::Run {
                corpus_root,
                project,
            } => {
                assert_eq!(corpus_root, PathBuf::from("dict"));
                assert!(project.project.is_none());
                assert!(project.config.is_none());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn parse_run_with_project_and_config() {
        let cli = Cli::parse_from([
            "driver",
            "run",
            "dict",
            "--project",
            "/src/gcide",
            "--config",
            "/etc/driver.toml",
        ]);
        match cli.command {
            Command::Run { project, .. } => {
                assert_eq!(project.project, Some(PathBuf::from("/src/gcide")));
                assert_eq!(project.config, Some(PathBuf::from("/etc/driver.toml")));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["driver", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Command::Init {
                force: true,
                project: None
            }
        ));
    }

    #[test]
    fn run_requires_corpus_root() {
        assert!(Cli::try_parse_from(["driver", "run"]).is_err());
    }
}
