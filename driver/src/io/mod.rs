//! I/O adapters for driver commands.

pub mod build;
pub mod config;
pub mod corpus;
pub mod init;
pub mod process;
pub mod transform;
pub mod workdir;
