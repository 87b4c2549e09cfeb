//! Configuration errors: the only failures that stop a run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("project directory not found: {}", .0.display())]
    ProjectDirNotFound(PathBuf),

    #[error("source root not found: {}", .0.display())]
    SourceRootNotFound(PathBuf),

    #[error("examples root not found: {}", .0.display())]
    ExampleRootNotFound(PathBuf),

    #[error("library root not found: {}", .0.display())]
    LibraryRootNotFound(PathBuf),

    #[error("unknown format: {0}. Use markdown or html")]
    UnknownFormat(String),

    #[error("at least one source root is required (-s)")]
    NoSourceRoots,
}
