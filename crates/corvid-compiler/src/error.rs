//! Driver-level error type: the one layer in this crate allowed to talk
//! about filesystem I/O, since the front end proper never does (spec §5).

use std::path::PathBuf;

use thiserror::Error;

/// Errors the driver can raise before resolution even begins: a bad
/// input path, or no source files found after expansion.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read '{path}': {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("no source files found among the given inputs")]
    NoInputFiles,
}

pub type CompileResult<T> = Result<T, CompileError>;
