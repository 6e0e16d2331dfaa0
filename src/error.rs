//! Error types shared by every libforge helper.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while staging or patching a native library build.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown architecture: {0}")]
    UnknownArch(String),

    #[error("unsupported Android ABI: {0}")]
    UnknownAbi(String),

    #[error("no value for template placeholder '{0}'")]
    MissingPlaceholder(String),

    #[error("failed to apply patch {name} (exit code: {code:?})")]
    PatchFailed { name: String, code: Option<i32> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsafe archive entry: {0}")]
    UnsafeArchiveEntry(String),

    #[error("archive error: {0}")]
    Archive(String),

    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
}
