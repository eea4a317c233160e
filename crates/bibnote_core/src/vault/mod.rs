//! Vault capability contracts and storage implementations.
//!
//! # Responsibility
//! - Define the small file-capability surface the reconciliation and import
//!   services depend on (`exists`, `read`, `write`, `copy`, `create_folder`).
//! - Isolate host/filesystem details behind the trait so services are
//!   unit-testable against an in-memory fake.
//!
//! # Invariants
//! - Paths are vault-relative, `/`-separated, and never escape the vault
//!   root (`..` components are rejected).
//! - `read`/`write` operate on whole note bodies; there are no partial
//!   writes at this layer.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod fs;
mod memory;

pub use fs::FsVault;
pub use memory::MemoryVault;

pub type VaultResult<T> = Result<T, VaultError>;

/// Storage-layer failure for vault operations.
#[derive(Debug)]
pub enum VaultError {
    /// Path does not resolve to an existing file.
    NotFound(String),
    /// Path is empty, absolute, or escapes the vault root.
    InvalidPath(String),
    /// File content is not valid UTF-8 text.
    NotText(String),
    /// Underlying I/O failure.
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl Display for VaultError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "file does not exist: `{path}`"),
            Self::InvalidPath(path) => write!(f, "invalid vault path: `{path}`"),
            Self::NotText(path) => write!(f, "file is not valid UTF-8 text: `{path}`"),
            Self::Io { path, source } => write!(f, "io failure on `{path}`: {source}"),
        }
    }
}

impl Error for VaultError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Capability interface over the host's file storage.
pub trait Vault {
    /// Returns whether a file or folder exists at `path`.
    fn exists(&self, path: &str) -> bool;
    /// Reads one note body as UTF-8 text.
    fn read(&self, path: &str) -> VaultResult<String>;
    /// Writes one note body, creating parent folders as needed.
    fn write(&mut self, path: &str, content: &str) -> VaultResult<()>;
    /// Copies one file byte-for-byte, overwriting the destination.
    fn copy(&mut self, source: &str, destination: &str) -> VaultResult<()>;
    /// Creates a folder (and missing parents). Existing folders are fine.
    fn create_folder(&mut self, path: &str) -> VaultResult<()>;
}

/// Validates and normalizes one vault-relative path.
///
/// Accepts `/`-separated relative paths; rejects empty input, absolute
/// paths, backslashes and `..` traversal.
pub fn normalize_path(path: &str) -> VaultResult<String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(VaultError::InvalidPath(path.to_string()));
    }
    if trimmed.starts_with('/') || trimmed.contains('\\') {
        return Err(VaultError::InvalidPath(path.to_string()));
    }

    let mut parts: Vec<&str> = Vec::new();
    for part in trimmed.split('/') {
        match part {
            "" | "." => continue,
            ".." => return Err(VaultError::InvalidPath(path.to_string())),
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return Err(VaultError::InvalidPath(path.to_string()));
    }
    Ok(parts.join("/"))
}

/// Splits one normalized path into `(parent, file_name)`.
///
/// The parent is empty for top-level paths.
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", path),
    }
}

/// Splits one file name into `(stem, extension)`; extension keeps no dot.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}
