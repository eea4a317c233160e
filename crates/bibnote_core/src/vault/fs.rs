//! Filesystem-backed vault rooted at one directory.
//!
//! # Responsibility
//! - Map vault-relative paths onto a root directory with std::fs operations.
//! - Enforce path confinement before touching the filesystem.
//!
//! # Invariants
//! - Every operation goes through `normalize_path`; traversal outside the
//!   root is rejected before any I/O happens.
//! - `write` and `copy` create missing parent directories.

use crate::vault::{normalize_path, Vault, VaultError, VaultResult};
use std::path::{Path, PathBuf};

/// Vault implementation over one root directory.
#[derive(Debug)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Creates a vault rooted at `root`. The directory is created lazily by
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> VaultResult<PathBuf> {
        let normalized = normalize_path(path)?;
        Ok(self.root.join(normalized))
    }

    fn ensure_parent(&self, target: &Path, label: &str) -> VaultResult<()> {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|source| VaultError::Io {
                path: label.to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

impl Vault for FsVault {
    fn exists(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok(target) => target.exists(),
            Err(_) => false,
        }
    }

    fn read(&self, path: &str) -> VaultResult<String> {
        let normalized = normalize_path(path)?;
        let target = self.root.join(&normalized);
        if !target.is_file() {
            return Err(VaultError::NotFound(normalized));
        }
        let bytes = std::fs::read(&target).map_err(|source| VaultError::Io {
            path: normalized.clone(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|_| VaultError::NotText(normalized))
    }

    fn write(&mut self, path: &str, content: &str) -> VaultResult<()> {
        let normalized = normalize_path(path)?;
        let target = self.root.join(&normalized);
        self.ensure_parent(&target, &normalized)?;
        std::fs::write(&target, content).map_err(|source| VaultError::Io {
            path: normalized,
            source,
        })
    }

    fn copy(&mut self, source: &str, destination: &str) -> VaultResult<()> {
        let from_rel = normalize_path(source)?;
        let from = self.root.join(&from_rel);
        if !from.is_file() {
            return Err(VaultError::NotFound(from_rel));
        }
        let to_rel = normalize_path(destination)?;
        let to = self.root.join(&to_rel);
        self.ensure_parent(&to, &to_rel)?;
        std::fs::copy(&from, &to)
            .map(|_| ())
            .map_err(|source| VaultError::Io {
                path: to_rel,
                source,
            })
    }

    fn create_folder(&mut self, path: &str) -> VaultResult<()> {
        let normalized = normalize_path(path)?;
        let target = self.root.join(&normalized);
        std::fs::create_dir_all(&target).map_err(|source| VaultError::Io {
            path: normalized,
            source,
        })
    }
}
