//! In-memory vault used by unit and integration tests.
//!
//! # Responsibility
//! - Implement the full `Vault` capability surface over plain maps.
//! - Keep behavior observable: tests can seed and inspect raw bytes.

use crate::vault::{normalize_path, split_parent, Vault, VaultError, VaultResult};
use std::collections::{BTreeMap, BTreeSet};

/// Map-backed vault fake.
#[derive(Debug, Default)]
pub struct MemoryVault {
    files: BTreeMap<String, Vec<u8>>,
    folders: BTreeSet<String>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one text file, creating implied parent folders.
    pub fn seed_text(&mut self, path: &str, content: &str) {
        self.seed_bytes(path, content.as_bytes().to_vec());
    }

    /// Seeds one binary file, creating implied parent folders.
    pub fn seed_bytes(&mut self, path: &str, content: Vec<u8>) {
        let normalized = normalize_path(path).expect("seed path must be valid");
        self.record_parents(&normalized);
        self.files.insert(normalized, content);
    }

    /// Returns raw bytes for one path, for test assertions.
    pub fn bytes(&self, path: &str) -> Option<&[u8]> {
        let normalized = normalize_path(path).ok()?;
        self.files.get(&normalized).map(Vec::as_slice)
    }

    /// Returns all file paths in sorted order.
    pub fn file_paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn record_parents(&mut self, path: &str) {
        let (parent, _) = split_parent(path);
        let mut prefix = String::new();
        for part in parent.split('/').filter(|part| !part.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(part);
            self.folders.insert(prefix.clone());
        }
    }
}

impl Vault for MemoryVault {
    fn exists(&self, path: &str) -> bool {
        match normalize_path(path) {
            Ok(normalized) => {
                self.files.contains_key(&normalized) || self.folders.contains(&normalized)
            }
            Err(_) => false,
        }
    }

    fn read(&self, path: &str) -> VaultResult<String> {
        let normalized = normalize_path(path)?;
        let bytes = self
            .files
            .get(&normalized)
            .ok_or(VaultError::NotFound(normalized.clone()))?;
        String::from_utf8(bytes.clone()).map_err(|_| VaultError::NotText(normalized))
    }

    fn write(&mut self, path: &str, content: &str) -> VaultResult<()> {
        let normalized = normalize_path(path)?;
        self.record_parents(&normalized);
        self.files
            .insert(normalized, content.as_bytes().to_vec());
        Ok(())
    }

    fn copy(&mut self, source: &str, destination: &str) -> VaultResult<()> {
        let from = normalize_path(source)?;
        let to = normalize_path(destination)?;
        let bytes = self
            .files
            .get(&from)
            .ok_or(VaultError::NotFound(from))?
            .clone();
        self.record_parents(&to);
        self.files.insert(to, bytes);
        Ok(())
    }

    fn create_folder(&mut self, path: &str) -> VaultResult<()> {
        let normalized = normalize_path(path)?;
        let mut prefix = String::new();
        for part in normalized.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(part);
            self.folders.insert(prefix.clone());
        }
        Ok(())
    }
}
