//! Frontmatter reconciliation use-case service.
//!
//! # Responsibility
//! - Apply merged property updates to one note through the vault.
//! - Project single properties from a note's header for callers.
//!
//! # Invariants
//! - Updates are parse-fully-or-abort: a malformed header never results in
//!   a partial write.
//! - Body text outside the header block is preserved byte-for-byte.

use crate::frontmatter::{merge, parse_block, reader, splice, FrontmatterError};
use crate::model::property::PropertyMap;
use crate::vault::{Vault, VaultError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for frontmatter use-cases.
#[derive(Debug)]
pub enum FrontmatterServiceError {
    /// Target note path does not resolve to an existing file.
    NoteNotFound(String),
    /// Existing header block could not be parsed; nothing was written.
    MalformedHeader { path: String, reason: String },
    /// Storage-layer failure.
    Vault(VaultError),
}

impl Display for FrontmatterServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(path) => write!(f, "note does not exist: `{path}`"),
            Self::MalformedHeader { path, reason } => {
                write!(f, "header of `{path}` is malformed: {reason}")
            }
            Self::Vault(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FrontmatterServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Vault(err) => Some(err),
            _ => None,
        }
    }
}

impl From<VaultError> for FrontmatterServiceError {
    fn from(value: VaultError) -> Self {
        match value {
            VaultError::NotFound(path) => Self::NoteNotFound(path),
            other => Self::Vault(other),
        }
    }
}

/// Merges `incoming` into the header of the note at `path`.
///
/// Reads the note, parses its header strictly, merges with the documented
/// policy and writes the full body back. Free function so other services
/// can reuse it with their own vault handle.
pub fn update_note_frontmatter<V: Vault>(
    vault: &mut V,
    path: &str,
    incoming: &PropertyMap,
    clear_empty: bool,
) -> Result<(), FrontmatterServiceError> {
    let body = vault.read(path)?;

    let existing = match crate::frontmatter::extract_block(&body) {
        Ok(Some(block)) => match parse_block(block.yaml) {
            Ok(map) => map,
            Err(FrontmatterError::MalformedHeader(reason)) => {
                warn!("event=frontmatter_update module=service status=error path={path} reason=malformed_header");
                return Err(FrontmatterServiceError::MalformedHeader {
                    path: path.to_string(),
                    reason,
                });
            }
        },
        Ok(None) => PropertyMap::new(),
        Err(FrontmatterError::MalformedHeader(reason)) => {
            warn!("event=frontmatter_update module=service status=error path={path} reason=malformed_header");
            return Err(FrontmatterServiceError::MalformedHeader {
                path: path.to_string(),
                reason,
            });
        }
    };

    let merged = merge(&existing, incoming, clear_empty);
    let updated = splice(&body, &merged).map_err(|FrontmatterError::MalformedHeader(reason)| {
        FrontmatterServiceError::MalformedHeader {
            path: path.to_string(),
            reason,
        }
    })?;
    vault.write(path, &updated)?;

    info!(
        "event=frontmatter_update module=service status=ok path={path} keys={}",
        merged.len()
    );
    Ok(())
}

/// Frontmatter service facade over one vault implementation.
pub struct FrontmatterService<V: Vault> {
    vault: V,
}

impl<V: Vault> FrontmatterService<V> {
    /// Creates a service using the provided vault implementation.
    pub fn new(vault: V) -> Self {
        Self { vault }
    }

    /// Consumes the service and returns the vault.
    pub fn into_vault(self) -> V {
        self.vault
    }

    /// Merges `incoming` into the note's header and persists the result.
    pub fn update_frontmatter(
        &mut self,
        path: &str,
        incoming: &PropertyMap,
        clear_empty: bool,
    ) -> Result<(), FrontmatterServiceError> {
        update_note_frontmatter(&mut self.vault, path, incoming, clear_empty)
    }

    /// Returns the parsed header of one note.
    ///
    /// Notes without a header yield an empty map.
    pub fn read_header(&self, path: &str) -> Result<PropertyMap, FrontmatterServiceError> {
        let body = self.vault.read(path)?;
        let block = crate::frontmatter::extract_block(&body).map_err(
            |FrontmatterError::MalformedHeader(reason)| FrontmatterServiceError::MalformedHeader {
                path: path.to_string(),
                reason,
            },
        )?;
        match block {
            None => Ok(PropertyMap::new()),
            Some(block) => parse_block(block.yaml).map_err(
                |FrontmatterError::MalformedHeader(reason)| {
                    FrontmatterServiceError::MalformedHeader {
                        path: path.to_string(),
                        reason,
                    }
                },
            ),
        }
    }

    /// Returns one property normalized to list shape.
    pub fn read_list_property(
        &self,
        path: &str,
        key: &str,
    ) -> Result<Vec<String>, FrontmatterServiceError> {
        Ok(reader::read_list(&self.read_header(path)?, key))
    }

    /// Returns one property normalized to scalar shape.
    pub fn read_scalar_property(
        &self,
        path: &str,
        key: &str,
    ) -> Result<String, FrontmatterServiceError> {
        Ok(reader::read_scalar(&self.read_header(path)?, key))
    }
}
