//! Core domain logic for bibnote.
//! This crate is the single source of truth for reconciliation invariants.

pub mod frontmatter;
pub mod logging;
pub mod model;
pub mod service;
pub mod vault;

pub use frontmatter::{merge, FrontmatterError, FrontmatterResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::conflict::{
    BatchImportContext, ConflictAction, ConflictResolution, ImportOutcome,
};
pub use model::property::{PropertyMap, PropertyValue};
pub use model::reference::{ParseError, Reference, ReferenceParser, ReferenceValidationError};
pub use service::frontmatter_service::{FrontmatterService, FrontmatterServiceError};
pub use service::import_service::{AlwaysSkip, ConflictPrompt, ImportService, HOLDINGS_PROPERTY};
pub use service::reference_service::{
    citation_list, reference_frontmatter, NoteLayout, ReferenceService, ReferenceServiceError,
    REFERENCES_PROPERTY,
};
pub use vault::{FsVault, MemoryVault, Vault, VaultError, VaultResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
