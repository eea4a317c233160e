//! Holding import use-case service.
//!
//! # Responsibility
//! - Copy attachment files ("holdings") into the vault next to their host
//!   note and record them in the note's `holdings` list property.
//! - Resolve destination-path collisions through the operator prompt, with
//!   per-batch apply-to-all memory.
//!
//! # Invariants
//! - A dismissed prompt resolves to skip; an import never overwrites a file
//!   without an explicit replace choice.
//! - One failed file reports its own outcome and never aborts the batch.
//! - Apply-to-all memory lives in the `BatchImportContext` passed by the
//!   caller, not in process-global state.

use crate::model::conflict::{BatchImportContext, ConflictAction, ConflictResolution, ImportOutcome};
use crate::model::property::{PropertyMap, PropertyValue};
use crate::service::frontmatter_service::update_note_frontmatter;
use crate::vault::{split_extension, split_parent, Vault};
use log::{info, warn};

/// Frontmatter list property holding destinations are recorded under.
pub const HOLDINGS_PROPERTY: &str = "holdings";

const DISAMBIGUATION_LIMIT: u32 = 999;

/// Operator prompt seam for destination collisions.
///
/// The UI presents skip/replace/disambiguate with an apply-to-all toggle and
/// returns the choice; `None` models a dismissed prompt.
pub trait ConflictPrompt {
    fn prompt(&mut self, destination: &str) -> Option<ConflictResolution>;
}

/// Prompt-free policy that skips every collision.
///
/// Useful for non-interactive callers and as the fail-safe default.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysSkip;

impl ConflictPrompt for AlwaysSkip {
    fn prompt(&mut self, _destination: &str) -> Option<ConflictResolution> {
        Some(ConflictResolution::new(ConflictAction::Skip, true))
    }
}

/// Holding import service over one vault and one prompt surface.
pub struct ImportService<V: Vault, P: ConflictPrompt> {
    vault: V,
    prompt: P,
    holdings_folder: String,
}

impl<V: Vault, P: ConflictPrompt> ImportService<V, P> {
    /// Creates a service copying holdings into `holdings_folder`.
    pub fn new(vault: V, prompt: P, holdings_folder: impl Into<String>) -> Self {
        Self {
            vault,
            prompt,
            holdings_folder: holdings_folder.into(),
        }
    }

    /// Consumes the service and returns the vault.
    pub fn into_vault(self) -> V {
        self.vault
    }

    /// Imports one holding for `host_note` under batch conflict memory.
    ///
    /// The outcome is always returned as a value; callers collect them
    /// per-file and keep going.
    pub fn import_holding(
        &mut self,
        host_note: &str,
        source: &str,
        context: &mut BatchImportContext,
    ) -> ImportOutcome {
        if !self.vault.exists(source) {
            warn!("event=holding_import module=service status=error reason=missing_source");
            return ImportOutcome::failed(
                source,
                format!("source file `{source}` does not exist"),
            );
        }
        if !self.vault.exists(host_note) {
            warn!("event=holding_import module=service status=error reason=missing_host_note");
            return ImportOutcome::failed(
                source,
                format!("host note `{host_note}` does not exist"),
            );
        }

        if let Err(err) = self.vault.create_folder(&self.holdings_folder) {
            return ImportOutcome::failed(source, err.to_string());
        }

        let preferred = self.compose_destination(source);
        let destination = match self.resolve_destination(&preferred, context) {
            Ok(Some(destination)) => destination,
            Ok(None) => {
                info!("event=holding_import module=service status=skipped");
                return ImportOutcome::skipped(source, preferred);
            }
            Err(reason) => return ImportOutcome::failed(source, reason),
        };

        if let Err(err) = self.vault.copy(source, &destination) {
            warn!("event=holding_import module=service status=error reason=copy_failed");
            return ImportOutcome::failed(source, err.to_string());
        }

        let mut incoming = PropertyMap::new();
        incoming.insert(
            HOLDINGS_PROPERTY,
            PropertyValue::list([destination.as_str()]),
        );
        if let Err(err) = update_note_frontmatter(&mut self.vault, host_note, &incoming, false) {
            return ImportOutcome {
                source: source.to_string(),
                success: false,
                destination: Some(destination),
                error: Some(format!("holding copied but not recorded: {err}")),
            };
        }

        info!("event=holding_import module=service status=ok");
        ImportOutcome::copied(source, destination)
    }

    /// Imports a batch of holdings under one fresh conflict context.
    ///
    /// Outcomes are collected independently; failures never abort the rest.
    pub fn import_batch(&mut self, host_note: &str, sources: &[String]) -> Vec<ImportOutcome> {
        let mut context = BatchImportContext::new();
        let outcomes: Vec<ImportOutcome> = sources
            .iter()
            .map(|source| self.import_holding(host_note, source, &mut context))
            .collect();

        let succeeded = outcomes.iter().filter(|outcome| outcome.success).count();
        info!(
            "event=holding_import_batch module=service status=ok total={} succeeded={}",
            outcomes.len(),
            succeeded
        );
        outcomes
    }

    /// Composes the deterministic destination path for one source file.
    fn compose_destination(&self, source: &str) -> String {
        let (_, file_name) = split_parent(source);
        format!("{}/{file_name}", self.holdings_folder)
    }

    /// Resolves a destination collision for `preferred`.
    ///
    /// Returns `Ok(None)` when the resolution is skip. A remembered
    /// apply-to-all action is reused without prompting; otherwise the
    /// operation suspends on the prompt and a dismissal falls back to the
    /// skip default.
    fn resolve_destination(
        &mut self,
        preferred: &str,
        context: &mut BatchImportContext,
    ) -> Result<Option<String>, String> {
        if !self.vault.exists(preferred) {
            return Ok(Some(preferred.to_string()));
        }

        let action = match context.remembered() {
            Some(action) => action,
            None => {
                let resolution = self
                    .prompt
                    .prompt(preferred)
                    .unwrap_or_else(ConflictResolution::dismissed);
                context.record(resolution);
                resolution.action
            }
        };

        match action {
            ConflictAction::Skip => Ok(None),
            ConflictAction::Replace => Ok(Some(preferred.to_string())),
            ConflictAction::Disambiguate => self.disambiguate(preferred),
        }
    }

    /// Probes `name 1`, `name 2`, ... for the first free destination.
    fn disambiguate(&self, preferred: &str) -> Result<Option<String>, String> {
        let (parent, file_name) = split_parent(preferred);
        let (stem, extension) = split_extension(file_name);
        for index in 1..=DISAMBIGUATION_LIMIT {
            let candidate_name = match extension {
                Some(ext) => format!("{stem} {index}.{ext}"),
                None => format!("{stem} {index}"),
            };
            let candidate = if parent.is_empty() {
                candidate_name
            } else {
                format!("{parent}/{candidate_name}")
            };
            if !self.vault.exists(&candidate) {
                return Ok(Some(candidate));
            }
        }
        Err(format!(
            "no free destination name found for `{preferred}`"
        ))
    }
}
