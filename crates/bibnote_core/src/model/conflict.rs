//! Conflict-resolution records for batch holding imports.
//!
//! # Responsibility
//! - Capture one operator decision per destination-path collision.
//! - Carry the "apply to all remaining" choice for exactly one batch.
//!
//! # Invariants
//! - A dismissed prompt always resolves to skip; imports never overwrite
//!   data without an explicit choice.
//! - Remembered resolutions live inside one `BatchImportContext` and die
//!   with it; nothing is process-global.

use serde::{Deserialize, Serialize};

/// Operator choice for one destination-path collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictAction {
    /// Leave the existing destination file untouched.
    Skip,
    /// Overwrite the existing destination file.
    Replace,
    /// Copy under a numbered alternative name.
    Disambiguate,
}

/// One resolved collision decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictResolution {
    pub action: ConflictAction,
    /// Reuse this action for every later collision in the same batch.
    pub apply_to_all: bool,
}

impl ConflictResolution {
    pub fn new(action: ConflictAction, apply_to_all: bool) -> Self {
        Self {
            action,
            apply_to_all,
        }
    }

    /// Fail-safe default used when the operator dismisses the prompt.
    pub fn dismissed() -> Self {
        Self {
            action: ConflictAction::Skip,
            apply_to_all: false,
        }
    }
}

/// Per-batch conflict memory threaded through each import step.
///
/// Replaces hidden process-wide state: the context is created by the batch
/// entry point, passed by reference into every per-file step, and dropped
/// when the batch completes.
#[derive(Debug, Clone, Default)]
pub struct BatchImportContext {
    remembered: Option<ConflictAction>,
}

impl BatchImportContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the action remembered from an earlier apply-to-all choice.
    pub fn remembered(&self) -> Option<ConflictAction> {
        self.remembered
    }

    /// Records one resolution; only apply-to-all choices are remembered.
    pub fn record(&mut self, resolution: ConflictResolution) {
        if resolution.apply_to_all {
            self.remembered = Some(resolution.action);
        }
    }
}

/// Per-file result of one holding import.
///
/// Batch operations collect one outcome per source file; a failure never
/// aborts the remaining files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// Source path the import was asked to copy.
    pub source: String,
    /// Whether the holding was copied and recorded.
    pub success: bool,
    /// Destination path chosen for the holding, when one was determined.
    pub destination: Option<String>,
    /// Human-readable failure or skip reason.
    pub error: Option<String>,
}

impl ImportOutcome {
    /// Successful copy outcome.
    pub fn copied(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            success: true,
            destination: Some(destination.into()),
            error: None,
        }
    }

    /// Failure outcome with a per-file reason.
    pub fn failed(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            success: false,
            destination: None,
            error: Some(error.into()),
        }
    }

    /// Skip outcome for a collision resolved as skip.
    pub fn skipped(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            success: false,
            destination: Some(destination.into()),
            error: Some("skipped: destination already exists".to_string()),
        }
    }
}
