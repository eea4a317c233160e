//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate vault and frontmatter calls into use-case level APIs.
//! - Keep UI layers decoupled from storage and serialization details.
//!
//! # Invariants
//! - All failures are returned as values; nothing propagates as an uncaught
//!   fault to the host runtime.
//! - Batch operations isolate per-item failures.

pub mod frontmatter_service;
pub mod import_service;
pub mod reference_service;
