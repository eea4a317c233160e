//! Unified domain model for bibliographic note reconciliation.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one property-map shape shared by read, merge and write paths.
//!
//! # Invariants
//! - `PropertyMap` keys are unique and case-sensitive.
//! - Property values are either a scalar or a flat list of scalars; nested
//!   shapes are rejected at the parse boundary.

pub mod conflict;
pub mod property;
pub mod reference;
