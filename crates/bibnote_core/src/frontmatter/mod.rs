//! Frontmatter block reconciliation.
//!
//! # Responsibility
//! - Extract and parse the delimited header block at the top of a note body.
//! - Merge newly computed properties into existing ones without destroying
//!   unrelated data.
//! - Serialize the merged map back deterministically, leaving the body text
//!   outside the block byte-for-byte untouched.
//!
//! # Invariants
//! - Parse-before-write is strict: an unparsable existing block aborts the
//!   update; no partial write ever happens.
//! - List-valued merge results are deduplicated and lexicographically
//!   sorted, so round-trips are byte-stable.

pub mod merge;
pub mod reader;
pub mod writer;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use merge::merge;
pub use reader::{extract_block, parse_block, read_list, read_scalar, HeaderBlock};
pub use writer::{render, splice};

pub type FrontmatterResult<T> = Result<T, FrontmatterError>;

/// Frontmatter parse/serialize failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterError {
    /// The existing header block cannot be parsed as a property map.
    MalformedHeader(String),
}

impl Display for FrontmatterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedHeader(reason) => {
                write!(f, "header block is malformed: {reason}")
            }
        }
    }
}

impl Error for FrontmatterError {}
