//! Reference note generation use-case service.
//!
//! # Responsibility
//! - Map parsed bibliographic records into frontmatter properties.
//! - Create or update entry notes and cross-linked author pages.
//! - Render deterministic citation lists.
//!
//! # Invariants
//! - Updating an existing entry note goes through the merge policy, so user
//!   edits to the header and the body survive re-imports.
//! - A fresh note is composed and written in one vault operation; a failed
//!   write never leaves a header-less stub behind.
//! - Author pages accumulate citation-key links as a deduplicated, sorted
//!   list property.
//! - Citation lists are sorted by citation key.

use crate::frontmatter::{merge, splice, FrontmatterError};
use crate::model::property::{PropertyMap, PropertyValue};
use crate::model::reference::{Reference, ReferenceValidationError};
use crate::service::frontmatter_service::{update_note_frontmatter, FrontmatterServiceError};
use crate::vault::Vault;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// List property on author pages pointing back at entry notes.
pub const REFERENCES_PROPERTY: &str = "references";

static FILE_NAME_UNSAFE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/:*?"<>|#^\[\]]+"#).expect("valid file name regex"));

/// Folder layout for generated notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteLayout {
    /// Folder receiving entry notes.
    pub reference_folder: String,
    /// Folder receiving author pages.
    pub author_folder: String,
}

impl Default for NoteLayout {
    fn default() -> Self {
        Self {
            reference_folder: "references".to_string(),
            author_folder: "authors".to_string(),
        }
    }
}

/// Service error for reference note use-cases.
#[derive(Debug)]
pub enum ReferenceServiceError {
    /// Record shape rejected before any write.
    Validation(ReferenceValidationError),
    /// Frontmatter reconciliation failure on a target note.
    Frontmatter(FrontmatterServiceError),
}

impl Display for ReferenceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Frontmatter(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReferenceServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Frontmatter(err) => Some(err),
        }
    }
}

impl From<ReferenceValidationError> for ReferenceServiceError {
    fn from(value: ReferenceValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<FrontmatterServiceError> for ReferenceServiceError {
    fn from(value: FrontmatterServiceError) -> Self {
        Self::Frontmatter(value)
    }
}

/// Reference note service over one vault implementation.
pub struct ReferenceService<V: Vault> {
    vault: V,
    layout: NoteLayout,
}

impl<V: Vault> ReferenceService<V> {
    /// Creates a service writing notes into the given layout.
    pub fn new(vault: V, layout: NoteLayout) -> Self {
        Self { vault, layout }
    }

    /// Consumes the service and returns the vault.
    pub fn into_vault(self) -> V {
        self.vault
    }

    /// Returns the entry note path for one record.
    pub fn reference_note_path(&self, reference: &Reference) -> String {
        format!(
            "{}/{}.md",
            self.layout.reference_folder,
            sanitize_file_name(&reference.citation_key)
        )
    }

    /// Returns the author page path for one display name.
    pub fn author_note_path(&self, author: &str) -> String {
        format!(
            "{}/{}.md",
            self.layout.author_folder,
            sanitize_file_name(author)
        )
    }

    /// Creates or updates the entry note for one record.
    ///
    /// New notes get a synthesized body; existing notes keep their body and
    /// have the mapped properties merged into their header. Returns the
    /// entry note path.
    pub fn upsert_reference_note(
        &mut self,
        reference: &Reference,
    ) -> Result<String, ReferenceServiceError> {
        reference.validate()?;
        let path = self.reference_note_path(reference);
        let incoming = reference_frontmatter(reference);

        if self.vault.exists(&path) {
            update_note_frontmatter(&mut self.vault, &path, &incoming, false)?;
        } else {
            let title = reference
                .field("title")
                .unwrap_or(reference.citation_key.as_str());
            self.write_fresh_note(&path, &format!("# {title}\n"), &incoming)?;
        }

        info!("event=reference_upsert module=service status=ok");
        Ok(path)
    }

    /// Ensures author pages exist and link back to the entry note.
    ///
    /// Returns the author page paths in record order.
    pub fn upsert_author_pages(
        &mut self,
        reference: &Reference,
    ) -> Result<Vec<String>, ReferenceServiceError> {
        reference.validate()?;
        let link = format!("[[{}]]", reference.citation_key);
        let mut paths = Vec::new();

        for author in reference.authors() {
            let path = self.author_note_path(&author);
            let mut incoming = PropertyMap::new();
            incoming.insert(REFERENCES_PROPERTY, PropertyValue::list([link.as_str()]));
            if self.vault.exists(&path) {
                update_note_frontmatter(&mut self.vault, &path, &incoming, false)?;
            } else {
                self.write_fresh_note(&path, &format!("# {author}\n"), &incoming)?;
            }
            paths.push(path);
        }

        info!(
            "event=author_pages_upsert module=service status=ok pages={}",
            paths.len()
        );
        Ok(paths)
    }

    /// Writes a new note with its header and synthesized body in one vault
    /// operation, running the incoming properties through the merge policy
    /// first so fresh and existing notes normalize identically.
    fn write_fresh_note(
        &mut self,
        path: &str,
        body: &str,
        incoming: &PropertyMap,
    ) -> Result<(), ReferenceServiceError> {
        let merged = merge(&PropertyMap::new(), incoming, false);
        let composed = splice(body, &merged).map_err(
            |FrontmatterError::MalformedHeader(reason)| FrontmatterServiceError::MalformedHeader {
                path: path.to_string(),
                reason,
            },
        )?;
        self.vault
            .write(path, &composed)
            .map_err(FrontmatterServiceError::from)?;
        Ok(())
    }
}

/// Maps one record into frontmatter properties.
///
/// Only fields present on the record are emitted; authors become wiki-links
/// and keywords become a lowercase tag list.
pub fn reference_frontmatter(reference: &Reference) -> PropertyMap {
    let mut map = PropertyMap::new();
    map.insert("citekey", PropertyValue::scalar(&reference.citation_key));
    map.insert("type", PropertyValue::scalar(&reference.kind));

    for (field, key) in [
        ("title", "title"),
        ("year", "year"),
        ("journal", "journal"),
        ("booktitle", "journal"),
        ("publisher", "publisher"),
        ("doi", "doi"),
        ("url", "url"),
    ] {
        if map.contains_key(key) {
            continue;
        }
        if let Some(value) = reference.field(field) {
            map.insert(key, PropertyValue::scalar(value));
        }
    }

    let authors = reference.authors();
    if !authors.is_empty() {
        map.insert(
            "authors",
            PropertyValue::List(
                authors
                    .iter()
                    .map(|author| format!("[[{author}]]"))
                    .collect(),
            ),
        );
    }

    if let Some(keywords) = reference.field("keywords") {
        let tags: Vec<String> = keywords
            .split(',')
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();
        if !tags.is_empty() {
            map.insert("tags", PropertyValue::List(tags));
        }
    }

    map
}

/// Renders a plain-text citation list sorted by citation key.
///
/// Line shape: `authors (year). title. container.` with absent parts
/// dropped. Deterministic for round-trip tests and clipboard export.
pub fn citation_list(references: &[Reference]) -> String {
    let mut sorted: Vec<&Reference> = references.iter().collect();
    sorted.sort_by(|a, b| a.citation_key.cmp(&b.citation_key));

    let mut out = String::new();
    for reference in sorted {
        out.push_str(&citation_line(reference));
        out.push('\n');
    }
    out
}

fn citation_line(reference: &Reference) -> String {
    let mut parts: Vec<String> = Vec::new();

    let authors = reference.authors();
    let year = reference.field("year");
    match (authors.is_empty(), year) {
        (false, Some(year)) => parts.push(format!("{} ({year})", authors.join("; "))),
        (false, None) => parts.push(authors.join("; ")),
        (true, Some(year)) => parts.push(format!("({year})")),
        (true, None) => {}
    }

    if let Some(title) = reference.field("title") {
        parts.push(title.to_string());
    }
    if let Some(container) = reference.field("journal").or(reference.field("booktitle")) {
        parts.push(container.to_string());
    }

    if parts.is_empty() {
        return reference.citation_key.clone();
    }
    format!("{}.", parts.join(". "))
}

/// Replaces path-hostile characters so names compose into vault paths.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned = FILE_NAME_UNSAFE_RE.replace_all(name.trim(), "-");
    cleaned.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::{citation_list, reference_frontmatter, sanitize_file_name};
    use crate::model::property::PropertyValue;
    use crate::model::reference::Reference;

    fn sample_reference() -> Reference {
        let mut reference = Reference::new("doe2020", "article");
        reference.set_field("title", "A Study of Things");
        reference.set_field("author", "Doe, Jane and Smith, John");
        reference.set_field("year", "2020");
        reference.set_field("journal", "Journal of Examples");
        reference.set_field("keywords", "Testing, Merge Policy");
        reference
    }

    #[test]
    fn frontmatter_maps_core_fields() {
        let map = reference_frontmatter(&sample_reference());
        assert_eq!(map.get("citekey"), Some(&PropertyValue::scalar("doe2020")));
        assert_eq!(map.get("type"), Some(&PropertyValue::scalar("article")));
        assert_eq!(map.get("year"), Some(&PropertyValue::scalar("2020")));
        assert_eq!(
            map.get("authors"),
            Some(&PropertyValue::list(["[[Jane Doe]]", "[[John Smith]]"]))
        );
        assert_eq!(
            map.get("tags"),
            Some(&PropertyValue::list(["testing", "merge policy"]))
        );
    }

    #[test]
    fn frontmatter_prefers_journal_over_booktitle() {
        let mut reference = sample_reference();
        reference.set_field("booktitle", "Proceedings of Examples");
        let map = reference_frontmatter(&reference);
        assert_eq!(
            map.get("journal"),
            Some(&PropertyValue::scalar("Journal of Examples"))
        );
    }

    #[test]
    fn frontmatter_omits_absent_fields() {
        let reference = Reference::new("bare2021", "misc");
        let map = reference_frontmatter(&reference);
        assert!(map.get("title").is_none());
        assert!(map.get("authors").is_none());
        assert!(map.get("tags").is_none());
    }

    #[test]
    fn citation_list_is_sorted_by_citation_key() {
        let mut second = Reference::new("zimmer2019", "article");
        second.set_field("title", "Later Entry");
        let rendered = citation_list(&[second, sample_reference()]);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("A Study of Things"));
        assert!(lines[1].contains("Later Entry"));
    }

    #[test]
    fn citation_line_drops_absent_parts() {
        let mut reference = Reference::new("na2020", "misc");
        reference.set_field("title", "Untitled Work");
        let rendered = citation_list(std::slice::from_ref(&reference));
        assert_eq!(rendered, "Untitled Work.\n");
    }

    #[test]
    fn sanitize_replaces_path_hostile_characters() {
        assert_eq!(sanitize_file_name("a/b:c*d"), "a-b-c-d");
        assert_eq!(sanitize_file_name("  plain name "), "plain name");
        assert_eq!(sanitize_file_name("[[weird]]"), "weird");
    }
}
