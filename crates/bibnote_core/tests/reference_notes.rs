use bibnote_core::{
    FrontmatterService, MemoryVault, NoteLayout, PropertyValue, Reference, ReferenceService,
    ReferenceServiceError, Vault, VaultResult, REFERENCES_PROPERTY,
};

/// Vault wrapper recording every write target, for single-write assertions.
struct CountingVault {
    inner: MemoryVault,
    writes: Vec<String>,
}

impl CountingVault {
    fn new() -> Self {
        Self {
            inner: MemoryVault::new(),
            writes: Vec::new(),
        }
    }
}

impl Vault for CountingVault {
    fn exists(&self, path: &str) -> bool {
        self.inner.exists(path)
    }

    fn read(&self, path: &str) -> VaultResult<String> {
        self.inner.read(path)
    }

    fn write(&mut self, path: &str, content: &str) -> VaultResult<()> {
        self.writes.push(path.to_string());
        self.inner.write(path, content)
    }

    fn copy(&mut self, source: &str, destination: &str) -> VaultResult<()> {
        self.inner.copy(source, destination)
    }

    fn create_folder(&mut self, path: &str) -> VaultResult<()> {
        self.inner.create_folder(path)
    }
}

fn sample_reference() -> Reference {
    let mut reference = Reference::new("doe2020", "article");
    reference.set_field("title", "A Study of Things");
    reference.set_field("author", "Doe, Jane and Smith, John");
    reference.set_field("year", "2020");
    reference.set_field("journal", "Journal of Examples");
    reference
}

#[test]
fn upsert_creates_entry_note_with_mapped_frontmatter() {
    let mut service = ReferenceService::new(MemoryVault::new(), NoteLayout::default());
    let path = service.upsert_reference_note(&sample_reference()).unwrap();
    assert_eq!(path, "references/doe2020.md");

    let reader = FrontmatterService::new(service.into_vault());
    let header = reader.read_header(&path).unwrap();
    assert_eq!(header.get("citekey"), Some(&PropertyValue::scalar("doe2020")));
    assert_eq!(
        header.get("title"),
        Some(&PropertyValue::scalar("A Study of Things"))
    );
    assert_eq!(
        header.get("authors"),
        Some(&PropertyValue::list(["[[Jane Doe]]", "[[John Smith]]"]))
    );

    let body = reader.into_vault().read(&path).unwrap();
    assert!(body.ends_with("# A Study of Things\n"));
}

#[test]
fn upsert_into_existing_note_preserves_user_edits() {
    let mut vault = MemoryVault::new();
    vault.seed_text(
        "references/doe2020.md",
        "---\nstatus: reading\ntags:\n  - methods\n---\nMy own summary.\n",
    );
    let mut service = ReferenceService::new(vault, NoteLayout::default());
    service.upsert_reference_note(&sample_reference()).unwrap();

    let reader = FrontmatterService::new(service.into_vault());
    let header = reader.read_header("references/doe2020.md").unwrap();
    assert_eq!(header.get("status"), Some(&PropertyValue::scalar("reading")));
    assert_eq!(
        header.get("tags"),
        Some(&PropertyValue::list(["methods"]))
    );
    assert_eq!(header.get("year"), Some(&PropertyValue::scalar("2020")));

    let body = reader.into_vault().read("references/doe2020.md").unwrap();
    assert!(body.ends_with("My own summary.\n"));
}

#[test]
fn author_pages_accumulate_links_from_multiple_references() {
    let mut service = ReferenceService::new(MemoryVault::new(), NoteLayout::default());
    let pages = service.upsert_author_pages(&sample_reference()).unwrap();
    assert_eq!(
        pages,
        vec![
            "authors/Jane Doe.md".to_string(),
            "authors/John Smith.md".to_string()
        ]
    );

    let mut second = Reference::new("doe2021", "article");
    second.set_field("author", "Doe, Jane");
    service.upsert_author_pages(&second).unwrap();

    let reader = FrontmatterService::new(service.into_vault());
    let header = reader.read_header("authors/Jane Doe.md").unwrap();
    assert_eq!(
        header.get(REFERENCES_PROPERTY),
        Some(&PropertyValue::list(["[[doe2020]]", "[[doe2021]]"]))
    );
}

#[test]
fn author_page_upsert_is_idempotent() {
    let mut service = ReferenceService::new(MemoryVault::new(), NoteLayout::default());
    service.upsert_author_pages(&sample_reference()).unwrap();
    service.upsert_author_pages(&sample_reference()).unwrap();

    let reader = FrontmatterService::new(service.into_vault());
    let header = reader.read_header("authors/Jane Doe.md").unwrap();
    assert_eq!(
        header.get(REFERENCES_PROPERTY),
        Some(&PropertyValue::list(["[[doe2020]]"]))
    );
}

#[test]
fn fresh_entry_note_is_composed_in_a_single_write() {
    // Header and body go out together; an interrupted upsert cannot leave a
    // header-less stub behind.
    let mut service = ReferenceService::new(CountingVault::new(), NoteLayout::default());
    service.upsert_reference_note(&sample_reference()).unwrap();

    let vault = service.into_vault();
    assert_eq!(vault.writes, vec!["references/doe2020.md".to_string()]);
    let body = vault.inner.read("references/doe2020.md").unwrap();
    assert!(body.starts_with("---\n"));
    assert!(body.ends_with("# A Study of Things\n"));
}

#[test]
fn fresh_author_page_is_composed_in_a_single_write() {
    let mut service = ReferenceService::new(CountingVault::new(), NoteLayout::default());
    let mut reference = Reference::new("doe2020", "article");
    reference.set_field("author", "Doe, Jane");
    service.upsert_author_pages(&reference).unwrap();

    let vault = service.into_vault();
    assert_eq!(vault.writes, vec!["authors/Jane Doe.md".to_string()]);
    let body = vault.inner.read("authors/Jane Doe.md").unwrap();
    assert!(body.starts_with("---\n"));
    assert!(body.ends_with("# Jane Doe\n"));
}

#[test]
fn invalid_citation_key_is_rejected_before_any_write() {
    let mut service = ReferenceService::new(MemoryVault::new(), NoteLayout::default());
    let mut reference = sample_reference();
    reference.citation_key = "bad key".to_string();

    let err = service.upsert_reference_note(&reference).unwrap_err();
    assert!(matches!(err, ReferenceServiceError::Validation(_)));
    assert!(service.into_vault().file_paths().is_empty());
}

#[test]
fn citation_keys_with_path_hostile_characters_compose_safe_paths() {
    let mut service = ReferenceService::new(MemoryVault::new(), NoteLayout::default());
    let mut reference = Reference::new("doe:2020", "article");
    reference.set_field("title", "Colons Everywhere");
    let path = service.upsert_reference_note(&reference).unwrap();
    assert_eq!(path, "references/doe-2020.md");
}
