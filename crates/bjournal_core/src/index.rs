//! The index of permanent notes.
//!
//! Unlike day records, index notes are not tied to a date. The index itself is
//! a single `index.yaml` in the journal directory listing `{name, url}` pairs;
//! each `url` is a markdown file relative to that directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the persisted index inside the journal directory.
pub const INDEX_FILE: &str = "index.yaml";

/// One permanent note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexItem {
    /// Display name
    pub name: String,

    /// Note file, relative to the journal directory
    pub url: String,

    /// `url` resolved against the journal directory. Never persisted.
    #[serde(skip)]
    pub full_path: PathBuf,
}

impl IndexItem {
    /// Create an item whose note lives at `base_path/url`.
    pub fn new(name: impl Into<String>, url: impl Into<String>, base_path: &Path) -> Self {
        let url = url.into();
        Self {
            name: name.into(),
            full_path: base_path.join(&url),
            url,
        }
    }
}

/// Ordered registry of permanent notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Notes in insertion order
    #[serde(default)]
    pub items: Vec<IndexItem>,
}

impl Index {
    /// Decode a persisted index and resolve every item against `base_path`.
    /// An empty document is an empty index.
    pub fn from_yaml(content: &str, base_path: &Path) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Index::default());
        }
        let mut index: Index = serde_yaml::from_str(content)?;
        for item in &mut index.items {
            item.full_path = base_path.join(&item.url);
        }
        Ok(index)
    }

    /// Encode the index as persisted.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Number of notes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no notes.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// File name for a new index note created on `day_key`: the key and name
/// joined by `_`, upper-cased, spaces replaced by `_`, with a `.md` suffix.
///
/// `note_file_name("19.02.2022", "reading list")` is
/// `19.02.2022_READING_LIST.md`.
pub fn note_file_name(day_key: &str, name: &str) -> String {
    let stem = format!("{}_{}", day_key, name).to_uppercase().replace(' ', "_");
    format!("{}.md", stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_resolves_full_paths() {
        let yaml = "items:\n- name: Books\n  url: BOOKS.md\n- name: Ideas\n  url: notes/IDEAS.md\n";
        let index = Index::from_yaml(yaml, Path::new("/journal")).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.items[0].full_path, PathBuf::from("/journal/BOOKS.md"));
        assert_eq!(
            index.items[1].full_path,
            PathBuf::from("/journal/notes/IDEAS.md")
        );
    }

    #[test]
    fn test_full_path_is_not_persisted() {
        let mut index = Index::default();
        index
            .items
            .push(IndexItem::new("Books", "BOOKS.md", Path::new("/journal")));

        let yaml = index.to_yaml().unwrap();
        assert!(yaml.contains("name: Books"));
        assert!(yaml.contains("url: BOOKS.md"));
        assert!(!yaml.contains("/journal"));
    }

    #[test]
    fn test_empty_document() {
        let index = Index::from_yaml("", Path::new("/journal")).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_note_file_name() {
        assert_eq!(
            note_file_name("19.02.2022", "reading list"),
            "19.02.2022_READING_LIST.md"
        );
        assert_eq!(note_file_name("01.01.2024", "Q1"), "01.01.2024_Q1.md");
    }
}
