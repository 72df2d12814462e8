//! # Storage Layer
//!
//! Records are kept in plain files, one collection per record kind. The
//! [`RecordStore`] trait is the contract every backend implements:
//!
//! - `list()`: every record, materialized
//! - `get(id)`: `Ok(None)` when the id is absent
//! - `upsert(record)`: replace the record with the same id, or append
//! - `delete(id)`: `Ok(false)` when the id is absent
//! - `next_id()`: a fresh identifier in the backend's own scheme
//!
//! Absence is a normal outcome here, not an error. The command layer turns it
//! into [`StudyNavError::NotFound`](crate::error::StudyNavError::NotFound).
//! I/O failures on write always propagate.
//!
//! ## Implementations
//!
//! - [`json::JsonStore`]: one `{"items": [...]}` file, rewritten whole through
//!   a temp file and a rename on every mutation.
//! - [`markdown::MarkdownStore`]: one `<id>-<slug>.md` file per record.
//! - [`memory::MemoryStore`]: no persistence, for tests.
//!
//! [`FileStore`] picks one of the two file backends at runtime.
//!
//! ## Storage Format
//!
//! ```text
//! ~/.studynav/
//! ├── config.json
//! ├── notes.json          # JSON backend
//! ├── tasks.json
//! └── vault/              # Markdown backend
//!     ├── notes/1-lecture-1-dp.md
//!     └── tasks/1-write-report.md
//! ```
//!
//! Every operation is a linear scan over the collection. There is no index.

use crate::codec::MarkdownRecord;
use crate::config::Backend;
use crate::error::Result;
use std::path::{Path, PathBuf};

pub(crate) mod atomic;
pub mod json;
pub mod markdown;
pub mod memory;

pub trait RecordStore<R> {
    fn list(&self) -> Result<Vec<R>>;

    fn get(&self, id: &str) -> Result<Option<R>>;

    fn upsert(&mut self, record: &R) -> Result<()>;

    fn delete(&mut self, id: &str) -> Result<bool>;

    fn next_id(&self) -> Result<String>;
}

/// A file-backed store whose backend is chosen at runtime.
pub enum FileStore<R> {
    Json(json::JsonStore<R>),
    Markdown(markdown::MarkdownStore<R>),
}

impl<R: MarkdownRecord> FileStore<R> {
    /// Open the store for `backend`. `json_file` and `vault_dir` are the
    /// locations for the respective backends; only the chosen one is touched.
    pub fn open(backend: Backend, json_file: PathBuf, vault_dir: PathBuf) -> Result<Self> {
        Ok(match backend {
            Backend::Json => FileStore::Json(json::JsonStore::open(json_file)?),
            Backend::Markdown => FileStore::Markdown(markdown::MarkdownStore::open(vault_dir)?),
        })
    }

    pub fn backend(&self) -> Backend {
        match self {
            FileStore::Json(_) => Backend::Json,
            FileStore::Markdown(_) => Backend::Markdown,
        }
    }

    /// The collection file or record directory.
    pub fn location(&self) -> &Path {
        match self {
            FileStore::Json(store) => store.path(),
            FileStore::Markdown(store) => store.dir(),
        }
    }
}

impl<R: MarkdownRecord> RecordStore<R> for FileStore<R> {
    fn list(&self) -> Result<Vec<R>> {
        match self {
            FileStore::Json(store) => store.list(),
            FileStore::Markdown(store) => store.list(),
        }
    }

    fn get(&self, id: &str) -> Result<Option<R>> {
        match self {
            FileStore::Json(store) => store.get(id),
            FileStore::Markdown(store) => store.get(id),
        }
    }

    fn upsert(&mut self, record: &R) -> Result<()> {
        match self {
            FileStore::Json(store) => store.upsert(record),
            FileStore::Markdown(store) => store.upsert(record),
        }
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        match self {
            FileStore::Json(store) => store.delete(id),
            FileStore::Markdown(store) => store.delete(id),
        }
    }

    fn next_id(&self) -> Result<String> {
        match self {
            FileStore::Json(store) => store.next_id(),
            FileStore::Markdown(store) => store.next_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Note, Task};
    use tempfile::TempDir;

    #[test]
    fn opens_only_the_selected_backend() {
        let dir = TempDir::new().unwrap();
        let json_file = dir.path().join("tasks.json");
        let vault = dir.path().join("vault").join("tasks");

        let store: FileStore<Task> =
            FileStore::open(Backend::Json, json_file.clone(), vault.clone()).unwrap();
        assert_eq!(store.backend(), Backend::Json);
        assert_eq!(store.location(), json_file.as_path());
        assert!(json_file.exists());
        assert!(!vault.exists());

        let store: FileStore<Task> =
            FileStore::open(Backend::Markdown, json_file, vault.clone()).unwrap();
        assert_eq!(store.backend(), Backend::Markdown);
        assert!(vault.is_dir());
    }

    #[test]
    fn both_backends_honor_the_same_contract() {
        let dir = TempDir::new().unwrap();
        for backend in [Backend::Json, Backend::Markdown] {
            let root = dir.path().join(backend.to_string());
            let mut store: FileStore<Note> =
                FileStore::open(backend, root.join("notes.json"), root.join("notes")).unwrap();

            let id = store.next_id().unwrap();
            let note = Note::new(id.clone(), "Lecture 1".into(), "body".into(), vec![]);
            store.upsert(&note).unwrap();

            assert_eq!(store.get(&id).unwrap(), Some(note.clone()));
            assert_eq!(store.list().unwrap(), vec![note]);
            assert_eq!(store.get("nope").unwrap(), None);
            assert!(store.delete(&id).unwrap());
            assert!(!store.delete(&id).unwrap());
            assert!(store.list().unwrap().is_empty());
        }
    }
}
