use super::{atomic, RecordStore};
use crate::codec::json::{decode_collection, encode_collection};
use crate::error::{Result, StudyNavError};
use crate::ids;
use crate::model::Record;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CORRUPT_SUFFIX: &str = ".corrupt";

/// All records of one kind in a single JSON file.
///
/// Every mutation reads the whole collection, changes it in memory and writes
/// the whole collection back through [`atomic`]. An unreadable file is
/// treated as an empty collection; a copy of it is kept beside it as
/// `<name>.corrupt` before anything can overwrite it.
pub struct JsonStore<R> {
    path: PathBuf,
    _record: PhantomData<R>,
}

impl<R: Record> JsonStore<R> {
    /// Open the collection at `path`, creating it (and its directory) holding
    /// an empty collection when it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let store = Self {
            path,
            _record: PhantomData,
        };
        if !store.path.exists() {
            debug!(path = %store.path.display(), "creating empty collection");
            store.save(&[])?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the whole collection. Duplicate ids are rejected.
    pub fn replace_all(&mut self, records: &[R]) -> Result<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = records.iter().find(|r| !seen.insert(r.id())) {
            return Err(StudyNavError::Store(format!(
                "duplicate {} id in replacement: {}",
                R::KIND.label(),
                dup.id()
            )));
        }
        self.save(records)
    }

    fn load(&self) -> Result<Vec<R>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        match decode_collection(&content) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "unreadable collection, continuing with an empty one"
                );
                self.preserve_corrupt();
                Ok(Vec::new())
            }
        }
    }

    fn preserve_corrupt(&self) {
        let mut name = self.path.as_os_str().to_owned();
        name.push(CORRUPT_SUFFIX);
        let backup = PathBuf::from(name);
        if backup.exists() {
            return;
        }
        match fs::copy(&self.path, &backup) {
            Ok(_) => warn!(backup = %backup.display(), "kept a copy of the unreadable collection"),
            Err(err) => warn!(error = %err, "could not back up the unreadable collection"),
        }
    }

    /// Write the collection to a staged sibling file without replacing the original.
    fn stage(&self, records: &[R]) -> Result<PathBuf> {
        let content = encode_collection(records)?;
        atomic::stage(&self.path, content.as_bytes())
    }

    fn save(&self, records: &[R]) -> Result<()> {
        let staged = self.stage(records)?;
        atomic::commit(&staged, &self.path)?;
        debug!(path = %self.path.display(), count = records.len(), "collection written");
        Ok(())
    }
}

impl<R: Record> RecordStore<R> for JsonStore<R> {
    fn list(&self) -> Result<Vec<R>> {
        self.load()
    }

    fn get(&self, id: &str) -> Result<Option<R>> {
        Ok(self.load()?.into_iter().find(|r| r.id() == id))
    }

    fn upsert(&mut self, record: &R) -> Result<()> {
        let mut records = self.load()?;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.save(&records)
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }

    fn next_id(&self) -> Result<String> {
        Ok(ids::new_token_id(R::KIND.id_prefix()))
    }
}
