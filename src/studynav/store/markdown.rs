use super::{atomic, RecordStore};
use crate::codec::markdown::{decode, encode};
use crate::codec::MarkdownRecord;
use crate::error::{Result, StudyNavError};
use crate::ids;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const EXTENSION: &str = "md";

/// One Markdown file per record, named `<id>-<slug>.md`.
///
/// The id is whatever precedes the first `-` of the file name, and that is
/// what lookups match against, exactly. The id inside the header is
/// informational; when it disagrees with the file name, the file name wins.
pub struct MarkdownStore<R> {
    dir: PathBuf,
    _record: PhantomData<R>,
}

/// Lowercase the title and collapse every run of non `[a-z0-9]` characters
/// into one `-`. An empty result becomes `fallback`.
pub fn slugify(title: &str, fallback: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

/// The id part of a record file name, or `None` for files that are not records.
pub fn record_id_from_file_name(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(".md")?;
    let (id, _) = stem.split_once('-')?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.contains(['-', '/', '\\']) {
        return Err(StudyNavError::InvalidId(id.to_string()));
    }
    Ok(())
}

impl<R: MarkdownRecord> MarkdownStore<R> {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            _record: PhantomData,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name_for(record: &R) -> String {
        format!(
            "{}-{}.{}",
            record.id(),
            slugify(record.title(), R::KIND.label()),
            EXTENSION
        )
    }

    /// Record files in listing order: numeric ids ascending, then by name.
    fn record_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if record_id_from_file_name(&name).is_some() {
                files.push((name, path));
            }
        }

        files.sort_by(|(a, _), (b, _)| {
            let key = |name: &str| ids::leading_number(name).unwrap_or(u64::MAX);
            key(a.as_str()).cmp(&key(b.as_str())).then_with(|| a.cmp(b))
        });
        Ok(files)
    }

    /// The file holding `id`, matched exactly on the part before the first `-`.
    fn find(&self, id: &str) -> Result<Option<PathBuf>> {
        Ok(self
            .record_files()?
            .into_iter()
            .find(|(name, _)| record_id_from_file_name(name) == Some(id))
            .map(|(_, path)| path))
    }

    fn read(&self, name: &str, path: &Path) -> Option<R> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "skipping unreadable record file");
                return None;
            }
        };
        let content = String::from_utf8_lossy(&bytes);
        let mut record: R = decode(&content);
        if let Some(id) = record_id_from_file_name(name) {
            if record.id() != id {
                if !record.id().is_empty() {
                    debug!(file = name, header_id = record.id(), "header id differs from file name");
                }
                record.set_id(id.to_string());
            }
        }
        Some(record)
    }
}

impl<R: MarkdownRecord> RecordStore<R> for MarkdownStore<R> {
    fn list(&self) -> Result<Vec<R>> {
        Ok(self
            .record_files()?
            .iter()
            .filter_map(|(name, path)| self.read(name, path))
            .collect())
    }

    fn get(&self, id: &str) -> Result<Option<R>> {
        let Some(path) = self.find(id)? else {
            return Ok(None);
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.read(&name, &path))
    }

    fn upsert(&mut self, record: &R) -> Result<()> {
        validate_id(record.id())?;
        let previous = self.find(record.id())?;
        let target = self.dir.join(Self::file_name_for(record));

        atomic::write(&target, encode(record).as_bytes())?;
        debug!(file = %target.display(), "record written");

        // A title change renames the file; drop the old one only once the new one is in place.
        if let Some(old) = previous {
            if old != target {
                fs::remove_file(&old)?;
            }
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        match self.find(id)? {
            Some(path) => {
                fs::remove_file(&path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn next_id(&self) -> Result<String> {
        Ok(ids::next_numeric_id(&self.dir)?.to_string())
    }
}
