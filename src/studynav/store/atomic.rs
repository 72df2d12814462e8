//! Whole-file replacement through a temporary sibling and a rename.
//!
//! The temporary file lives in the target's directory so the rename never
//! crosses a filesystem. Readers see the old file or the new one, never a
//! partial write. Nothing here serializes two writers; the last rename wins.

use crate::error::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub(crate) const TMP_SUFFIX: &str = ".tmp";

fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}-{}{}", name, Uuid::new_v4(), TMP_SUFFIX))
}

/// Write `contents` next to `target` and flush it to disk. Returns the staged path.
pub(crate) fn stage(target: &Path, contents: &[u8]) -> Result<PathBuf> {
    let staged = staging_path(target);
    let written = File::create(&staged).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    if let Err(err) = written {
        let _ = fs::remove_file(&staged);
        return Err(err.into());
    }
    Ok(staged)
}

/// Move a staged file over `target`.
pub(crate) fn commit(staged: &Path, target: &Path) -> Result<()> {
    if let Err(err) = fs::rename(staged, target) {
        let _ = fs::remove_file(staged);
        return Err(err.into());
    }
    Ok(())
}

pub(crate) fn write(target: &Path, contents: &[u8]) -> Result<()> {
    let staged = stage(target, contents)?;
    commit(&staged, target)
}
