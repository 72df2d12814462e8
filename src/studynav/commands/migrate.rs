//! Copy every record from one backend into the other.
//!
//! Ids and timestamps are preserved and the source is only read. Records
//! already present in the target under the same id are replaced. The
//! Markdown backend cannot hold every JSON id (`-`, path separators, empty),
//! so such records are skipped and reported instead of failing the run.

use crate::codec::MarkdownRecord;
use crate::commands::{CmdMessage, CmdResult, StudyNavPaths};
use crate::config::Backend;
use crate::error::{Result, StudyNavError};
use crate::model::{Note, Record, Task};
use crate::store::{FileStore, RecordStore};
use std::collections::HashMap;
use tracing::{info, warn};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub copied: usize,
    pub skipped: Vec<String>,
}

pub fn run(paths: &StudyNavPaths, to: Backend) -> Result<CmdResult> {
    let from = match to {
        Backend::Json => Backend::Markdown,
        Backend::Markdown => Backend::Json,
    };

    let mut result = CmdResult::default();
    let notes = migrate_kind::<Note>(paths, from, to)?;
    let tasks = migrate_kind::<Task>(paths, from, to)?;

    for (kind, report) in [("notes", &notes), ("tasks", &tasks)] {
        result.add_message(CmdMessage::success(format!(
            "Copied {} {} from {} to {}",
            report.copied, kind, from, to
        )));
        for id in &report.skipped {
            result.add_message(CmdMessage::warning(format!(
                "Skipped {} with id {:?}: not usable as a file name",
                kind.trim_end_matches('s'),
                id
            )));
        }
    }
    Ok(result)
}

fn migrate_kind<R: MarkdownRecord>(
    paths: &StudyNavPaths,
    from: Backend,
    to: Backend,
) -> Result<MigrationReport> {
    let json_file = paths.collection_file(R::KIND);
    let vault = paths.vault_subdir(R::KIND);

    let source_exists = match from {
        Backend::Json => json_file.exists(),
        Backend::Markdown => vault.is_dir(),
    };
    if !source_exists {
        info!(kind = R::KIND.label(), "nothing to migrate");
        return Ok(MigrationReport::default());
    }

    let source = FileStore::<R>::open(from, json_file.clone(), vault.clone())?;
    let mut target = FileStore::<R>::open(to, json_file, vault)?;
    copy_records(&source, &mut target)
}

/// Copy all of `source` into `target`.
pub fn copy_records<R: MarkdownRecord>(
    source: &FileStore<R>,
    target: &mut FileStore<R>,
) -> Result<MigrationReport> {
    let records = source.list()?;
    let mut report = MigrationReport::default();

    match target {
        FileStore::Json(store) => {
            // One rewrite for the whole batch.
            let mut merged = store.list()?;
            let mut positions: HashMap<String, usize> = merged
                .iter()
                .enumerate()
                .map(|(i, r)| (r.id().to_string(), i))
                .collect();
            for record in records {
                let existing = positions.get(record.id()).copied();
                match existing {
                    Some(i) => merged[i] = record,
                    None => {
                        positions.insert(record.id().to_string(), merged.len());
                        merged.push(record);
                    }
                }
                report.copied += 1;
            }
            store.replace_all(&merged)?;
        }
        FileStore::Markdown(store) => {
            for record in records {
                match store.upsert(&record) {
                    Ok(()) => report.copied += 1,
                    Err(StudyNavError::InvalidId(id)) => {
                        warn!(kind = R::KIND.label(), id = %id, "skipping record");
                        report.skipped.push(id);
                    }
                    Err(err) => return Err(err),
                }
            }
        }
    }
    Ok(report)
}
