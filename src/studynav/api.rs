//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every studynav operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (e.g., parsing due dates and status names)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no formatting and no printing; that is the CLI's job.
//!
//! ## Generic Over RecordStore
//!
//! `StudyNavApi<N, T>` is generic over one store per record kind:
//! - Production: `StudyNavApi<FileStore<Note>, FileStore<Task>>`
//! - Testing: `StudyNavApi<MemoryStore<Note>, MemoryStore<Task>>`

use crate::commands::{self, CmdResult, StudyNavPaths};
use crate::config::Backend;
use crate::error::Result;
use crate::model::{Note, RecordKind, Task, TaskStatus};
use crate::query::{NoteFilter, TaskFilter};
use crate::store::{FileStore, RecordStore};

pub use crate::commands::config::ConfigAction;
pub use crate::commands::tasks::TaskDraft;

/// The main API facade for studynav operations.
pub struct StudyNavApi<N, T> {
    notes: N,
    tasks: T,
    paths: StudyNavPaths,
    backend: Backend,
}

impl StudyNavApi<FileStore<Note>, FileStore<Task>> {
    /// Open both file-backed collections for `backend`.
    pub fn open(paths: StudyNavPaths, backend: Backend) -> Result<Self> {
        let notes = FileStore::open(
            backend,
            paths.collection_file(RecordKind::Note),
            paths.vault_subdir(RecordKind::Note),
        )?;
        let tasks = FileStore::open(
            backend,
            paths.collection_file(RecordKind::Task),
            paths.vault_subdir(RecordKind::Task),
        )?;
        Ok(Self::new(notes, tasks, paths, backend))
    }
}

impl<N: RecordStore<Note>, T: RecordStore<Task>> StudyNavApi<N, T> {
    pub fn new(notes: N, tasks: T, paths: StudyNavPaths, backend: Backend) -> Self {
        Self {
            notes,
            tasks,
            paths,
            backend,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn paths(&self) -> &StudyNavPaths {
        &self.paths
    }

    // --- Notes ---

    pub fn add_note(&mut self, title: &str, body: &str, tags: &[String]) -> Result<CmdResult> {
        commands::notes::add(&mut self.notes, title, body, tags)
    }

    pub fn list_notes(&self, tag: Option<String>) -> Result<CmdResult> {
        commands::notes::list(&self.notes, &NoteFilter { tag })
    }

    pub fn show_note(&self, id: &str) -> Result<CmdResult> {
        commands::notes::show(&self.notes, id)
    }

    pub fn append_note(&mut self, id: &str, text: &str) -> Result<CmdResult> {
        commands::notes::append(&mut self.notes, id, text)
    }

    pub fn tag_note(&mut self, id: &str, tags: &[String]) -> Result<CmdResult> {
        commands::notes::tag(&mut self.notes, id, tags)
    }

    pub fn delete_note(&mut self, id: &str) -> Result<CmdResult> {
        commands::notes::delete(&mut self.notes, id)
    }

    // --- Tasks ---

    pub fn add_task(&mut self, draft: TaskDraft) -> Result<CmdResult> {
        commands::tasks::add(&mut self.tasks, draft)
    }

    /// List tasks. `status` and `due_before` are raw user input.
    pub fn list_tasks(
        &self,
        status: Option<&str>,
        due_before: Option<&str>,
        linked_note: Option<String>,
    ) -> Result<CmdResult> {
        let filter = TaskFilter {
            status: status.map(str::parse).transpose()?,
            due_before: due_before.map(commands::helpers::parse_due).transpose()?,
            linked_note,
        };
        commands::tasks::list(&self.tasks, &filter)
    }

    pub fn show_task(&self, id: &str) -> Result<CmdResult> {
        commands::tasks::show(&self.tasks, id)
    }

    pub fn complete_task(&mut self, id: &str) -> Result<CmdResult> {
        commands::tasks::set_status(&mut self.tasks, id, TaskStatus::Done)
    }

    pub fn start_task(&mut self, id: &str) -> Result<CmdResult> {
        commands::tasks::set_status(&mut self.tasks, id, TaskStatus::Doing)
    }

    pub fn reopen_task(&mut self, id: &str) -> Result<CmdResult> {
        commands::tasks::set_status(&mut self.tasks, id, TaskStatus::Todo)
    }

    pub fn link_task(&mut self, id: &str, note_id: &str) -> Result<CmdResult> {
        commands::tasks::link(&mut self.tasks, id, note_id)
    }

    pub fn unlink_task(&mut self, id: &str) -> Result<CmdResult> {
        commands::tasks::unlink(&mut self.tasks, id)
    }

    pub fn delete_task(&mut self, id: &str) -> Result<CmdResult> {
        commands::tasks::delete(&mut self.tasks, id)
    }

    // --- Everything else ---

    pub fn search(&self, term: &str) -> Result<CmdResult> {
        commands::search::run(&self.notes, &self.tasks, term)
    }

    pub fn paths_info(&self) -> Result<CmdResult> {
        commands::paths::run(&self.paths, self.backend)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }

    /// Copy every record from the other backend into `to`.
    pub fn migrate(&self, to: Backend) -> Result<CmdResult> {
        commands::migrate::run(&self.paths, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use std::path::PathBuf;

    fn api() -> StudyNavApi<MemoryStore<Note>, MemoryStore<Task>> {
        StudyNavApi::new(
            MemoryStore::new(),
            MemoryStore::new(),
            StudyNavPaths::new(PathBuf::from("/data"), None),
            Backend::Json,
        )
    }

    #[test]
    fn list_tasks_parses_filters() {
        let mut api = api();
        let mut draft = TaskDraft::new("Write report");
        draft.due_date = crate::model::parse_date("2025-10-20");
        api.add_task(draft).unwrap();
        api.add_task(TaskDraft::new("Someday")).unwrap();

        let res = api.list_tasks(Some("TODO"), Some("2025-10-31"), None).unwrap();
        assert_eq!(res.tasks.len(), 1);
        assert_eq!(res.tasks[0].title, "Write report");

        assert!(api.list_tasks(Some("later"), None, None).is_err());
        assert!(api.list_tasks(None, Some("soon"), None).is_err());
    }

    #[test]
    fn task_lifecycle_through_the_facade() {
        let mut api = api();
        api.add_task(TaskDraft::new("A")).unwrap();
        api.start_task("1").unwrap();
        assert_eq!(api.show_task("1").unwrap().tasks[0].status, TaskStatus::Doing);
        api.complete_task("1").unwrap();
        api.reopen_task("1").unwrap();
        assert_eq!(api.show_task("1").unwrap().tasks[0].status, TaskStatus::Todo);
        api.delete_task("1").unwrap();
        assert!(api.show_task("1").unwrap_err().is_not_found());
    }

    #[test]
    fn notes_and_search() {
        let mut api = api();
        api.add_note("Lecture 1: DP", "", &["cs".to_string()]).unwrap();
        api.add_task(TaskDraft::new("unrelated")).unwrap();

        let res = api.search("dp").unwrap();
        assert_eq!(res.notes.len(), 1);
        assert!(res.tasks.is_empty());
        assert_eq!(api.list_notes(Some("cs".into())).unwrap().notes.len(), 1);
        assert!(api.list_notes(Some("bio".into())).unwrap().notes.is_empty());
    }
}
