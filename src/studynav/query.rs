//! # Query Layer
//!
//! Filters, sort orders and search over records already loaded from a store.
//! Nothing here touches the filesystem; every query is a linear pass.
//!
//! Filters are plain structs whose fields are all optional. An unset field
//! matches everything, and set fields combine with AND, so two filters merged
//! into one select exactly the intersection of what each selects alone.

use crate::model::{Note, Task, TaskStatus};
use chrono::NaiveDate;
use std::cmp::Reverse;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    pub tag: Option<String>,
}

impl NoteFilter {
    pub fn matches(&self, note: &Note) -> bool {
        self.tag.as_deref().map_or(true, |tag| note.has_tag(tag))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    /// Due on or before this date. Tasks without a due date never match.
    pub due_before: Option<NaiveDate>,
    pub linked_note: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|status| task.status != status) {
            return false;
        }
        if let Some(limit) = self.due_before {
            if !task.due_date.is_some_and(|due| due <= limit) {
                return false;
            }
        }
        if let Some(note_id) = &self.linked_note {
            if task.linked_note_id.as_ref() != Some(note_id) {
                return false;
            }
        }
        true
    }
}

pub fn filter_notes(notes: Vec<Note>, filter: &NoteFilter) -> Vec<Note> {
    notes.into_iter().filter(|n| filter.matches(n)).collect()
}

pub fn filter_tasks(tasks: Vec<Task>, filter: &TaskFilter) -> Vec<Task> {
    tasks.into_iter().filter(|t| filter.matches(t)).collect()
}

/// Most recently updated first.
pub fn sort_notes(notes: &mut [Note]) {
    notes.sort_by_key(|n| Reverse(n.updated_at));
}

/// Status rank, then due date (unset last), then priority.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| {
        (
            t.status.rank(),
            t.due_date.unwrap_or(NaiveDate::MAX),
            t.priority,
        )
    });
}

#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub notes: Vec<Note>,
    pub tasks: Vec<Task>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.tasks.is_empty()
    }
}

/// Case-insensitive substring search. Notes match on title or body, tasks on title.
pub fn search(notes: Vec<Note>, tasks: Vec<Task>, term: &str) -> SearchResults {
    let needle = term.to_lowercase();
    let hit = |text: &str| text.to_lowercase().contains(&needle);

    SearchResults {
        notes: notes
            .into_iter()
            .filter(|n| hit(&n.title) || hit(&n.body))
            .collect(),
        tasks: tasks.into_iter().filter(|t| hit(&t.title)).collect(),
    }
}
