use crate::commands::helpers::{clean_title, require};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StudyNavError};
use crate::model::{RecordKind, Task, TaskStatus, DEFAULT_PRIORITY, MAX_PRIORITY, MIN_PRIORITY};
use crate::query::{filter_tasks, sort_tasks, TaskFilter};
use crate::store::RecordStore;
use chrono::NaiveDate;

/// Fields supplied when creating a task.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: u8,
    pub due_date: Option<NaiveDate>,
    pub linked_note_id: Option<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: DEFAULT_PRIORITY,
            due_date: None,
            linked_note_id: None,
        }
    }
}

pub fn add<S: RecordStore<Task>>(store: &mut S, draft: TaskDraft) -> Result<CmdResult> {
    let title = clean_title(&draft.title)?;
    if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&draft.priority) {
        return Err(StudyNavError::Api(format!(
            "Priority must be between {} and {}, got {}",
            MIN_PRIORITY, MAX_PRIORITY, draft.priority
        )));
    }

    let mut task = Task::new(store.next_id()?, title);
    task.description = draft.description.trim().to_string();
    task.priority = draft.priority;
    task.due_date = draft.due_date;
    task.linked_note_id = draft
        .linked_note_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());
    store.upsert(&task)?;

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Task added: {} ({})",
            task.title, task.id
        )))
        .with_tasks(vec![task]))
}

pub fn list<S: RecordStore<Task>>(store: &S, filter: &TaskFilter) -> Result<CmdResult> {
    let mut tasks = filter_tasks(store.list()?, filter);
    sort_tasks(&mut tasks);
    Ok(CmdResult::default().with_tasks(tasks))
}

pub fn show<S: RecordStore<Task>>(store: &S, id: &str) -> Result<CmdResult> {
    let task = require(store, id)?;
    Ok(CmdResult::default().with_tasks(vec![task]))
}

pub fn set_status<S: RecordStore<Task>>(
    store: &mut S,
    id: &str,
    status: TaskStatus,
) -> Result<CmdResult> {
    let mut task = require(store, id)?;

    let message = if task.set_status(status) {
        store.upsert(&task)?;
        CmdMessage::success(format!("Task {} is now {}: {}", task.id, status, task.title))
    } else if status == TaskStatus::Done {
        CmdMessage::info(format!("Task {} already done", task.id))
    } else {
        CmdMessage::info(format!("Task {} is already {}", task.id, status))
    };
    Ok(CmdResult::default()
        .with_message(message)
        .with_tasks(vec![task]))
}

/// Point a task at a note. The note is not required to exist.
pub fn link<S: RecordStore<Task>>(store: &mut S, id: &str, note_id: &str) -> Result<CmdResult> {
    let note_id = note_id.trim();
    if note_id.is_empty() {
        return Err(StudyNavError::Api("Note id cannot be empty".to_string()));
    }
    let mut task = require(store, id)?;
    task.link_note(Some(note_id.to_string()));
    store.upsert(&task)?;

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Task {} linked to note {}",
            task.id, note_id
        )))
        .with_tasks(vec![task]))
}

pub fn unlink<S: RecordStore<Task>>(store: &mut S, id: &str) -> Result<CmdResult> {
    let mut task = require(store, id)?;
    if task.linked_note_id.is_none() {
        return Ok(CmdResult::default()
            .with_message(CmdMessage::info(format!("Task {} has no linked note", task.id)))
            .with_tasks(vec![task]));
    }
    task.link_note(None);
    store.upsert(&task)?;

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Task {} unlinked", task.id)))
        .with_tasks(vec![task]))
}

pub fn delete<S: RecordStore<Task>>(store: &mut S, id: &str) -> Result<CmdResult> {
    if !store.delete(id)? {
        return Err(StudyNavError::not_found(RecordKind::Task, id));
    }
    Ok(CmdResult::default().with_message(CmdMessage::success(format!("Deleted task {}", id))))
}
