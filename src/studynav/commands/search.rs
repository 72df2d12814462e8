use crate::commands::CmdResult;
use crate::error::{Result, StudyNavError};
use crate::model::{Note, Task};
use crate::query::{self, sort_notes, sort_tasks};
use crate::store::RecordStore;

pub fn run<N, T>(notes: &N, tasks: &T, term: &str) -> Result<CmdResult>
where
    N: RecordStore<Note>,
    T: RecordStore<Task>,
{
    let term = term.trim();
    if term.is_empty() {
        return Err(StudyNavError::Api("Search term cannot be empty".to_string()));
    }

    let mut found = query::search(notes.list()?, tasks.list()?, term);
    sort_notes(&mut found.notes);
    sort_tasks(&mut found.tasks);
    Ok(CmdResult::default()
        .with_notes(found.notes)
        .with_tasks(found.tasks))
}
