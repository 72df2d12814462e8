use super::RecordStore;
use crate::error::Result;
use crate::model::Record;

/// In-memory storage for testing.
/// Does NOT persist data. Keeps insertion order and hands out numeric ids.
#[derive(Debug, Clone)]
pub struct MemoryStore<R> {
    records: Vec<R>,
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> MemoryStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn numeric_id_after_max(&self) -> String {
        let max = self
            .records
            .iter()
            .filter_map(|r| r.id().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}

impl<R: Record> RecordStore<R> for MemoryStore<R> {
    fn list(&self) -> Result<Vec<R>> {
        Ok(self.records.clone())
    }

    fn get(&self, id: &str) -> Result<Option<R>> {
        Ok(self.records.iter().find(|r| r.id() == id).cloned())
    }

    fn upsert(&mut self, record: &R) -> Result<()> {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record.clone(),
            None => self.records.push(record.clone()),
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        Ok(self.records.len() != before)
    }

    fn next_id(&self) -> Result<String> {
        Ok(self.numeric_id_after_max())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{parse_date, Note, Task, TaskStatus};

    #[derive(Default)]
    pub struct StoreFixture {
        pub notes: MemoryStore<Note>,
        pub tasks: MemoryStore<Task>,
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_note(mut self, title: &str, body: &str, tags: &[&str]) -> Self {
            let id = self.notes.numeric_id_after_max();
            let tags = tags.iter().map(|t| t.to_string()).collect();
            self.notes
                .records
                .push(Note::new(id, title.to_string(), body.to_string(), tags));
            self
        }

        pub fn with_task(
            mut self,
            title: &str,
            status: TaskStatus,
            priority: u8,
            due: Option<&str>,
        ) -> Self {
            let mut task = Task::new(self.tasks.numeric_id_after_max(), title.to_string());
            task.status = status;
            task.priority = priority;
            task.due_date = due.and_then(parse_date);
            self.tasks.records.push(task);
            self
        }
    }
}
