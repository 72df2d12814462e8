use crate::commands::helpers::{clean_tags, clean_title, require};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StudyNavError};
use crate::model::{Note, RecordKind};
use crate::query::{filter_notes, sort_notes, NoteFilter};
use crate::store::RecordStore;

pub fn add<S: RecordStore<Note>>(
    store: &mut S,
    title: &str,
    body: &str,
    tags: &[String],
) -> Result<CmdResult> {
    let title = clean_title(title)?;
    let note = Note::new(store.next_id()?, title, body.trim().to_string(), clean_tags(tags));
    store.upsert(&note)?;

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Note added: {} ({})",
            note.title, note.id
        )))
        .with_notes(vec![note]))
}

pub fn list<S: RecordStore<Note>>(store: &S, filter: &NoteFilter) -> Result<CmdResult> {
    let mut notes = filter_notes(store.list()?, filter);
    sort_notes(&mut notes);
    Ok(CmdResult::default().with_notes(notes))
}

pub fn show<S: RecordStore<Note>>(store: &S, id: &str) -> Result<CmdResult> {
    let note = require(store, id)?;
    Ok(CmdResult::default().with_notes(vec![note]))
}

pub fn append<S: RecordStore<Note>>(store: &mut S, id: &str, text: &str) -> Result<CmdResult> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StudyNavError::Api("Nothing to append".to_string()));
    }

    let mut note = require(store, id)?;
    note.append(text);
    store.upsert(&note)?;

    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Appended to note {}", note.id)))
        .with_notes(vec![note]))
}

pub fn tag<S: RecordStore<Note>>(store: &mut S, id: &str, tags: &[String]) -> Result<CmdResult> {
    let mut note = require(store, id)?;
    let added = note.add_tags(clean_tags(tags));

    let message = if added == 0 {
        CmdMessage::info(format!("Note {} already has those tags", note.id))
    } else {
        store.upsert(&note)?;
        CmdMessage::success(format!("Tagged note {}: {}", note.id, note.tags.join(", ")))
    };
    Ok(CmdResult::default()
        .with_message(message)
        .with_notes(vec![note]))
}

pub fn delete<S: RecordStore<Note>>(store: &mut S, id: &str) -> Result<CmdResult> {
    if !store.delete(id)? {
        return Err(StudyNavError::not_found(RecordKind::Note, id));
    }
    Ok(CmdResult::default().with_message(CmdMessage::success(format!("Deleted note {}", id))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::MemoryStore;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn add_assigns_id_and_trims() {
        let mut store = MemoryStore::new();
        let result = add(&mut store, "  Lecture 1 ", " intro ", &tags(&["cs", " "])).unwrap();
        let note = &result.notes[0];
        assert_eq!(note.id, "1");
        assert_eq!(note.title, "Lecture 1");
        assert_eq!(note.body, "intro");
        assert_eq!(note.tags, vec!["cs"]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_rejects_empty_title() {
        let mut store = MemoryStore::new();
        assert!(add(&mut store, "  ", "", &[]).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn append_keeps_original_text_and_advances_updated_at() {
        let mut store = MemoryStore::new();
        let before = add(&mut store, "Lecture 1", "Overlapping subproblems", &tags(&["cs"]))
            .unwrap()
            .notes
            .remove(0);

        append(&mut store, "1", "more detail").unwrap();
        let shown = show(&store, "1").unwrap().notes.remove(0);
        assert_eq!(shown.body, "Overlapping subproblems\n\nmore detail");
        assert!(shown.updated_at > before.updated_at);
        assert_eq!(shown.created_at, before.created_at);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let mut store = MemoryStore::new();
        assert!(show(&store, "9").unwrap_err().is_not_found());
        assert!(append(&mut store, "9", "x").unwrap_err().is_not_found());
        assert!(tag(&mut store, "9", &tags(&["x"])).unwrap_err().is_not_found());
        assert!(delete(&mut store, "9").unwrap_err().is_not_found());
    }

    #[test]
    fn tag_adds_only_new_tags() {
        let mut fixture = StoreFixture::new().with_note("Lecture", "", &["cs"]);
        let result = tag(&mut fixture.notes, "1", &tags(&["cs", "dp"])).unwrap();
        assert_eq!(result.notes[0].tags, vec!["cs", "dp"]);

        let result = tag(&mut fixture.notes, "1", &tags(&["dp"])).unwrap();
        assert_eq!(result.messages[0].level, crate::commands::MessageLevel::Info);
    }

    #[test]
    fn list_filters_by_tag() {
        let fixture = StoreFixture::new()
            .with_note("A", "", &["cs"])
            .with_note("B", "", &["math"]);
        let filter = NoteFilter {
            tag: Some("math".into()),
        };
        let result = list(&fixture.notes, &filter).unwrap();
        assert_eq!(result.notes.len(), 1);
        assert_eq!(result.notes[0].title, "B");
    }

    #[test]
    fn delete_removes_note() {
        let mut fixture = StoreFixture::new().with_note("A", "", &[]);
        delete(&mut fixture.notes, "1").unwrap();
        assert!(fixture.notes.is_empty());
    }
}
