use std::collections::HashSet;
use std::fs;
use studynav::model::{parse_date, Note, Task, TaskStatus};
use studynav::store::json::JsonStore;
use studynav::store::markdown::MarkdownStore;
use studynav::store::RecordStore;
use tempfile::TempDir;

fn create(store: &mut MarkdownStore<Task>, title: &str) -> String {
    let task = Task::new(store.next_id().unwrap(), title.to_string());
    store.upsert(&task).unwrap();
    task.id
}

#[test]
fn delete_leaves_neighbours_and_never_reuses_ids() {
    let dir = TempDir::new().unwrap();
    let mut store: MarkdownStore<Task> = MarkdownStore::open(dir.path().join("tasks")).unwrap();

    let first = create(&mut store, "First");
    let second = create(&mut store, "Second");
    let third = create(&mut store, "Third");
    assert_eq!((first.as_str(), second.as_str(), third.as_str()), ("1", "2", "3"));

    assert!(store.delete(&second).unwrap());

    let remaining: Vec<String> = store.list().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(remaining, vec![first.clone(), third.clone()]);

    let fourth = create(&mut store, "Fourth");
    assert_ne!(fourth, second);
    assert!(![first, third].contains(&fourth));
    assert_eq!(fourth, "4");
}

#[test]
fn many_creations_yield_distinct_ids() {
    let dir = TempDir::new().unwrap();
    let mut store: MarkdownStore<Task> = MarkdownStore::open(dir.path().join("tasks")).unwrap();
    let ids: HashSet<String> = (0..30).map(|i| create(&mut store, &format!("t{}", i))).collect();
    assert_eq!(ids.len(), 30);

    let json_dir = TempDir::new().unwrap();
    let store: JsonStore<Note> = JsonStore::open(json_dir.path().join("notes.json")).unwrap();
    let tokens: HashSet<String> = (0..200).map(|_| store.next_id().unwrap()).collect();
    // Tokens minted in the same second share 24 random bits; a rare pair may collide.
    assert!(tokens.len() >= 199);
}

#[test]
fn one_and_ten_do_not_collide() {
    let dir = TempDir::new().unwrap();
    let mut store: MarkdownStore<Task> = MarkdownStore::open(dir.path().join("tasks")).unwrap();
    store.upsert(&Task::new("10".into(), "Ten".into())).unwrap();
    store.upsert(&Task::new("1".into(), "One".into())).unwrap();

    assert!(store.delete("1").unwrap());
    assert_eq!(store.get("10").unwrap().unwrap().title, "Ten");
    assert_eq!(store.next_id().unwrap(), "11");
}

#[test]
fn tricky_values_round_trip_through_files() {
    let dir = TempDir::new().unwrap();
    let mut store: MarkdownStore<Task> = MarkdownStore::open(dir.path().join("tasks")).unwrap();

    let mut task = Task::new("1".into(), "Say \"hi\"\n---\nbye: now".into());
    task.description = "first line\n---\nlast line".into();
    task.status = TaskStatus::Doing;
    task.priority = 1;
    task.due_date = parse_date("2025-10-20");
    task.linked_note_id = Some(String::new());
    store.upsert(&task).unwrap();

    assert_eq!(store.get("1").unwrap(), Some(task));

    let leftovers: Vec<String> = fs::read_dir(store.dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn hand_edited_files_are_tolerated() {
    let dir = TempDir::new().unwrap();
    let tasks = dir.path().join("tasks");
    let store: MarkdownStore<Task> = MarkdownStore::open(&tasks).unwrap();

    fs::write(tasks.join("1-no-header.md"), "# Just a heading\n\nSome words\n").unwrap();
    fs::write(
        tasks.join("2-legacy.md"),
        "---\nid: 2\ntitle: \"Legacy\"\ndescription: \"\"\ncompleted: TRUE\ncreated_at: \"2025-01-02 03:04:05\"\n---\n\n# Legacy\n",
    )
    .unwrap();
    fs::write(
        tasks.join("3-open.md"),
        "---\ntitle: \"Open header\"\nfavourite_colour: blue\n\n# Open header\n\nbody survives\n",
    )
    .unwrap();

    let all = store.list().unwrap();
    assert_eq!(all.len(), 3);

    assert_eq!(all[0].title, "Just a heading");
    assert_eq!(all[0].description, "Some words");

    assert_eq!(all[1].id, "2");
    assert_eq!(all[1].status, TaskStatus::Done);

    assert_eq!(all[2].title, "Open header");
    assert_eq!(all[2].description, "body survives");
}
