use std::fs;

use tempfile::TempDir;
use todolite_core::{
    FileKeyValueStore, Filter, KeyValueStore, LoadReport, TaskStore, TodoState, Variant,
};

fn open_store(dir: &TempDir, variant: Variant) -> TaskStore<FileKeyValueStore> {
    let repo = FileKeyValueStore::new(dir.path()).unwrap();
    let mut store = TaskStore::new(repo, variant);
    store.load().unwrap();
    store
}

#[test]
fn save_then_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir, Variant::Rich);

    let milk = store.add("Buy milk").unwrap().applied().unwrap();
    store.add("Walk dog").unwrap();
    store.add("Call mom").unwrap();
    store.toggle(&milk).unwrap();
    store.save().unwrap();
    let before = store.snapshot().to_vec();

    let reloaded = open_store(&dir, Variant::Rich);
    assert_eq!(reloaded.snapshot(), before.as_slice());
}

#[test]
fn minimal_variant_roundtrip_keeps_every_field() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir, Variant::Minimal);

    let milk = store.add("Buy milk").unwrap().applied().unwrap();
    store.add("Walk dog").unwrap();
    store.toggle(&milk).unwrap();
    let before = store.snapshot().to_vec();
    assert!(before.iter().all(|t| t.created_at.is_none()));

    let reloaded = open_store(&dir, Variant::Minimal);
    assert_eq!(reloaded.snapshot(), before.as_slice());
}

#[test]
fn every_mutation_is_on_disk_before_returning() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir, Variant::Rich);

    let id = store.add("persist me").unwrap().applied().unwrap();
    assert_eq!(open_store(&dir, Variant::Rich).len(), 1);

    store.update(&id, "persisted").unwrap();
    assert_eq!(open_store(&dir, Variant::Rich).snapshot()[0].text, "persisted");

    store.toggle(&id).unwrap();
    assert!(open_store(&dir, Variant::Rich).snapshot()[0].completed);

    store.delete(&id).unwrap();
    assert!(open_store(&dir, Variant::Rich).is_empty());
}

#[test]
fn missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let repo = FileKeyValueStore::new(dir.path()).unwrap();
    let mut store = TaskStore::new(repo, Variant::Rich);
    assert_eq!(store.load().unwrap(), LoadReport::Empty);
}

#[test]
fn corrupt_file_recovers_and_next_mutation_overwrites() {
    let dir = TempDir::new().unwrap();
    let mut repo = FileKeyValueStore::new(dir.path()).unwrap();
    repo.set("todos.v1", "[{\"id\": 1,").unwrap();

    let mut store = TaskStore::new(repo, Variant::Rich);
    assert_eq!(store.load().unwrap(), LoadReport::Recovered);
    assert!(store.is_empty());

    store.add("fresh start").unwrap();
    let raw = fs::read_to_string(dir.path().join("todos.v1.json")).unwrap();
    assert!(raw.contains("fresh start"));
    assert_eq!(open_store(&dir, Variant::Rich).len(), 1);
}

#[test]
fn legacy_minimal_records_load() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("todos.json"),
        r#"[{"id":"1700000000001","text":"old task"}]"#,
    )
    .unwrap();

    let store = open_store(&dir, Variant::Minimal);
    let task = &store.snapshot()[0];
    assert_eq!(task.id.as_str(), "1700000000001");
    assert_eq!(task.text, "old task");
    assert!(!task.completed);
    assert!(task.created_at.is_none());
}

#[test]
fn variants_do_not_share_data() {
    let dir = TempDir::new().unwrap();
    let mut rich = open_store(&dir, Variant::Rich);
    rich.add("rich only").unwrap();

    assert!(open_store(&dir, Variant::Minimal).is_empty());
    assert!(dir.path().join("todos.v1.json").exists());
    assert!(!dir.path().join("todos.json").exists());
}

#[test]
fn clear_completed_keeps_every_active_task() {
    let dir = TempDir::new().unwrap();
    let mut store = open_store(&dir, Variant::Rich);
    let mut active = Vec::new();
    for i in 0..6 {
        let id = store.add(&format!("task {i}")).unwrap().applied().unwrap();
        if i % 2 == 0 {
            store.toggle(&id).unwrap();
        } else {
            active.push(id);
        }
    }

    store.clear_completed().unwrap();
    let snapshot = store.snapshot();
    assert!(snapshot.iter().all(|t| !t.completed));
    for id in &active {
        assert!(store.get(id).is_some());
    }
    assert_eq!(open_store(&dir, Variant::Rich).len(), active.len());
}

#[test]
fn filters_partition_the_snapshot() {
    let dir = TempDir::new().unwrap();
    let repo = FileKeyValueStore::new(dir.path()).unwrap();
    let (mut state, _) = TodoState::open(repo, Variant::Rich).unwrap();
    for i in 0..5 {
        let id = state.add(&format!("item {i}")).unwrap().applied().unwrap();
        if i < 2 {
            state.toggle(&id).unwrap();
        }
    }

    state.set_filter(Filter::Active);
    let active = state.visible().len();
    assert!(state.visible().iter().all(|t| !t.completed));

    state.set_filter(Filter::Completed);
    let completed = state.visible().len();
    assert!(state.visible().iter().all(|t| t.completed));

    state.set_filter(Filter::All);
    assert_eq!(state.visible().len(), state.snapshot().len());
    assert_eq!(active + completed, state.snapshot().len());
    assert_eq!((active, completed), (3, 2));
}
