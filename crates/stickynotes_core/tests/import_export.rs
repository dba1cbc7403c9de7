use serde_json::json;
use stickynotes_core::{
    BlobNoteRepository, ImportError, ImportReport, InMemoryBlobRepository, ManualClock, Note,
    NoteColor, NoteStore, Notice, StoreOptions,
};

type MemoryStore = NoteStore<BlobNoteRepository<InMemoryBlobRepository>, ManualClock>;

fn open(clock: &ManualClock) -> MemoryStore {
    NoteStore::open_with(
        BlobNoteRepository::new(InMemoryBlobRepository::new()),
        clock.clone(),
        StoreOptions::default(),
    )
}

#[test]
fn import_adds_only_new_ids_and_reports_count() {
    let clock = ManualClock::new(50);
    let mut store = open(&clock);
    let existing = store.create("mine", NoteColor::Yellow);

    let report = store
        .import_merge(json!([
            {"id": existing.id.clone(), "content": "collision"},
            {"id": "fresh", "content": "imported", "color": "blue", "createdAt": 7, "updatedAt": 9}
        ]))
        .unwrap();

    assert_eq!(report, ImportReport { added: 1, skipped: 1 });
    assert_eq!(store.len(), 2);
    let first = &store.notes()[0];
    assert_eq!(first.id, "fresh");
    assert_eq!(first.color, NoteColor::Blue);
    assert_eq!((first.created_at, first.updated_at, first.position), (7, 9, 0));
    assert_eq!(store.get(&existing.id).unwrap().content, "mine");
    assert_eq!(
        store.drain_notices(),
        vec![Notice::Imported { added: 1, skipped: 1 }]
    );
}

#[test]
fn import_prepends_survivors_in_payload_order() {
    let clock = ManualClock::new(0);
    let mut store = open(&clock);
    store.create("old", NoteColor::Yellow);

    store
        .import_json(r#"[{"id":"x","content":"one"},{"id":"y","content":"two"},{"content":"nope"}]"#)
        .unwrap();

    let order: Vec<&str> = store.notes().iter().map(|n| n.content.as_str()).collect();
    assert_eq!(order, ["one", "two", "old"]);
    let positions: Vec<usize> = store.notes().iter().map(|n| n.position).collect();
    assert_eq!(positions, [0, 1, 2]);
}

#[test]
fn non_array_import_is_rejected_without_mutation() {
    let clock = ManualClock::new(0);
    let mut store = open(&clock);
    store.create("keep", NoteColor::Yellow);
    let before = store.notes().to_vec();

    let err = store.import_merge(json!({"id": "a"})).unwrap_err();
    assert_eq!(err, ImportError::NotAnArray("object"));
    let err = store.import_json("{ not json").unwrap_err();
    assert!(matches!(err, ImportError::InvalidJson(_)));

    assert_eq!(store.notes(), before.as_slice());
    let notices = store.drain_notices();
    assert_eq!(notices.len(), 2);
    assert!(notices
        .iter()
        .all(|notice| matches!(notice, Notice::ImportRejected { .. })));
}

#[test]
fn export_is_pretty_printed_and_round_trips() {
    let clock = ManualClock::new(123);
    let mut store = open(&clock);
    store.create("alpha", NoteColor::Pink);
    store.create("beta\nsecond line", NoteColor::Green);

    let exported = store.export_all().unwrap();
    assert!(exported.starts_with("[\n  {"));
    assert!(exported.contains("\"createdAt\": 123"));

    let decoded: Vec<Note> = serde_json::from_str(&exported).unwrap();
    assert_eq!(decoded, store.notes());
}

#[test]
fn exported_file_imports_into_empty_store() {
    let clock = ManualClock::new(0);
    let mut source = open(&clock);
    source.create("carry me", NoteColor::Blue);
    source.create("and me", NoteColor::Yellow);
    let exported = source.export_all().unwrap();

    let mut target = open(&clock);
    let report = target.import_json(&exported).unwrap();
    assert_eq!(report.added, 2);
    assert_eq!(target.notes(), source.notes());

    let again = target.import_json(&exported).unwrap();
    assert_eq!(again, ImportReport { added: 0, skipped: 2 });
}
