use quote_common::error::QuoteError;
use quote_common::quote::default_quotes;
use quote_common::storage::{FileStore, KeyValueStore, MemoryStore, StorageKey};
use quote_common::store::WriteStatus;
use quote_common::{Quote, QuoteStore};
use serde_json::json;
use std::sync::Arc;

/// Store whose writes always fail, reads return nothing.
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: StorageKey) -> Result<Option<String>, QuoteError> {
        Ok(None)
    }

    fn set(&self, _key: StorageKey, _value: &str) -> Result<(), QuoteError> {
        Err(QuoteError::Storage("quota exceeded".to_string()))
    }

    fn remove(&self, _key: StorageKey) -> Result<(), QuoteError> {
        Ok(())
    }
}

fn persisted(storage: &dyn KeyValueStore) -> Vec<Quote> {
    let raw = storage.get(StorageKey::Quotes).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn load_seeds_defaults_when_storage_is_empty() {
    let storage = Arc::new(MemoryStore::new());
    let store = QuoteStore::load(storage.clone());
    assert_eq!(store.all(), default_quotes().as_slice());
    assert_eq!(persisted(&*storage), default_quotes());
}

#[test]
fn load_fails_open_on_malformed_data() {
    let storage = Arc::new(MemoryStore::new());
    storage.set(StorageKey::Quotes, "{\"not\": \"a list\"}").unwrap();
    let store = QuoteStore::load(storage.clone());
    assert_eq!(store.all(), default_quotes().as_slice());

    storage
        .set(StorageKey::Quotes, r#"[{"text": "", "category": "x"}]"#)
        .unwrap();
    let store = QuoteStore::load(storage.clone());
    assert_eq!(store.len(), 2);
}

#[test]
fn load_fails_open_on_corrupted_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = FileStore::open(dir.path()).unwrap();
    std::fs::write(file.path_of(StorageKey::Quotes), "garbage").unwrap();

    let store = QuoteStore::load(Arc::new(file.clone()));
    assert_eq!(store.all(), default_quotes().as_slice());
    assert_eq!(persisted(&file), default_quotes());
}

#[test]
fn load_reads_previous_session() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStore::open(dir.path()).unwrap());
    let mut store = QuoteStore::load(storage.clone());
    store.add("Keep going", "Motivation").unwrap();

    let reopened = QuoteStore::load(Arc::new(FileStore::open(dir.path()).unwrap()));
    assert_eq!(reopened.len(), 3);
    assert_eq!(reopened.all()[2].text, "Keep going");
}

#[test]
fn add_grows_list_by_one_and_persists_verbatim() {
    let storage = Arc::new(MemoryStore::new());
    let mut store = QuoteStore::load(storage.clone());
    let before = store.len();

    let (quote, write) = store.add("Less is more", "Design").unwrap();
    assert!(write.is_persisted());
    assert_eq!(store.len(), before + 1);
    assert_eq!(quote, Quote::new("Less is more", "Design").unwrap());
    assert_eq!(persisted(&*storage).last(), Some(&quote));
}

#[test]
fn add_rejects_empty_fields_and_leaves_list_unchanged() {
    let storage = Arc::new(MemoryStore::new());
    let mut store = QuoteStore::load(storage.clone());
    let before = store.all().to_vec();

    assert!(matches!(store.add("", "x"), Err(QuoteError::Validation(_))));
    assert!(matches!(store.add("x", ""), Err(QuoteError::Validation(_))));
    assert!(matches!(store.add("  ", "x"), Err(QuoteError::Validation(_))));
    assert_eq!(store.all(), before.as_slice());
    assert_eq!(persisted(&*storage), before);
}

#[test]
fn add_keeps_quote_in_memory_when_write_fails() {
    let mut store = QuoteStore::load(Arc::new(ReadOnlyStore));
    let (_, write) = store.add("Offline", "Notes").unwrap();
    assert!(matches!(write, WriteStatus::MemoryOnly(QuoteError::Storage(_))));
    assert_eq!(store.all().last().map(|q| q.text.as_str()), Some("Offline"));
}

#[test]
fn import_batch_appends_only_well_formed_records() {
    let storage = Arc::new(MemoryStore::new());
    let mut store = QuoteStore::load(storage.clone());
    let before = store.len();

    let records = vec![
        json!({"text": "Carpe diem", "category": "Latin"}),
        json!({"text": "Missing category"}),
    ];
    let report = store.import_batch(&records).unwrap();
    assert_eq!(report.accepted, 1);
    assert_eq!(report.rejected, 1);
    assert_eq!(store.len(), before + 1);
    assert_eq!(store.all()[before].text, "Carpe diem");
    assert_eq!(persisted(&*storage).len(), before + 1);
}

#[test]
fn import_batch_without_valid_records_does_not_mutate() {
    let storage = Arc::new(MemoryStore::new());
    let mut store = QuoteStore::load(storage.clone());
    let before = store.all().to_vec();

    let records = vec![json!({"text": 1, "category": "x"}), json!(null)];
    assert!(matches!(
        store.import_batch(&records),
        Err(QuoteError::NoValidRecords)
    ));
    assert!(matches!(
        store.import_batch(&[]),
        Err(QuoteError::NoValidRecords)
    ));
    assert_eq!(store.all(), before.as_slice());
}

#[test]
fn merge_scenario_resolves_conflict_and_appends_new_text() {
    let storage = Arc::new(MemoryStore::new());
    let mut store = QuoteStore::empty(storage.clone());
    store.add("Believe in yourself", "Motivation").unwrap();

    let batch = vec![
        Quote::new("Believe in yourself", "Server").unwrap(),
        Quote::new("New Saying", "Server").unwrap(),
    ];
    let report = store.merge_remote(&batch);
    assert_eq!(report.conflicts_resolved, 1);
    assert_eq!(report.new_records, 1);
    assert!(report.write.unwrap().is_persisted());
    assert_eq!(store.all(), batch.as_slice());

    let again = store.merge_remote(&batch);
    assert!(!again.changed());
    assert_eq!(store.len(), 2);
}

#[test]
fn reload_picks_up_writes_from_another_handle() {
    let dir = tempfile::tempdir().unwrap();
    let mut daemon = QuoteStore::load(Arc::new(FileStore::open(dir.path()).unwrap()));
    let mut client = QuoteStore::load(Arc::new(FileStore::open(dir.path()).unwrap()));

    client.add("From the shell", "Notes").unwrap();
    daemon.reload().unwrap();
    assert_eq!(daemon.len(), 3);
}

#[test]
fn add_builds_on_list_merged_by_another_handle() {
    let dir = tempfile::tempdir().unwrap();
    let mut daemon = QuoteStore::load(Arc::new(FileStore::open(dir.path()).unwrap()));
    let mut shell = QuoteStore::load(Arc::new(FileStore::open(dir.path()).unwrap()));

    daemon.merge_remote(&[Quote::new("From server", "Server").unwrap()]);
    shell.add("From the shell", "Notes").unwrap();

    let reopened = QuoteStore::load(Arc::new(FileStore::open(dir.path()).unwrap()));
    let texts: Vec<&str> = reopened.all().iter().map(|q| q.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["Believe in yourself", "Patience is power", "From server", "From the shell"]
    );
    assert_eq!(shell.all(), reopened.all());
}

/// Serves a fixed saved list, refuses every write.
struct FrozenStore;

impl KeyValueStore for FrozenStore {
    fn get(&self, _key: StorageKey) -> Result<Option<String>, QuoteError> {
        Ok(Some(r#"[{"text": "Saved", "category": "Old"}]"#.to_string()))
    }

    fn set(&self, _key: StorageKey, _value: &str) -> Result<(), QuoteError> {
        Err(QuoteError::Storage("disk full".to_string()))
    }

    fn remove(&self, _key: StorageKey) -> Result<(), QuoteError> {
        Ok(())
    }
}

#[test]
fn unsaved_changes_survive_later_mutations() {
    let mut store = QuoteStore::load(Arc::new(FrozenStore));
    assert_eq!(store.len(), 1);

    store.add("First offline", "Notes").unwrap();
    store.add("Second offline", "Notes").unwrap();
    let texts: Vec<&str> = store.all().iter().map(|q| q.text.as_str()).collect();
    assert_eq!(texts, vec!["Saved", "First offline", "Second offline"]);
}
