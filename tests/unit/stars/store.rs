use super::*;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "nocturne_{}_{}_{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn rows() -> Vec<Star> {
    vec![
        Star::new(3, 2, "c"),
        Star::new(1, 2, "b"),
        Star::new(9, 0, "a"),
        Star::new(0, 5, "d"),
    ]
}

fn exercise(store: &mut dyn RowStore) {
    store.ensure_schema().unwrap();
    store.ensure_schema().unwrap();
    assert_eq!(store.count().unwrap(), 0);

    assert!(seed_if_empty(store, &rows()).unwrap());
    assert!(!seed_if_empty(store, &rows()).unwrap());
    assert_eq!(store.count().unwrap(), 4);

    let symbols: Vec<String> = store
        .fetch_ordered()
        .unwrap()
        .into_iter()
        .map(|s| s.symbol)
        .collect();
    assert_eq!(symbols, vec!["a", "b", "c", "d"]);

    store.truncate().unwrap();
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn memory_store_round_trip() {
    exercise(&mut MemoryRowStore::new());
}

#[test]
fn memory_store_requires_schema() {
    let store = MemoryRowStore::new();
    let err = store.count().unwrap_err();
    assert!(err.to_string().starts_with("store error:"), "{err}");
}

#[test]
fn json_store_round_trip_and_persists() {
    let dir = temp_path("json_store");
    let path = dir.join("nested").join("stars.json");

    let mut store = JsonRowStore::new(&path);
    exercise(&mut store);
    store.insert_many(&rows()).unwrap();

    let reopened = JsonRowStore::new(&path);
    assert_eq!(reopened.count().unwrap(), 4);
    assert_eq!(reopened.fetch_ordered().unwrap()[0], Star::new(9, 0, "a"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn json_store_rejects_garbage() {
    let dir = temp_path("json_garbage");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("stars.json");
    std::fs::write(&path, b"not json").unwrap();

    let mut store = JsonRowStore::new(&path);
    let err = store.ensure_schema().unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"), "{err}");

    std::fs::write(&path, br#"{"version": 99, "rows": []}"#).unwrap();
    let err = store.ensure_schema().unwrap_err();
    assert!(err.to_string().contains("unsupported table version"), "{err}");

    std::fs::remove_dir_all(&dir).ok();
}
