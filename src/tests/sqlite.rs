use crate::{
    ContentStore,
    load::Origin,
    storage::{LocalStorage, SqliteStorage},
};

use super::{KEY, category, fixture, options};

#[tokio::test]
async fn get_set_remove() {
    let storage = SqliteStorage::open("sqlite::memory:").await.unwrap();
    assert_eq!(storage.get_item(KEY).await.unwrap(), None);

    storage.set_item(KEY, "first").await.unwrap();
    storage.set_item(KEY, "second").await.unwrap();
    assert_eq!(storage.get_item(KEY).await.unwrap().as_deref(), Some("second"));

    storage.remove_item(KEY).await.unwrap();
    assert_eq!(storage.get_item(KEY).await.unwrap(), None);
}

#[tokio::test]
async fn closed_storage_reports_error() {
    let storage = SqliteStorage::open("sqlite::memory:").await.unwrap();
    storage.close().await;
    assert!(storage.get_item(KEY).await.is_err());
}

#[tokio::test]
async fn store_survives_reopen() {
    let storage = SqliteStorage::open("sqlite::memory:").await.unwrap();
    let mut store = ContentStore::init(storage, options(Some(fixture("data.json")))).await;
    let id = store.add_category(category("Plats")).await.unwrap();
    let storage = store.dispose();

    let store = ContentStore::init(storage, options(Some(fixture("minimal.json")))).await;
    assert_eq!(store.origin(), Some(Origin::LocalCache));
    assert_eq!(store.categories().len(), 3);
    assert!(store.category(&id).is_some());
}

#[tokio::test]
async fn persist_failure_keeps_document_in_memory() {
    let storage = SqliteStorage::open("sqlite::memory:").await.unwrap();
    let mut store = ContentStore::init(storage.clone(), options(Some(fixture("data.json")))).await;
    storage.close().await;

    let id = store.add_category(category("Plats")).await.unwrap();
    assert!(store.category(&id).is_some());
    assert!(store.has_unsaved_changes());
}
