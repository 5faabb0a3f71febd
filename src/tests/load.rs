use crate::{
    ContentStore, SiteDocument, StoreOptions,
    load::{BaselineSource, LoadPolicy, LoadStep, Origin},
    storage::{LocalStorage, MemoryStorage},
};

use super::{KEY, fixture, options};

#[tokio::test]
async fn baseline_seeds_empty_storage() {
    let storage = MemoryStorage::new();
    let store = ContentStore::init(storage.clone(), options(Some(fixture("minimal.json")))).await;

    assert!(!store.loading());
    assert!(store.categories().is_empty());
    assert_eq!(store.site_data().unwrap().hero_section.title, "T");
    assert_eq!(store.origin(), Some(Origin::Baseline));
    assert!(!store.has_unsaved_changes());

    let cached = storage.get_item(KEY).await.unwrap().unwrap();
    let cached: SiteDocument = serde_json::from_str(&cached).unwrap();
    assert_eq!(&cached, store.site_data().unwrap());
}

#[tokio::test]
async fn cache_takes_precedence_over_baseline() {
    let mut edited = SiteDocument::fallback();
    edited.hero_section.title = "Edited".into();
    let storage = MemoryStorage::with_item(KEY, serde_json::to_string(&edited).unwrap());

    let store = ContentStore::init(storage, options(Some(fixture("data.json")))).await;
    assert_eq!(store.origin(), Some(Origin::LocalCache));
    assert_eq!(store.site_data().unwrap(), &edited);
}

#[tokio::test]
async fn malformed_cache_falls_through_to_baseline() {
    let storage = MemoryStorage::with_item(KEY, "{\"heroSection\": ");
    let store = ContentStore::init(storage.clone(), options(Some(fixture("data.json")))).await;
    assert_eq!(store.origin(), Some(Origin::Baseline));
    assert_eq!(store.categories().len(), 2);

    let repaired: SiteDocument =
        serde_json::from_str(&storage.get_item(KEY).await.unwrap().unwrap()).unwrap();
    assert_eq!(repaired.categories.len(), 2);
}

#[tokio::test]
async fn unavailable_baseline_falls_back_to_default() {
    let storage = MemoryStorage::new();
    let store = ContentStore::init(
        storage.clone(),
        options(Some(fixture("missing.json"))),
    )
    .await;
    assert_eq!(store.origin(), Some(Origin::Fallback));
    assert_eq!(store.site_data().unwrap(), &SiteDocument::fallback());
    assert!(storage.get_item(KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn broken_baseline_falls_back_to_default() {
    let store = ContentStore::init(MemoryStorage::new(), options(Some(fixture("broken.json")))).await;
    assert_eq!(store.origin(), Some(Origin::Fallback));
    assert!(store.categories().is_empty());
    assert!(!store.site_data().unwrap().contact.phone.is_empty());
}

#[tokio::test]
async fn unreachable_baseline_url_falls_back_to_default() {
    let url = "http://127.0.0.1:9/data.json".parse().unwrap();
    let store = ContentStore::init(
        MemoryStorage::new(),
        options(Some(BaselineSource::Url(url))),
    )
    .await;
    assert_eq!(store.origin(), Some(Origin::Fallback));
}

#[tokio::test]
async fn policy_order_is_respected() {
    let mut cached = SiteDocument::fallback();
    cached.hero_section.title = "Cached".into();
    let storage = MemoryStorage::with_item(KEY, serde_json::to_string(&cached).unwrap());

    // Baseline first: the cached edit is ignored.
    let policy = LoadPolicy::from_steps([
        LoadStep::Baseline(fixture("minimal.json")),
        LoadStep::LocalCache,
    ]);
    assert_eq!(policy.steps().last(), Some(&LoadStep::Fallback));
    let loaded = policy.run(&storage, KEY).await;
    assert_eq!(loaded.origin, Origin::Baseline);
    assert_eq!(loaded.document.hero_section.title, "T");
}

#[tokio::test]
async fn load_runs_once() {
    let storage = MemoryStorage::new();
    let mut store = ContentStore::new(
        storage.clone(),
        StoreOptions {
            storage_key: KEY.into(),
            policy: LoadPolicy::new(Some(fixture("minimal.json"))),
        },
    );
    assert!(store.loading());
    store.load().await;
    assert!(!store.loading());

    storage
        .set_item(KEY, &serde_json::to_string(&SiteDocument::fallback()).unwrap())
        .await
        .unwrap();
    store.load().await;
    assert_eq!(store.site_data().unwrap().hero_section.title, "T");
}

#[tokio::test]
async fn reset_to_baseline_discards_cached_edits() {
    let mut cached = SiteDocument::fallback();
    cached.hero_section.title = "Stale".into();
    let storage = MemoryStorage::with_item(KEY, serde_json::to_string(&cached).unwrap());
    let mut store = ContentStore::init(storage.clone(), options(Some(fixture("data.json")))).await;
    assert_eq!(store.origin(), Some(Origin::LocalCache));

    store.reset_to_baseline().await.unwrap();
    assert_eq!(store.origin(), Some(Origin::Baseline));
    assert_eq!(store.site_data().unwrap().hero_section.title, "Boucherie Hidaya");
    assert!(!store.has_unsaved_changes());
    let saved: SiteDocument =
        serde_json::from_str(&storage.get_item(KEY).await.unwrap().unwrap()).unwrap();
    assert_eq!(&saved, store.site_data().unwrap());
}

#[tokio::test]
async fn reset_without_reachable_baseline_keeps_document() {
    let mut store = ContentStore::init(MemoryStorage::new(), options(Some(fixture("missing.json")))).await;
    let before = store.site_data().unwrap().clone();
    assert!(store.reset_to_baseline().await.is_err());
    assert_eq!(store.site_data().unwrap(), &before);

    let mut store = ContentStore::init(MemoryStorage::new(), options(None)).await;
    assert!(matches!(
        store.reset_to_baseline().await,
        Err(crate::Error::Baseline(crate::load::BaselineError::NotConfigured))
    ));
}
