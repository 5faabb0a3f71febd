use crate::{
    ContentStore, StoreOptions,
    load::{BaselineSource, LoadPolicy, LoadStep},
    patch::{NewCategory, NewProduct},
    storage::MemoryStorage,
};

mod load;
mod sqlite;

const KEY: &str = "boucherie-site-data";

fn fixture(name: &str) -> BaselineSource {
    BaselineSource::Path(format!("src/tests/fixtures/{name}").into())
}

fn options(baseline: Option<BaselineSource>) -> StoreOptions {
    StoreOptions {
        storage_key: KEY.into(),
        policy: LoadPolicy::new(baseline),
    }
}

/// A loaded store seeded with the bundled fixture catalog.
async fn seeded() -> (ContentStore<MemoryStorage>, MemoryStorage) {
    let storage = MemoryStorage::new();
    let store = ContentStore::init(storage.clone(), options(Some(fixture("data.json")))).await;
    (store, storage)
}

/// A loaded store with no categories.
async fn empty() -> ContentStore<MemoryStorage> {
    let policy = LoadPolicy::from_steps([LoadStep::Baseline(fixture("minimal.json"))]);
    ContentStore::init(
        MemoryStorage::new(),
        StoreOptions {
            storage_key: KEY.into(),
            policy,
        },
    )
    .await
}

fn category(title: &str) -> NewCategory {
    NewCategory {
        title: title.into(),
        description: format!("{title} description"),
        ..Default::default()
    }
}

fn product(name: &str) -> NewProduct {
    NewProduct {
        name: name.into(),
        description: format!("{name} description"),
        price_per_kg: "20€/kg".into(),
        ..Default::default()
    }
}
