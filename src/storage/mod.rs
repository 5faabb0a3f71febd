//! Local device storage.
//!
//! The content store keeps exactly one entry here: the serialized site
//! document under its storage key. Anything that can get, set and remove a
//! string by key can back it.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] sqlx::Error),
    #[error("storage has been closed")]
    Closed,
}

pub trait LocalStorage {
    fn get_item(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, Error>> + Send;

    fn set_item(&self, key: &str, value: &str)
    -> impl Future<Output = Result<(), Error>> + Send;

    fn remove_item(&self, key: &str) -> impl Future<Output = Result<(), Error>> + Send;
}
