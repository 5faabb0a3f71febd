pub mod config;
pub mod document;
pub mod image;
pub mod load;
pub mod patch;
pub mod storage;
pub mod store;
pub mod transfer;

#[cfg(test)]
mod tests;

pub use document::{Category, Contact, HeroSection, Hours, Product, Service, SiteDocument};
pub use store::{ContentStore, StoreOptions};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Nothing to export: the site document has not been loaded yet")]
    NothingToExport,
    #[error("Store is still loading")]
    NotLoaded,
    #[error("Baseline document unavailable: {0}")]
    Baseline(load::BaselineError),
    #[error("Invalid import payload: {0}")]
    Import(transfer::ImportError),
    #[error("Failed to serialize site document: {0}")]
    Serialize(serde_json::Error),
    #[error("Failed to write export file ({path}): {error}")]
    WriteExport {
        path: std::path::PathBuf,
        error: std::io::Error,
    },
}
