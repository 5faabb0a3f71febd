use std::path::PathBuf;

use serde::Deserialize;

use crate::{
    load::{BaselineSource, LoadPolicy},
    store::{DEFAULT_STORAGE_KEY, StoreOptions},
};

fn default_storage() -> String {
    "sqlite://boucherie.db".into()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.into()
}

fn default_baseline() -> Option<BaselineSource> {
    Some(BaselineSource::Path(PathBuf::from("public/data.json")))
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// SQLite URL of the on-device storage.
    #[serde(default = "default_storage")]
    pub storage: String,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// `null` disables the baseline step.
    #[serde(default = "default_baseline")]
    pub baseline: Option<BaselineSource>,
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            storage_key: default_storage_key(),
            baseline: default_baseline(),
            export_dir: default_export_dir(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.storage_key.trim().is_empty() {
            return Err("storage_key must not be empty".into());
        }
        if !self.storage.starts_with("sqlite:") {
            return Err(format!("unsupported storage url: {}", self.storage));
        }
        Ok(())
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            storage_key: self.storage_key.clone(),
            policy: LoadPolicy::new(self.baseline.clone()),
        }
    }
}
