//! Where the site document comes from at start-up.
//!
//! Loading walks an ordered [`LoadPolicy`]. Each [`LoadStep`] either yields a
//! document or reports itself unavailable, and the first document wins. The
//! default order is local cache, then the bundled baseline, then the
//! hardcoded fallback, which never fails.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{document::SiteDocument, storage::LocalStorage};

#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    #[error("failed to fetch baseline ({url}): {error}")]
    Fetch { error: reqwest::Error, url: url::Url },
    #[error("baseline request returned {status} ({url})")]
    Status {
        status: reqwest::StatusCode,
        url: url::Url,
    },
    #[error("failed to read baseline file ({path}): {error}")]
    ReadFile {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse baseline document: {0}")]
    Parse(serde_json::Error),
    #[error("no baseline source configured")]
    NotConfigured,
}

/// The static JSON document shipped with the site.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BaselineSource {
    Url(url::Url),
    Path(PathBuf),
}

impl BaselineSource {
    pub async fn fetch(&self) -> Result<SiteDocument, BaselineError> {
        let body = match self {
            BaselineSource::Url(url) => {
                let response = reqwest::Client::new()
                    .get(url.clone())
                    .header("Accept", "application/json")
                    .send()
                    .await
                    .map_err(|error| BaselineError::Fetch {
                        error,
                        url: url.clone(),
                    })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(BaselineError::Status {
                        status,
                        url: url.clone(),
                    });
                }
                response.text().await.map_err(|error| BaselineError::Fetch {
                    error,
                    url: url.clone(),
                })?
            }
            BaselineSource::Path(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|error| BaselineError::ReadFile {
                    error,
                    path: path.clone(),
                })?,
        };
        serde_json::from_str(&body).map_err(BaselineError::Parse)
    }
}

impl std::fmt::Display for BaselineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaselineSource::Url(url) => write!(f, "{url}"),
            BaselineSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStep {
    /// The document previously persisted under the storage key.
    LocalCache,
    Baseline(BaselineSource),
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    LocalCache,
    Baseline,
    Fallback,
}

#[derive(Debug)]
pub struct Loaded {
    pub document: SiteDocument,
    pub origin: Origin,
}

impl Loaded {
    /// Whatever did not come from the cache is written back to it, so the
    /// next start finds it there.
    pub fn needs_persist(&self) -> bool {
        self.origin != Origin::LocalCache
    }
}

impl LoadStep {
    pub async fn attempt<S: LocalStorage>(&self, storage: &S, key: &str) -> Option<Loaded> {
        match self {
            LoadStep::LocalCache => {
                let saved = match storage.get_item(key).await {
                    Ok(Some(saved)) => saved,
                    Ok(None) => {
                        debug!(%key, "nothing cached");
                        return None;
                    }
                    Err(error) => {
                        warn!(%error, %key, "failed to read cached document");
                        return None;
                    }
                };
                match serde_json::from_str(&saved) {
                    Ok(document) => Some(Loaded {
                        document,
                        origin: Origin::LocalCache,
                    }),
                    Err(error) => {
                        warn!(%error, %key, "cached document is malformed; ignoring it");
                        None
                    }
                }
            }
            LoadStep::Baseline(source) => match source.fetch().await {
                Ok(document) => Some(Loaded {
                    document,
                    origin: Origin::Baseline,
                }),
                Err(error) => {
                    warn!(%error, %source, "baseline document unavailable");
                    None
                }
            },
            LoadStep::Fallback => Some(Loaded {
                document: SiteDocument::fallback(),
                origin: Origin::Fallback,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPolicy {
    steps: Vec<LoadStep>,
}

impl LoadPolicy {
    pub fn new(baseline: Option<BaselineSource>) -> Self {
        let mut steps = vec![LoadStep::LocalCache];
        steps.extend(baseline.map(LoadStep::Baseline));
        steps.push(LoadStep::Fallback);
        Self { steps }
    }

    /// Uses `steps` in the given order. A trailing [`LoadStep::Fallback`] is
    /// appended when missing, so running the policy always produces a document.
    pub fn from_steps(steps: impl IntoIterator<Item = LoadStep>) -> Self {
        let mut steps = steps.into_iter().collect::<Vec<_>>();
        if steps.last() != Some(&LoadStep::Fallback) {
            steps.push(LoadStep::Fallback);
        }
        Self { steps }
    }

    pub fn steps(&self) -> &[LoadStep] {
        &self.steps
    }

    pub fn baseline(&self) -> Option<&BaselineSource> {
        self.steps.iter().find_map(|step| match step {
            LoadStep::Baseline(source) => Some(source),
            _ => None,
        })
    }

    pub async fn run<S: LocalStorage>(&self, storage: &S, key: &str) -> Loaded {
        for step in &self.steps {
            if let Some(loaded) = step.attempt(storage, key).await {
                info!(origin = ?loaded.origin, %key, "site document loaded");
                return loaded;
            }
        }
        Loaded {
            document: SiteDocument::fallback(),
            origin: Origin::Fallback,
        }
    }
}

impl Default for LoadPolicy {
    fn default() -> Self {
        Self::new(None)
    }
}
