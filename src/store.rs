//! The content store: single owner of the site document.
//!
//! A store starts out loading. [`ContentStore::load`] runs the load policy
//! once; until then reads see no document and mutations are ignored.
//!
//! Every mutation builds a new [`SiteDocument`] from the current one, swaps it
//! in, writes it to local storage right away and raises the unsaved-changes
//! flag. That flag is only lowered by [`ContentStore::save_all_changes`] or by
//! an import/reset, independently of what has been persisted.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use tracing::{debug, error, info, warn};

use crate::{
    Error,
    document::{Category, Contact, HeroSection, Product, Service, SiteDocument},
    load::{BaselineError, LoadPolicy, Origin},
    patch::{CategoryPatch, ContactPatch, HeroPatch, NewCategory, NewProduct, Patch, ProductPatch},
    storage::LocalStorage,
    transfer,
};

pub const DEFAULT_STORAGE_KEY: &str = "boucherie-site-data";

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub storage_key: String,
    pub policy: LoadPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.into(),
            policy: LoadPolicy::default(),
        }
    }
}

/// Whether a committed document counts as an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Commit {
    Edit,
    Reset,
}

pub struct ContentStore<S> {
    storage: S,
    options: StoreOptions,
    document: Option<SiteDocument>,
    origin: Option<Origin>,
    dirty: bool,
    last_id: u64,
}

impl<S: LocalStorage> ContentStore<S> {
    pub fn new(storage: S, options: StoreOptions) -> Self {
        Self {
            storage,
            options,
            document: None,
            origin: None,
            dirty: false,
            last_id: 0,
        }
    }

    /// Creates a store and loads it.
    pub async fn init(storage: S, options: StoreOptions) -> Self {
        let mut store = Self::new(storage, options);
        store.load().await;
        store
    }

    pub async fn load(&mut self) {
        if !self.loading() {
            warn!(key = %self.options.storage_key, "store already loaded");
            return;
        }
        let loaded = self
            .options
            .policy
            .run(&self.storage, &self.options.storage_key)
            .await;
        if loaded.needs_persist() {
            self.persist(&loaded.document).await;
        }
        self.origin = Some(loaded.origin);
        self.document = Some(loaded.document);
    }

    /// Hands back the storage. The persisted document stays where it is.
    pub fn dispose(self) -> S {
        self.storage
    }

    pub fn loading(&self) -> bool {
        self.document.is_none()
    }

    /// Where the current document was loaded from.
    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }

    pub fn site_data(&self) -> Option<&SiteDocument> {
        self.document.as_ref()
    }

    pub fn contact(&self) -> Option<&Contact> {
        self.document.as_ref().map(|document| &document.contact)
    }

    pub fn hero_section(&self) -> Option<&HeroSection> {
        self.document.as_ref().map(|document| &document.hero_section)
    }

    pub fn categories(&self) -> &[Category] {
        self.document
            .as_ref()
            .map(|document| document.categories.as_slice())
            .unwrap_or_default()
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.document.as_ref()?.category(id)
    }

    pub fn get_product_by_id(&self, id: &str) -> Option<&Product> {
        self.document.as_ref()?.product(id)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn storage_key(&self) -> &str {
        &self.options.storage_key
    }

    pub async fn update_hero_section(&mut self, patch: &HeroPatch) -> bool {
        self.mutate("update hero section", |document| SiteDocument {
            hero_section: patch.apply(&document.hero_section),
            ..document.clone()
        })
        .await
    }

    pub async fn update_contact(&mut self, patch: &ContactPatch) -> bool {
        self.mutate("update contact", |document| SiteDocument {
            contact: patch.apply(&document.contact),
            ..document.clone()
        })
        .await
    }

    pub async fn update_services(&mut self, services: Vec<Service>) -> bool {
        self.mutate("update services", |document| SiteDocument {
            services,
            ..document.clone()
        })
        .await
    }

    /// Returns the id given to the new category.
    pub async fn add_category(&mut self, draft: NewCategory) -> Option<String> {
        let document = self.document.as_ref()?;
        // Draft ids that survive are reserved before any fresh id is issued.
        let mut taken = HashSet::new();
        let keep = draft
            .products
            .iter()
            .map(|product| {
                !product.id.is_empty()
                    && !document.contains_id(&product.id)
                    && taken.insert(product.id.clone())
            })
            .collect::<Vec<_>>();
        let id = next_id(&mut self.last_id, |candidate| {
            document.contains_id(candidate) || taken.contains(candidate)
        });
        taken.insert(id.clone());
        let mut category = draft.into_category(id.clone());
        for (product, keep) in category.products.iter_mut().zip(keep) {
            if !keep {
                product.id = next_id(&mut self.last_id, |candidate| {
                    document.contains_id(candidate) || taken.contains(candidate)
                });
                taken.insert(product.id.clone());
            }
            product.category_id = id.clone();
        }
        self.mutate("add category", |document| {
            let mut categories = document.categories.clone();
            categories.push(category);
            SiteDocument {
                categories,
                ..document.clone()
            }
        })
        .await
        .then_some(id)
    }

    /// Returns `false` if no category has that id.
    pub async fn update_category(&mut self, id: &str, patch: &CategoryPatch) -> bool {
        if self.category(id).is_none() {
            debug!(%id, "update of unknown category ignored");
            return false;
        }
        self.mutate("update category", |document| SiteDocument {
            categories: document
                .categories
                .iter()
                .map(|category| {
                    if category.id == id {
                        patch.apply(category)
                    } else {
                        category.clone()
                    }
                })
                .collect(),
            ..document.clone()
        })
        .await
    }

    /// Removes the category together with all of its products.
    pub async fn delete_category(&mut self, id: &str) -> bool {
        if self.category(id).is_none() {
            debug!(%id, "delete of unknown category ignored");
            return false;
        }
        self.mutate("delete category", |document| SiteDocument {
            categories: document
                .categories
                .iter()
                .filter(|category| category.id != id)
                .cloned()
                .collect(),
            ..document.clone()
        })
        .await
    }

    /// Returns the id given to the new product, or `None` when the category
    /// does not exist.
    pub async fn add_product(&mut self, category_id: &str, draft: NewProduct) -> Option<String> {
        let document = self.document.as_ref()?;
        if document.category(category_id).is_none() {
            debug!(%category_id, "product added to unknown category ignored");
            return None;
        }
        let id = next_id(&mut self.last_id, |candidate| document.contains_id(candidate));
        let product = draft.into_product(id.clone(), category_id.to_string());
        self.mutate("add product", |document| SiteDocument {
            categories: document
                .categories
                .iter()
                .map(|category| {
                    if category.id == category_id {
                        let mut products = category.products.clone();
                        products.push(product.clone());
                        Category {
                            products,
                            ..category.clone()
                        }
                    } else {
                        category.clone()
                    }
                })
                .collect(),
            ..document.clone()
        })
        .await
        .then_some(id)
    }

    pub async fn update_product(&mut self, id: &str, patch: &ProductPatch) -> bool {
        if self.get_product_by_id(id).is_none() {
            debug!(%id, "update of unknown product ignored");
            return false;
        }
        self.mutate("update product", |document| SiteDocument {
            categories: document
                .categories
                .iter()
                .map(|category| Category {
                    products: category
                        .products
                        .iter()
                        .map(|product| {
                            if product.id == id {
                                patch.apply(product)
                            } else {
                                product.clone()
                            }
                        })
                        .collect(),
                    ..category.clone()
                })
                .collect(),
            ..document.clone()
        })
        .await
    }

    /// Removes the product from whichever category holds it. Unknown ids
    /// leave the document untouched.
    pub async fn delete_product(&mut self, id: &str) -> bool {
        if self.get_product_by_id(id).is_none() {
            debug!(%id, "delete of unknown product ignored");
            return false;
        }
        self.mutate("delete product", |document| SiteDocument {
            categories: document
                .categories
                .iter()
                .map(|category| Category {
                    products: category
                        .products
                        .iter()
                        .filter(|product| product.id != id)
                        .cloned()
                        .collect(),
                    ..category.clone()
                })
                .collect(),
            ..document.clone()
        })
        .await
    }

    /// Acknowledges pending edits. Data is already persisted by each mutation.
    pub fn save_all_changes(&mut self) {
        if self.dirty {
            info!("changes saved");
        }
        self.dirty = false;
    }

    pub fn export_data(&self) -> Result<&SiteDocument, Error> {
        self.document.as_ref().ok_or(Error::NothingToExport)
    }

    /// Writes the pretty-printed export to `dir`, named after today's date.
    pub async fn export_to_dir(&self, dir: &Path) -> Result<PathBuf, Error> {
        let document = self.export_data()?;
        let path = dir.join(transfer::export_file_name(chrono::Utc::now().date_naive()));
        let json = transfer::to_pretty_json(document).map_err(Error::Serialize)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|error| Error::WriteExport {
                path: path.clone(),
                error,
            })?;
        info!(path = %path.display(), "site document exported");
        Ok(path)
    }

    /// Replaces the whole document. Not counted as an edit.
    pub async fn import_data(&mut self, document: SiteDocument) -> Result<(), Error> {
        if self.loading() {
            return Err(Error::NotLoaded);
        }
        self.commit(document, Commit::Reset).await;
        info!("site document imported");
        Ok(())
    }

    /// Validates `text` before touching the store; on failure the current
    /// document is left as it was.
    pub async fn import_json(&mut self, text: &str) -> Result<(), Error> {
        let document = transfer::parse_import(text).map_err(Error::Import)?;
        self.import_data(document).await
    }

    /// Replaces the current document, cached edits included, with a fresh
    /// copy of the baseline document.
    pub async fn reset_to_baseline(&mut self) -> Result<(), Error> {
        if self.loading() {
            return Err(Error::NotLoaded);
        }
        let source = self
            .options
            .policy
            .baseline()
            .cloned()
            .ok_or_else(|| Error::Baseline(BaselineError::NotConfigured))?;
        let document = source.fetch().await.map_err(Error::Baseline)?;
        self.commit(document, Commit::Reset).await;
        self.origin = Some(Origin::Baseline);
        info!(%source, "site document reset to baseline");
        Ok(())
    }

    async fn mutate(
        &mut self,
        action: &'static str,
        produce: impl FnOnce(&SiteDocument) -> SiteDocument,
    ) -> bool {
        let Some(current) = self.document.as_ref() else {
            debug!(action, "store is loading; mutation ignored");
            return false;
        };
        let next = produce(current);
        debug!(action, "site document updated");
        self.commit(next, Commit::Edit).await;
        true
    }

    async fn commit(&mut self, next: SiteDocument, kind: Commit) {
        self.persist(&next).await;
        self.document = Some(next);
        self.dirty = kind == Commit::Edit;
    }

    /// Persist failures are logged; the in-memory document stays authoritative.
    async fn persist(&self, document: &SiteDocument) {
        let key = &self.options.storage_key;
        let json = match serde_json::to_string(document) {
            Ok(json) => json,
            Err(error) => {
                error!(%error, %key, "failed to serialize site document");
                return;
            }
        };
        if let Err(error) = self.storage.set_item(key, &json).await {
            error!(%error, %key, "failed to persist site document");
        }
    }
}

/// Millisecond timestamps, bumped past the last issued id and past any id
/// `taken` reports as in use.
fn next_id(last_id: &mut u64, taken: impl Fn(&str) -> bool) -> String {
    let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
    let mut candidate = now.max(*last_id + 1);
    while taken(&candidate.to_string()) {
        candidate += 1;
    }
    *last_id = candidate;
    candidate.to_string()
}
