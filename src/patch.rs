//! Partial updates and new-entity drafts.
//!
//! Every store mutation goes through [`Patch::apply`], which produces a new
//! value from the old one: fields present in the patch override, everything
//! else is carried over. Nested values (such as [`Hours`]) are replaced as a
//! whole, never merged.

use serde::Deserialize;

use crate::document::{Category, Contact, HeroSection, Hours, Product};

pub trait Patch<T> {
    fn apply(&self, base: &T) -> T;
}

fn pick<V: Clone>(patch: &Option<V>, base: &V) -> V {
    patch.as_ref().unwrap_or(base).clone()
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeroPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub background_image: Option<String>,
}

impl Patch<HeroSection> for HeroPatch {
    fn apply(&self, base: &HeroSection) -> HeroSection {
        HeroSection {
            title: pick(&self.title, &base.title),
            subtitle: pick(&self.subtitle, &base.subtitle),
            background_image: pick(&self.background_image, &base.background_image),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContactPatch {
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub hours: Option<Hours>,
}

impl Patch<Contact> for ContactPatch {
    fn apply(&self, base: &Contact) -> Contact {
        Contact {
            address: pick(&self.address, &base.address),
            phone: pick(&self.phone, &base.phone),
            email: pick(&self.email, &base.email),
            hours: pick(&self.hours, &base.hours),
        }
    }
}

/// Updates a category's own fields. Its id and product list are not patchable.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub items: Option<Vec<String>>,
}

impl Patch<Category> for CategoryPatch {
    fn apply(&self, base: &Category) -> Category {
        Category {
            id: base.id.clone(),
            title: pick(&self.title, &base.title),
            description: pick(&self.description, &base.description),
            image: pick(&self.image, &base.image),
            items: pick(&self.items, &base.items),
            products: base.products.clone(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub detailed_description: Option<String>,
    pub images: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub origin: Option<String>,
    pub weight: Option<String>,
    pub price_per_kg: Option<String>,
}

impl Patch<Product> for ProductPatch {
    fn apply(&self, base: &Product) -> Product {
        Product {
            id: base.id.clone(),
            name: pick(&self.name, &base.name),
            description: pick(&self.description, &base.description),
            detailed_description: pick(&self.detailed_description, &base.detailed_description),
            images: pick(&self.images, &base.images),
            kind: pick(&self.kind, &base.kind),
            origin: pick(&self.origin, &base.origin),
            weight: pick(&self.weight, &base.weight),
            price_per_kg: pick(&self.price_per_kg, &base.price_per_kg),
            category_id: base.category_id.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

fn require(value: &str, field: &'static str) -> Result<(), DraftError> {
    if value.trim().is_empty() {
        Err(DraftError::MissingField(field))
    } else {
        Ok(())
    }
}

/// A category before it has been given an id.
///
/// Products listed here are adopted as-is; the store re-stamps their
/// `categoryId` and replaces ids already taken in the document.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCategory {
    pub title: String,
    pub description: String,
    pub image: String,
    pub items: Vec<String>,
    pub products: Vec<Product>,
}

impl NewCategory {
    /// Admin-form rule: title and description are mandatory.
    pub fn validate(&self) -> Result<(), DraftError> {
        require(&self.title, "title")?;
        require(&self.description, "description")
    }

    pub(crate) fn into_category(self, id: String) -> Category {
        Category {
            id,
            title: self.title,
            description: self.description,
            image: self.image,
            items: self.items,
            products: self.products,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub detailed_description: String,
    pub images: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub origin: String,
    pub weight: String,
    pub price_per_kg: String,
}

impl NewProduct {
    /// Admin-form rule: name and description are mandatory, blank image
    /// entries are dropped.
    pub fn validate(mut self) -> Result<Self, DraftError> {
        require(&self.name, "name")?;
        require(&self.description, "description")?;
        self.images.retain(|image| !image.trim().is_empty());
        Ok(self)
    }

    pub(crate) fn into_product(self, id: String, category_id: String) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            detailed_description: self.detailed_description,
            images: self.images,
            kind: self.kind,
            origin: self.origin,
            weight: self.weight,
            price_per_kg: self.price_per_kg,
            category_id,
        }
    }
}
