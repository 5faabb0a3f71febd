//! The site content tree.
//!
//! A [`SiteDocument`] is always held fully materialized. Nested values are
//! replaced, never edited in place, by the store (see [`crate::patch`]).

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SiteDocument {
    #[serde(alias = "hero")]
    pub hero_section: HeroSection,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub services: Vec<Service>,
    pub contact: Contact,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    /// Remote URL or embedded `data:` URL.
    pub background_image: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub items: Vec<String>,
    pub products: Vec<Product>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub detailed_description: String,
    pub images: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub origin: String,
    pub weight: String,
    pub price_per_kg: String,
    pub category_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub details: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub hours: Hours,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Hours {
    pub weekdays: String,
    pub saturday: String,
    pub sunday: String,
}

impl SiteDocument {
    /// Minimal document used when neither the local cache nor the baseline
    /// document can be read.
    pub fn fallback() -> Self {
        Self {
            hero_section: HeroSection {
                title: "Boucherie Hidaya".into(),
                subtitle: "Votre boucherie halal de confiance à Cugnaux".into(),
                background_image: String::new(),
            },
            categories: Vec::new(),
            services: Vec::new(),
            contact: Contact {
                address: "36 Avenue Georges Pompidou, 31270 Cugnaux, France".into(),
                phone: "05 61 86 54 42".into(),
                email: String::new(),
                hours: Hours {
                    weekdays: "Lun : 8h30-13h / Mar-Ven : 8h30-13h, 15h-19h30".into(),
                    saturday: "8h30-13h / 15h-19h30".into(),
                    sunday: "8h30-13h".into(),
                },
            },
        }
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Scans every category; product ids are unique across the document.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products().find(|product| product.id == id)
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.categories
            .iter()
            .flat_map(|category| category.products.iter())
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.category(id).is_some() || self.product(id).is_some()
    }
}
