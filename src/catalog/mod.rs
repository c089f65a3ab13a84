//! Catalog data model and loading
//!
//! Source records for the marketplace: categories containing products,
//! products carrying registry numbers (CAS), GHS hazard marks and per-seller
//! offers. The search corpus is built from these records; faceting (hazard
//! class, purity, supplier) happens caller-side over the same fields.

pub mod expand;
pub mod offers;
pub mod pricelist;

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

pub type ProductId = String;
pub type SellerId = String;

/// Stock status of a base catalog offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    InStock,
    Backorder,
}

impl Default for Availability {
    fn default() -> Self {
        Availability::InStock
    }
}

/// GHS hazard pictogram classes carried by a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hazard {
    Flammable,
    Toxic,
    Irritant,
    Environment,
}

/// Kind of attached product document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "MSDS")]
    Msds,
    #[serde(rename = "CoA")]
    CoA,
    #[serde(rename = "Spec")]
    SpecSheet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentLink {
    pub kind: DocumentKind,
    pub url: String,
}

/// One seller's offer for a product's base pack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub seller: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time: Option<String>,
    #[serde(default)]
    pub availability: Availability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hazards: Vec<Hazard>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentLink>,
    #[serde(default)]
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Seller directory entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub id: SellerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
}

/// The full catalog: an ordered list of categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

const DEMO_CATALOG_JSON: &str = include_str!("../../data/catalog.json");

impl Catalog {
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::NotFound(format!(
                "catalog file {}",
                path.display()
            )));
        }
        let text = fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&text)?;
        info!(
            "Loaded catalog from {}: {} categories, {} products",
            path.display(),
            catalog.categories.len(),
            catalog.product_count()
        );
        Ok(catalog)
    }

    /// The built-in demo catalog shipped with the binary.
    pub fn demo() -> Self {
        serde_json::from_str(DEMO_CATALOG_JSON).expect("embedded demo catalog is valid")
    }

    pub fn product_count(&self) -> usize {
        self.categories.iter().map(|c| c.products.len()).sum()
    }

    /// All products paired with their category, in catalog order.
    pub fn products(&self) -> impl Iterator<Item = (&Category, &Product)> {
        self.categories
            .iter()
            .flat_map(|c| c.products.iter().map(move |p| (c, p)))
    }

    pub fn find_category(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    pub fn find_product(&self, id: &str) -> Option<&Product> {
        self.products().map(|(_, p)| p).find(|p| p.id == id)
    }
}

/// Static seller directory (names shown to buyers, contacts for checkout)
pub fn seller_directory() -> Vec<Seller> {
    vec![
        Seller {
            id: "zetachem".to_string(),
            name: "ZetaChem".to_string(),
            email: Some("sales@zetachem.example".to_string()),
            phone: Some("+7 700 000-00-00".to_string()),
            telegram: Some("@zetachem_sales".to_string()),
        },
        Seller {
            id: "acma".to_string(),
            name: "Acm Acma Corp".to_string(),
            email: Some("b2b@acma.example".to_string()),
            phone: None,
            telegram: None,
        },
        Seller {
            id: "vialabs".to_string(),
            name: "Vialabs".to_string(),
            email: Some("orders@vialabs.example".to_string()),
            phone: Some("+7 701 111-11-11".to_string()),
            telegram: None,
        },
        Seller {
            id: "synthoria".to_string(),
            name: "SYNTHORIA".to_string(),
            email: Some("deal@synthoria.example".to_string()),
            phone: None,
            telegram: Some("@synthoria_deals".to_string()),
        },
    ]
}
