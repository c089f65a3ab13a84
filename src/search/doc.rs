//! Search documents and corpus construction
//!
//! Flattens the catalog into one immutable document per category and per
//! product. Product documents carry machine-generated synonyms (normalized
//! and transliterated titles) so a query typed in either script can land on
//! them. The corpus is rebuilt wholesale on catalog change, never mutated.

use super::translit::{cyr_to_lat, lat_to_cyr, normalize};
use crate::catalog::{Category, Product};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocKind {
    Product,
    Category,
}

/// Category fields carried in payloads (the product list is not duplicated
/// into every product document).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInfo {
    pub slug: String,
    pub title: String,
    pub desc: String,
}

impl From<&Category> for CategoryInfo {
    fn from(cat: &Category) -> Self {
        Self {
            slug: cat.slug.clone(),
            title: cat.title.clone(),
            desc: cat.desc.clone(),
        }
    }
}

/// Reference back to the source record, returned to the caller unmodified.
/// Callers pattern-match on the variant instead of probing for fields;
/// `Product` exposes `hazards`, `purity` and `offers[].seller` for
/// caller-side faceting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Payload {
    Product {
        product: Product,
        category: CategoryInfo,
    },
    Category {
        category: CategoryInfo,
    },
}

/// The unit indexed and returned by the search core
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchDoc {
    /// Unique within the corpus: `prod:<id>` or `cat:<slug>`
    pub id: String,
    pub kind: DocKind,
    pub title: String,
    /// Chemical registry number, `\d{1,7}-\d{2}-\d`, products only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cas: Option<String>,
    pub tags: BTreeSet<String>,
    /// Derived at build time: normalized title plus both transliterations
    pub synonyms: BTreeSet<String>,
    pub seller_names: BTreeSet<String>,
    pub payload: Payload,
}

/// Build the flat document collection from catalog source records.
/// Deterministic: identical input yields an identical document set.
pub fn build_docs(categories: &[Category]) -> Vec<SearchDoc> {
    let mut docs = Vec::new();
    for cat in categories {
        let info = CategoryInfo::from(cat);
        docs.push(SearchDoc {
            id: format!("cat:{}", cat.slug),
            kind: DocKind::Category,
            title: cat.title.clone(),
            cas: None,
            tags: BTreeSet::new(),
            synonyms: BTreeSet::new(),
            seller_names: BTreeSet::new(),
            payload: Payload::Category {
                category: info.clone(),
            },
        });
        for product in &cat.products {
            docs.push(product_doc(product, &info));
        }
    }
    docs
}

fn product_doc(product: &Product, category: &CategoryInfo) -> SearchDoc {
    let synonyms: BTreeSet<String> = [
        lat_to_cyr(&product.title),
        cyr_to_lat(&product.title),
        normalize(&product.title),
    ]
    .into_iter()
    .collect();

    let seller_names: BTreeSet<String> =
        product.offers.iter().map(|o| o.seller.clone()).collect();

    SearchDoc {
        id: format!("prod:{}", product.id),
        kind: DocKind::Product,
        title: product.title.clone(),
        cas: product.cas.clone(),
        tags: product.tags.iter().cloned().collect(),
        synonyms,
        seller_names,
        payload: Payload::Product {
            product: product.clone(),
            category: category.clone(),
        },
    }
}
