//! Deterministic demo-catalog expansion
//!
//! Pads every category to a target SKU count by cloning its seed products
//! with an index suffix and an arithmetic variation of the trailing CAS
//! segment. Offers are cleared on clones: sellers publish their own prices.
//! Purely index-driven, so the same input always expands identically.

use super::{Catalog, Category, Product};

pub fn expand(catalog: &Catalog, per_category: usize) -> Catalog {
    let categories = catalog
        .categories
        .iter()
        .map(|cat| expand_category(cat, per_category))
        .collect();
    Catalog { categories }
}

fn expand_category(cat: &Category, per_category: usize) -> Category {
    let base = &cat.products;
    let mut products = base.clone();
    let mut i = 0;
    while products.len() < per_category && !base.is_empty() {
        products.push(clone_product(&base[i % base.len()], i));
        i += 1;
    }
    Category {
        products,
        ..cat.clone()
    }
}

fn clone_product(template: &Product, idx: usize) -> Product {
    Product {
        id: format!("{}__v{}", template.id, idx + 1),
        title: format!("{} –{:03}", template.title, idx + 1),
        cas: template.cas.as_deref().map(|cas| vary_cas(cas, idx)),
        offers: Vec::new(),
        ..template.clone()
    }
}

/// Bump the trailing digit run of a CAS-shaped code by `idx % 97`.
/// Codes without a trailing digit run pass through unchanged.
fn vary_cas(cas: &str, idx: usize) -> String {
    let tail_start = cas
        .rfind(|c: char| !c.is_ascii_digit())
        .map(|p| p + 1)
        .unwrap_or(0);
    let (head, tail) = cas.split_at(tail_start);
    match tail.parse::<u64>() {
        Ok(value) => format!("{}{}", head, value + (idx % 97) as u64),
        Err(_) => cas.to_string(),
    }
}
