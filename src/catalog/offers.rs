//! Merged offer view: base catalog offers plus seller-local overrides
//!
//! A seller manages one offer per product in their own workspace; the
//! product page shows those merged with the catalog's base offers and a
//! distinct-seller count for the "N sellers" badge.

use super::{Offer, Product, ProductId, Seller, SellerId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Availability states a seller can publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OfferAvailability {
    InStock,
    Preorder,
    OutOfStock,
}

impl Default for OfferAvailability {
    fn default() -> Self {
        OfferAvailability::InStock
    }
}

/// Draft offers stay local; published offers join the merged view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishState {
    Draft,
    Published,
}

impl Default for PublishState {
    fn default() -> Self {
        PublishState::Published
    }
}

/// A seller's own offer for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerOffer {
    pub seller_id: SellerId,
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
    pub availability: OfferAvailability,
    #[serde(default)]
    pub state: PublishState,
}

/// One row of the merged per-product offer list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedOffer {
    pub seller: String,
    pub price: f64,
    pub currency: Option<String>,
    pub pack: Option<String>,
    pub qty: Option<u32>,
    pub lead_time: Option<String>,
}

impl From<&Offer> for MergedOffer {
    fn from(offer: &Offer) -> Self {
        Self {
            seller: offer.seller.clone(),
            price: offer.price,
            currency: offer.currency.clone(),
            pack: offer.pack.clone(),
            qty: offer.qty,
            lead_time: offer.lead_time.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedOffers {
    pub offers: Vec<MergedOffer>,
    pub seller_count: usize,
}

/// Merge a product's base offers with the seller's published override, if
/// any. Draft overrides stay invisible. The seller directory resolves ids
/// to display names; unknown ids fall back to the raw id.
pub fn merged_offers(
    product: &Product,
    overrides: &HashMap<ProductId, SellerOffer>,
    directory: &[Seller],
) -> MergedOffers {
    let mut offers: Vec<MergedOffer> = product.offers.iter().map(MergedOffer::from).collect();

    if let Some(mine) = overrides.get(&product.id) {
        if mine.state == PublishState::Published {
            let seller = directory
                .iter()
                .find(|s| s.id == mine.seller_id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| mine.seller_id.clone());
            offers.push(MergedOffer {
                seller,
                price: mine.price,
                currency: mine.currency.clone(),
                pack: mine.pack.clone(),
                qty: mine.qty,
                lead_time: mine.lead_time.clone(),
            });
        }
    }

    let seller_count = offers
        .iter()
        .map(|o| o.seller.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    MergedOffers {
        offers,
        seller_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{seller_directory, Catalog};

    fn my_offer(seller_id: &str, price: f64, state: PublishState) -> SellerOffer {
        SellerOffer {
            seller_id: seller_id.to_string(),
            price,
            currency: Some("₽".to_string()),
            pack: Some("1 л".to_string()),
            qty: Some(12),
            lead_time: Some("2–3 дня".to_string()),
            availability: OfferAvailability::InStock,
            state,
        }
    }

    #[test]
    fn test_base_offers_only() {
        let catalog = Catalog::demo();
        let sealant = catalog.find_product("sealant-300").unwrap();
        let merged = merged_offers(sealant, &HashMap::new(), &seller_directory());
        assert_eq!(merged.offers.len(), 4);
        assert_eq!(merged.seller_count, 4);
    }

    #[test]
    fn test_published_override_joins_and_counts_once() {
        let catalog = Catalog::demo();
        let acetone = catalog.find_product("acetone-lab").unwrap();
        let mut overrides = HashMap::new();
        overrides.insert(
            acetone.id.clone(),
            my_offer("vialabs", 1850.0, PublishState::Published),
        );

        let merged = merged_offers(acetone, &overrides, &seller_directory());
        assert_eq!(merged.offers.len(), 2);
        // base ZetaChem + Vialabs override = two distinct sellers
        assert_eq!(merged.seller_count, 2);
        assert!(merged.offers.iter().any(|o| o.seller == "Vialabs"));

        // same seller twice counts once
        overrides.insert(
            acetone.id.clone(),
            my_offer("zetachem", 1800.0, PublishState::Published),
        );
        let merged = merged_offers(acetone, &overrides, &seller_directory());
        assert_eq!(merged.offers.len(), 2);
        assert_eq!(merged.seller_count, 1);
    }

    #[test]
    fn test_draft_override_hidden() {
        let catalog = Catalog::demo();
        let acetone = catalog.find_product("acetone-lab").unwrap();
        let mut overrides = HashMap::new();
        overrides.insert(
            acetone.id.clone(),
            my_offer("vialabs", 1850.0, PublishState::Draft),
        );

        let merged = merged_offers(acetone, &overrides, &seller_directory());
        assert_eq!(merged.offers.len(), 1);
        assert_eq!(merged.seller_count, 1);
    }

    #[test]
    fn test_unknown_seller_id_falls_back_to_id() {
        let catalog = Catalog::demo();
        let acetone = catalog.find_product("acetone-lab").unwrap();
        let mut overrides = HashMap::new();
        overrides.insert(
            acetone.id.clone(),
            my_offer("newcomer", 1700.0, PublishState::Published),
        );

        let merged = merged_offers(acetone, &overrides, &seller_directory());
        assert!(merged.offers.iter().any(|o| o.seller == "newcomer"));
    }

    #[test]
    fn test_seller_offer_wire_format() {
        let offer: SellerOffer = serde_json::from_str(
            r#"{"sellerId":"vialabs","price":990,"leadTime":"5 дней","availability":"out-of-stock","state":"draft"}"#,
        )
        .unwrap();
        assert_eq!(offer.availability, OfferAvailability::OutOfStock);
        assert_eq!(offer.state, PublishState::Draft);
        assert_eq!(offer.lead_time.as_deref(), Some("5 дней"));
    }
}
