//! Search index: corpus + matcher, built once, queried read-only
//!
//! `search` runs the matcher once per query variant, merges hits by
//! document keeping the best (lowest) score, promotes exact registry-number
//! matches, then sorts and truncates. The whole call is a pure function of
//! (corpus, query, limit); concurrent readers need no locking. A catalog
//! reload builds a fresh `SearchIndex` and swaps it through `SharedIndex`.

use super::doc::{build_docs, SearchDoc};
use super::matcher::{FieldMatcher, MatchConfig};
use super::planner::plan;
use super::translit::normalize;
use crate::catalog::Category;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};
use tracing::debug;

/// Score multiplier for an exact registry-number hit. Strong promotion
/// toward the front; never turns a nonzero score into a literal zero.
const CAS_BOOST: f64 = 0.2;

fn cas_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,7}-\d{2}-\d$").expect("registry-number pattern is valid"))
}

/// Does the text have the exact shape of a CAS registry number?
pub fn is_registry_number(text: &str) -> bool {
    cas_pattern().is_match(text)
}

/// One ranked result; `score` is 0 for perfect, lower is better
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit<'a> {
    pub doc: &'a SearchDoc,
    pub score: f64,
}

pub struct SearchIndex {
    docs: Vec<SearchDoc>,
    matcher: FieldMatcher,
}

impl SearchIndex {
    /// Build the corpus and matcher from catalog source records.
    pub fn build(categories: &[Category]) -> Self {
        Self::with_config(categories, MatchConfig::default())
    }

    pub fn with_config(categories: &[Category], config: MatchConfig) -> Self {
        let docs = build_docs(categories);
        let matcher = FieldMatcher::new(&docs, config);
        debug!("Built search index over {} documents", docs.len());
        Self { docs, matcher }
    }

    pub fn docs(&self) -> &[SearchDoc] {
        &self.docs
    }

    /// Rank documents against a raw user query.
    ///
    /// Empty/whitespace queries and `limit == 0` yield an empty list, never
    /// an error; arbitrary Unicode is accepted.
    pub fn search(&self, raw_query: &str, limit: usize) -> Vec<SearchHit<'_>> {
        let query = raw_query.trim();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let variants = plan(query);
        debug!(query, variants = variants.len(), "planned query");

        // best (lowest) score per document across all variants
        let mut best: HashMap<usize, f64> = HashMap::new();
        for variant in &variants {
            let exact_code = is_registry_number(variant);
            let variant_norm = exact_code.then(|| normalize(variant));

            for candidate in self.matcher.matches(variant, limit.saturating_mul(2)) {
                let mut score = candidate.score;
                if let (Some(vn), Some(cas)) =
                    (variant_norm.as_deref(), self.docs[candidate.doc].cas.as_deref())
                {
                    if normalize(cas) == vn {
                        score *= CAS_BOOST;
                    }
                }
                best.entry(candidate.doc)
                    .and_modify(|s| *s = s.min(score))
                    .or_insert(score);
            }
        }

        // emit in corpus order so the stable sort breaks ties by document order
        let mut hits: Vec<SearchHit<'_>> = self
            .docs
            .iter()
            .enumerate()
            .filter_map(|(idx, doc)| best.get(&idx).map(|&score| SearchHit { doc, score }))
            .collect();
        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits.truncate(limit);
        hits
    }
}

/// Shared handle for the reload contract: readers take an `Arc` snapshot,
/// reloads build a whole new index and swap the reference. In-flight
/// queries finish against the old corpus; nobody observes a partial build.
pub struct SharedIndex {
    inner: RwLock<Arc<SearchIndex>>,
}

impl SharedIndex {
    pub fn new(index: SearchIndex) -> Self {
        Self {
            inner: RwLock::new(Arc::new(index)),
        }
    }

    pub fn current(&self) -> Arc<SearchIndex> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn swap(&self, fresh: SearchIndex) {
        let fresh = Arc::new(fresh);
        match self.inner.write() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
    }

    /// Rebuild from changed catalog records and publish atomically.
    pub fn reload(&self, categories: &[Category]) {
        self.swap(SearchIndex::build(categories));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category, Offer, Product};

    fn product(id: &str, title: &str, cas: Option<&str>) -> Product {
        Product {
            id: id.to_string(),
            title: title.to_string(),
            cas: cas.map(str::to_string),
            purity: None,
            volume: None,
            image: None,
            tags: Vec::new(),
            hazards: Vec::new(),
            documents: Vec::new(),
            offers: vec![Offer {
                seller: "ZetaChem".to_string(),
                price: 100.0,
                currency: None,
                pack: None,
                qty: None,
                lead_time: None,
                availability: Default::default(),
            }],
        }
    }

    fn category(slug: &str, title: &str, products: Vec<Product>) -> Category {
        Category {
            slug: slug.to_string(),
            title: title.to_string(),
            desc: String::new(),
            products,
        }
    }

    fn lab_index() -> SearchIndex {
        SearchIndex::build(&[category(
            "lab",
            "Лабораторная химия",
            vec![
                product("acetone", "Ацетон", Some("67-64-1")),
                product("ethanol", "Этанол", Some("64-17-5")),
                product("toluene", "Толуол", Some("108-88-3")),
            ],
        )])
    }

    #[test]
    fn test_empty_query_returns_empty() {
        let index = lab_index();
        assert!(index.search("", 5).is_empty());
        assert!(index.search("   ", 5).is_empty());
    }

    #[test]
    fn test_zero_limit_returns_empty() {
        let index = lab_index();
        assert!(index.search("ацетон", 0).is_empty());
    }

    #[test]
    fn test_limit_respected() {
        let index = lab_index();
        for n in 0..4 {
            assert!(index.search("химия", n).len() <= n);
        }
    }

    #[test]
    fn test_determinism() {
        let index = lab_index();
        let a: Vec<(String, f64)> = index
            .search("etanol", 5)
            .iter()
            .map(|h| (h.doc.id.clone(), h.score))
            .collect();
        let b: Vec<(String, f64)> = index
            .search("etanol", 5)
            .iter()
            .map(|h| (h.doc.id.clone(), h.score))
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_exact_registry_number_promoted_first() {
        let index = lab_index();
        let hits = index.search("67-64-1", 5);
        assert!(!hits.is_empty());
        assert_eq!(hits[0].doc.id, "prod:acetone");
        // strictly ahead of any fuzzy hit in the same list
        for other in &hits[1..] {
            assert!(hits[0].score < other.score);
        }
    }

    #[test]
    fn test_cross_script_retrieval() {
        // Latin query reaches the Cyrillic-titled product through
        // transliteration-derived synonyms
        let index = lab_index();
        let hits = index.search("aceton", 5);
        assert!(hits.iter().any(|h| h.doc.id == "prod:acetone"));
    }

    #[test]
    fn test_short_query_matches_nothing() {
        let index = lab_index();
        assert!(index.search("a", 5).is_empty());
    }

    #[test]
    fn test_dedup_across_variants_keeps_best_score() {
        let index = SearchIndex::build(&[category(
            "lab",
            "Лабораторная химия",
            vec![product("ethanol", "Этанол", Some("64-17-5"))],
        )]);
        let hits = index.search("etanol", 10);
        let matching: Vec<_> = hits
            .iter()
            .filter(|h| h.doc.id == "prod:ethanol")
            .collect();
        // several variants hit the document; exactly one entry survives
        assert_eq!(matching.len(), 1);

        // and its score equals the minimum over the individual variants
        let min_variant_score = plan("etanol")
            .iter()
            .flat_map(|v| index.matcher.matches(v, 20))
            .filter(|c| index.docs[c.doc].id == "prod:ethanol")
            .map(|c| c.score)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(matching[0].score, min_variant_score);
    }

    #[test]
    fn test_category_vs_product_mixing() {
        let index = SearchIndex::build(&[
            category("lab", "Лабораторная химия", vec![product("acetone", "Ацетон", None)]),
        ]);
        let hits = index.search("хим", 10);
        assert!(hits.iter().any(|h| h.doc.id == "cat:lab"));
        assert!(!hits.iter().any(|h| h.doc.id == "prod:acetone"));
    }

    #[test]
    fn test_seller_query_finds_products() {
        let index = lab_index();
        let hits = index.search("zetachem", 10);
        assert!(hits.iter().any(|h| h.doc.id == "prod:acetone"));
    }

    #[test]
    fn test_is_registry_number() {
        assert!(is_registry_number("67-64-1"));
        assert!(is_registry_number("7732-18-5"));
        assert!(!is_registry_number("67-64-12"));
        assert!(!is_registry_number("67_64_1"));
        assert!(!is_registry_number("aceton"));
        assert!(!is_registry_number(""));
    }

    #[test]
    fn test_shared_index_swap() {
        let shared = SharedIndex::new(lab_index());
        let before = shared.current();
        assert!(!before.search("ацетон", 5).is_empty());

        shared.reload(&[category("empty", "Пусто", Vec::new())]);
        // old snapshot still answers against the stale corpus
        assert!(!before.search("ацетон", 5).is_empty());
        // new snapshot sees the new corpus
        assert!(shared.current().search("ацетон", 5).is_empty());
    }

    #[test]
    fn test_demo_catalog_end_to_end() {
        let catalog = Catalog::demo();
        let index = SearchIndex::build(&catalog.categories);
        let hits = index.search("растворитель", 5);
        assert_eq!(hits[0].doc.id, "prod:solvent-646");
    }
}
