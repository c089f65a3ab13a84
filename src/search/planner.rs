//! Query variant fan-out
//!
//! One raw query becomes up to four variants: the raw text, its normalized
//! form and both transliteration directions. Each variant is matched
//! independently and the merger keeps the best score per document, so the
//! order here only fixes determinism, not ranking.

use super::translit::{cyr_to_lat, lat_to_cyr, normalize};

/// Expand a raw query into deduplicated variants, in a fixed order.
pub fn plan(raw: &str) -> Vec<String> {
    let mut variants = Vec::with_capacity(4);
    for candidate in [
        raw.to_string(),
        normalize(raw),
        lat_to_cyr(raw),
        cyr_to_lat(raw),
    ] {
        if !candidate.is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_query_fans_out() {
        let variants = plan("aceton");
        // raw == normalized == cyr_to_lat here; lat_to_cyr differs
        assert_eq!(variants, vec!["aceton".to_string(), "акетон".to_string()]);
    }

    #[test]
    fn test_cyrillic_query_fans_out() {
        let variants = plan("Ацетон");
        assert_eq!(
            variants,
            vec![
                "Ацетон".to_string(),
                "ацетон".to_string(),
                "atseton".to_string(),
            ]
        );
    }

    #[test]
    fn test_registry_number_collapses_to_one() {
        // digits and hyphens survive every transform unchanged
        assert_eq!(plan("67-64-1"), vec!["67-64-1".to_string()]);
    }

    #[test]
    fn test_empty_variants_dropped() {
        assert!(plan("").is_empty());
        // symbols outside every table normalize to nothing but keep the raw
        let variants = plan("§§");
        assert_eq!(variants, vec!["§§".to_string()]);
    }

    #[test]
    fn test_order_is_deterministic() {
        assert_eq!(plan("Khimiya"), plan("Khimiya"));
    }
}
