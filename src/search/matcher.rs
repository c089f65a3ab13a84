//! Field-weighted approximate matching over the document collection
//!
//! Distances live on a normalized 0–1 scale where 0 is a perfect match.
//! Per field, the query is aligned against the field text with free start
//! and end in the text (location inside the field carries no penalty), and
//! the edit distance of the best alignment is divided by the query length.
//! Fields worse than `threshold` do not match. A document's score is the
//! product over its matched fields of `max(distance, ε) ^ weight`, so a hit
//! in a heavily weighted field pulls the score down hardest and an exact
//! hit drives it toward (but never exactly to) zero.

use super::doc::SearchDoc;
use unicode_normalization::UnicodeNormalization;

/// Relative contribution of each document field.
/// Registry numbers weigh most: exact-looking codes should dominate ranking.
#[derive(Debug, Clone)]
pub struct FieldWeights {
    pub title: f64,
    pub cas: f64,
    pub tags: f64,
    pub synonyms: f64,
    pub seller_names: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 0.55,
            cas: 0.9,
            tags: 0.2,
            synonyms: 0.35,
            seller_names: 0.15,
        }
    }
}

/// Matching tolerances. Empirically tuned defaults, overridable by callers.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub weights: FieldWeights,
    /// Accept fields up to this normalized distance (tolerates 1–2 typos)
    pub threshold: f64,
    /// Queries shorter than this never match
    pub min_query_chars: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: FieldWeights::default(),
            threshold: 0.42,
            min_query_chars: 2,
        }
    }
}

/// One candidate produced for a single query variant
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Index into the corpus
    pub doc: usize,
    pub score: f64,
}

/// Per-document field texts, pre-folded once at build time
struct DocFields {
    title: Vec<char>,
    cas: Option<Vec<char>>,
    tags: Vec<Vec<char>>,
    synonyms: Vec<Vec<char>>,
    seller_names: Vec<Vec<char>>,
}

/// Read-only matcher constructed once over the corpus
pub struct FieldMatcher {
    config: MatchConfig,
    fields: Vec<DocFields>,
}

fn fold(text: &str) -> Vec<char> {
    text.nfc().flat_map(char::to_lowercase).collect()
}

impl FieldMatcher {
    pub fn new(docs: &[SearchDoc], config: MatchConfig) -> Self {
        let fields = docs
            .iter()
            .map(|doc| DocFields {
                title: fold(&doc.title),
                cas: doc.cas.as_deref().map(fold),
                tags: doc.tags.iter().map(|t| fold(t)).collect(),
                synonyms: doc.synonyms.iter().map(|s| fold(s)).collect(),
                seller_names: doc.seller_names.iter().map(|s| fold(s)).collect(),
            })
            .collect();
        Self { config, fields }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Match one query variant against every document, returning up to `cap`
    /// candidates ordered best (lowest score) first. Ties keep corpus order.
    pub fn matches(&self, variant: &str, cap: usize) -> Vec<Candidate> {
        let needle = fold(variant);
        if needle.len() < self.config.min_query_chars {
            return Vec::new();
        }

        let mut candidates: Vec<Candidate> = self
            .fields
            .iter()
            .enumerate()
            .filter_map(|(idx, doc)| {
                self.score_doc(&needle, doc)
                    .map(|score| Candidate { doc: idx, score })
            })
            .collect();
        candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
        candidates.truncate(cap);
        candidates
    }

    fn score_doc(&self, needle: &[char], doc: &DocFields) -> Option<f64> {
        let w = &self.config.weights;
        let mut score = 1.0;
        let mut matched = false;

        let mut fold_in = |best: Option<f64>, weight: f64| {
            if let Some(distance) = best {
                matched = true;
                score *= distance.max(f64::EPSILON).powf(weight);
            }
        };

        fold_in(self.best_distance(needle, std::slice::from_ref(&doc.title)), w.title);
        if let Some(cas) = &doc.cas {
            fold_in(self.best_distance(needle, std::slice::from_ref(cas)), w.cas);
        }
        fold_in(self.best_distance(needle, &doc.tags), w.tags);
        fold_in(self.best_distance(needle, &doc.synonyms), w.synonyms);
        fold_in(self.best_distance(needle, &doc.seller_names), w.seller_names);

        matched.then_some(score)
    }

    /// Best normalized distance of the needle over a field's values,
    /// or None when every value is beyond the threshold.
    fn best_distance(&self, needle: &[char], values: &[Vec<char>]) -> Option<f64> {
        values
            .iter()
            .map(|value| {
                substring_distance(needle, value) as f64 / needle.len() as f64
            })
            .filter(|d| *d <= self.config.threshold)
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Edit distance of the best alignment of `needle` against any substring of
/// `haystack` (free leading and trailing haystack, standard unit costs).
/// A plain substring occurrence costs 0.
fn substring_distance(needle: &[char], haystack: &[char]) -> usize {
    if needle.is_empty() {
        return 0;
    }
    if haystack.is_empty() {
        return needle.len();
    }

    // two-row DP; row i = needle prefix length, free start in the haystack
    let mut prev: Vec<usize> = vec![0; haystack.len() + 1];
    let mut curr: Vec<usize> = vec![0; haystack.len() + 1];

    for (i, &nc) in needle.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &hc) in haystack.iter().enumerate() {
            let sub = prev[j] + usize::from(nc != hc);
            let del = prev[j + 1] + 1;
            let ins = curr[j] + 1;
            curr[j + 1] = sub.min(del).min(ins);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    // free end: best over all haystack positions
    prev.iter().copied().min().unwrap_or(needle.len())
}
