//! Script normalization and Latin⇄Cyrillic transliteration
//!
//! `normalize` reduces arbitrary user text to a lowercase, allow-listed,
//! whitespace-collapsed form that is safe to compare across scripts.
//! `lat_to_cyr` and `cyr_to_lat` are independent, lossy, best-effort
//! approximations of pronunciation: round-tripping is not guaranteed and is
//! relied upon to produce several distinct query variants from one input.

use aho_corasick::{AhoCorasick, MatchKind};
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Multi-letter Latin sequences, tried before the single-character map.
/// Longest match wins ("sch" beats "sh" and "ch").
const LAT_DIGRAPHS: [&str; 8] = ["sch", "sh", "ch", "yo", "yu", "ya", "kh", "ts"];
const LAT_DIGRAPH_SUBS: [&str; 8] = ["щ", "ш", "ч", "ё", "ю", "я", "х", "ц"];

fn lat_digraph_matcher() -> &'static AhoCorasick {
    static MATCHER: OnceLock<AhoCorasick> = OnceLock::new();
    MATCHER.get_or_init(|| {
        AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(LAT_DIGRAPHS)
            .expect("digraph table is a valid pattern set")
    })
}

/// Normalize text for matching: lowercase, fold ё→е, drop the silent signs,
/// replace anything outside the allow-list (Latin, Cyrillic, digits,
/// whitespace, `-,./`) with a space and collapse whitespace runs.
///
/// Idempotent and total: never panics on any Unicode input.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.nfc().flat_map(char::to_lowercase) {
        let ch = if ch == 'ё' { 'е' } else { ch };
        if matches!(ch, 'ъ' | 'ь') {
            continue;
        }
        let allowed = ch.is_ascii_lowercase()
            || ch.is_ascii_digit()
            || ('а'..='я').contains(&ch)
            || matches!(ch, '-' | ',' | '.' | '/');
        if allowed {
            out.push(ch);
        } else if !out.ends_with(' ') && !out.is_empty() {
            // anything else (including whitespace) acts as a separator
            out.push(' ');
        }
    }
    if out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Rough Latin→Cyrillic transliteration, so "aceton" can reach "ацетон".
pub fn lat_to_cyr(text: &str) -> String {
    let lower = text.to_lowercase();
    let staged = lat_digraph_matcher().replace_all(&lower, &LAT_DIGRAPH_SUBS);
    let mut out = String::with_capacity(staged.len() * 2);
    for ch in staged.chars() {
        match ch {
            'a' => out.push('а'),
            'b' => out.push('б'),
            'v' => out.push('в'),
            'g' => out.push('г'),
            'd' => out.push('д'),
            'e' => out.push('е'),
            'z' => out.push('з'),
            'i' => out.push('и'),
            'j' => out.push('й'),
            'k' => out.push('к'),
            'l' => out.push('л'),
            'm' => out.push('м'),
            'n' => out.push('н'),
            'o' => out.push('о'),
            'p' => out.push('п'),
            'r' => out.push('р'),
            's' => out.push('с'),
            't' => out.push('т'),
            'u' => out.push('у'),
            'f' => out.push('ф'),
            'h' => out.push('х'),
            'c' => out.push('к'),
            'y' => out.push('ы'),
            'q' => out.push('к'),
            'w' => out.push('в'),
            'x' => out.push_str("кс"),
            other => out.push(other),
        }
    }
    out
}

/// Rough Cyrillic→Latin transliteration. The hushers and affricates expand
/// to digraphs, the silent signs vanish; anything unmapped passes through.
pub fn cyr_to_lat(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    for ch in lower.chars() {
        match ch {
            'щ' => out.push_str("sch"),
            'ш' => out.push_str("sh"),
            'ч' => out.push_str("ch"),
            'ё' => out.push_str("yo"),
            'ю' => out.push_str("yu"),
            'я' => out.push_str("ya"),
            'х' => out.push_str("kh"),
            'ц' => out.push_str("ts"),
            'ж' => out.push_str("zh"),
            'а' => out.push('a'),
            'б' => out.push('b'),
            'в' => out.push('v'),
            'г' => out.push('g'),
            'д' => out.push('d'),
            'е' => out.push('e'),
            'з' => out.push('z'),
            'и' => out.push('i'),
            'й' => out.push('j'),
            'к' => out.push('k'),
            'л' => out.push('l'),
            'м' => out.push('m'),
            'н' => out.push('n'),
            'о' => out.push('o'),
            'п' => out.push('p'),
            'р' => out.push('r'),
            'с' => out.push('s'),
            'т' => out.push('t'),
            'у' => out.push('u'),
            'ф' => out.push('f'),
            'ы' => out.push('y'),
            'ъ' | 'ь' => {}
            other => out.push(other),
        }
    }
    out
}
