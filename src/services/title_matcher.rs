//! Decides whether a free-text title refers to the same work as a catalog record.
//!
//! Two tiers are used when resolving seeds:
//! 1. Strict: a title equals the query; failing that, both canonicalize to
//!    the same string
//! 2. Loose: a title contains the query or is contained in it

use regex::Regex;
use std::sync::LazyLock;

use crate::models::CatalogWork;

static SUBTITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":.*$").expect("valid subtitle regex"));

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid annotation regex"));

static SEASON_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:season\s*\d+|part\s*\d+|\d+(?:st|nd|rd|th)\s+season)\b")
        .expect("valid season marker regex")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Which tier produced a seed match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Strict,
    Loose,
}

/// Lowercases a title and strips subtitle, annotations and season markers
pub fn canonicalize(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = SUBTITLE.replace(&lowered, "");
    let stripped = PARENTHESIZED.replace_all(&stripped, " ");
    let stripped = SEASON_MARKER.replace_all(&stripped, " ");
    WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}

fn contains_either_way(title: &str, query: &str) -> bool {
    title.contains(query) || query.contains(title)
}

fn canonical_equal(title: &str, query: &str) -> bool {
    let canonical_title = canonicalize(title);
    !canonical_title.is_empty() && canonical_title == canonicalize(query)
}

fn usable<'a>(titles: &'a [&'a str], query: &str) -> Option<(String, Vec<String>)> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let titles: Vec<String> = titles
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    if titles.is_empty() {
        return None;
    }

    Some((query, titles))
}

/// True when any candidate title refers to the same work as the query
///
/// Substring containment in either direction, then canonical equality.
/// An empty query or an empty title list never matches.
pub fn related(candidate_titles: &[&str], query: &str) -> bool {
    let Some((query, titles)) = usable(candidate_titles, query) else {
        return false;
    };

    titles
        .iter()
        .any(|title| contains_either_way(title, &query) || canonical_equal(title, &query))
}

/// Exact (case-insensitive) or canonical equality with any title
pub fn strict_match(candidate_titles: &[&str], query: &str) -> bool {
    let Some((query, titles)) = usable(candidate_titles, query) else {
        return false;
    };

    titles
        .iter()
        .any(|title| *title == query || canonical_equal(title, &query))
}

/// Case-insensitive equality with any title, no canonicalization
pub fn exact_match(candidate_titles: &[&str], query: &str) -> bool {
    let Some((query, titles)) = usable(candidate_titles, query) else {
        return false;
    };

    titles.iter().any(|title| *title == query)
}

/// Plain textual containment with any title, no canonicalization
pub fn loose_match(candidate_titles: &[&str], query: &str) -> bool {
    let Some((query, titles)) = usable(candidate_titles, query) else {
        return false;
    };

    titles.iter().any(|title| contains_either_way(title, &query))
}

/// Picks the seed work for a query out of catalog search results
///
/// An exact title anywhere in the results beats a canonical hit, so a sequel
/// listed first cannot shadow the work the query names. Within each pass the
/// first hit in catalog order wins; the loose tier is the last resort.
pub fn best_match<'a>(results: &'a [CatalogWork], query: &str) -> Option<(&'a CatalogWork, MatchTier)> {
    results
        .iter()
        .find(|work| exact_match(&work.titles(), query))
        .or_else(|| {
            results
                .iter()
                .find(|work| strict_match(&work.titles(), query))
        })
        .map(|work| (work, MatchTier::Strict))
        .or_else(|| {
            results
                .iter()
                .find(|work| loose_match(&work.titles(), query))
                .map(|work| (work, MatchTier::Loose))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("Attack on Titan Season 2"), "attack on titan");
        assert_eq!(canonicalize("Attack on Titan: Final Season"), "attack on titan");
        assert_eq!(canonicalize("Mob Psycho 100 II (TV)"), "mob psycho 100 ii");
        assert_eq!(canonicalize("Vinland Saga 2nd Season"), "vinland saga");
        assert_eq!(canonicalize("Jujutsu Kaisen Part 2"), "jujutsu kaisen");
        assert_eq!(canonicalize("  Steins;Gate  "), "steins;gate");
    }

    #[test]
    fn test_related_season_suffix() {
        assert!(related(&["Attack on Titan"], "Attack on Titan Season 2"));
    }

    #[test]
    fn test_related_substring() {
        assert!(related(&["Naruto Shippuden"], "Naruto"));
        assert!(related(&["naruto"], "NARUTO SHIPPUDEN"));
    }

    #[test]
    fn test_related_canonical_only() {
        // Neither contains the other, canonical forms agree
        assert!(related(
            &["Kaguya-sama: Love is War"],
            "Kaguya-sama (2019) 3rd Season"
        ));
    }

    #[test]
    fn test_related_empty_inputs() {
        assert!(!related(&[], "Naruto"));
        assert!(!related(&["Naruto"], ""));
        assert!(!related(&["Naruto"], "   "));
        assert!(!related(&["", "  "], "Naruto"));
    }

    #[test]
    fn test_unrelated_titles() {
        assert!(!related(&["Death Note"], "Code Geass"));
    }

    #[test]
    fn test_strict_rejects_plain_containment() {
        assert!(!strict_match(&["Naruto Shippuden"], "Naruto"));
        assert!(loose_match(&["Naruto Shippuden"], "Naruto"));
    }

    #[test]
    fn test_exact_match_ignores_case_only() {
        assert!(exact_match(&["Attack on Titan"], "  attack ON titan "));
        assert!(!exact_match(&["Attack on Titan: Final Season"], "Attack on Titan"));
        assert!(!exact_match(&["Attack on Titan"], ""));
    }

    #[test]
    fn test_loose_does_not_canonicalize() {
        assert!(!loose_match(&["Kaguya-sama: Love is War"], "Kaguya-sama (2019)"));
        assert!(strict_match(&["Kaguya-sama: Love is War"], "Kaguya-sama (2019)"));
    }

    #[test]
    fn test_best_match_exact_title_beats_earlier_canonical() {
        let shippuden = CatalogWork::new(1735, "Naruto: Shippuuden");
        let naruto = CatalogWork::new(20, "Naruto");
        let results = vec![shippuden, naruto];

        let (work, tier) = best_match(&results, "naruto").unwrap();
        assert_eq!(work.id.0, 20);
        assert_eq!(tier, MatchTier::Strict);

        let results = vec![
            CatalogWork::new(40028, "Attack on Titan: Final Season"),
            CatalogWork::new(16498, "Attack on Titan"),
        ];
        let (work, _) = best_match(&results, "Attack on Titan").unwrap();
        assert_eq!(work.id.0, 16498);

        let results = vec![CatalogWork::new(40028, "Attack on Titan: Final Season")];
        let (work, tier) = best_match(&results, "Attack on Titan").unwrap();
        assert_eq!(work.id.0, 40028);
        assert_eq!(tier, MatchTier::Strict);

        let results = vec![CatalogWork::new(1735, "Naruto Shippuden"), CatalogWork::new(20, "Naruto")];
        let (work, tier) = best_match(&results, "naruto").unwrap();
        assert_eq!(work.id.0, 20);
        assert_eq!(tier, MatchTier::Strict);
    }

    #[test]
    fn test_best_match_loose_fallback() {
        let results = vec![
            CatalogWork::new(1, "Cowboy Bebop"),
            CatalogWork::new(2, "Naruto Shippuden"),
        ];

        let (work, tier) = best_match(&results, "Naruto").unwrap();
        assert_eq!(work.id.0, 2);
        assert_eq!(tier, MatchTier::Loose);
    }

    #[test]
    fn test_best_match_uses_alternate_titles() {
        let mut work = CatalogWork::new(16498, "Shingeki no Kyojin");
        work.title_english = Some("Attack on Titan".to_string());
        let results = vec![work];

        let (found, tier) = best_match(&results, "Attack on Titan Season 2").unwrap();
        assert_eq!(found.id.0, 16498);
        assert_eq!(tier, MatchTier::Strict);
    }

    #[test]
    fn test_best_match_none() {
        let results = vec![CatalogWork::new(1, "Cowboy Bebop")];
        assert!(best_match(&results, "Monster").is_none());
        assert!(best_match(&[], "Monster").is_none());
    }
}
