use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

pub mod jikan;

use crate::services::scoring::ScoringStrategyKind;

/// Stable catalog identifier of an anime (MyAnimeList id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkId(pub u64);

impl Display for WorkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog identifier of a genre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenreId(pub u64);

impl Display for GenreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Genre tag. Two genres are the same genre when their ids match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

impl Genre {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: GenreId(id),
            name: name.into(),
        }
    }
}

impl PartialEq for Genre {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Genre {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiringStatus {
    Completed,
    Airing,
    NotYetAired,
    Unknown,
}

impl AiringStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("completed") | Some("finished airing") => AiringStatus::Completed,
            Some("currently airing") | Some("airing") => AiringStatus::Airing,
            Some("not yet aired") | Some("upcoming") => AiringStatus::NotYetAired,
            _ => AiringStatus::Unknown,
        }
    }
}

/// Snapshot of one catalog entry as returned by the catalog at fetch time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogWork {
    pub id: WorkId,
    pub title: String,
    pub title_english: Option<String>,
    pub title_japanese: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Quality score on the catalog's 0-10 scale
    pub score: Option<f64>,
    pub scored_by: Option<u64>,
    pub members: Option<u64>,
    pub favorites: Option<u64>,
    pub rank: Option<u32>,
    pub status: AiringStatus,
    /// Air-start date as reported by the catalog (ISO 8601)
    pub aired_from: Option<String>,
    pub synopsis: Option<String>,
    pub episodes: Option<u32>,
    pub media_type: Option<String>,
    pub image_url: Option<String>,
    pub url: Option<String>,
}

impl CatalogWork {
    /// Minimal work with only identity and primary title set
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: WorkId(id),
            title: title.into(),
            title_english: None,
            title_japanese: None,
            synonyms: Vec::new(),
            genres: Vec::new(),
            score: None,
            scored_by: None,
            members: None,
            favorites: None,
            rank: None,
            status: AiringStatus::Unknown,
            aired_from: None,
            synopsis: None,
            episodes: None,
            media_type: None,
            image_url: None,
            url: None,
        }
    }

    /// All title variants in preference order: primary, English, Japanese, synonyms
    pub fn titles(&self) -> Vec<&str> {
        std::iter::once(self.title.as_str())
            .chain(self.title_english.as_deref())
            .chain(self.title_japanese.as_deref())
            .chain(self.synonyms.iter().map(String::as_str))
            .filter(|t| !t.trim().is_empty())
            .collect()
    }

    /// English title when the catalog has one, primary title otherwise
    pub fn display_title(&self) -> &str {
        self.title_english
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.title)
    }

    /// Year the work started airing, `None` when the date is absent or unparseable
    pub fn air_year(&self) -> Option<i32> {
        let raw = self.aired_from.as_deref()?.trim();
        if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
            return Some(date.year());
        }
        raw.get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
            .map(|date| date.year())
    }
}

/// Genre frequency across the resolved seed works
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreStat {
    pub genre_id: GenreId,
    pub name: String,
    /// Number of seed works carrying this genre
    pub frequency: usize,
    /// `frequency / seed count * 100`
    pub percentage: f64,
}

/// One named contribution to a candidate's score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBreakdown(pub Vec<ScoreComponent>);

impl ScoreBreakdown {
    pub fn push(&mut self, name: &str, value: f64) {
        self.0.push(ScoreComponent {
            name: name.to_string(),
            value,
        });
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|c| c.name == name).map(|c| c.value)
    }

    pub fn total(&self) -> f64 {
        self.0.iter().map(|c| c.value).sum()
    }
}

/// A catalog work with its computed desirability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub work: CatalogWork,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub strategy: ScoringStrategyKind,
    pub match_reason: String,
}

/// Result of resolving the user's seed titles against the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSeeds {
    pub seed_works: Vec<CatalogWork>,
    pub genre_stats: Vec<GenreStat>,
    /// Works that must never be recommended (every resolved seed)
    pub exclude_ids: BTreeSet<WorkId>,
    /// Queries that did not resolve to any catalog work
    pub unmatched: Vec<String>,
}

impl ResolvedSeeds {
    pub fn total_seeds(&self) -> usize {
        self.seed_works.len()
    }

    /// Explains an empty recommendation list in terms of the seed genres
    pub fn empty_result_message(&self) -> String {
        if self.genre_stats.is_empty() {
            return "Your titles carry no genre information to recommend from".to_string();
        }

        let genres: Vec<String> = self
            .genre_stats
            .iter()
            .map(|stat| format!("{} ({:.0}%)", stat.name, stat.percentage))
            .collect();

        format!(
            "Found genres {} in your titles, but no new recommendations were available for them",
            genres.join(", ")
        )
    }
}

/// Outcome of a full recommendation request
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationOutcome {
    /// None of the queries resolved to a catalog work
    NoMatches { queries: Vec<String> },
    /// Seeds resolved but no candidate survived expansion
    NoRecommendations { seeds: ResolvedSeeds },
    Recommendations {
        seeds: ResolvedSeeds,
        items: Vec<ScoredCandidate>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_equality_is_by_id() {
        assert_eq!(Genre::new(1, "Action"), Genre::new(1, "Acción"));
        assert_ne!(Genre::new(1, "Action"), Genre::new(2, "Action"));
    }

    #[test]
    fn test_airing_status_parse() {
        assert_eq!(
            AiringStatus::parse(Some("Finished Airing")),
            AiringStatus::Completed
        );
        assert_eq!(AiringStatus::parse(Some("Completed")), AiringStatus::Completed);
        assert_eq!(
            AiringStatus::parse(Some("Currently Airing")),
            AiringStatus::Airing
        );
        assert_eq!(
            AiringStatus::parse(Some("Not yet aired")),
            AiringStatus::NotYetAired
        );
        assert_eq!(AiringStatus::parse(None), AiringStatus::Unknown);
    }

    #[test]
    fn test_air_year() {
        let mut work = CatalogWork::new(1, "Cowboy Bebop");
        assert_eq!(work.air_year(), None);

        work.aired_from = Some("1998-04-03T00:00:00+00:00".to_string());
        assert_eq!(work.air_year(), Some(1998));

        work.aired_from = Some("2009-04-05".to_string());
        assert_eq!(work.air_year(), Some(2009));

        work.aired_from = Some("spring".to_string());
        assert_eq!(work.air_year(), None);
    }

    #[test]
    fn test_titles_order_and_empty_filtering() {
        let mut work = CatalogWork::new(16498, "Shingeki no Kyojin");
        work.title_english = Some("Attack on Titan".to_string());
        work.title_japanese = Some("".to_string());
        work.synonyms = vec!["AoT".to_string()];

        assert_eq!(
            work.titles(),
            vec!["Shingeki no Kyojin", "Attack on Titan", "AoT"]
        );
        assert_eq!(work.display_title(), "Attack on Titan");
    }

    #[test]
    fn test_empty_result_message_names_genres() {
        let seeds = ResolvedSeeds {
            seed_works: vec![CatalogWork::new(1, "A")],
            genre_stats: vec![GenreStat {
                genre_id: GenreId(1),
                name: "Action".to_string(),
                frequency: 1,
                percentage: 100.0,
            }],
            exclude_ids: BTreeSet::from([WorkId(1)]),
            unmatched: vec![],
        };

        assert!(seeds.empty_result_message().contains("Action (100%)"));
    }
}
