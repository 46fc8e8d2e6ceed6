//! Candidate scoring.
//!
//! Two weighting schemes with distinct constants:
//! - `GenreExpansion`: quality, popularity (log scale), genre relevance,
//!   completion and recency, used when candidates come from genre expansion
//! - `DirectRating`: heavier on raw catalog rating and audience counts,
//!   ignores the genre that produced the candidate
//!
//! Scoring is pure: the current year is passed in through [`ScoringContext`].

use serde::{Deserialize, Serialize};

use crate::models::{AiringStatus, CatalogWork, ScoreBreakdown, ScoredCandidate};

pub const RATING: &str = "rating";
pub const POPULARITY: &str = "popularity";
pub const GENRE_RELEVANCE: &str = "genre_relevance";
pub const COMPLETION: &str = "completion";
pub const RECENCY: &str = "recency";
pub const RATING_COUNT: &str = "rating_count";
pub const FAVORITES: &str = "favorites";
pub const RANK: &str = "rank";

/// Selectable scoring strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategyKind {
    #[default]
    GenreExpansion,
    DirectRating,
}

impl ScoringStrategyKind {
    pub fn strategy(self) -> &'static dyn ScoringStrategy {
        match self {
            ScoringStrategyKind::GenreExpansion => &GenreExpansionScoring,
            ScoringStrategyKind::DirectRating => &DirectRatingScoring,
        }
    }
}

/// Inputs besides the candidate itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringContext {
    /// Number of seed works carrying the genre that produced the candidate
    pub genre_frequency: usize,
    pub total_seeds: usize,
    pub current_year: i32,
}

pub trait ScoringStrategy: Send + Sync {
    fn kind(&self) -> ScoringStrategyKind;

    /// Named contributions; the score is their sum
    fn breakdown(&self, candidate: &CatalogWork, context: &ScoringContext) -> ScoreBreakdown;
}

/// Scores one candidate and attaches the reason it was picked
pub fn score(
    strategy: &dyn ScoringStrategy,
    candidate: &CatalogWork,
    context: &ScoringContext,
    match_reason: String,
) -> ScoredCandidate {
    let breakdown = strategy.breakdown(candidate, context);

    ScoredCandidate {
        work: candidate.clone(),
        score: breakdown.total(),
        breakdown,
        strategy: strategy.kind(),
        match_reason,
    }
}

pub struct GenreExpansionScoring;

impl GenreExpansionScoring {
    const RATING_WEIGHT: f64 = 5.0;
    const POPULARITY_CAP: f64 = 30.0;
    const GENRE_WEIGHT: f64 = 20.0;
    const COMPLETION_BONUS: f64 = 5.0;
    const RECENCY_WINDOW: f64 = 5.0;

    fn popularity(members: Option<u64>) -> f64 {
        let raw = match members {
            Some(m) if m > 0 => ((m as f64).log10() - 3.0) * 10.0,
            _ => 0.0,
        };
        raw.min(Self::POPULARITY_CAP)
    }

    fn genre_relevance(context: &ScoringContext) -> f64 {
        if context.total_seeds == 0 {
            return 0.0;
        }
        context.genre_frequency as f64 / context.total_seeds as f64 * Self::GENRE_WEIGHT
    }

    fn recency(air_year: Option<i32>, current_year: i32) -> f64 {
        match air_year {
            Some(year) => {
                let age = f64::from(current_year - year);
                (Self::RECENCY_WINDOW - age).max(0.0)
            }
            None => 0.0,
        }
    }
}

impl ScoringStrategy for GenreExpansionScoring {
    fn kind(&self) -> ScoringStrategyKind {
        ScoringStrategyKind::GenreExpansion
    }

    fn breakdown(&self, candidate: &CatalogWork, context: &ScoringContext) -> ScoreBreakdown {
        let mut breakdown = ScoreBreakdown::default();

        breakdown.push(
            RATING,
            candidate.score.unwrap_or(0.0) * Self::RATING_WEIGHT,
        );
        breakdown.push(POPULARITY, Self::popularity(candidate.members));
        breakdown.push(GENRE_RELEVANCE, Self::genre_relevance(context));
        breakdown.push(
            COMPLETION,
            if candidate.status == AiringStatus::Completed {
                Self::COMPLETION_BONUS
            } else {
                0.0
            },
        );
        breakdown.push(
            RECENCY,
            Self::recency(candidate.air_year(), context.current_year),
        );

        breakdown
    }
}

pub struct DirectRatingScoring;

impl DirectRatingScoring {
    const RATING_WEIGHT: f64 = 15.0;
    const MEMBERS_DIVISOR: f64 = 100_000.0;
    const MEMBERS_CAP: f64 = 25.0;
    const SCORED_BY_DIVISOR: f64 = 10_000.0;
    const SCORED_BY_CAP: f64 = 15.0;
    const RECENT_YEARS: i32 = 2;
    const RECENCY_BONUS: f64 = 10.0;
    const COMPLETION_BONUS: f64 = 5.0;
    const FAVORITES_DIVISOR: f64 = 10_000.0;
    const FAVORITES_CAP: f64 = 15.0;
    const RANK_CEILING: f64 = 1000.0;
    const RANK_DIVISOR: f64 = 50.0;

    fn capped(count: Option<u64>, divisor: f64, cap: f64) -> f64 {
        count.map_or(0.0, |c| (c as f64 / divisor).min(cap))
    }
}

impl ScoringStrategy for DirectRatingScoring {
    fn kind(&self) -> ScoringStrategyKind {
        ScoringStrategyKind::DirectRating
    }

    fn breakdown(&self, candidate: &CatalogWork, context: &ScoringContext) -> ScoreBreakdown {
        let mut breakdown = ScoreBreakdown::default();

        breakdown.push(
            RATING,
            candidate.score.unwrap_or(0.0) * Self::RATING_WEIGHT,
        );
        breakdown.push(
            POPULARITY,
            Self::capped(candidate.members, Self::MEMBERS_DIVISOR, Self::MEMBERS_CAP),
        );
        breakdown.push(
            RATING_COUNT,
            Self::capped(
                candidate.scored_by,
                Self::SCORED_BY_DIVISOR,
                Self::SCORED_BY_CAP,
            ),
        );
        breakdown.push(
            RECENCY,
            match candidate.air_year() {
                Some(year) if (0..=Self::RECENT_YEARS).contains(&(context.current_year - year)) => {
                    Self::RECENCY_BONUS
                }
                _ => 0.0,
            },
        );
        breakdown.push(
            COMPLETION,
            if candidate.status == AiringStatus::Completed {
                Self::COMPLETION_BONUS
            } else {
                0.0
            },
        );
        breakdown.push(
            FAVORITES,
            Self::capped(
                candidate.favorites,
                Self::FAVORITES_DIVISOR,
                Self::FAVORITES_CAP,
            ),
        );
        breakdown.push(
            RANK,
            candidate.rank.map_or(0.0, |rank| {
                ((Self::RANK_CEILING - f64::from(rank)) / Self::RANK_DIVISOR).max(0.0)
            }),
        );

        breakdown
    }
}
