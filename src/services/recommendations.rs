use chrono::{Datelike, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    config::EngineSettings,
    models::{
        CatalogWork, GenreStat, RecommendationOutcome, ResolvedSeeds, ScoredCandidate, WorkId,
    },
    services::{
        catalog::{CatalogProvider, GenreSearch, TitleSearch},
        genre_stats,
        rate_limit::RateLimiter,
        scoring::{self, ScoringContext, ScoringStrategyKind},
        title_matcher::{self, MatchTier},
    },
};

/// Per-request knobs of [`RecommendationEngine::recommend`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendOptions {
    pub max_results: usize,
    pub strategy: ScoringStrategyKind,
    /// Drop candidates whose catalog score is absent or below this value
    pub min_score: Option<f64>,
}

impl RecommendOptions {
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            strategy: ScoringStrategyKind::default(),
            min_score: None,
        }
    }
}

/// Splits the search-box format ("Naruto, Bleach ,") into seed queries
pub fn split_seed_input(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .collect()
}

/// Genre-expansion recommendation engine
///
/// Resolves seed titles against the catalog, aggregates their genres, then
/// pulls a quality-sorted pool per relevant genre and merges the best few of
/// each into one ranked, deduplicated list.
///
/// All catalog calls of a request are issued one after another with the
/// injected [`RateLimiter`] between them. Catalog failures never abort a
/// request; the failed call counts as an empty result.
pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogProvider>,
    rate_limiter: Arc<dyn RateLimiter>,
    settings: EngineSettings,
    current_year: Option<i32>,
}

impl RecommendationEngine {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        rate_limiter: Arc<dyn RateLimiter>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            catalog,
            rate_limiter,
            settings,
            current_year: None,
        }
    }

    /// Pins the year used for recency scoring instead of the wall clock
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn current_year(&self) -> i32 {
        self.current_year.unwrap_or_else(|| Utc::now().year())
    }

    /// Resolves, aggregates and recommends in one go
    pub async fn run(&self, queries: &[String], options: RecommendOptions) -> RecommendationOutcome {
        let Some(seeds) = self.resolve_seeds(queries).await else {
            return RecommendationOutcome::NoMatches {
                queries: queries.to_vec(),
            };
        };

        let items = self.recommend(&seeds, options).await;
        if items.is_empty() {
            tracing::info!(
                seeds = seeds.total_seeds(),
                genres = seeds.genre_stats.len(),
                "Seeds resolved but nothing to recommend"
            );
            RecommendationOutcome::NoRecommendations { seeds }
        } else {
            RecommendationOutcome::Recommendations { seeds, items }
        }
    }

    /// Stage 1 and 2: find a catalog work for each query and aggregate genres
    ///
    /// Returns `None` when not a single query resolves.
    pub async fn resolve_seeds(&self, queries: &[String]) -> Option<ResolvedSeeds> {
        let start = Instant::now();
        let mut seed_works: Vec<CatalogWork> = Vec::new();
        let mut exclude_ids: BTreeSet<WorkId> = BTreeSet::new();
        let mut unmatched: Vec<String> = Vec::new();
        let mut calls_made = 0usize;

        for raw in queries {
            let query = raw.trim();
            if query.is_empty() {
                continue;
            }

            if calls_made > 0 {
                self.rate_limiter.wait().await;
            }
            calls_made += 1;

            match self.resolve_one(query).await {
                Some(work) => {
                    if exclude_ids.insert(work.id) {
                        seed_works.push(work);
                    } else {
                        tracing::debug!(query = %query, id = %work.id, "Duplicate seed ignored");
                    }
                }
                None => unmatched.push(query.to_string()),
            }
        }

        if seed_works.is_empty() {
            tracing::warn!(
                queries = queries.len(),
                "No seed titles could be resolved"
            );
            return None;
        }

        let genre_stats = genre_stats::aggregate(&seed_works);

        tracing::info!(
            resolved = seed_works.len(),
            unmatched = unmatched.len(),
            genres = genre_stats.len(),
            processing_time_ms = start.elapsed().as_millis() as u64,
            "Seed resolution completed"
        );

        Some(ResolvedSeeds {
            seed_works,
            genre_stats,
            exclude_ids,
            unmatched,
        })
    }

    async fn resolve_one(&self, query: &str) -> Option<CatalogWork> {
        let search = TitleSearch {
            query: query.to_string(),
            limit: self.settings.title_search_limit,
            safe_only: true,
        };

        let results = match self.catalog.search_by_title(&search).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(
                    query = %query,
                    provider = self.catalog.name(),
                    error = %e,
                    "Seed lookup failed, skipping"
                );
                return None;
            }
        };

        match title_matcher::best_match(&results, query) {
            Some((work, tier)) => {
                tracing::info!(
                    query = %query,
                    id = %work.id,
                    title = %work.title,
                    loose = tier == MatchTier::Loose,
                    "Seed resolved"
                );
                Some(work.clone())
            }
            None => {
                tracing::info!(
                    query = %query,
                    candidates = results.len(),
                    "No catalog match for seed"
                );
                None
            }
        }
    }

    /// Stage 3 and 4: expand relevant genres and merge into a ranked list
    ///
    /// The result never contains an excluded id, holds at most
    /// `options.max_results` entries, and is sorted by descending score.
    pub async fn recommend(
        &self,
        seeds: &ResolvedSeeds,
        options: RecommendOptions,
    ) -> Vec<ScoredCandidate> {
        let start = Instant::now();
        let total_seeds = seeds.total_seeds();
        let mut results: Vec<ScoredCandidate> = Vec::new();

        if total_seeds == 0 || options.max_results == 0 {
            return results;
        }

        let mut excluded: BTreeSet<WorkId> = seeds.exclude_ids.clone();
        excluded.extend(seeds.seed_works.iter().map(|w| w.id));

        let current_year = self.current_year();
        let mut calls_made = 0usize;

        'genres: for stat in &seeds.genre_stats {
            let share = stat.frequency as f64 / total_seeds as f64;
            if share < self.settings.genre_floor {
                tracing::debug!(
                    genre = %stat.name,
                    frequency = stat.frequency,
                    total_seeds,
                    "Genre below relevance floor, not expanded"
                );
                continue;
            }

            if calls_made > 0 {
                self.rate_limiter.wait().await;
            }
            calls_made += 1;

            let context = ScoringContext {
                genre_frequency: stat.frequency,
                total_seeds,
                current_year,
            };
            let top = self.expand_genre(stat, &context, &excluded, options).await;

            for candidate in top {
                if results.len() >= options.max_results {
                    break 'genres;
                }
                if excluded.insert(candidate.work.id) {
                    results.push(candidate);
                }
            }

            if results.len() >= options.max_results {
                break;
            }
        }

        results.sort_by(|a, b| b.score.total_cmp(&a.score));

        tracing::info!(
            recommendations = results.len(),
            genre_calls = calls_made,
            strategy = ?options.strategy,
            processing_time_ms = start.elapsed().as_millis() as u64,
            "Recommendation merge completed"
        );

        results
    }

    /// Fetches one genre's pool and returns its best `per_genre_cap` unseen candidates
    async fn expand_genre(
        &self,
        stat: &GenreStat,
        context: &ScoringContext,
        excluded: &BTreeSet<WorkId>,
        options: RecommendOptions,
    ) -> Vec<ScoredCandidate> {
        let search = GenreSearch::top_rated(stat.genre_id, self.settings.genre_pool_size);

        let pool = match self.catalog.search_by_genre(&search).await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(
                    genre = %stat.name,
                    provider = self.catalog.name(),
                    error = %e,
                    "Genre expansion failed, continuing"
                );
                return Vec::new();
            }
        };

        let reason = format!(
            "{} ({}/{} of your anime)",
            stat.name, context.genre_frequency, context.total_seeds
        );
        let strategy = options.strategy.strategy();

        let mut scored: Vec<ScoredCandidate> = pool
            .iter()
            .filter(|work| !excluded.contains(&work.id))
            .filter(|work| match options.min_score {
                Some(min) => work.score.is_some_and(|s| s >= min),
                None => true,
            })
            .map(|work| scoring::score(strategy, work, context, reason.clone()))
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.settings.per_genre_cap);

        tracing::debug!(
            genre = %stat.name,
            pool = pool.len(),
            kept = scored.len(),
            "Genre expanded"
        );

        scored
    }
}
