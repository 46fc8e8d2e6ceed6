use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    config::MAX_RESULTS_LIMIT,
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{CatalogWork, GenreStat, RecommendationOutcome, ResolvedSeeds, ScoredCandidate},
    routes::AppState,
    services::{recommendations::split_seed_input, scoring::ScoringStrategyKind, RecommendOptions},
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub titles: Vec<String>,
    /// Comma-separated titles as typed into a search box
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
    #[serde(default)]
    pub strategy: ScoringStrategyKind,
    #[serde(default)]
    pub min_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SeedRequest {
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<ScoredCandidate>,
    pub seeds: Vec<CatalogWork>,
    pub genre_stats: Vec<GenreStat>,
    pub unmatched: Vec<String>,
    /// Set when seeds resolved but nothing could be recommended
    pub message: Option<String>,
}

impl RecommendationResponse {
    fn new(seeds: ResolvedSeeds, recommendations: Vec<ScoredCandidate>) -> Self {
        let message = recommendations
            .is_empty()
            .then(|| seeds.empty_result_message());

        Self {
            recommendations,
            seeds: seeds.seed_works,
            genre_stats: seeds.genre_stats,
            unmatched: seeds.unmatched,
            message,
        }
    }
}

/// Collects seed queries from the list and the comma-separated form
fn seed_queries(titles: &[String], query: Option<&str>) -> AppResult<Vec<String>> {
    let queries: Vec<String> = titles
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .chain(query.map(split_seed_input).unwrap_or_default())
        .collect();

    if queries.is_empty() {
        return Err(AppError::InvalidInput(
            "Please provide at least one anime title".to_string(),
        ));
    }

    Ok(queries)
}

fn no_matches(queries: &[String]) -> AppError {
    AppError::NotFound(format!(
        "No anime matched the provided titles: {}",
        queries.join(", ")
    ))
}

/// Handler for seed resolution endpoint
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SeedRequest>,
) -> AppResult<Json<ResolvedSeeds>> {
    let queries = seed_queries(&request.titles, request.query.as_deref())?;

    state
        .engine
        .resolve_seeds(&queries)
        .await
        .map(Json)
        .ok_or_else(|| no_matches(&queries))
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let queries = seed_queries(&request.titles, request.query.as_deref())?;

    let max_results = request
        .max_results
        .unwrap_or(state.engine.settings().max_results);
    if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
        return Err(AppError::InvalidInput(format!(
            "max_results must be between 1 and {}",
            MAX_RESULTS_LIMIT
        )));
    }

    tracing::info!(
        request_id = %request_id,
        seeds = queries.len(),
        max_results,
        strategy = ?request.strategy,
        "Processing recommendation request"
    );

    let options = RecommendOptions {
        max_results,
        strategy: request.strategy,
        min_score: request.min_score,
    };

    let response = match state.engine.run(&queries, options).await {
        RecommendationOutcome::NoMatches { queries } => return Err(no_matches(&queries)),
        RecommendationOutcome::NoRecommendations { seeds } => {
            RecommendationResponse::new(seeds, Vec::new())
        }
        RecommendationOutcome::Recommendations { seeds, items } => {
            RecommendationResponse::new(seeds, items)
        }
    };

    tracing::info!(
        request_id = %request_id,
        recommendations = response.recommendations.len(),
        "Recommendation request completed"
    );

    Ok(Json(response))
}
