use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult, models::CatalogWork, routes::AppState, services::title_search,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    limit: Option<usize>,
}

/// Handler for anime title search endpoint
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<CatalogWork>>> {
    let limit = params
        .limit
        .unwrap_or(state.engine.settings().title_search_limit);
    let works = title_search::search_titles(state.catalog.clone(), &params.q, limit).await?;
    Ok(Json(works))
}
