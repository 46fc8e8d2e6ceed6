/// Anime catalog abstraction
///
/// The engine only needs two lookups from a catalog: a best-effort text search by
/// title and a quality-sorted listing by genre. Keeping them behind a trait lets
/// the engine run against fakes in tests and against Jikan in production.
use serde::Serialize;

use crate::{
    error::AppResult,
    models::{CatalogWork, GenreId},
};

pub mod jikan;

pub use jikan::JikanCatalog;

/// Parameters of a title search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleSearch {
    pub query: String,
    pub limit: usize,
    /// Exclude adult entries
    pub safe_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Desc,
}

/// Parameters of a genre listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreSearch {
    pub genre_id: GenreId,
    pub limit: usize,
    pub safe_only: bool,
    pub order_by: OrderBy,
    pub direction: SortDirection,
}

impl GenreSearch {
    /// Best-rated-first listing of one genre
    pub fn top_rated(genre_id: GenreId, limit: usize) -> Self {
        Self {
            genre_id,
            limit,
            safe_only: true,
            order_by: OrderBy::Score,
            direction: SortDirection::Desc,
        }
    }
}

/// Trait for anime catalogs
///
/// Both lookups may fail or return nothing; callers decide how to degrade.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search works by free-text title, in the catalog's relevance order
    async fn search_by_title(&self, search: &TitleSearch) -> AppResult<Vec<CatalogWork>>;

    /// List works tagged with a genre, in the requested order
    async fn search_by_genre(&self, search: &GenreSearch) -> AppResult<Vec<CatalogWork>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
