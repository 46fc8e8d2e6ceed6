#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anime_recommender::{
    config::EngineSettings,
    error::{AppError, AppResult},
    models::{AiringStatus, CatalogWork, Genre, GenreId},
    services::{
        catalog::{CatalogProvider, GenreSearch, TitleSearch},
        rate_limit::NoDelay,
        RecommendationEngine,
    },
};

pub const ACTION: (u64, &str) = (1, "Action");
pub const ADVENTURE: (u64, &str) = (2, "Adventure");
pub const COMEDY: (u64, &str) = (4, "Comedy");
pub const DRAMA: (u64, &str) = (8, "Drama");
pub const FANTASY: (u64, &str) = (10, "Fantasy");
pub const ROMANCE: (u64, &str) = (22, "Romance");

pub fn anime(id: u64, title: &str, genres: &[(u64, &str)], score: f64, members: u64) -> CatalogWork {
    let mut work = CatalogWork::new(id, title);
    work.genres = genres
        .iter()
        .map(|(gid, name)| Genre::new(*gid, *name))
        .collect();
    work.score = Some(score);
    work.members = Some(members);
    work.status = AiringStatus::Completed;
    work.aired_from = Some("2015-01-01T00:00:00+00:00".to_string());
    work
}

/// Deterministic in-memory catalog recording every call it receives
#[derive(Default)]
pub struct FakeCatalog {
    titles: HashMap<String, Vec<CatalogWork>>,
    genres: HashMap<GenreId, Vec<CatalogWork>>,
    failing_genres: HashSet<GenreId>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, query: &str, results: Vec<CatalogWork>) -> Self {
        self.titles.insert(query.to_lowercase(), results);
        self
    }

    pub fn with_genre(mut self, genre: (u64, &str), pool: Vec<CatalogWork>) -> Self {
        self.genres.insert(GenreId(genre.0), pool);
        self
    }

    pub fn failing_genre(mut self, genre: (u64, &str)) -> Self {
        self.failing_genres.insert(GenreId(genre.0));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn genre_calls(&self) -> Vec<u64> {
        self.calls()
            .iter()
            .filter_map(|c| c.strip_prefix("genre:"))
            .filter_map(|id| id.parse().ok())
            .collect()
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn search_by_title(&self, search: &TitleSearch) -> AppResult<Vec<CatalogWork>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("title:{}", search.query));
        assert!(search.safe_only);

        Ok(self
            .titles
            .get(&search.query.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    async fn search_by_genre(&self, search: &GenreSearch) -> AppResult<Vec<CatalogWork>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("genre:{}", search.genre_id));
        assert!(search.safe_only);

        if self.failing_genres.contains(&search.genre_id) {
            return Err(AppError::ExternalApi("simulated outage".to_string()));
        }

        let mut pool = self
            .genres
            .get(&search.genre_id)
            .cloned()
            .unwrap_or_default();
        pool.truncate(search.limit);
        Ok(pool)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub fn engine_with(catalog: Arc<FakeCatalog>) -> RecommendationEngine {
    RecommendationEngine::new(catalog, Arc::new(NoDelay), EngineSettings::default())
        .with_current_year(2025)
}
