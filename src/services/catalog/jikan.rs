/// Jikan v4 catalog provider (unofficial MyAnimeList REST API)
///
/// Both lookups go through `GET /anime`:
/// 1. Title search: `?q=<title>&limit=<n>&sfw`
/// 2. Genre listing: `?genres=<id>&order_by=score&sort=desc&limit=<n>&sfw`
///
/// Jikan allows roughly one request per second per client; pacing is the
/// caller's job (see `services::rate_limit`).
use crate::{
    error::{AppError, AppResult},
    models::{jikan::JikanListResponse, CatalogWork},
    services::catalog::{CatalogProvider, GenreSearch, OrderBy, SortDirection, TitleSearch},
};
use reqwest::{Client as HttpClient, StatusCode};
use std::time::Duration;

/// Jikan rejects larger page sizes
const MAX_PAGE_SIZE: usize = 25;

#[derive(Clone)]
pub struct JikanCatalog {
    http_client: HttpClient,
    api_url: String,
}

impl JikanCatalog {
    pub fn new(api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .user_agent(concat!("anime-recommender/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn title_params(search: &TitleSearch) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", search.query.trim().to_string()),
            ("limit", search.limit.clamp(1, MAX_PAGE_SIZE).to_string()),
        ];
        if search.safe_only {
            params.push(("sfw", "true".to_string()));
        }
        params
    }

    fn genre_params(search: &GenreSearch) -> Vec<(&'static str, String)> {
        let order_by = match search.order_by {
            OrderBy::Score => "score",
        };
        let sort = match search.direction {
            SortDirection::Desc => "desc",
        };

        let mut params = vec![
            ("genres", search.genre_id.to_string()),
            ("order_by", order_by.to_string()),
            ("sort", sort.to_string()),
            ("limit", search.limit.clamp(1, MAX_PAGE_SIZE).to_string()),
        ];
        if search.safe_only {
            params.push(("sfw", "true".to_string()));
        }
        params
    }

    async fn list_anime(&self, params: &[(&'static str, String)]) -> AppResult<Vec<CatalogWork>> {
        let url = format!("{}/anime", self.api_url);
        let response = self.http_client.get(&url).query(params).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::ExternalApi(
                "Jikan API rate limit exceeded".to_string(),
            ));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Jikan API returned status {}: {}",
                status, body
            )));
        }

        let listing: JikanListResponse = response.json().await?;
        Ok(listing.data.into_iter().map(CatalogWork::from).collect())
    }
}

#[async_trait::async_trait]
impl CatalogProvider for JikanCatalog {
    async fn search_by_title(&self, search: &TitleSearch) -> AppResult<Vec<CatalogWork>> {
        if search.query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let works = self.list_anime(&Self::title_params(search)).await?;

        tracing::info!(
            query = %search.query,
            results = works.len(),
            provider = self.name(),
            "Title search completed"
        );

        Ok(works)
    }

    async fn search_by_genre(&self, search: &GenreSearch) -> AppResult<Vec<CatalogWork>> {
        let works = self.list_anime(&Self::genre_params(search)).await?;

        tracing::info!(
            genre_id = %search.genre_id,
            results = works.len(),
            provider = self.name(),
            "Genre listing completed"
        );

        Ok(works)
    }

    fn name(&self) -> &'static str {
        "jikan"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenreId;

    fn create_test_catalog() -> JikanCatalog {
        JikanCatalog::new("http://test.local/v4/".to_string(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(create_test_catalog().api_url, "http://test.local/v4");
    }

    #[test]
    fn test_title_params() {
        let params = JikanCatalog::title_params(&TitleSearch {
            query: "  Cowboy Bebop ".to_string(),
            limit: 10,
            safe_only: true,
        });

        assert_eq!(
            params,
            vec![
                ("q", "Cowboy Bebop".to_string()),
                ("limit", "10".to_string()),
                ("sfw", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_genre_params_clamp_limit() {
        let mut search = GenreSearch::top_rated(GenreId(1), 100);
        search.safe_only = false;

        let params = JikanCatalog::genre_params(&search);

        assert_eq!(
            params,
            vec![
                ("genres", "1".to_string()),
                ("order_by", "score".to_string()),
                ("sort", "desc".to_string()),
                ("limit", "25".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_request() {
        let catalog = create_test_catalog();
        let result = catalog
            .search_by_title(&TitleSearch {
                query: "   ".to_string(),
                limit: 5,
                safe_only: true,
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
