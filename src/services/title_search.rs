use crate::{
    error::{AppError, AppResult},
    models::CatalogWork,
    services::catalog::{CatalogProvider, TitleSearch},
};
use std::sync::Arc;

/// Service function for plain anime title search
///
/// Delegates to the configured CatalogProvider with the safe-content filter on,
/// keeping HTTP routing apart from catalog access.
pub async fn search_titles(
    catalog: Arc<dyn CatalogProvider>,
    query: &str,
    limit: usize,
) -> AppResult<Vec<CatalogWork>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    catalog
        .search_by_title(&TitleSearch {
            query: query.to_string(),
            limit,
            safe_only: true,
        })
        .await
}
