//! Search queries and catalog distributions.

use std::sync::Arc;

use vault_core::result::AppResult;
use vault_core::types::pagination::Page;
use vault_core::types::query::SearchQuery;
use vault_database::repositories::catalog::CatalogRepository;
use vault_entity::record::FileRecord;
use vault_entity::stats::{MonthCount, SizeDistribution, TypeCount};

/// Read-side service over the file catalog.
#[derive(Debug, Clone)]
pub struct QueryService {
    /// Catalog repository.
    catalog: Arc<CatalogRepository>,
}

impl QueryService {
    /// Creates a new query service.
    pub fn new(catalog: Arc<CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Runs a filtered, sorted, paginated search over the catalog.
    pub async fn search(&self, query: &SearchQuery) -> AppResult<Page<FileRecord>> {
        query.validate()?;
        self.catalog.search(query).await
    }

    /// Upload counts grouped by main media type.
    pub async fn file_type_histogram(&self) -> AppResult<Vec<TypeCount>> {
        self.catalog.file_type_histogram().await
    }

    /// Upload counts bucketed by size class.
    pub async fn size_distribution(&self) -> AppResult<SizeDistribution> {
        self.catalog.size_distribution().await
    }

    /// Upload counts grouped by calendar month.
    pub async fn date_distribution(&self) -> AppResult<Vec<MonthCount>> {
        self.catalog.date_distribution().await
    }
}
