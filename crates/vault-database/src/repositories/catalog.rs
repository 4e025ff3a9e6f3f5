//! File catalog repository implementation.

use sqlx::SqlitePool;
use uuid::Uuid;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::types::pagination::Page;
use vault_core::types::query::SearchQuery;
use vault_entity::record::FileRecord;
use vault_entity::stats::{MonthCount, SizeDistribution, TypeCount};

/// One mebibyte; the lower edge of the `medium` size bucket.
const MEDIUM_MIN_BYTES: i64 = 1_048_576;
/// Ten mebibytes; sizes strictly above this are `large`.
const MEDIUM_MAX_BYTES: i64 = 10_485_760;

/// Repository for file catalog records.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Create a new catalog repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a file record by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM file_records WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find file record", e)
            })
    }

    /// Search the catalog with filters, sorting, and pagination.
    ///
    /// Filters compose with AND. The count and page queries share one
    /// filter list so the pagination block always matches the results.
    pub async fn search(&self, query: &SearchQuery) -> AppResult<Page<FileRecord>> {
        let mut conditions: Vec<&str> = Vec::new();

        let text_pattern = query
            .text_filter()
            .map(|text| format!("%{}%", escape_like(&text.to_lowercase())));
        if text_pattern.is_some() {
            conditions.push("LOWER(original_filename) LIKE ? ESCAPE '\\'");
        }
        let media_type = query.type_filter();
        if media_type.is_some() {
            conditions.push("declared_media_type = ?");
        }
        if query.size_range.min.is_some() {
            conditions.push("size_bytes >= ?");
        }
        if query.size_range.max.is_some() {
            conditions.push("size_bytes <= ?");
        }
        let start_day = query
            .date_range
            .start
            .map(|day| day.format("%Y-%m-%d").to_string());
        if start_day.is_some() {
            conditions.push("date(uploaded_at) >= date(?)");
        }
        let end_day = query
            .date_range
            .end
            .map(|day| day.format("%Y-%m-%d").to_string());
        if end_day.is_some() {
            conditions.push("date(uploaded_at) <= date(?)");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM file_records {where_clause}");
        // The id tiebreak keeps page boundaries stable when the sort
        // column has equal values.
        let select_sql = format!(
            "SELECT * FROM file_records {where_clause} ORDER BY {} {}, id ASC LIMIT ? OFFSET ?",
            query.sort_by.column(),
            query.sort_order.as_sql()
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, FileRecord>(&select_sql);

        if let Some(pattern) = &text_pattern {
            count_query = count_query.bind(pattern.clone());
            select_query = select_query.bind(pattern.clone());
        }
        if let Some(mt) = media_type {
            count_query = count_query.bind(mt.to_string());
            select_query = select_query.bind(mt.to_string());
        }
        if let Some(min) = query.size_range.min {
            count_query = count_query.bind(min as i64);
            select_query = select_query.bind(min as i64);
        }
        if let Some(max) = query.size_range.max {
            count_query = count_query.bind(max as i64);
            select_query = select_query.bind(max as i64);
        }
        if let Some(day) = &start_day {
            count_query = count_query.bind(day.clone());
            select_query = select_query.bind(day.clone());
        }
        if let Some(day) = &end_day {
            count_query = count_query.bind(day.clone());
            select_query = select_query.bind(day.clone());
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count search results", e)
        })?;

        let records = select_query
            .bind(query.page.limit() as i64)
            .bind(query.page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search file records", e)
            })?;

        Ok(Page::new(
            records,
            query.page.page,
            query.page.limit(),
            total as u64,
        ))
    }

    /// Count all records in the catalog.
    pub async fn count_all(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM file_records")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count file records", e)
            })
    }

    /// Sum the declared sizes of all records (logical bytes).
    pub async fn total_size_bytes(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COALESCE(SUM(size_bytes), 0) FROM file_records")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to sum file sizes", e)
            })
    }

    /// Count records registered as duplicates.
    pub async fn duplicate_count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM file_records WHERE is_duplicate = 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count duplicates", e)
            })
    }

    /// Count records per main media type, most common first.
    pub async fn file_type_histogram(&self) -> AppResult<Vec<TypeCount>> {
        sqlx::query_as::<_, TypeCount>(
            "SELECT CASE WHEN instr(declared_media_type, '/') > 0 \
                    THEN substr(declared_media_type, 1, instr(declared_media_type, '/') - 1) \
                    ELSE declared_media_type END AS media_type, \
                    COUNT(*) AS count \
             FROM file_records \
             GROUP BY media_type \
             ORDER BY count DESC, media_type ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to build type histogram", e)
        })
    }

    /// Count records per size bucket.
    pub async fn size_distribution(&self) -> AppResult<SizeDistribution> {
        sqlx::query_as::<_, SizeDistribution>(&format!(
            "SELECT COALESCE(SUM(size_bytes < {MEDIUM_MIN_BYTES}), 0) AS small, \
                    COALESCE(SUM(size_bytes >= {MEDIUM_MIN_BYTES} AND size_bytes <= {MEDIUM_MAX_BYTES}), 0) AS medium, \
                    COALESCE(SUM(size_bytes > {MEDIUM_MAX_BYTES}), 0) AS large \
             FROM file_records",
        ))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to build size distribution", e)
        })
    }

    /// Count records per upload month, oldest first.
    pub async fn date_distribution(&self) -> AppResult<Vec<MonthCount>> {
        sqlx::query_as::<_, MonthCount>(
            "SELECT strftime('%Y-%m', uploaded_at) AS month, COUNT(*) AS count \
             FROM file_records \
             GROUP BY month \
             ORDER BY month ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to build date distribution", e)
        })
    }
}

/// Escape LIKE wildcards in user-supplied search text.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
