use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside list responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaginationMeta {
    /// Page that was returned (1-based).
    pub current: i64,
    pub total_pages: i64,
    /// Number of records in this page.
    pub count: i64,
    pub total_records: i64,
}

impl PaginationMeta {
    pub fn new(current: i64, limit: i64, count: i64, total_records: i64) -> Self {
        let total_pages = if limit > 0 {
            (total_records + limit - 1) / limit
        } else {
            1
        };
        Self {
            current,
            total_pages,
            count,
            total_records,
        }
    }
}

/// Helper to normalize pagination params with safe defaults.
pub fn normalize_pagination(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(10).clamp(1, 100);
    (page, limit)
}
