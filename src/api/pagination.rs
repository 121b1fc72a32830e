use serde::{Deserialize, Serialize};

/// 1-based page and page size after defaults and caps are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Page below 1 becomes 1; a zero or missing limit takes the default; limits above `max_limit` are capped
    pub fn resolve(page: Option<u32>, limit: Option<u32>, default_limit: u32, max_limit: u32) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = match limit {
            Some(0) | None => default_limit,
            Some(l) => l,
        }
        .min(max_limit)
        .max(1);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let limit = i64::from(request.limit.max(1));
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}
