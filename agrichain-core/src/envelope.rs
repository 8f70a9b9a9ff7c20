//! Uniform response envelope and pagination types.
//!
//! Every repository operation returns an `ApiResponse<T>`; list operations
//! additionally carry a `PageInfo`.

use serde::{Deserialize, Serialize};

/// The uniform `{success, data, pagination?, message?}` wrapper returned by
/// every data-layer call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response with no pagination or message.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
            message: None,
        }
    }

    /// Successful response carrying a human-readable message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
            message: Some(message.into()),
        }
    }

    /// Successful page of a list operation.
    pub fn paged(data: T, pagination: PageInfo) -> Self {
        Self {
            success: true,
            data,
            pagination: Some(pagination),
            message: None,
        }
    }
}

/// 1-based pagination request. `Default` is page 1 with the caller's
/// collection default limit applied via `limit_or`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct PageRequest {
    /// 1-based page number; 0 is treated as 1.
    pub page: Option<u32>,
    /// Page size; collections supply their own default.
    pub limit: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    pub fn page_or_first(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit_or(&self, default: u32) -> u32 {
        self.limit.unwrap_or(default).max(1)
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    /// Compute the metadata for page `page` of `total` items at `limit` per
    /// page. `total_pages == ceil(total / limit)`.
    pub fn compute(page: u32, limit: u32, total: usize) -> Self {
        let total_pages = (total as u64).div_ceil(limit as u64) as u32;
        let end = page as u64 * limit as u64;
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: end < total as u64,
            has_prev: page > 1,
        }
    }
}

/// Slice out the requested page of `items` and compute its metadata.
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> (Vec<T>, PageInfo) {
    let info = PageInfo::compute(page, limit, items.len());
    let start = ((page - 1) as usize).saturating_mul(limit as usize);
    let slice = items
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .collect();
    (slice, info)
}
