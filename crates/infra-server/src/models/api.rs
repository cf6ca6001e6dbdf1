//! Common API types and utilities

use crate::error::{ApiError, Result};
use infra_registry::{Page, PageRequest, page::DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// Standard pagination parameters
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    #[serde(default)]
    pub page: u32,

    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl PaginationQuery {
    pub fn to_request(&self) -> Result<PageRequest> {
        Ok(PageRequest::new(self.page, self.size)?)
    }
}

/// Standard pagination response
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationInfo {
    pub page: u32,
    pub size: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Convert a registry page, mapping each item into its response model
    pub fn from_page<U>(page: Page<U>, f: impl FnMut(U) -> T) -> Self {
        let has_more = page.has_more();
        let page = page.map(f);

        Self {
            pagination: PaginationInfo {
                page: page.page,
                size: page.size,
                total: page.total_elements,
                total_pages: page.total_pages,
                has_more,
            },
            data: page.content,
        }
    }
}

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Reject a blank required field at the request boundary
pub(crate) fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_response_from_page() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(0, 3).unwrap(), 7);
        let response = PaginatedResponse::from_page(page, |n| n.to_string());

        assert_eq!(response.data, vec!["1", "2", "3"]);
        assert_eq!(response.pagination.total, 7);
        assert_eq!(response.pagination.total_pages, 3);
        assert!(response.pagination.has_more);
    }

    #[test]
    fn test_pagination_query_rejects_zero_size() {
        let query = PaginationQuery { page: 0, size: 0 };
        assert!(query.to_request().is_err());
    }
}
