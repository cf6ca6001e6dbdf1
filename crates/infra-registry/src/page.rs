//! Offset pagination shared by every listing operation

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};

/// Page size used when a caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u32 = 2000;

/// A zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// Create a page request, rejecting sizes outside `1..=MAX_PAGE_SIZE`
    pub fn new(page: u32, size: u32) -> Result<Self> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(RegistryError::invalid_argument(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, size
            )));
        }
        Ok(Self { page, size })
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }

    pub fn limit(&self) -> u64 {
        self.size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus totals over the whole collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(request.size as u64) as u32;
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }

    /// Slice an already ordered collection into the requested page
    pub fn from_ordered(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len() as u64;
        let content = items
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .collect();
        Self::new(content, request, total)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }

    pub fn has_more(&self) -> bool {
        self.page as u64 + 1 < self.total_pages as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_rejects_bad_sizes() {
        assert!(PageRequest::new(0, 0).is_err());
        assert!(PageRequest::new(0, MAX_PAGE_SIZE + 1).is_err());
        assert!(PageRequest::new(3, MAX_PAGE_SIZE).is_ok());
    }

    #[test]
    fn test_from_ordered_splits_fifteen_items() {
        let items: Vec<u32> = (1..=15).collect();

        let first = Page::from_ordered(items.clone(), PageRequest::new(0, 10).unwrap());
        assert_eq!(first.content, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total_elements, 15);
        assert_eq!(first.total_pages, 2);
        assert!(first.has_more());

        let second = Page::from_ordered(items.clone(), PageRequest::new(1, 10).unwrap());
        assert_eq!(second.content, vec![11, 12, 13, 14, 15]);
        assert!(!second.has_more());

        let beyond = Page::from_ordered(items, PageRequest::new(5, 10).unwrap());
        assert!(beyond.content.is_empty());
        assert_eq!(beyond.total_elements, 15);
    }

    #[test]
    fn test_empty_collection_has_zero_pages() {
        let page: Page<u32> = Page::from_ordered(Vec::new(), PageRequest::default());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_more());
    }

    #[test]
    fn test_map_keeps_totals() {
        let page = Page::new(vec![1, 2], PageRequest::new(2, 2).unwrap(), 9);
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.content, vec![10, 20]);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.total_pages, 5);
    }
}
