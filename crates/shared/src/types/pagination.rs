//! Pagination types for the detailed invoice list.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Creates a request, clamping page and page size to at least 1.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Index of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Maximum number of items on this page.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// Whether a following page exists.
    pub has_next: bool,
    /// Whether a preceding page exists.
    pub has_previous: bool,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        let per_page = per_page.max(1);
        let total_pages = if total == 0 {
            1
        } else {
            u32::try_from(total.div_ceil(u64::from(per_page))).unwrap_or(u32::MAX)
        };

        Self {
            data,
            meta: PageMeta {
                page,
                per_page,
                total,
                total_pages,
                has_next: page < total_pages,
                has_previous: page > 1,
            },
        }
    }
}

impl<T: Clone> PageResponse<T> {
    /// Slices one page out of an in-memory list.
    ///
    /// A page past the end yields an empty `data` with accurate metadata.
    #[must_use]
    pub fn from_slice(items: &[T], request: &PageRequest) -> Self {
        let request = PageRequest::new(request.page, request.per_page);
        let start = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let data = items
            .iter()
            .skip(start)
            .take(request.per_page as usize)
            .cloned()
            .collect();

        Self::new(data, request.page, request.per_page, items.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 20);
    }

    #[rstest]
    #[case(1, 20, 0)]
    #[case(2, 20, 20)]
    #[case(3, 10, 20)]
    #[case(0, 10, 0)]
    fn test_page_request_offset(#[case] page: u32, #[case] per_page: u32, #[case] offset: u64) {
        let request = PageRequest { page, per_page };
        assert_eq!(request.offset(), offset);
        assert_eq!(request.limit(), u64::from(per_page));
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(20, 1)]
    #[case(21, 2)]
    #[case(100, 5)]
    fn test_total_pages(#[case] total: u64, #[case] expected: u32) {
        let response = PageResponse::<u8>::new(vec![], 1, 20, total);
        assert_eq!(response.meta.total_pages, expected);
    }

    #[test]
    fn test_from_slice_navigation_flags() {
        let items: Vec<u32> = (1..=45).collect();

        let first = PageResponse::from_slice(&items, &PageRequest::new(1, 20));
        assert_eq!(first.data.len(), 20);
        assert_eq!(first.data[0], 1);
        assert!(first.meta.has_next);
        assert!(!first.meta.has_previous);

        let last = PageResponse::from_slice(&items, &PageRequest::new(3, 20));
        assert_eq!(last.data, vec![41, 42, 43, 44, 45]);
        assert!(!last.meta.has_next);
        assert!(last.meta.has_previous);
        assert_eq!(last.meta.total_pages, 3);
    }

    #[test]
    fn test_from_slice_past_end() {
        let items = vec!['a', 'b'];
        let page = PageResponse::from_slice(&items, &PageRequest::new(9, 5));
        assert!(page.data.is_empty());
        assert_eq!(page.meta.total, 2);
        assert_eq!(page.meta.total_pages, 1);
    }
}
