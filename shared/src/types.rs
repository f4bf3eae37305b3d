//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Pagination parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Pagination {
    /// Clamp to page >= 1 and 1..=100 items per page
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

/// Slice one page out of an in-memory list
pub fn paginate<T: Clone>(items: &[T], pagination: Pagination) -> PaginatedResponse<T> {
    let Pagination { page, per_page } = pagination.normalized();
    let total_items = items.len() as u64;
    let total_pages = total_items.div_ceil(per_page as u64) as u32;

    let start = ((page - 1) as usize).saturating_mul(per_page as usize);
    let data = items
        .iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect();

    PaginatedResponse {
        data,
        pagination: PaginationMeta {
            page,
            per_page,
            total_items,
            total_pages,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_middle_and_last_page() {
        let items: Vec<u32> = (1..=45).collect();

        let second = paginate(&items, Pagination { page: 2, per_page: 20 });
        assert_eq!(second.data.first(), Some(&21));
        assert_eq!(second.data.len(), 20);
        assert_eq!(second.pagination.total_pages, 3);

        let last = paginate(&items, Pagination { page: 3, per_page: 20 });
        assert_eq!(last.data, vec![41, 42, 43, 44, 45]);
    }

    #[test]
    fn test_paginate_out_of_range_and_empty() {
        let items: Vec<u32> = (1..=5).collect();
        assert!(paginate(&items, Pagination { page: 9, per_page: 20 }).data.is_empty());

        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, Pagination::default());
        assert_eq!(page.pagination.total_items, 0);
        assert_eq!(page.pagination.total_pages, 0);
    }

    #[test]
    fn test_paginate_normalizes_input() {
        let items: Vec<u32> = (1..=300).collect();
        let page = paginate(&items, Pagination { page: 0, per_page: 500 });
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.per_page, 100);
        assert_eq!(page.data.len(), 100);
    }
}
