//! Pagination by slicing
//!
//! The full ordered list is loaded and the requested page cut out of it.

use crate::error::{GrowthError, GrowthResult};

/// A validated page request (1-based page number)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    /// `per_page` falls back to `default_per_page` and is capped at `max_per_page`
    pub fn new(
        page: usize,
        per_page: Option<usize>,
        default_per_page: usize,
        max_per_page: usize,
    ) -> GrowthResult<Self> {
        if page == 0 {
            return Err(GrowthError::Validation(
                "page must be 1 or greater".to_string(),
            ));
        }

        let per_page = per_page.unwrap_or(default_per_page);
        if per_page == 0 {
            return Err(GrowthError::Validation(
                "perPage must be 1 or greater".to_string(),
            ));
        }

        Ok(Self {
            page,
            per_page: per_page.min(max_per_page),
        })
    }
}

/// One page of results plus totals for the response headers
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page_count: usize,
}

/// Cut `request`'s page out of `items`; pages past the end are empty
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let page_count = total.div_ceil(request.per_page);
    let start = (request.page - 1).saturating_mul(request.per_page);

    let items = items
        .into_iter()
        .skip(start)
        .take(request.per_page)
        .collect();

    Page {
        items,
        total,
        page_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: usize, per_page: usize) -> PageRequest {
        PageRequest::new(page, Some(per_page), 10, 100).unwrap()
    }

    #[test]
    fn test_middle_and_last_page() {
        let items: Vec<u32> = (1..=25).collect();

        let second = paginate(items.clone(), request(2, 10));
        assert_eq!(second.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(second.total, 25);
        assert_eq!(second.page_count, 3);

        let last = paginate(items, request(3, 10));
        assert_eq!(last.items, vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = paginate(vec![1, 2, 3], request(5, 2));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.page_count, 2);
    }

    #[test]
    fn test_empty_list() {
        let page = paginate(Vec::<u32>::new(), request(1, 10));
        assert!(page.items.is_empty());
        assert_eq!(page.page_count, 0);
    }

    #[test]
    fn test_request_defaults_and_limits() {
        assert_eq!(PageRequest::new(1, None, 10, 100).unwrap().per_page, 10);
        assert_eq!(PageRequest::new(1, Some(500), 10, 100).unwrap().per_page, 100);
        assert!(PageRequest::new(0, None, 10, 100).is_err());
        assert!(PageRequest::new(1, Some(0), 10, 100).is_err());
    }
}
