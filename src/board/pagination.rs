//! Page planning for board listings.
//!
//! A [`PagePlan`] is derived from the total item count, the page size and the
//! requested page index. Out-of-range requests are clamped to the last page,
//! never rejected.

use std::num::NonZeroUsize;

use serde::Serialize;

/// One numbered link in the page navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// Zero-based page index.
    pub index: usize,
    /// One-based display number.
    pub number: usize,
    /// Whether this is the page being shown.
    pub is_current: bool,
}

/// Navigation plan for one listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePlan {
    /// One link per page, in order.
    pub links: Vec<PageLink>,
    /// Resolved (clamped) zero-based page index.
    pub current_index: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Total number of items across all pages.
    pub total_items: usize,
    /// Items per page.
    pub page_size: usize,
    /// One-based number of the previous page, if any.
    pub previous_page_number: Option<usize>,
    /// One-based number of the next page, if any.
    pub next_page_number: Option<usize>,
}

impl PagePlan {
    /// Plan the navigation for `total_items` split into pages of `page_size`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    /// use corkboard::board::PagePlan;
    ///
    /// let plan = PagePlan::new(7, NonZeroUsize::new(3).unwrap(), 0);
    /// assert_eq!(plan.total_pages, 3);
    /// assert_eq!(plan.previous_page_number, None);
    /// assert_eq!(plan.next_page_number, Some(2));
    /// ```
    pub fn new(total_items: usize, page_size: NonZeroUsize, requested_index: usize) -> Self {
        let page_size = page_size.get();
        let total_pages = total_items.div_ceil(page_size);
        let current_index = if total_pages == 0 {
            0
        } else {
            requested_index.min(total_pages - 1)
        };

        let links = (0..total_pages)
            .map(|index| PageLink {
                index,
                number: index + 1,
                is_current: index == current_index,
            })
            .collect();

        let previous_page_number = (current_index > 0).then_some(current_index);
        let next_page_number = (current_index + 1 < total_pages).then_some(current_index + 2);

        Self {
            links,
            current_index,
            total_pages,
            total_items,
            page_size,
            previous_page_number,
            next_page_number,
        }
    }

    /// Number of items to skip to reach the current page.
    pub fn offset(&self) -> usize {
        self.current_index * self.page_size
    }

    /// Maximum number of items on the current page.
    pub fn limit(&self) -> usize {
        self.page_size
    }

    /// Whether the listing has no items at all.
    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }

    /// Whether the requested index had to be clamped.
    pub fn was_clamped(&self, requested_index: usize) -> bool {
        self.current_index != requested_index
    }
}

/// Convert a one-based page number (as used in query strings) into an index.
///
/// Numbers below 1 map to the first page.
pub fn page_index_from_number(number: i64) -> usize {
    if number <= 1 {
        0
    } else {
        usize::try_from(number - 1).unwrap_or(usize::MAX)
    }
}
