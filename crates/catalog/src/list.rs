//! Product list filter state.
//!
//! Each list view is a pure function `(filter state, page) -> page of rows`;
//! the UI owns a [`ProductListState`] value and issues a fresh query on every
//! change. Updates are reducer-style: state in, new state out, nothing
//! mutated in place.

use serde::{Deserialize, Serialize};

use stockroom_core::CategoryId;

/// Products are paginated ten to a page.
pub const PRODUCT_PAGE_SIZE: u32 = 10;

/// Filter state driving the product list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListState {
    search: String,
    category_id: Option<CategoryId>,
    page: u32,
}

impl Default for ProductListState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category_id: None,
            page: 1,
        }
    }
}

impl ProductListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The free-text filter, or `None` when blank (blank means "no filter").
    ///
    /// Matches against name OR sku, case-insensitively, as one group.
    pub fn search(&self) -> Option<&str> {
        let s = self.search.trim();
        (!s.is_empty()).then_some(s)
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        PRODUCT_PAGE_SIZE
    }

    /// Change the search text. Resets to page 1: the old page number is
    /// meaningless against a different result set.
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            page: 1,
            ..self
        }
    }

    /// Change the category filter. Resets to page 1.
    pub fn with_category(self, category_id: Option<CategoryId>) -> Self {
        Self {
            category_id,
            page: 1,
            ..self
        }
    }

    /// Navigate to a page without touching the filters. Clamped to >= 1.
    pub fn with_page(self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changing_search_resets_the_page() {
        let state = ProductListState::new().with_page(2).with_search("laptop");
        assert_eq!(state.page(), 1);
        assert_eq!(state.search(), Some("laptop"));
    }

    #[test]
    fn changing_category_resets_the_page() {
        let category = CategoryId::new();
        let state = ProductListState::new()
            .with_search("tv")
            .with_page(3)
            .with_category(Some(category));
        assert_eq!(state.page(), 1);
        // The other filter survives the reset.
        assert_eq!(state.search(), Some("tv"));
        assert_eq!(state.category_id(), Some(category));
    }

    #[test]
    fn paging_keeps_the_filters() {
        let state = ProductListState::new().with_search("book").with_page(4);
        assert_eq!(state.page(), 4);
        assert_eq!(state.search(), Some("book"));
    }

    #[test]
    fn blank_search_is_no_filter() {
        assert_eq!(ProductListState::new().with_search("   ").search(), None);
        assert_eq!(ProductListState::new().search(), None);
    }

    #[test]
    fn page_zero_clamps_to_one() {
        assert_eq!(ProductListState::new().with_page(0).page(), 1);
    }
}
