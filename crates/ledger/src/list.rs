//! Movement list filter state.
//!
//! Same reducer shape as the product list: the UI owns an immutable state
//! value and re-queries on every change.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockroom_core::ProductId;

use crate::movement::MovementKind;

/// Movements are paginated fifteen to a page.
pub const MOVEMENT_PAGE_SIZE: u32 = 15;

/// Filter state driving the movement list view.
///
/// Every filter change resets to page 1, date bounds included. (The system
/// this replaces reset only on product/type changes; the asymmetry was an
/// oversight, not a behavior worth keeping.)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementListState {
    product_id: Option<ProductId>,
    kind: Option<MovementKind>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    page: u32,
}

impl Default for MovementListState {
    fn default() -> Self {
        Self {
            product_id: None,
            kind: None,
            date_from: None,
            date_to: None,
            page: 1,
        }
    }
}

impl MovementListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product_id(&self) -> Option<ProductId> {
        self.product_id
    }

    pub fn kind(&self) -> Option<MovementKind> {
        self.kind
    }

    /// Inclusive lower bound on the movement's creation *date* (not time).
    pub fn date_from(&self) -> Option<NaiveDate> {
        self.date_from
    }

    /// Inclusive upper bound on the movement's creation date.
    pub fn date_to(&self) -> Option<NaiveDate> {
        self.date_to
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        MOVEMENT_PAGE_SIZE
    }

    pub fn with_product(self, product_id: Option<ProductId>) -> Self {
        Self {
            product_id,
            page: 1,
            ..self
        }
    }

    pub fn with_kind(self, kind: Option<MovementKind>) -> Self {
        Self {
            kind,
            page: 1,
            ..self
        }
    }

    pub fn with_date_from(self, date_from: Option<NaiveDate>) -> Self {
        Self {
            date_from,
            page: 1,
            ..self
        }
    }

    pub fn with_date_to(self, date_to: Option<NaiveDate>) -> Self {
        Self {
            date_to,
            page: 1,
            ..self
        }
    }

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
    fn every_filter_change_resets_the_page() {
        let base = || MovementListState::new().with_page(3);
        let date = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();

        assert_eq!(base().with_product(Some(ProductId::new())).page(), 1);
        assert_eq!(base().with_kind(Some(MovementKind::Out)).page(), 1);
        assert_eq!(base().with_date_from(Some(date)).page(), 1);
        assert_eq!(base().with_date_to(Some(date)).page(), 1);
    }

    #[test]
    fn paging_keeps_the_filters() {
        let product_id = ProductId::new();
        let state = MovementListState::new()
            .with_product(Some(product_id))
            .with_kind(Some(MovementKind::In))
            .with_page(2);
        assert_eq!(state.page(), 2);
        assert_eq!(state.product_id(), Some(product_id));
        assert_eq!(state.kind(), Some(MovementKind::In));
    }
}
