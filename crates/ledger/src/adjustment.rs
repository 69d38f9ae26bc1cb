//! The stock-adjustment command.
//!
//! `quantity` on a product is denormalized for fast reads (dashboards, list
//! views); the price of that trade-off is paid here: the quantity update and
//! the ledger insert must land together, atomically, and an `out` that would
//! drive the balance negative must be refused before anything is written.

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, FieldErrors, ProductId, UserId};

use crate::movement::{MovementKind, MovementReason};

/// A validated request to apply a signed quantity change to a product.
///
/// The insufficient-stock precondition depends on the product's *current*
/// quantity, which only the store knows at commit time; it is checked via
/// [`StockAdjustment::apply_to`] inside the store's transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub product_id: ProductId,
    pub user_id: UserId,
    pub kind: MovementKind,
    pub quantity: i64,
    pub reason: MovementReason,
}

impl StockAdjustment {
    /// Validate the request fields. Quantity must be at least 1.
    pub fn new(
        product_id: ProductId,
        user_id: UserId,
        kind: MovementKind,
        quantity: i64,
        reason: MovementReason,
    ) -> DomainResult<Self> {
        let mut errors = FieldErrors::new();
        if quantity < 1 {
            errors.push("quantity", "must be at least 1");
        }
        errors.into_result()?;

        Ok(Self {
            product_id,
            user_id,
            kind,
            quantity,
            reason,
        })
    }

    /// Compute the balance after this adjustment.
    ///
    /// For `out`, refuses to go below zero: fails with `InsufficientStock`
    /// carrying the available balance, and the caller must not have mutated
    /// anything yet.
    pub fn apply_to(&self, current: i64) -> DomainResult<i64> {
        match self.kind {
            MovementKind::In => Ok(current + self.quantity),
            MovementKind::Out => {
                if self.quantity > current {
                    Err(DomainError::InsufficientStock {
                        available: current,
                        requested: self.quantity,
                    })
                } else {
                    Ok(current - self.quantity)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn adjustment(kind: MovementKind, quantity: i64) -> StockAdjustment {
        StockAdjustment::new(
            ProductId::new(),
            UserId::new(),
            kind,
            quantity,
            MovementReason::Adjustment,
        )
        .unwrap()
    }

    #[test]
    fn quantity_below_one_is_a_field_error() {
        for bad in [0, -5] {
            let err = StockAdjustment::new(
                ProductId::new(),
                UserId::new(),
                MovementKind::In,
                bad,
                MovementReason::Received,
            )
            .unwrap_err();
            match err {
                DomainError::Validation(errors) => {
                    assert_eq!(errors.iter().next().map(|e| e.field), Some("quantity"));
                }
                other => panic!("expected Validation, got {other:?}"),
            }
        }
    }

    #[test]
    fn inbound_adds_to_the_balance() {
        assert_eq!(adjustment(MovementKind::In, 5).apply_to(15), Ok(20));
    }

    #[test]
    fn outbound_subtracts_when_covered() {
        assert_eq!(adjustment(MovementKind::Out, 5).apply_to(15), Ok(10));
    }

    #[test]
    fn outbound_to_zero_is_allowed() {
        assert_eq!(adjustment(MovementKind::Out, 15).apply_to(15), Ok(0));
    }

    #[test]
    fn outbound_past_the_balance_is_refused() {
        let err = adjustment(MovementKind::Out, 20).apply_to(10).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                available: 10,
                requested: 20,
            }
        );
    }

    proptest! {
        /// The ledger invariant: after any sequence of adjustments, the
        /// balance equals the initial quantity plus all inbound quantities
        /// minus all outbound quantities that were accepted.
        #[test]
        fn balance_tracks_accepted_movements(
            initial in 0i64..10_000,
            steps in proptest::collection::vec((proptest::bool::ANY, 1i64..500), 0..64),
        ) {
            let mut balance = initial;
            let mut in_sum = 0i64;
            let mut out_sum = 0i64;

            for (inbound, quantity) in steps {
                let kind = if inbound { MovementKind::In } else { MovementKind::Out };
                match adjustment(kind, quantity).apply_to(balance) {
                    Ok(next) => {
                        balance = next;
                        match kind {
                            MovementKind::In => in_sum += quantity,
                            MovementKind::Out => out_sum += quantity,
                        }
                    }
                    Err(DomainError::InsufficientStock { available, .. }) => {
                        // Refused adjustments leave the balance untouched.
                        prop_assert_eq!(available, balance);
                    }
                    Err(other) => panic!("unexpected error: {other:?}"),
                }
            }

            prop_assert!(balance >= 0);
            prop_assert_eq!(balance, initial + in_sum - out_sum);
        }
    }
}
