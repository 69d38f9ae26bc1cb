use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{CategoryId, DomainResult, FieldErrors, ProductId};

/// A product in the catalog.
///
/// `quantity` is a materialized running balance: it is only ever changed by
/// the stock-adjustment operation, which records a matching ledger entry in
/// the same transaction. Edits to name/sku/category never touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub category_id: CategoryId,
}

impl ProductDraft {
    /// Validate raw form input, reporting per-field errors.
    ///
    /// SKU uniqueness is a store constraint, checked at insert time.
    pub fn validate(
        name: &str,
        sku: &str,
        quantity: i64,
        category_id: CategoryId,
    ) -> DomainResult<Self> {
        let mut errors = FieldErrors::new();

        let name = name.trim();
        if name.is_empty() {
            errors.push("name", "must not be empty");
        }

        let sku = sku.trim();
        if sku.is_empty() {
            errors.push("sku", "must not be empty");
        }

        if quantity < 0 {
            errors.push("quantity", "must not be negative");
        }

        errors.into_result()?;

        Ok(Self {
            name: name.to_string(),
            sku: sku.to_string(),
            quantity,
            category_id,
        })
    }
}

/// Validated input for editing a product.
///
/// Deliberately has no quantity field: stock levels change only through the
/// ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: String,
    pub sku: String,
    pub category_id: CategoryId,
}

impl ProductUpdate {
    pub fn validate(name: &str, sku: &str, category_id: CategoryId) -> DomainResult<Self> {
        let draft = ProductDraft::validate(name, sku, 0, category_id)?;
        Ok(Self {
            name: draft.name,
            sku: draft.sku,
            category_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::DomainError;

    #[test]
    fn draft_trims_and_accepts_valid_input() {
        let category_id = CategoryId::new();
        let draft = ProductDraft::validate("  Laptop  ", " SKU-001 ", 15, category_id).unwrap();
        assert_eq!(draft.name, "Laptop");
        assert_eq!(draft.sku, "SKU-001");
        assert_eq!(draft.quantity, 15);
    }

    #[test]
    fn draft_rejects_empty_name_and_sku_together() {
        let err = ProductDraft::validate("  ", "", 0, CategoryId::new()).unwrap_err();
        match err {
            DomainError::Validation(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["name", "sku"]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn draft_rejects_negative_quantity() {
        let err = ProductDraft::validate("Laptop", "SKU-001", -1, CategoryId::new()).unwrap_err();
        match err {
            DomainError::Validation(errors) => {
                assert_eq!(errors.iter().next().map(|e| e.field), Some("quantity"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn update_has_no_quantity() {
        let update = ProductUpdate::validate("Laptop", "SKU-001", CategoryId::new()).unwrap();
        assert_eq!(update.name, "Laptop");
        assert_eq!(update.sku, "SKU-001");
    }
}
