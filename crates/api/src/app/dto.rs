//! Request DTOs, query-string models, and their mapping into domain types.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use stockroom_auth::Role;
use stockroom_catalog::ProductListState;
use stockroom_core::{CategoryId, DomainError, DomainResult, FieldErrors, ProductId};
use stockroom_ledger::{MovementKind, MovementListState, MovementReason};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub category_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub sku: String,
    pub category_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub kind: String,
    pub quantity: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

impl AdjustStockRequest {
    /// Resolve the enum fields, collecting every offending field at once.
    /// A missing/blank reason falls back to the default (`adjustment`).
    pub fn parse(&self) -> DomainResult<(MovementKind, MovementReason)> {
        let mut errors = FieldErrors::new();

        let kind = self.kind.parse::<MovementKind>();
        if let Err(e) = &kind {
            errors.push("kind", e.to_string());
        }

        let reason = match self.reason.as_deref() {
            None | Some("") => Ok(MovementReason::default()),
            Some(raw) => raw.parse::<MovementReason>(),
        };
        if let Err(e) = &reason {
            errors.push("reason", e.to_string());
        }

        if self.quantity < 1 {
            errors.push("quantity", "must be at least 1");
        }

        if let (Ok(kind), Ok(reason)) = (kind, reason) {
            errors.into_result()?;
            return Ok((kind, reason));
        }
        Err(DomainError::Validation(errors))
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl UserRequest {
    pub fn parse_role(&self) -> DomainResult<Role> {
        self.role.parse::<Role>().map_err(|e| {
            DomainError::Validation(FieldErrors::single("role", e.to_string()))
        })
    }
}

// -------------------------
// Query-string models
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub page: Option<u32>,
}

impl ProductListQuery {
    pub fn into_state(self) -> ProductListState {
        let mut state = ProductListState::new();
        if let Some(search) = self.search {
            state = state.with_search(search);
        }
        state
            .with_category(self.category_id.map(CategoryId::from_uuid))
            .with_page(self.page.unwrap_or(1))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MovementListQuery {
    pub product_id: Option<Uuid>,
    pub kind: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: Option<u32>,
}

impl MovementListQuery {
    pub fn into_state(self) -> DomainResult<MovementListState> {
        let kind = match self.kind.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<MovementKind>().map_err(|e| {
                DomainError::Validation(FieldErrors::single("kind", e.to_string()))
            })?),
        };

        Ok(MovementListState::new()
            .with_product(self.product_id.map(ProductId::from_uuid))
            .with_kind(kind)
            .with_date_from(self.date_from)
            .with_date_to(self.date_to)
            .with_page(self.page.unwrap_or(1)))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_request_reports_every_bad_field() {
        let request = AdjustStockRequest {
            kind: "sideways".to_string(),
            quantity: 0,
            reason: Some("stolen".to_string()),
        };
        match request.parse() {
            Err(DomainError::Validation(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["kind", "reason", "quantity"]);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn adjust_request_defaults_the_reason() {
        let request = AdjustStockRequest {
            kind: "in".to_string(),
            quantity: 3,
            reason: None,
        };
        let (kind, reason) = request.parse().unwrap();
        assert_eq!(kind, MovementKind::In);
        assert_eq!(reason, MovementReason::Adjustment);
    }

    #[test]
    fn movement_query_rejects_unknown_kind() {
        let query = MovementListQuery {
            kind: Some("both".to_string()),
            ..Default::default()
        };
        assert!(query.into_state().is_err());
    }

    #[test]
    fn product_query_maps_onto_list_state() {
        let query = ProductListQuery {
            search: Some("laptop".to_string()),
            category_id: None,
            page: Some(3),
        };
        let state = query.into_state();
        assert_eq!(state.search(), Some("laptop"));
        assert_eq!(state.page(), 3);
    }
}
