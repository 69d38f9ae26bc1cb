//! In-memory store implementation.
//!
//! Backs dev mode and the test suite. A single `RwLock` over the whole
//! state makes each operation one atomic unit of work, matching the
//! serialization the relational store provides through transactions.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use stockroom_auth::{User, UserDraft};
use stockroom_catalog::{
    Category, CategoryDraft, Product, ProductDraft, ProductListState, ProductUpdate,
};
use stockroom_core::{CategoryId, DomainError, FieldErrors, MovementId, Page, PageMeta, ProductId, UserId};
use stockroom_ledger::{MovementListState, StockAdjustment, StockMovement};

use crate::error::{ConstraintViolation, StoreResult};
use crate::repository::{CATEGORY_PAGE_SIZE, CatalogStore, LedgerStore, ReportStore, UserStore};
use crate::rows::{
    AdjustmentOutcome, CategoryRow, DashboardStats, LOW_STOCK_THRESHOLD, MovementRow, ProductRow,
};

#[derive(Debug, Default)]
struct State {
    categories: Vec<Category>,
    products: Vec<Product>,
    movements: Vec<StockMovement>,
    users: Vec<User>,
}

/// In-memory store (dev/test).
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unknown_category() -> DomainError {
    DomainError::Validation(FieldErrors::single("category_id", "unknown category"))
}

fn ensure_category_exists(state: &State, id: CategoryId) -> StoreResult<()> {
    if state.categories.iter().any(|c| c.id == id) {
        Ok(())
    } else {
        Err(unknown_category().into())
    }
}

fn ensure_sku_free(state: &State, sku: &str, except: Option<ProductId>) -> StoreResult<()> {
    if state
        .products
        .iter()
        .any(|p| p.sku == sku && Some(p.id) != except)
    {
        Err(ConstraintViolation::DuplicateSku.into())
    } else {
        Ok(())
    }
}

fn ensure_email_free(state: &State, email: &str, except: Option<UserId>) -> StoreResult<()> {
    if state
        .users
        .iter()
        .any(|u| u.email == email && Some(u.id) != except)
    {
        Err(ConstraintViolation::DuplicateEmail.into())
    } else {
        Ok(())
    }
}

fn product_row(state: &State, product: &Product) -> ProductRow {
    let category_name = state
        .categories
        .iter()
        .find(|c| c.id == product.category_id)
        .map(|c| c.name.clone())
        .unwrap_or_default();
    ProductRow {
        product: product.clone(),
        category_name,
    }
}

fn movement_row(state: &State, movement: &StockMovement) -> MovementRow {
    let product_name = state
        .products
        .iter()
        .find(|p| p.id == movement.product_id)
        .map(|p| p.name.clone())
        .unwrap_or_default();
    let user_name = state
        .users
        .iter()
        .find(|u| u.id == movement.user_id)
        .map(|u| u.name.clone())
        .unwrap_or_default();
    MovementRow {
        movement: movement.clone(),
        product_name,
        user_name,
    }
}

fn category_row(state: &State, category: &Category) -> CategoryRow {
    let product_count = state
        .products
        .iter()
        .filter(|p| p.category_id == category.id)
        .count() as u64;
    CategoryRow {
        category: category.clone(),
        product_count,
    }
}

/// Movements sorted newest first, ties broken by descending id so paging is
/// deterministic (same order the Postgres store returns).
fn sorted_movements<'a>(
    state: &'a State,
    filter: impl Fn(&StockMovement) -> bool,
) -> Vec<&'a StockMovement> {
    let mut movements: Vec<&StockMovement> =
        state.movements.iter().filter(|m| filter(m)).collect();
    movements.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
    });
    movements
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn create_product(&self, draft: ProductDraft) -> StoreResult<Product> {
        let mut state = self.state.write().unwrap();
        ensure_category_exists(&state, draft.category_id)?;
        ensure_sku_free(&state, &draft.sku, None)?;

        let product = Product {
            id: ProductId::new(),
            name: draft.name,
            sku: draft.sku,
            quantity: draft.quantity,
            category_id: draft.category_id,
            created_at: Utc::now(),
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let state = self.state.read().unwrap();
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }

    async fn update_product(&self, id: ProductId, update: ProductUpdate) -> StoreResult<Product> {
        let mut state = self.state.write().unwrap();
        ensure_category_exists(&state, update.category_id)?;
        ensure_sku_free(&state, &update.sku, Some(id))?;

        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::NotFound)?;
        product.name = update.name;
        product.sku = update.sku;
        product.category_id = update.category_id;
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> StoreResult<()> {
        let mut state = self.state.write().unwrap();
        let index = state
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(DomainError::NotFound)?;
        state.products.remove(index);
        // Ledger cascade, matching the relational schema.
        state.movements.retain(|m| m.product_id != id);
        Ok(())
    }

    async fn list_products(&self, list: &ProductListState) -> StoreResult<Page<ProductRow>> {
        let state = self.state.read().unwrap();

        let needle = list.search().map(|s| s.to_lowercase());
        let filtered: Vec<&Product> = state
            .products
            .iter()
            .filter(|p| {
                let search_ok = match &needle {
                    Some(needle) => {
                        p.name.to_lowercase().contains(needle)
                            || p.sku.to_lowercase().contains(needle)
                    }
                    None => true,
                };
                let category_ok = list.category_id().is_none_or(|c| p.category_id == c);
                search_ok && category_ok
            })
            .collect();

        let meta = PageMeta::new(list.page(), list.page_size(), filtered.len() as u64);
        let rows = filtered
            .into_iter()
            .skip(meta.offset() as usize)
            .take(meta.page_size as usize)
            .map(|p| product_row(&state, p))
            .collect();
        Ok(Page::new(rows, meta))
    }

    async fn create_category(&self, draft: CategoryDraft) -> StoreResult<Category> {
        let mut state = self.state.write().unwrap();
        let category = Category {
            id: CategoryId::new(),
            name: draft.name,
            created_at: Utc::now(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn category(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        let state = self.state.read().unwrap();
        Ok(state.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn update_category(&self, id: CategoryId, draft: CategoryDraft) -> StoreResult<Category> {
        let mut state = self.state.write().unwrap();
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DomainError::NotFound)?;
        category.name = draft.name;
        Ok(category.clone())
    }

    async fn delete_category(&self, id: CategoryId) -> StoreResult<()> {
        let mut state = self.state.write().unwrap();
        let index = state
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(DomainError::NotFound)?;
        if state.products.iter().any(|p| p.category_id == id) {
            return Err(ConstraintViolation::CategoryInUse.into());
        }
        state.categories.remove(index);
        Ok(())
    }

    async fn list_categories(&self, page: u32) -> StoreResult<Page<CategoryRow>> {
        let state = self.state.read().unwrap();
        let meta = PageMeta::new(
            page.max(1),
            CATEGORY_PAGE_SIZE,
            state.categories.len() as u64,
        );
        let rows = state
            .categories
            .iter()
            .skip(meta.offset() as usize)
            .take(meta.page_size as usize)
            .map(|c| category_row(&state, c))
            .collect();
        Ok(Page::new(rows, meta))
    }

    async fn all_categories(&self) -> StoreResult<Vec<Category>> {
        let state = self.state.read().unwrap();
        Ok(state.categories.clone())
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn adjust_stock(&self, adjustment: StockAdjustment) -> StoreResult<AdjustmentOutcome> {
        let mut state = self.state.write().unwrap();
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == adjustment.product_id)
            .ok_or(DomainError::NotFound)?;

        // Precondition checked before anything is written; an error here
        // leaves both the product and the ledger untouched.
        let new_quantity = adjustment.apply_to(product.quantity)?;
        product.quantity = new_quantity;

        let movement = StockMovement {
            id: MovementId::new(),
            product_id: adjustment.product_id,
            user_id: adjustment.user_id,
            kind: adjustment.kind,
            quantity: adjustment.quantity,
            reason: adjustment.reason,
            created_at: Utc::now(),
        };
        state.movements.push(movement.clone());

        Ok(AdjustmentOutcome {
            new_quantity,
            movement,
        })
    }

    async fn list_movements(&self, list: &MovementListState) -> StoreResult<Page<MovementRow>> {
        let state = self.state.read().unwrap();

        let movements = sorted_movements(&state, |m| {
            let product_ok = list.product_id().is_none_or(|p| m.product_id == p);
            let kind_ok = list.kind().is_none_or(|k| m.kind == k);
            let date = m.created_at.date_naive();
            let from_ok = list.date_from().is_none_or(|from| date >= from);
            let to_ok = list.date_to().is_none_or(|to| date <= to);
            product_ok && kind_ok && from_ok && to_ok
        });

        let meta = PageMeta::new(list.page(), list.page_size(), movements.len() as u64);
        let rows = movements
            .into_iter()
            .skip(meta.offset() as usize)
            .take(meta.page_size as usize)
            .map(|m| movement_row(&state, m))
            .collect();
        Ok(Page::new(rows, meta))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, draft: UserDraft) -> StoreResult<User> {
        let mut state = self.state.write().unwrap();
        ensure_email_free(&state, &draft.email, None)?;

        let user = User {
            id: UserId::new(),
            name: draft.name,
            email: draft.email,
            role: draft.role,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn user(&self, id: UserId) -> StoreResult<Option<User>> {
        let state = self.state.read().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_user(&self, id: UserId, draft: UserDraft) -> StoreResult<User> {
        let mut state = self.state.write().unwrap();
        ensure_email_free(&state, &draft.email, Some(id))?;

        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DomainError::NotFound)?;
        user.name = draft.name;
        user.email = draft.email;
        user.role = draft.role;
        Ok(user.clone())
    }

    async fn delete_user(&self, id: UserId) -> StoreResult<()> {
        let mut state = self.state.write().unwrap();
        let index = state
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(DomainError::NotFound)?;
        state.users.remove(index);
        // Movement cascade on the acting user, matching the relational schema.
        state.movements.retain(|m| m.user_id != id);
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let state = self.state.read().unwrap();
        Ok(state.users.clone())
    }
}

#[async_trait]
impl ReportStore for InMemoryStore {
    async fn dashboard_stats(&self) -> StoreResult<DashboardStats> {
        let state = self.state.read().unwrap();
        let today = Utc::now().date_naive();

        let recent_movements = sorted_movements(&state, |_| true)
            .into_iter()
            .take(5)
            .map(|m| movement_row(&state, m))
            .collect();

        Ok(DashboardStats {
            total_products: state.products.len() as u64,
            total_categories: state.categories.len() as u64,
            low_stock_products: state
                .products
                .iter()
                .filter(|p| p.quantity < LOW_STOCK_THRESHOLD)
                .count() as u64,
            today_movements: state
                .movements
                .iter()
                .filter(|m| m.created_at.date_naive() == today)
                .count() as u64,
            recent_movements,
            category_counts: state
                .categories
                .iter()
                .map(|c| category_row(&state, c))
                .collect(),
        })
    }
}
