//! Repository contracts.
//!
//! Two implementations exist: [`crate::memory::InMemoryStore`] for dev and
//! tests, and [`crate::postgres::PgStore`] for real deployments. Both must
//! satisfy the same semantics; the ledger tests run against the in-memory
//! one.

use async_trait::async_trait;

use stockroom_auth::{User, UserDraft};
use stockroom_catalog::{Category, CategoryDraft, Product, ProductDraft, ProductListState, ProductUpdate};
use stockroom_core::{CategoryId, Page, ProductId, UserId};
use stockroom_ledger::{MovementListState, StockAdjustment};

use crate::error::StoreResult;
use crate::rows::{AdjustmentOutcome, CategoryRow, DashboardStats, MovementRow, ProductRow};

/// Categories are paginated ten to a page (no filters on that view).
pub const CATEGORY_PAGE_SIZE: u32 = 10;

/// Products and categories.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert a product. Duplicate SKU is a constraint violation; an unknown
    /// category is a field error on `category_id`.
    async fn create_product(&self, draft: ProductDraft) -> StoreResult<Product>;

    async fn product(&self, id: ProductId) -> StoreResult<Option<Product>>;

    /// Edit name/sku/category. Never touches quantity.
    async fn update_product(&self, id: ProductId, update: ProductUpdate) -> StoreResult<Product>;

    /// Delete a product. Its movements cascade away with it.
    async fn delete_product(&self, id: ProductId) -> StoreResult<()>;

    /// One page of the filtered product list, stable insertion order.
    async fn list_products(&self, state: &ProductListState) -> StoreResult<Page<ProductRow>>;

    async fn create_category(&self, draft: CategoryDraft) -> StoreResult<Category>;

    async fn category(&self, id: CategoryId) -> StoreResult<Option<Category>>;

    async fn update_category(&self, id: CategoryId, draft: CategoryDraft) -> StoreResult<Category>;

    /// Refused with `CategoryInUse` while any product references the
    /// category.
    async fn delete_category(&self, id: CategoryId) -> StoreResult<()>;

    async fn list_categories(&self, page: u32) -> StoreResult<Page<CategoryRow>>;

    /// Every category, for filter dropdowns.
    async fn all_categories(&self) -> StoreResult<Vec<Category>>;
}

/// The stock ledger.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Apply an adjustment: update the product's quantity and append the
    /// movement, atomically. Either both happen or neither.
    async fn adjust_stock(&self, adjustment: StockAdjustment) -> StoreResult<AdjustmentOutcome>;

    /// One page of the filtered movement list, newest first.
    async fn list_movements(&self, state: &MovementListState) -> StoreResult<Page<MovementRow>>;
}

/// User administration.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, draft: UserDraft) -> StoreResult<User>;

    async fn user(&self, id: UserId) -> StoreResult<Option<User>>;

    async fn update_user(&self, id: UserId, draft: UserDraft) -> StoreResult<User>;

    async fn delete_user(&self, id: UserId) -> StoreResult<()>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;
}

/// Dashboard aggregates.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn dashboard_stats(&self) -> StoreResult<DashboardStats>;
}

/// The full persistence surface, for callers that need all of it.
pub trait Store: CatalogStore + LedgerStore + UserStore + ReportStore {}

impl<T: CatalogStore + LedgerStore + UserStore + ReportStore> Store for T {}
