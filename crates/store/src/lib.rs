//! `stockroom-store` — persistence for the catalog, ledger, and users.
//!
//! Repository traits with two implementations: [`memory::InMemoryStore`]
//! for dev/test and [`postgres::PgStore`] for deployments.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod rows;
pub mod seed;

pub use error::{ConstraintViolation, StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use postgres::PgStore;
pub use repository::{CATEGORY_PAGE_SIZE, CatalogStore, LedgerStore, ReportStore, Store, UserStore};
pub use rows::{
    AdjustmentOutcome, CategoryRow, DashboardStats, LOW_STOCK_THRESHOLD, MovementRow, ProductRow,
    SeedData,
};
pub use seed::seed;
