//! Display-resolved read models.
//!
//! List views need the associated names (category of a product, product and
//! actor of a movement) alongside each row; stores resolve them in the same
//! query rather than one round-trip per row.

use serde::Serialize;

use stockroom_auth::User;
use stockroom_catalog::{Category, Product};
use stockroom_ledger::StockMovement;

/// Products with fewer than this many units count as "low stock" on the
/// dashboard.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// A product row with its category resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRow {
    #[serde(flatten)]
    pub product: Product,
    pub category_name: String,
}

/// A category row with its product count resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    #[serde(flatten)]
    pub category: Category,
    pub product_count: u64,
}

/// A ledger row with product and actor resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementRow {
    #[serde(flatten)]
    pub movement: StockMovement,
    pub product_name: String,
    pub user_name: String,
}

/// Result of a successful stock adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustmentOutcome {
    pub new_quantity: i64,
    pub movement: StockMovement,
}

/// Aggregates for the dashboard view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_categories: u64,
    pub low_stock_products: u64,
    pub today_movements: u64,
    pub recent_movements: Vec<MovementRow>,
    pub category_counts: Vec<CategoryRow>,
}

/// Entities created by [`crate::seed::seed`].
#[derive(Debug, Clone)]
pub struct SeedData {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub users: Vec<User>,
}
