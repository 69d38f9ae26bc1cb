//! Deterministic seed data.
//!
//! Mirrors the catalog the system ships with for dev and demo environments:
//! five categories, ten products, three users (one per role). Seeding an
//! already-seeded store fails on the SKU/email uniqueness constraints, so
//! call it once against an empty store.

use stockroom_auth::{Role, UserDraft};
use stockroom_catalog::{CategoryDraft, ProductDraft};

use crate::error::StoreResult;
use crate::repository::Store;
use crate::rows::SeedData;

const CATEGORIES: [&str; 5] = [
    "Electronics",
    "Clothing",
    "Books",
    "Food & Beverages",
    "Home & Garden",
];

const PRODUCTS: [(&str, &str, &str, i64); 10] = [
    ("Laptop Dell XPS 13", "DELL-XPS-001", "Electronics", 15),
    ("iPhone 14 Pro", "APPL-IP14-001", "Electronics", 8),
    ("Samsung TV 55\"", "SAMS-TV55-001", "Electronics", 5),
    ("T-Shirt Blue L", "TSH-BLU-L-001", "Clothing", 50),
    ("Jeans Black 32", "JNS-BLK-32-001", "Clothing", 30),
    ("Rust Book", "BOOK-RST-001", "Books", 20),
    ("SQL Cookbook", "BOOK-SQL-001", "Books", 12),
    ("Coffee Beans 1kg", "COFF-BEAN-001", "Food & Beverages", 25),
    ("Green Tea Box", "TEA-GRN-001", "Food & Beverages", 40),
    ("Garden Chair", "GARD-CHR-001", "Home & Garden", 18),
];

const USERS: [(&str, &str, Role); 3] = [
    ("Admin", "admin@example.com", Role::Admin),
    ("Manager User", "manager@example.com", Role::Manager),
    ("Stock Worker", "worker@example.com", Role::StockWorker),
];

/// Populate an empty store with the demo catalog.
pub async fn seed(store: &dyn Store) -> StoreResult<SeedData> {
    let mut categories = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        categories.push(store.create_category(CategoryDraft::validate(name)?).await?);
    }

    let category_id = |name: &str| {
        categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
            .expect("seed product references a seed category")
    };

    let mut products = Vec::with_capacity(PRODUCTS.len());
    for (name, sku, category, quantity) in PRODUCTS {
        let draft = ProductDraft::validate(name, sku, quantity, category_id(category))?;
        products.push(store.create_product(draft).await?);
    }

    let mut users = Vec::with_capacity(USERS.len());
    for (name, email, role) in USERS {
        users.push(store.create_user(UserDraft::validate(name, email, role)?).await?);
    }

    tracing::info!(
        categories = categories.len(),
        products = products.len(),
        users = users.len(),
        "seeded store"
    );

    Ok(SeedData {
        categories,
        products,
        users,
    })
}
