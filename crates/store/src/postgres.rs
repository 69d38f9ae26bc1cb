//! Postgres store implementation.
//!
//! Runtime queries only; dynamic filter composition goes through
//! `sqlx::QueryBuilder`. The adjustment path wraps the quantity update and
//! the ledger insert in one transaction, with the product row locked while
//! the precondition is checked.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use stockroom_auth::{Role, User, UserDraft};
use stockroom_catalog::{
    Category, CategoryDraft, Product, ProductDraft, ProductListState, ProductUpdate,
};
use stockroom_core::{
    CategoryId, DomainError, FieldErrors, MovementId, Page, PageMeta, ProductId, UserId,
};
use stockroom_ledger::{
    MovementKind, MovementListState, MovementReason, StockAdjustment, StockMovement,
};

use crate::error::{ConstraintViolation, StoreError, StoreResult};
use crate::repository::{CATEGORY_PAGE_SIZE, CatalogStore, LedgerStore, ReportStore, UserStore};
use crate::rows::{
    AdjustmentOutcome, CategoryRow, DashboardStats, LOW_STOCK_THRESHOLD, MovementRow, ProductRow,
};

const MOVEMENT_ROW_SELECT: &str = "SELECT m.id, m.product_id, m.user_id, m.kind, m.quantity, \
     m.reason, m.created_at, p.name AS product_name, u.name AS user_name \
     FROM stock_movements m \
     JOIN products p ON p.id = m.product_id \
     JOIN users u ON u.id = m.user_id";

/// Postgres-backed store.
///
/// Thread safety comes from the SQLx connection pool; every mutation that
/// spans more than one statement runs in an explicit transaction.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        Ok(Self::new(PgPool::connect(database_url).await?))
    }

    /// Apply the schema. Statements are idempotent (`IF NOT EXISTS`).
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(include_str!("../migrations/0001_schema.sql"))
            .execute(&self.pool)
            .await?;
        tracing::info!("schema migration applied");
        Ok(())
    }

    async fn scalar_count(&self, sql: &str) -> Result<u64, sqlx::Error> {
        let row = sqlx::query(sql).fetch_one(&self.pool).await?;
        let count: i64 = row.try_get(0)?;
        Ok(count as u64)
    }
}

fn map_constraint_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            match db.constraint() {
                Some("products_sku_key") => return ConstraintViolation::DuplicateSku.into(),
                Some("users_email_key") => return ConstraintViolation::DuplicateEmail.into(),
                _ => {}
            }
        }
        if db.is_foreign_key_violation() && db.constraint() == Some("products_category_id_fkey") {
            return DomainError::Validation(FieldErrors::single("category_id", "unknown category"))
                .into();
        }
    }
    StoreError::Database(e)
}

fn decode_err(e: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(e))
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        sku: row.try_get("sku")?,
        quantity: row.try_get("quantity")?,
        category_id: CategoryId::from_uuid(row.try_get("category_id")?),
        created_at: row.try_get("created_at")?,
    })
}

fn category_from_row(row: &PgRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: CategoryId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    let role: Role = row
        .try_get::<String, _>("role")?
        .parse()
        .map_err(decode_err)?;
    Ok(User {
        id: UserId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        role,
        created_at: row.try_get("created_at")?,
    })
}

fn movement_row_from_row(row: &PgRow) -> Result<MovementRow, sqlx::Error> {
    let kind: MovementKind = row
        .try_get::<String, _>("kind")?
        .parse()
        .map_err(decode_err)?;
    let reason: MovementReason = row
        .try_get::<String, _>("reason")?
        .parse()
        .map_err(decode_err)?;
    Ok(MovementRow {
        movement: StockMovement {
            id: MovementId::from_uuid(row.try_get("id")?),
            product_id: ProductId::from_uuid(row.try_get("product_id")?),
            user_id: UserId::from_uuid(row.try_get("user_id")?),
            kind,
            quantity: row.try_get("quantity")?,
            reason,
            created_at: row.try_get("created_at")?,
        },
        product_name: row.try_get("product_name")?,
        user_name: row.try_get("user_name")?,
    })
}

/// Append the WHERE clause for a product list. Works for both the count and
/// the row query; the products table must be aliased `p`.
fn push_product_filters(qb: &mut QueryBuilder<'_, Postgres>, state: &ProductListState) {
    let mut sep = " WHERE ";
    if let Some(search) = state.search() {
        let pattern = format!("%{search}%");
        qb.push(sep)
            .push("(p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.sku ILIKE ")
            .push_bind(pattern)
            .push(")");
        sep = " AND ";
    }
    if let Some(category_id) = state.category_id() {
        qb.push(sep)
            .push("p.category_id = ")
            .push_bind(*category_id.as_uuid());
    }
}

/// Append the WHERE clause for a movement list; table aliased `m`. Date
/// bounds compare the UTC calendar date, not the timestamp.
fn push_movement_filters(qb: &mut QueryBuilder<'_, Postgres>, state: &MovementListState) {
    let mut sep = " WHERE ";
    if let Some(product_id) = state.product_id() {
        qb.push(sep)
            .push("m.product_id = ")
            .push_bind(*product_id.as_uuid());
        sep = " AND ";
    }
    if let Some(kind) = state.kind() {
        qb.push(sep).push("m.kind = ").push_bind(kind.as_str());
        sep = " AND ";
    }
    if let Some(from) = state.date_from() {
        qb.push(sep)
            .push("(m.created_at AT TIME ZONE 'UTC')::date >= ")
            .push_bind(from);
        sep = " AND ";
    }
    if let Some(to) = state.date_to() {
        qb.push(sep)
            .push("(m.created_at AT TIME ZONE 'UTC')::date <= ")
            .push_bind(to);
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn create_product(&self, draft: ProductDraft) -> StoreResult<Product> {
        let product = Product {
            id: ProductId::new(),
            name: draft.name,
            sku: draft.sku,
            quantity: draft.quantity,
            category_id: draft.category_id,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO products (id, name, sku, quantity, category_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(*product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.quantity)
        .bind(*product.category_id.as_uuid())
        .bind(product.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_constraint_error)?;

        Ok(product)
    }

    async fn product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query(
            "SELECT id, name, sku, quantity, category_id, created_at \
             FROM products WHERE id = $1",
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(product_from_row).transpose().map_err(Into::into)
    }

    async fn update_product(&self, id: ProductId, update: ProductUpdate) -> StoreResult<Product> {
        let row = sqlx::query(
            "UPDATE products SET name = $1, sku = $2, category_id = $3 WHERE id = $4 \
             RETURNING id, name, sku, quantity, category_id, created_at",
        )
        .bind(&update.name)
        .bind(&update.sku)
        .bind(*update.category_id.as_uuid())
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_constraint_error)?;

        match row {
            Some(row) => Ok(product_from_row(&row)?),
            None => Err(DomainError::NotFound.into()),
        }
    }

    async fn delete_product(&self, id: ProductId) -> StoreResult<()> {
        // Movements cascade via the schema's foreign key.
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound.into());
        }
        Ok(())
    }

    async fn list_products(&self, state: &ProductListState) -> StoreResult<Page<ProductRow>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_product_filters(&mut count, state);
        let total: i64 = count.build().fetch_one(&self.pool).await?.try_get(0)?;

        let meta = PageMeta::new(state.page(), state.page_size(), total as u64);

        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT p.id, p.name, p.sku, p.quantity, p.category_id, p.created_at, \
             c.name AS category_name \
             FROM products p JOIN categories c ON c.id = p.category_id",
        );
        push_product_filters(&mut query, state);
        query
            .push(" ORDER BY p.created_at, p.id")
            .push(" LIMIT ")
            .push_bind(i64::from(meta.page_size))
            .push(" OFFSET ")
            .push_bind(meta.offset() as i64);

        let rows = query.build().fetch_all(&self.pool).await?;
        let rows = rows
            .iter()
            .map(|row| {
                Ok(ProductRow {
                    product: product_from_row(row)?,
                    category_name: row.try_get("category_name")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(Page::new(rows, meta))
    }

    async fn create_category(&self, draft: CategoryDraft) -> StoreResult<Category> {
        let category = Category {
            id: CategoryId::new(),
            name: draft.name,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(*category.id.as_uuid())
            .bind(&category.name)
            .bind(category.created_at)
            .execute(&self.pool)
            .await?;

        Ok(category)
    }

    async fn category(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        let row = sqlx::query("SELECT id, name, created_at FROM categories WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(category_from_row).transpose().map_err(Into::into)
    }

    async fn update_category(&self, id: CategoryId, draft: CategoryDraft) -> StoreResult<Category> {
        let row = sqlx::query(
            "UPDATE categories SET name = $1 WHERE id = $2 RETURNING id, name, created_at",
        )
        .bind(&draft.name)
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(category_from_row(&row)?),
            None => Err(DomainError::NotFound.into()),
        }
    }

    async fn delete_category(&self, id: CategoryId) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let in_use: bool =
            sqlx::query("SELECT EXISTS (SELECT 1 FROM products WHERE category_id = $1)")
                .bind(*id.as_uuid())
                .fetch_one(&mut *tx)
                .await?
                .try_get(0)?;
        if in_use {
            return Err(ConstraintViolation::CategoryInUse.into());
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound.into());
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_categories(&self, page: u32) -> StoreResult<Page<CategoryRow>> {
        let total = self.scalar_count("SELECT COUNT(*) FROM categories").await?;
        let meta = PageMeta::new(page.max(1), CATEGORY_PAGE_SIZE, total);

        let rows = sqlx::query(
            "SELECT c.id, c.name, c.created_at, COUNT(p.id) AS product_count \
             FROM categories c LEFT JOIN products p ON p.category_id = c.id \
             GROUP BY c.id, c.name, c.created_at \
             ORDER BY c.created_at, c.id \
             LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(meta.page_size))
        .bind(meta.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let rows = rows
            .iter()
            .map(|row| {
                let product_count: i64 = row.try_get("product_count")?;
                Ok(CategoryRow {
                    category: category_from_row(row)?,
                    product_count: product_count as u64,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(Page::new(rows, meta))
    }

    async fn all_categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, name, created_at FROM categories ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(category_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}

#[async_trait]
impl LedgerStore for PgStore {
    async fn adjust_stock(&self, adjustment: StockAdjustment) -> StoreResult<AdjustmentOutcome> {
        let mut tx = self.pool.begin().await?;

        // Lock the product row for the duration of the transaction so
        // concurrent adjustments serialize on the store.
        let row = sqlx::query("SELECT quantity FROM products WHERE id = $1 FOR UPDATE")
            .bind(*adjustment.product_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?;
        let current: i64 = match row {
            Some(row) => row.try_get("quantity")?,
            None => return Err(DomainError::NotFound.into()),
        };

        // Precondition before any mutation; dropping the transaction on
        // error rolls back nothing because nothing was written.
        let new_quantity = adjustment.apply_to(current)?;

        sqlx::query("UPDATE products SET quantity = $1 WHERE id = $2")
            .bind(new_quantity)
            .bind(*adjustment.product_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        let movement = StockMovement {
            id: MovementId::new(),
            product_id: adjustment.product_id,
            user_id: adjustment.user_id,
            kind: adjustment.kind,
            quantity: adjustment.quantity,
            reason: adjustment.reason,
            created_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO stock_movements (id, product_id, user_id, kind, quantity, reason, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(*movement.id.as_uuid())
        .bind(*movement.product_id.as_uuid())
        .bind(*movement.user_id.as_uuid())
        .bind(movement.kind.as_str())
        .bind(movement.quantity)
        .bind(movement.reason.as_str())
        .bind(movement.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            product_id = %movement.product_id,
            kind = %movement.kind,
            quantity = movement.quantity,
            new_quantity,
            "stock adjusted"
        );

        Ok(AdjustmentOutcome {
            new_quantity,
            movement,
        })
    }

    async fn list_movements(&self, state: &MovementListState) -> StoreResult<Page<MovementRow>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM stock_movements m");
        push_movement_filters(&mut count, state);
        let total: i64 = count.build().fetch_one(&self.pool).await?.try_get(0)?;

        let meta = PageMeta::new(state.page(), state.page_size(), total as u64);

        let mut query = QueryBuilder::<Postgres>::new(MOVEMENT_ROW_SELECT);
        push_movement_filters(&mut query, state);
        query
            .push(" ORDER BY m.created_at DESC, m.id DESC")
            .push(" LIMIT ")
            .push_bind(i64::from(meta.page_size))
            .push(" OFFSET ")
            .push_bind(meta.offset() as i64);

        let rows = query.build().fetch_all(&self.pool).await?;
        let rows = rows
            .iter()
            .map(movement_row_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(rows, meta))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, draft: UserDraft) -> StoreResult<User> {
        let user = User {
            id: UserId::new(),
            name: draft.name,
            email: draft.email,
            role: draft.role,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO users (id, name, email, role, created_at) VALUES ($1, $2, $3, $4, $5)")
            .bind(*user.id.as_uuid())
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.role.as_str())
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(map_constraint_error)?;

        Ok(user)
    }

    async fn user(&self, id: UserId) -> StoreResult<Option<User>> {
        let row = sqlx::query("SELECT id, name, email, role, created_at FROM users WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose().map_err(Into::into)
    }

    async fn update_user(&self, id: UserId, draft: UserDraft) -> StoreResult<User> {
        let row = sqlx::query(
            "UPDATE users SET name = $1, email = $2, role = $3 WHERE id = $4 \
             RETURNING id, name, email, role, created_at",
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(draft.role.as_str())
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_constraint_error)?;

        match row {
            Some(row) => Ok(user_from_row(&row)?),
            None => Err(DomainError::NotFound.into()),
        }
    }

    async fn delete_user(&self, id: UserId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound.into());
        }
        Ok(())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query("SELECT id, name, email, role, created_at FROM users ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(user_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}

#[async_trait]
impl ReportStore for PgStore {
    async fn dashboard_stats(&self) -> StoreResult<DashboardStats> {
        let total_products = self.scalar_count("SELECT COUNT(*) FROM products").await?;
        let total_categories = self.scalar_count("SELECT COUNT(*) FROM categories").await?;

        let low_stock_products: i64 =
            sqlx::query("SELECT COUNT(*) FROM products WHERE quantity < $1")
                .bind(LOW_STOCK_THRESHOLD)
                .fetch_one(&self.pool)
                .await?
                .try_get(0)?;

        let today_movements = self
            .scalar_count(
                "SELECT COUNT(*) FROM stock_movements \
                 WHERE (created_at AT TIME ZONE 'UTC')::date = (now() AT TIME ZONE 'UTC')::date",
            )
            .await?;

        let recent = sqlx::query(&format!(
            "{MOVEMENT_ROW_SELECT} ORDER BY m.created_at DESC, m.id DESC LIMIT 5"
        ))
        .fetch_all(&self.pool)
        .await?;
        let recent_movements = recent
            .iter()
            .map(movement_row_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let counts = sqlx::query(
            "SELECT c.id, c.name, c.created_at, COUNT(p.id) AS product_count \
             FROM categories c LEFT JOIN products p ON p.category_id = c.id \
             GROUP BY c.id, c.name, c.created_at \
             ORDER BY c.created_at, c.id",
        )
        .fetch_all(&self.pool)
        .await?;
        let category_counts = counts
            .iter()
            .map(|row| {
                let product_count: i64 = row.try_get("product_count")?;
                Ok(CategoryRow {
                    category: category_from_row(row)?,
                    product_count: product_count as u64,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(DashboardStats {
            total_products,
            total_categories,
            low_stock_products: low_stock_products as u64,
            today_movements,
            recent_movements,
            category_counts,
        })
    }
}
