//! Store error model.

use thiserror::Error;

use stockroom_core::DomainError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a store implementation.
///
/// Domain failures (validation, insufficient stock, not found) pass through
/// unchanged so callers can render them field-scoped. Constraint violations
/// are user-facing but not tied to a single field. Database errors are
/// unrecoverable here: no retries, they propagate to the generic failure
/// boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Constraint(#[from] ConstraintViolation),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A store-level rule the request ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    #[error("a product with this SKU already exists")]
    DuplicateSku,

    #[error("a user with this email already exists")]
    DuplicateEmail,

    #[error("cannot delete a category that still has products")]
    CategoryInUse,
}
