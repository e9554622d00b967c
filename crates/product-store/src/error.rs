use domain::{ProductId, RepositoryError, Version};
use thiserror::Error;

/// Errors that can occur in the PostgreSQL product store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row exists for this product id.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The stored version did not match the expected version.
    #[error(
        "Concurrency conflict for product {id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        id: ProductId,
        expected: Version,
        actual: Version,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row no longer satisfies the product invariants.
    #[error("Invalid record for product {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    /// A quantity does not fit the BIGINT column.
    #[error("{field} value {value} is out of range for storage")]
    OutOfRange { field: &'static str, value: u64 },
}

impl StoreError {
    pub(crate) fn invalid(id: impl Into<String>, reason: impl ToString) -> Self {
        StoreError::InvalidRecord {
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => RepositoryError::NotFound(id),
            StoreError::ConcurrencyConflict {
                id,
                expected,
                actual,
            } => RepositoryError::ConcurrencyConflict {
                id,
                expected,
                actual,
            },
            other => RepositoryError::backend(other),
        }
    }
}

/// Result type for product store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
