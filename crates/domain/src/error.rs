//! Domain error types.

use common::ContextError;
use thiserror::Error;

use crate::product::{InsufficientStockError, ProductId, ValidationError};
use crate::repository::RepositoryError;
use crate::version::Version;

/// Errors returned by [`crate::ProductService`] operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Input failed value-object validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No product with this id exists.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A product with this id already exists.
    #[error("Product already exists: {0}")]
    ProductExists(ProductId),

    /// A stock decrease exceeded the quantity on hand.
    #[error("{0}")]
    InsufficientStock(#[from] InsufficientStockError),

    /// The product was changed by someone else between load and save.
    #[error(
        "Concurrency conflict for product {id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        id: ProductId,
        expected: Version,
        actual: Version,
    },

    /// The caller cancelled the request or its deadline passed.
    #[error("Request interrupted: {0}")]
    Interrupted(#[from] ContextError),

    /// Any other persistence failure.
    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => DomainError::ProductNotFound(id),
            RepositoryError::ConcurrencyConflict {
                id,
                expected,
                actual,
            } => DomainError::ConcurrencyConflict {
                id,
                expected,
                actual,
            },
            RepositoryError::Interrupted(e) => DomainError::Interrupted(e),
            other => DomainError::Repository(other),
        }
    }
}
