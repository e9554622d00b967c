//! Persistence contract for products.

mod memory;

pub use memory::InMemoryProductRepository;

use async_trait::async_trait;
use common::{Context, ContextError};
use thiserror::Error;

use crate::product::{CategoryId, Product, ProductId};
use crate::version::Version;

/// Errors that can occur when interacting with a product repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No product is stored under this id.
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

    /// The request context stopped the operation.
    #[error(transparent)]
    Interrupted(#[from] ContextError),

    /// The storage backend failed.
    #[error("Storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps any backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        RepositoryError::Backend(Box::new(err))
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Options for saving a product.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveOptions {
    /// Version the stored product must be at for the save to succeed.
    /// If None, the save overwrites unconditionally.
    pub expected_version: Option<Version>,
}

impl SaveOptions {
    /// Creates options with no version check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects the stored product to be at `version`.
    pub fn expect_version(version: Version) -> Self {
        Self {
            expected_version: Some(version),
        }
    }

    /// Expects no product to be stored under the id yet.
    pub fn expect_new() -> Self {
        Self::expect_version(Version::initial())
    }
}

/// Core trait for product persistence.
///
/// Implementations must be thread-safe and honour the [`Context`]: an
/// interrupted call returns [`RepositoryError::Interrupted`] and leaves no
/// partial write behind.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Loads a product by id.
    async fn find_by_id(&self, ctx: &Context, id: &ProductId) -> RepositoryResult<Product>;

    /// Loads every product, ordered by id.
    async fn find_all(&self, ctx: &Context) -> RepositoryResult<Vec<Product>>;

    /// Loads every product tagged with `category_id`, ordered by id.
    async fn find_by_category(
        &self,
        ctx: &Context,
        category_id: &CategoryId,
    ) -> RepositoryResult<Vec<Product>>;

    /// Creates or overwrites the product stored under its id.
    ///
    /// Returns the version the product is stored at. The passed product's own
    /// version is ignored; use `options` for concurrency checks.
    async fn save(
        &self,
        ctx: &Context,
        product: &Product,
        options: SaveOptions,
    ) -> RepositoryResult<Version>;

    /// Removes a product. Fails with `NotFound` if it does not exist.
    async fn delete(&self, ctx: &Context, id: &ProductId) -> RepositoryResult<()>;
}
