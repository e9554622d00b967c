use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::Context;
use tokio::sync::RwLock;

use super::{ProductRepository, RepositoryError, RepositoryResult, SaveOptions};
use crate::product::{CategoryId, Product, ProductId};
use crate::version::Version;

/// In-memory product repository.
///
/// A single reader/writer lock guards the whole map: lookups share it, saves
/// and deletes take it exclusively. Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored products.
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, ctx: &Context, id: &ProductId) -> RepositoryResult<Product> {
        let products = ctx.run(self.products.read()).await?;
        products
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn find_all(&self, ctx: &Context) -> RepositoryResult<Vec<Product>> {
        let products = ctx.run(self.products.read()).await?;
        Ok(products.values().cloned().collect())
    }

    async fn find_by_category(
        &self,
        ctx: &Context,
        category_id: &CategoryId,
    ) -> RepositoryResult<Vec<Product>> {
        let products = ctx.run(self.products.read()).await?;
        Ok(products
            .values()
            .filter(|p| p.has_category(category_id))
            .cloned()
            .collect())
    }

    async fn save(
        &self,
        ctx: &Context,
        product: &Product,
        options: SaveOptions,
    ) -> RepositoryResult<Version> {
        let mut products = ctx.run(self.products.write()).await?;

        let current = products
            .get(product.id())
            .map(Product::version)
            .unwrap_or(Version::initial());

        if let Some(expected) = options.expected_version
            && current != expected
        {
            return Err(RepositoryError::ConcurrencyConflict {
                id: product.id().clone(),
                expected,
                actual: current,
            });
        }

        // Last chance to back out before the write becomes visible.
        ctx.check()?;

        let next = current.next();
        let mut stored = product.clone();
        stored.set_version(next);
        products.insert(stored.id().clone(), stored);

        Ok(next)
    }

    async fn delete(&self, ctx: &Context, id: &ProductId) -> RepositoryResult<()> {
        let mut products = ctx.run(self.products.write()).await?;
        if !products.contains_key(id) {
            return Err(RepositoryError::NotFound(id.clone()));
        }
        ctx.check()?;
        products.remove(id);
        Ok(())
    }
}
