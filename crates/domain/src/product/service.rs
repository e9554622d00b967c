//! Product service: one method per catalog use case.

use common::Context;

use crate::error::DomainError;
use crate::repository::{ProductRepository, RepositoryError, SaveOptions};

use super::{
    AddCategoryToProduct, AdjustStock, CategoryId, CreateProduct, Product, ProductId,
    RemoveCategoryFromProduct, UpdateProduct,
};

/// Service for managing products.
///
/// Holds no product state between calls. Every mutating method loads the
/// product, applies the change and saves it with the version it loaded, so a
/// concurrent writer causes a [`DomainError::ConcurrencyConflict`] instead of a
/// lost update.
pub struct ProductService<R: ProductRepository> {
    repository: R,
}

impl<R: ProductRepository> ProductService<R> {
    /// Creates a new product service over the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Creates a product, failing if the id is taken.
    #[tracing::instrument(skip_all, fields(product_id = %cmd.id))]
    pub async fn create_product(
        &self,
        ctx: &Context,
        cmd: CreateProduct,
    ) -> Result<Product, DomainError> {
        match self.repository.find_by_id(ctx, &cmd.id).await {
            Ok(_) => return Err(DomainError::ProductExists(cmd.id)),
            Err(RepositoryError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let mut product = Product::new(cmd.id, cmd.name, cmd.description, cmd.price, cmd.stock);

        // Another request may have created the same id since the lookup.
        let version = match self
            .repository
            .save(ctx, &product, SaveOptions::expect_new())
            .await
        {
            Ok(version) => version,
            Err(RepositoryError::ConcurrencyConflict { id, .. }) => {
                return Err(DomainError::ProductExists(id));
            }
            Err(e) => return Err(e.into()),
        };
        product.set_version(version);

        metrics::counter!("catalog_products_created_total").increment(1);
        tracing::info!("product created");
        Ok(product)
    }

    /// Replaces name, description, price and stock of an existing product.
    #[tracing::instrument(skip_all, fields(product_id = %cmd.id))]
    pub async fn update_product(
        &self,
        ctx: &Context,
        cmd: UpdateProduct,
    ) -> Result<Product, DomainError> {
        let mut product = self.load(ctx, &cmd.id).await?;

        product.update_name(cmd.name);
        product.update_description(cmd.description);
        product.update_price(cmd.price);
        product.update_stock(cmd.stock);

        let product = self.persist(ctx, product).await?;
        metrics::counter!("catalog_products_updated_total").increment(1);
        tracing::info!(version = %product.version(), "product updated");
        Ok(product)
    }

    /// Deletes an existing product.
    #[tracing::instrument(skip_all, fields(product_id = %id))]
    pub async fn delete_product(&self, ctx: &Context, id: &ProductId) -> Result<(), DomainError> {
        self.load(ctx, id).await?;
        self.repository.delete(ctx, id).await?;

        metrics::counter!("catalog_products_deleted_total").increment(1);
        tracing::info!("product deleted");
        Ok(())
    }

    /// Loads a product by id.
    #[tracing::instrument(skip_all, fields(product_id = %id))]
    pub async fn get_product_by_id(
        &self,
        ctx: &Context,
        id: &ProductId,
    ) -> Result<Product, DomainError> {
        self.load(ctx, id).await
    }

    /// Loads every product.
    #[tracing::instrument(skip_all)]
    pub async fn get_all_products(&self, ctx: &Context) -> Result<Vec<Product>, DomainError> {
        Ok(self.repository.find_all(ctx).await?)
    }

    /// Loads every product tagged with `category_id`.
    #[tracing::instrument(skip_all, fields(category_id = %category_id))]
    pub async fn get_products_by_category(
        &self,
        ctx: &Context,
        category_id: &CategoryId,
    ) -> Result<Vec<Product>, DomainError> {
        Ok(self.repository.find_by_category(ctx, category_id).await?)
    }

    /// Tags a product with a category. Tagging twice is a no-op.
    #[tracing::instrument(
        skip_all,
        fields(product_id = %cmd.product_id, category_id = %cmd.category.id())
    )]
    pub async fn add_category_to_product(
        &self,
        ctx: &Context,
        cmd: AddCategoryToProduct,
    ) -> Result<Product, DomainError> {
        let mut product = self.load(ctx, &cmd.product_id).await?;

        if product.add_category(cmd.category) {
            metrics::counter!("catalog_category_changes_total", "action" => "add").increment(1);
            tracing::info!("category added");
        } else {
            tracing::debug!("category already present");
        }

        self.persist(ctx, product).await
    }

    /// Untags a product. Removing an absent category is a no-op.
    #[tracing::instrument(
        skip_all,
        fields(product_id = %cmd.product_id, category_id = %cmd.category_id)
    )]
    pub async fn remove_category_from_product(
        &self,
        ctx: &Context,
        cmd: RemoveCategoryFromProduct,
    ) -> Result<Product, DomainError> {
        let mut product = self.load(ctx, &cmd.product_id).await?;

        if product.remove_category(&cmd.category_id) {
            metrics::counter!("catalog_category_changes_total", "action" => "remove")
                .increment(1);
            tracing::info!("category removed");
        } else {
            tracing::debug!("category not present");
        }

        self.persist(ctx, product).await
    }

    /// Adds units to a product's stock.
    #[tracing::instrument(skip_all, fields(product_id = %cmd.product_id, quantity = cmd.quantity))]
    pub async fn increase_stock(
        &self,
        ctx: &Context,
        cmd: AdjustStock,
    ) -> Result<Product, DomainError> {
        let mut product = self.load(ctx, &cmd.product_id).await?;
        product.increase_stock(cmd.quantity);

        let product = self.persist(ctx, product).await?;
        metrics::counter!("catalog_stock_adjustments_total", "direction" => "increase")
            .increment(1);
        Ok(product)
    }

    /// Removes units from a product's stock. Nothing is saved if there are
    /// not enough units.
    #[tracing::instrument(skip_all, fields(product_id = %cmd.product_id, quantity = cmd.quantity))]
    pub async fn decrease_stock(
        &self,
        ctx: &Context,
        cmd: AdjustStock,
    ) -> Result<Product, DomainError> {
        let mut product = self.load(ctx, &cmd.product_id).await?;

        if let Err(e) = product.decrease_stock(cmd.quantity) {
            tracing::warn!(available = e.available, "insufficient stock");
            return Err(e.into());
        }

        let product = self.persist(ctx, product).await?;
        metrics::counter!("catalog_stock_adjustments_total", "direction" => "decrease")
            .increment(1);
        Ok(product)
    }

    async fn load(&self, ctx: &Context, id: &ProductId) -> Result<Product, DomainError> {
        Ok(self.repository.find_by_id(ctx, id).await?)
    }

    /// Saves `product` at the version it was loaded with.
    async fn persist(&self, ctx: &Context, mut product: Product) -> Result<Product, DomainError> {
        let expected = product.version();
        let version = self
            .repository
            .save(ctx, &product, SaveOptions::expect_version(expected))
            .await?;
        product.set_version(version);
        Ok(product)
    }
}
