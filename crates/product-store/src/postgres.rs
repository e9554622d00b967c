use async_trait::async_trait;
use common::Context;
use domain::{
    Category, CategoryId, CategoryName, Price, Product, ProductDescription, ProductId,
    ProductName, ProductParts, ProductRepository, RepositoryResult, SaveOptions, Stock, Version,
};
use sqlx::{PgPool, Row, postgres::PgPoolOptions, postgres::PgRow};

use crate::{Result, StoreError};

const SELECT_PRODUCTS: &str = r#"
    SELECT p.id, p.name, p.description, p.price_amount, p.price_currency, p.stock,
           p.created_at, p.updated_at, p.version,
           c.category_id, c.category_name
    FROM products p
    LEFT JOIN product_categories c ON c.product_id = p.id
"#;

const ORDER_PRODUCTS: &str = " ORDER BY p.id ASC, c.position ASC";

/// PostgreSQL-backed product repository.
///
/// Each product is a row in `products` plus its ordered tags in
/// `product_categories`. Saves replace both inside one transaction.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// Creates a new repository over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn fetch_products(&self, filter: &str, bind: Option<&str>) -> Result<Vec<Product>> {
        let sql = format!("{SELECT_PRODUCTS}{filter}{ORDER_PRODUCTS}");
        let mut query = sqlx::query(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows_to_products(rows)
    }

    async fn save_in_tx(&self, product: &Product, options: SaveOptions) -> Result<Version> {
        let id = product.id();
        let mut tx = self.pool.begin().await?;

        let stored: Option<i64> =
            sqlx::query_scalar("SELECT version FROM products WHERE id = $1 FOR UPDATE")
                .bind(id.as_str())
                .fetch_optional(&mut *tx)
                .await?;
        let current = match stored {
            Some(v) => to_version(id.as_str(), v)?,
            None => Version::initial(),
        };

        if let Some(expected) = options.expected_version
            && expected != current
        {
            return Err(StoreError::ConcurrencyConflict {
                id: id.clone(),
                expected,
                actual: current,
            });
        }

        let next = current.next();
        let amount = to_i64("price", product.price().amount())?;
        let stock = to_i64("stock", product.stock().quantity())?;
        let version = to_i64("version", next.as_u64())?;

        if stored.is_some() {
            sqlx::query(
                r#"
                UPDATE products
                SET name = $2, description = $3, price_amount = $4, price_currency = $5,
                    stock = $6, created_at = $7, updated_at = $8, version = $9
                WHERE id = $1
                "#,
            )
            .bind(id.as_str())
            .bind(product.name().as_str())
            .bind(product.description().as_str())
            .bind(amount)
            .bind(product.price().currency())
            .bind(stock)
            .bind(product.created_at())
            .bind(product.updated_at())
            .bind(version)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(
                r#"
                INSERT INTO products
                    (id, name, description, price_amount, price_currency, stock,
                     created_at, updated_at, version)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(id.as_str())
            .bind(product.name().as_str())
            .bind(product.description().as_str())
            .bind(amount)
            .bind(product.price().currency())
            .bind(stock)
            .bind(product.created_at())
            .bind(product.updated_at())
            .bind(version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                // A concurrent insert of the same id won the race
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.constraint() == Some("products_pkey")
                {
                    return StoreError::ConcurrencyConflict {
                        id: id.clone(),
                        expected: options.expected_version.unwrap_or(Version::initial()),
                        actual: Version::first(),
                    };
                }
                StoreError::Database(e)
            })?;
        }

        sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
            .bind(id.as_str())
            .execute(&mut *tx)
            .await?;

        for (position, category) in product.categories().iter().enumerate() {
            let position = i32::try_from(position).map_err(|_| StoreError::OutOfRange {
                field: "category position",
                value: position as u64,
            })?;
            sqlx::query(
                r#"
                INSERT INTO product_categories (product_id, category_id, category_name, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(id.as_str())
            .bind(category.id().as_str())
            .bind(category.name().as_str())
            .bind(position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(next)
    }

    async fn delete_row(&self, id: &ProductId) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn find_by_id(&self, ctx: &Context, id: &ProductId) -> RepositoryResult<Product> {
        let products = ctx
            .run(self.fetch_products(" WHERE p.id = $1", Some(id.as_str())))
            .await??;

        products
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(id.clone()).into())
    }

    async fn find_all(&self, ctx: &Context) -> RepositoryResult<Vec<Product>> {
        Ok(ctx.run(self.fetch_products("", None)).await??)
    }

    async fn find_by_category(
        &self,
        ctx: &Context,
        category_id: &CategoryId,
    ) -> RepositoryResult<Vec<Product>> {
        let filter = " WHERE p.id IN \
                      (SELECT product_id FROM product_categories WHERE category_id = $1)";
        Ok(ctx
            .run(self.fetch_products(filter, Some(category_id.as_str())))
            .await??)
    }

    #[tracing::instrument(skip_all, fields(product_id = %product.id()))]
    async fn save(
        &self,
        ctx: &Context,
        product: &Product,
        options: SaveOptions,
    ) -> RepositoryResult<Version> {
        ctx.check()?;
        // Dropping the future on interruption rolls the transaction back.
        let version = ctx.run(self.save_in_tx(product, options)).await??;
        tracing::debug!(%version, "product row saved");
        Ok(version)
    }

    #[tracing::instrument(skip_all, fields(product_id = %id))]
    async fn delete(&self, ctx: &Context, id: &ProductId) -> RepositoryResult<()> {
        ctx.check()?;
        Ok(ctx.run(self.delete_row(id)).await??)
    }
}

/// Folds joined rows, already ordered by product id then position, into
/// products.
fn rows_to_products(rows: Vec<PgRow>) -> Result<Vec<Product>> {
    let mut parts: Vec<ProductParts> = Vec::new();

    for row in rows {
        let id: String = row.try_get("id")?;
        let starts_new = parts.last().is_none_or(|last| last.id.as_str() != id);
        if starts_new {
            parts.push(row_to_parts(&row, &id)?);
        }

        let category_id: Option<String> = row.try_get("category_id")?;
        let category_name: Option<String> = row.try_get("category_name")?;
        if let (Some(category_id), Some(category_name)) = (category_id, category_name)
            && let Some(current) = parts.last_mut()
        {
            let category = Category::new(
                CategoryId::new(category_id).map_err(|e| StoreError::invalid(&id, e))?,
                CategoryName::new(category_name).map_err(|e| StoreError::invalid(&id, e))?,
            );
            current.categories.push(category);
        }
    }

    Ok(parts.into_iter().map(Product::from_parts).collect())
}

fn row_to_parts(row: &PgRow, id: &str) -> Result<ProductParts> {
    let invalid = |reason: domain::ValidationError| StoreError::invalid(id, reason);

    let name: String = row.try_get("name")?;
    let description: String = row.try_get("description")?;
    let amount: i64 = row.try_get("price_amount")?;
    let currency: String = row.try_get("price_currency")?;
    let stock: i64 = row.try_get("stock")?;
    let version: i64 = row.try_get("version")?;

    Ok(ProductParts {
        id: ProductId::new(id).map_err(invalid)?,
        name: ProductName::new(name).map_err(invalid)?,
        description: ProductDescription::new(description).map_err(invalid)?,
        price: Price::new(to_u64(id, amount)?, currency).map_err(invalid)?,
        stock: Stock::new(to_u64(id, stock)?).map_err(invalid)?,
        categories: Vec::new(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        version: to_version(id, version)?,
    })
}

fn to_u64(id: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| StoreError::invalid(id, format!("negative value {value}")))
}

fn to_version(id: &str, value: i64) -> Result<Version> {
    to_u64(id, value).map(Version::new)
}

fn to_i64(field: &'static str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| StoreError::OutOfRange { field, value })
}
