//! Product commands.
//!
//! Each command carries validated value objects. The `parse` constructors take
//! the raw primitives a request handler decodes and reject invalid input before
//! the service is reached.

use super::{
    Category, CategoryId, Price, ProductDescription, ProductId, ProductName, Stock,
    ValidationError,
};

/// Command to create a new product.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub id: ProductId,
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: Price,
    pub stock: Stock,
}

impl CreateProduct {
    /// Builds the command from raw fields.
    pub fn parse(
        id: &str,
        name: &str,
        description: &str,
        price: u64,
        currency: &str,
        stock: u64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: ProductId::new(id)?,
            name: ProductName::new(name)?,
            description: ProductDescription::new(description)?,
            price: Price::new(price, currency)?,
            stock: Stock::new(stock)?,
        })
    }
}

/// Command to replace the descriptive fields, price and stock of a product.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub id: ProductId,
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: Price,
    pub stock: Stock,
}

impl UpdateProduct {
    /// Builds the command from raw fields.
    pub fn parse(
        id: &str,
        name: &str,
        description: &str,
        price: u64,
        currency: &str,
        stock: u64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: ProductId::new(id)?,
            name: ProductName::new(name)?,
            description: ProductDescription::new(description)?,
            price: Price::new(price, currency)?,
            stock: Stock::new(stock)?,
        })
    }
}

/// Command to tag a product with a category.
#[derive(Debug, Clone)]
pub struct AddCategoryToProduct {
    pub product_id: ProductId,
    pub category: Category,
}

impl AddCategoryToProduct {
    pub fn parse(
        product_id: &str,
        category_id: &str,
        category_name: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            product_id: ProductId::new(product_id)?,
            category: Category::parse(category_id, category_name)?,
        })
    }
}

/// Command to untag a product.
#[derive(Debug, Clone)]
pub struct RemoveCategoryFromProduct {
    pub product_id: ProductId,
    pub category_id: CategoryId,
}

impl RemoveCategoryFromProduct {
    pub fn parse(product_id: &str, category_id: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            product_id: ProductId::new(product_id)?,
            category_id: CategoryId::new(category_id)?,
        })
    }
}

/// Command to move stock up or down by a number of units.
///
/// The direction is chosen by the service method it is passed to.
#[derive(Debug, Clone)]
pub struct AdjustStock {
    pub product_id: ProductId,
    pub quantity: u64,
}

impl AdjustStock {
    pub fn new(product_id: ProductId, quantity: u64) -> Self {
        Self {
            product_id,
            quantity,
        }
    }

    pub fn parse(product_id: &str, quantity: u64) -> Result<Self, ValidationError> {
        Ok(Self::new(ProductId::new(product_id)?, quantity))
    }
}
