//! Product aggregate and related types.

mod aggregate;
mod category;
mod commands;
mod service;
mod value_objects;

pub use aggregate::{Product, ProductParts};
pub use category::Category;
pub use commands::{
    AddCategoryToProduct, AdjustStock, CreateProduct, RemoveCategoryFromProduct, UpdateProduct,
};
pub use service::ProductService;
pub use value_objects::{
    CategoryId, CategoryName, Price, ProductDescription, ProductId, ProductName, Stock,
};

use thiserror::Error;

/// Malformed input to a value-object constructor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("product id cannot be empty")]
    EmptyProductId,

    #[error("product name cannot be empty")]
    EmptyProductName,

    #[error("product name cannot exceed {max} characters (got {actual})")]
    ProductNameTooLong { max: usize, actual: usize },

    #[error("product description cannot exceed {max} characters (got {actual})")]
    DescriptionTooLong { max: usize, actual: usize },

    #[error("price amount cannot be zero")]
    ZeroPrice,

    #[error("price amount cannot exceed {max} (got {actual})")]
    PriceTooHigh { max: u64, actual: u64 },

    #[error("stock quantity cannot exceed {max} (got {actual})")]
    StockTooHigh { max: u64, actual: u64 },

    #[error("currency cannot be empty")]
    EmptyCurrency,

    #[error("invalid currency format '{0}', must be 3 uppercase letters")]
    InvalidCurrency(String),

    #[error("category id cannot be empty")]
    EmptyCategoryId,

    #[error("category name cannot be empty")]
    EmptyCategoryName,

    #[error("category name cannot exceed {max} characters (got {actual})")]
    CategoryNameTooLong { max: usize, actual: usize },
}

/// A stock decrease asked for more units than are on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient stock: requested {requested}, available {available}")]
pub struct InsufficientStockError {
    pub requested: u64,
    pub available: u64,
}
