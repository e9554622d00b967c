//! Domain layer for the product catalog.
//!
//! This crate provides:
//! - Value objects (ids, names, description, price, stock)
//! - The Category entity and the Product aggregate root
//! - The ProductRepository contract with an in-memory implementation
//! - ProductService, which applies each use case against a repository

pub mod error;
pub mod product;
pub mod repository;
pub mod version;

pub use error::DomainError;
pub use product::{
    AddCategoryToProduct, AdjustStock, Category, CategoryId, CategoryName, CreateProduct,
    InsufficientStockError, Price, Product, ProductDescription, ProductId, ProductName,
    ProductParts, ProductService, RemoveCategoryFromProduct, Stock, UpdateProduct,
    ValidationError,
};
pub use repository::{
    InMemoryProductRepository, ProductRepository, RepositoryError, RepositoryResult, SaveOptions,
};
pub use version::Version;
